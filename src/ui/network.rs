//! Call network panel.
//!
//! Draws the projected call graph on a canvas: nodes evenly spaced on a
//! circle in projection order, one line per call from caller to callee.

use std::collections::HashMap;

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::canvas::{Canvas, Line as CanvasLine, Points},
    Frame,
};

use crate::app::App;
use crate::data::{circle_layout, CallGraph, NodeKind};
use crate::ui::common::{panel_block, render_message};

/// Longest node label drawn before truncation.
const MAX_LABEL: usize = 24;

/// Render the call network panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let graph = &app.graph;
    let title = format!(
        " Call Network ({} nodes, {} calls) ",
        graph.nodes().count(),
        graph.edges().count()
    );
    let block = panel_block(&title, &app.theme);

    if graph.is_empty() {
        let text = "No call data available for network graph".to_string();
        return render_message(frame, block, area, text, app.theme.muted);
    }

    let positions = node_positions(graph);
    let theme = &app.theme;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-1.6, 1.6])
        .y_bounds([-1.25, 1.25])
        .paint(|ctx| {
            for edge in graph.edges() {
                let (Some(&(x1, y1)), Some(&(x2, y2))) =
                    (positions.get(edge.source.as_str()), positions.get(edge.target.as_str()))
                else {
                    continue;
                };
                ctx.draw(&CanvasLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: theme.edge,
                });
            }
            ctx.layer();

            for node in graph.nodes() {
                let Some(&(x, y)) = positions.get(node.id.as_str()) else {
                    continue;
                };
                let color = theme.node_color(node.kind);
                ctx.draw(&Points {
                    coords: &[(x, y)],
                    color,
                });
                let marker = match node.kind {
                    NodeKind::Caller => "● ",
                    NodeKind::Callee => "◆ ",
                };
                ctx.print(
                    x * 1.08,
                    y * 1.08,
                    Span::styled(
                        format!("{}{}", marker, truncate(&node.label, MAX_LABEL)),
                        Style::default().fg(color),
                    ),
                );
            }
        });

    frame.render_widget(canvas, area);
}

/// Canvas coordinates of every node, keyed by node id.
fn node_positions(graph: &CallGraph) -> HashMap<&str, (f64, f64)> {
    let nodes: Vec<_> = graph.nodes().collect();
    nodes
        .iter()
        .zip(circle_layout(nodes.len()))
        .map(|(node, pos)| (node.id.as_str(), pos))
        .collect()
}

fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let mut out: String = label.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
