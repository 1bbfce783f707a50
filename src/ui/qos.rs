//! QoS metrics bar chart.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup},
    Frame,
};

use crate::app::{App, PanelState};
use crate::data::QosMetric;
use crate::ui::common::{
    panel_block, render_centered, render_error, render_spinner, render_stale_banner,
};

const TITLE: &str = " QoS Metrics ";

/// Height given to the largest metric. Bars are drawn relative to it, the
/// exact value is shown as the bar label.
const BAR_RANGE: u64 = 10_000;

/// Render the QoS panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel_block(TITLE, &app.theme);

    let (metrics, error) = match app.qos_state() {
        PanelState::Loading => return render_spinner(frame, app, block, area),
        PanelState::Failed(message) => return render_error(frame, app, block, area, message),
        PanelState::Ready { data, error } => (data, error),
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let area = render_stale_banner(frame, app, inner, error);

    if metrics.is_empty() {
        let text = "No QoS data available".to_string();
        return render_centered(frame, area, text, app.theme.muted);
    }

    let bars: Vec<Bar> = metrics
        .iter()
        .zip(bar_heights(metrics))
        .map(|(m, height)| {
            Bar::default()
                .label(Line::from(m.metric.clone()))
                .value(height)
                .text_value(format!("{:.2}", m.value))
                .style(Style::default().fg(app.theme.bar))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(area.width, metrics.len()))
        .bar_gap(2)
        .max(BAR_RANGE)
        .value_style(app.theme.header);
    frame.render_widget(chart, area);
}

/// Bar heights scaled so the largest metric reaches [`BAR_RANGE`].
///
/// Negative and non-finite values draw as empty.
fn bar_heights(metrics: &[QosMetric]) -> Vec<u64> {
    let drawable = |v: f64| v.is_finite() && v > 0.0;
    let max = metrics
        .iter()
        .map(|m| m.value)
        .filter(|v| drawable(*v))
        .fold(0.0_f64, f64::max);

    metrics
        .iter()
        .map(|m| {
            if drawable(m.value) && max > 0.0 {
                ((m.value / max) * BAR_RANGE as f64).round() as u64
            } else {
                0
            }
        })
        .collect()
}

/// Widest bar that fits `count` bars (with gaps) into `width` columns.
fn bar_width(width: u16, count: usize) -> u16 {
    let count = count.max(1) as u16;
    let gaps = 2 * count.saturating_sub(1);
    (width.saturating_sub(gaps) / count).clamp(1, 24)
}
