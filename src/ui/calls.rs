//! Call log table.
//!
//! Shows the first few entries of the call log in backend order with the
//! call status colored by whether the call is still active.

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::app::{App, PanelState};
use crate::ui::common::{panel_block, render_error, render_spinner, render_stale_banner};

const TITLE: &str = " Active Calls ";

/// Render the call log panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel_block(TITLE, &app.theme);

    let error = match app.calls_state() {
        PanelState::Loading => return render_spinner(frame, app, block, area),
        PanelState::Failed(message) => return render_error(frame, app, block, area, message),
        PanelState::Ready { error, .. } => error,
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let area = render_stale_banner(frame, app, inner, error);

    let calls = app.visible_calls();
    let show_timing = calls.iter().any(|c| c.start.is_some() || c.duration.is_some());

    let mut header = vec![Cell::from("From"), Cell::from("To"), Cell::from("Status")];
    let mut widths = vec![
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(8),
    ];
    if show_timing {
        header.extend([Cell::from("Start"), Cell::from("Duration")]);
        widths.extend([Constraint::Length(19), Constraint::Length(8)]);
    }
    let header = Row::new(header).height(1).style(app.theme.header);

    let rows: Vec<Row> = calls
        .iter()
        .map(|call| {
            let mut cells = vec![
                Cell::from(call.caller().unwrap_or_default().to_string()),
                Cell::from(call.callee().unwrap_or_default().to_string()),
                Cell::from(call.status.clone()).style(app.theme.call_status_style(call)),
            ];
            if show_timing {
                cells.push(Cell::from(or_dash(&call.start)));
                cells.push(Cell::from(or_dash(&call.duration)));
            }
            Row::new(cells)
        })
        .collect();

    let table = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(table, area);
}

fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{harness, sample_calls};
    use crate::data::CallLogEntry;
    use crate::source::Snapshot;
    use crate::ui::tests::{buffer_lines, draw_with};

    #[test]
    fn test_table_shows_first_rows_only() {
        let mut h = harness();
        h.calls_tx.send(Snapshot::ready(sample_calls())).unwrap();
        h.app.refresh();

        let (text, _) = draw_with(80, 12, |frame| {
            let area = frame.area();
            render(frame, &h.app, area)
        });
        assert!(text.contains("sip:user0@example.com"));
        assert!(text.contains("sip:user4@example.com"));
        assert!(!text.contains("sip:user5@example.com"));
        assert!(!text.contains("Start"));
    }

    #[test]
    fn test_status_colors() {
        let mut h = harness();
        h.calls_tx.send(Snapshot::ready(sample_calls())).unwrap();
        h.app.refresh();

        let (_, buffer) = draw_with(80, 12, |frame| {
            let area = frame.area();
            render(frame, &h.app, area)
        });
        let lines = buffer_lines(&buffer);
        let find = |needle: &str| {
            // Skip the border row, its title also says "Active"
            lines.iter().enumerate().skip(1).find_map(|(y, line)| {
                line.find(needle).map(|x| (line[..x].chars().count() as u16, y as u16))
            })
        };

        let active = find("Active").unwrap();
        let ended = find("Ended").unwrap();
        assert_eq!(buffer[active].fg, h.app.theme.healthy);
        assert_eq!(buffer[ended].fg, h.app.theme.critical);
    }

    #[test]
    fn test_timing_columns_when_present() {
        let mut h = harness();
        let calls = vec![CallLogEntry {
            call_id: Some("c1".to_string()),
            caller: Some("alice".to_string()),
            callee: Some("bob".to_string()),
            status: "Active".to_string(),
            start: Some("2024-05-01 10:00:00".to_string()),
            duration: None,
        }];
        h.calls_tx.send(Snapshot::ready(calls)).unwrap();
        h.app.refresh();

        let (text, _) = draw_with(80, 8, |frame| {
            let area = frame.area();
            render(frame, &h.app, area)
        });
        assert!(text.contains("Start"));
        assert!(text.contains("Duration"));
        assert!(text.contains("2024-05-01 10:00:00"));
    }

    #[test]
    fn test_stale_rows_stay_visible_with_banner() {
        let mut h = harness();
        let mut snapshot = Snapshot::ready(sample_calls());
        snapshot.error = Some("Request failed with status code 503".to_string());
        h.calls_tx.send(snapshot).unwrap();
        h.app.refresh();

        let (text, _) = draw_with(80, 12, |frame| {
            let area = frame.area();
            render(frame, &h.app, area)
        });
        assert!(text.contains("Request failed with status code 503"));
        assert!(text.contains("showing last data"));
        assert!(text.contains("sip:user0@example.com"));
    }
}
