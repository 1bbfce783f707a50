//! Terminal rendering with ratatui.
//!
//! ```text
//! ┌ header ────────────────────────────────────────────┐
//! ├ Active Calls ───────────┬ QoS Metrics ─────────────┤
//! │ table (first N rows)    │ bar chart                │
//! ├ Call Network ───────────┴──────────────────────────┤
//! │ canvas, circular layout                            │
//! └ status bar ────────────────────────────────────────┘
//! ```
//!
//! When both sources are failing the panels are replaced by a single
//! connection error. A panic while drawing replaces the whole screen with
//! a reload prompt until the user reloads.

pub mod boundary;
pub mod calls;
pub mod common;
pub mod network;
pub mod qos;
mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Minimum terminal size for a usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 16;

/// Draw one frame of the dashboard.
pub fn render(frame: &mut Frame, app: &mut App) {
    render_guarded(frame, app, render_dashboard);
}

fn render_guarded(frame: &mut Frame, app: &mut App, draw: impl FnOnce(&mut Frame, &App)) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, area);
        return;
    }

    if let Some(message) = &app.fatal {
        common::render_fatal(frame, app, area, message);
        return;
    }

    if let Err(message) = boundary::catch(|| draw(frame, app)) {
        app.record_fatal(message.clone());
        frame.render_widget(Clear, area);
        common::render_fatal(frame, app, area, &message);
    }
}

fn render_dashboard(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let [header, body, status] = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Min(8),    // Panels
        Constraint::Length(1), // Status bar
    ])
    .areas(area);

    common::render_header(frame, app, header);

    if app.connection_lost() {
        common::render_connection_lost(frame, app, body);
    } else {
        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(top);

        calls::render(frame, app, left);
        qos::render(frame, app, right);
        network::render(frame, app, bottom);
    }

    common::render_status_bar(frame, app, status);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

fn render_too_small(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5)
        .intersection(area);
    frame.render_widget(paragraph, centered);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::tests::{harness, sample_calls, sample_qos};
    use crate::source::Snapshot;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    /// Rows of a rendered buffer as plain text.
    pub(crate) fn buffer_lines(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    pub(crate) fn draw_with(
        width: u16,
        height: u16,
        draw: impl FnOnce(&mut Frame),
    ) -> (String, Buffer) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(draw).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (buffer_lines(&buffer).join("\n"), buffer)
    }

    fn draw(app: &mut App) -> String {
        draw_with(100, 40, |frame| render(frame, app)).0
    }

    #[test]
    fn test_initial_frame_shows_spinners() {
        let mut h = harness();
        let text = draw(&mut h.app);
        assert!(text.contains("VoIP Monitoring Dashboard"));
        assert!(text.contains("Active Calls"));
        assert!(text.contains("QoS Metrics"));
        assert_eq!(text.matches("Loading...").count(), 2);
        assert!(text.contains("No call data available for network graph"));
        assert!(text.contains("calls never"));
    }

    #[test]
    fn test_full_dashboard() {
        let mut h = harness();
        h.calls_tx.send(Snapshot::ready(sample_calls())).unwrap();
        h.qos_tx.send(Snapshot::ready(sample_qos())).unwrap();
        h.app.refresh();

        let text = draw(&mut h.app);
        assert!(text.contains("7 calls 4 active"));
        assert!(text.contains("From"));
        assert!(text.contains("Call Network (14 nodes, 7 calls)"));
        assert!(!text.contains("Loading..."));
        assert!(!text.contains("No QoS data available"));
    }

    #[test]
    fn test_connection_lost_replaces_panels() {
        let mut h = harness();
        h.calls_tx.send(Snapshot::failed("Network Error")).unwrap();
        h.qos_tx.send(Snapshot::failed("Network Error")).unwrap();
        h.app.refresh();

        let text = draw(&mut h.app);
        assert!(text.contains("Failed to connect to backend server"));
        assert!(!text.contains("Active Calls"));
        assert!(!text.contains("QoS Metrics"));
        assert!(!text.contains("Call Network"));
    }

    #[test]
    fn test_single_failure_is_inline() {
        let mut h = harness();
        h.calls_tx.send(Snapshot::failed("Network Error")).unwrap();
        h.qos_tx.send(Snapshot::ready(Vec::new())).unwrap();
        h.app.refresh();

        let text = draw(&mut h.app);
        assert!(!text.contains("Failed to connect to backend server"));
        assert!(text.contains("Error: Network Error"));
        assert!(text.contains("No QoS data available"));
    }

    #[test]
    fn test_help_overlay() {
        let mut h = harness();
        h.app.toggle_help();
        let text = draw(&mut h.app);
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("channel: calls"));
    }

    #[test]
    fn test_render_panic_shows_fatal_panel() {
        let mut h = harness();
        let (text, _) = draw_with(100, 40, |frame| {
            render_guarded(frame, &mut h.app, |_, _| panic!("row index out of range"))
        });
        assert!(text.contains("Dashboard Error"));
        assert!(text.contains("row index out of range"));
        assert_eq!(h.app.fatal.as_deref(), Some("row index out of range"));

        // The fatal panel stays until reload
        let text = draw(&mut h.app);
        assert!(text.contains("Dashboard Error"));
        assert!(!text.contains("Active Calls"));

        h.app.reload();
        let text = draw(&mut h.app);
        assert!(!text.contains("Dashboard Error"));
        assert!(text.contains("Active Calls"));
    }

    #[test]
    fn test_too_small() {
        let mut h = harness();
        let (text, _) = draw_with(40, 10, |frame| render(frame, &mut h.app));
        assert!(text.contains("Terminal too small: 40x10"));
    }

    mod live {
        use super::*;
        use std::time::Duration;

        use crate::data::{CallLogEntry, QosMetric};
        use crate::source::{HttpFetcher, PollingSource};
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const QOS_JSON: &str =
            r#"[{"metric":"Jitter (ms)","value":12.5},{"metric":"Latency (ms)","value":120}]"#;

        /// An app driven by two real pollers against `server`.
        fn live_app(server: &MockServer, timeout: Duration) -> App {
            let fetcher = HttpFetcher::new(server.uri(), timeout).unwrap();
            let calls = PollingSource::<CallLogEntry>::start(
                fetcher.clone(),
                "/calls",
                Duration::from_millis(100),
            );
            let qos = PollingSource::<QosMetric>::start(fetcher, "/qos", Duration::from_millis(100));
            App::new(Box::new(calls), Box::new(qos)).with_backend_url(server.uri())
        }

        async fn sleep_ms(ms: u64) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        #[tokio::test]
        async fn test_failing_calls_leave_qos_polling() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/calls"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/qos"))
                .respond_with(ResponseTemplate::new(200).set_body_string(QOS_JSON))
                .mount(&server)
                .await;

            let mut app = live_app(&server, Duration::from_secs(5));
            sleep_ms(250).await;
            app.refresh();

            assert_eq!(
                app.calls.error.as_deref(),
                Some("Request failed with status code 500")
            );
            assert!(app.qos.error.is_none());
            assert_eq!(app.qos.data.len(), 2);
            assert!(!app.connection_lost());
            let first = app.qos.updated_at.unwrap();

            sleep_ms(250).await;
            app.refresh();
            assert!(app.qos.updated_at.unwrap() > first, "qos kept polling");
            assert!(app.qos.error.is_none());
            assert!(app.calls.error.is_some());

            let text = draw(&mut app);
            assert!(text.contains("Request failed with status code 500"));
            assert!(text.contains("QoS Metrics"));
            assert!(!text.contains("Failed to connect to backend server"));
            app.quit();
        }

        #[tokio::test]
        async fn test_both_timing_out_shows_connection_page() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/calls"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string("[]")
                        .set_delay(Duration::from_secs(2)),
                )
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/qos"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(QOS_JSON)
                        .set_delay(Duration::from_secs(2)),
                )
                .mount(&server)
                .await;

            let mut app = live_app(&server, Duration::from_millis(50));
            sleep_ms(300).await;
            app.refresh();

            assert_eq!(app.calls.error.as_deref(), Some("timeout of 50ms exceeded"));
            assert_eq!(app.qos.error.as_deref(), Some("timeout of 50ms exceeded"));
            assert!(app.connection_lost());

            let text = draw(&mut app);
            assert!(text.contains("Error: Failed to connect to backend server"));
            assert!(!text.contains("QoS Metrics"));
            assert!(!text.contains("Active Calls"));
            app.quit();
        }
    }
}
