//! Common UI components shared across panels.
//!
//! This module contains the header bar, status bar, help overlay, and the
//! placeholder states (spinner, inline error, empty message) every panel
//! falls back to.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_age;
use crate::source::Snapshot;
use crate::ui::Theme;

/// Braille spinner frames.
const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Milliseconds per spinner frame.
const SPINNER_STEP_MS: u128 = 80;

/// Bordered block with a title, used by every panel.
pub fn panel_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
}

/// Render the header bar: title, backend URL and call counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " VoIP Monitoring Dashboard ",
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::raw(app.backend_url.clone()),
    ];

    if app.calls.has_loaded() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{}", app.calls.data.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" calls "));
        spans.push(Span::styled(
            format!("{}", app.active_call_count()),
            Style::default().fg(app.theme.healthy),
        ));
        spans.push(Span::raw(" active"));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows the age of each source's data and the available controls. A
/// temporary status message takes precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.fatal.is_some() {
        "r:reload q:quit"
    } else {
        "r:reload ?:help q:quit"
    };
    let status = format!(
        " calls {} | qos {} | {}",
        source_age(&app.calls),
        source_age(&app.qos),
        controls,
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

fn source_age<T>(snapshot: &Snapshot<T>) -> String {
    let age = match snapshot.updated_at {
        Some(at) => format!("{} ago", format_age(at.elapsed())),
        None => "never".to_string(),
    };
    if snapshot.error.is_some() {
        format!("{} (failing)", age)
    } else if snapshot.loading {
        format!("{} (fetching)", age)
    } else {
        age
    }
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let (calls_desc, qos_desc) = app.source_descriptions();
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  r         Reload both sources"),
        Line::from("  ?         Toggle this help"),
        Line::from("  Esc       Close help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Sources",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(format!("  {}", calls_desc)),
        Line::from(format!("  {}", qos_desc)),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_area = centered(area, 60, 14);
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Rect of at most `width` x `height` centered in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Current spinner frame, derived from how long the app has been running.
pub fn spinner_frame(app: &App) -> char {
    let step = app.started.elapsed().as_millis() / SPINNER_STEP_MS;
    SPINNER_FRAMES[(step % SPINNER_FRAMES.len() as u128) as usize]
}

/// Render a panel whose first fetch is still in flight.
pub fn render_spinner(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let text = format!("{} Loading...", spinner_frame(app));
    render_message(frame, block, area, text, Style::default().fg(app.theme.highlight));
}

/// Render a panel whose source failed before ever loading.
pub fn render_error(frame: &mut Frame, app: &App, block: Block, area: Rect, message: &str) {
    render_message(frame, block, area, format!("Error: {}", message), app.theme.error_style());
}

/// Render a single message vertically centered in a bordered panel.
pub fn render_message(frame: &mut Frame, block: Block, area: Rect, text: String, style: Style) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_centered(frame, inner, text, style);
}

/// Render a single message vertically centered in `area`, without a border.
pub fn render_centered(frame: &mut Frame, area: Rect, text: String, style: Style) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let paragraph = Paragraph::new(text).style(style).alignment(Alignment::Center);
    frame.render_widget(paragraph, middle);
}

/// Render the one-line stale-data banner when `error` is set.
///
/// Returns the area left for the panel's content.
pub fn render_stale_banner(frame: &mut Frame, app: &App, area: Rect, error: Option<&str>) -> Rect {
    let Some(error) = error else {
        return area;
    };
    let [banner, rest] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    let paragraph = Paragraph::new(format!("⚠ {} (showing last data)", error))
        .style(app.theme.error_style());
    frame.render_widget(paragraph, banner);
    rest
}

/// Full-page error shown when both sources are failing.
pub fn render_connection_lost(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel_block(" Connection ", &app.theme)
        .border_style(Style::default().fg(app.theme.critical));
    render_message(
        frame,
        block,
        area,
        "Error: Failed to connect to backend server".to_string(),
        app.theme.error_style(),
    );
}

/// Replacement view after a render panic.
pub fn render_fatal(frame: &mut Frame, app: &App, area: Rect, message: &str) {
    let text = vec![
        Line::from(Span::styled("Dashboard Error", app.theme.error_style())),
        Line::from(""),
        Line::from("We encountered an unexpected error. Please try reloading the dashboard."),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), app.theme.muted)),
        Line::from(""),
        Line::from(vec![
            Span::styled("r", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" reload   "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.critical));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    let fatal_area = centered(area, 80, 11);
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, fatal_area);
}
