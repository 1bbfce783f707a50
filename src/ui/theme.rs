//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{CallLogEntry, NodeKind};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for titles and highlights.
    pub highlight: Color,
    /// Color for active calls.
    pub healthy: Color,
    /// Color for errors and calls that are not active.
    pub critical: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Color of caller nodes in the call network.
    pub caller: Color,
    /// Color of callee nodes in the call network.
    pub callee: Color,
    /// Color of edges in the call network.
    pub edge: Color,
    /// Fill color of QoS bars.
    pub bar: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for placeholder messages ("No QoS data available", ...).
    pub muted: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            healthy: Color::Green,
            critical: Color::Red,
            border: Color::Gray,
            caller: Color::LightBlue,
            callee: Color::LightMagenta,
            edge: Color::DarkGray,
            bar: Color::Indexed(62),
            header: Style::default()
                .fg(Color::White)
                .bg(Color::Indexed(62))
                .add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            healthy: Color::Green,
            critical: Color::Red,
            border: Color::DarkGray,
            caller: Color::Blue,
            callee: Color::Magenta,
            edge: Color::Gray,
            bar: Color::Indexed(62),
            header: Style::default()
                .fg(Color::White)
                .bg(Color::Indexed(62))
                .add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for the status cell of a call
    pub fn call_status_style(&self, call: &CallLogEntry) -> Style {
        if call.is_active() {
            Style::default().fg(self.healthy).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.critical)
        }
    }

    /// Color of a node in the call network
    pub fn node_color(&self, kind: NodeKind) -> Color {
        match kind {
            NodeKind::Caller => self.caller,
            NodeKind::Callee => self.callee,
        }
    }

    /// Style for inline error messages
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
