use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // After a render failure only reload and quit are offered
    if app.fatal.is_some() {
        match key.code {
            KeyCode::Char('r') => app.reload(),
            KeyCode::Char('q') => app.quit(),
            _ => {}
        }
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('?') => app.toggle_help(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::harness;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_keys() {
        let mut h = harness();
        press(&mut h.app, KeyCode::Char('q'));
        assert!(!h.app.running);

        let mut h = harness();
        handle_key_event(
            &mut h.app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(!h.app.running);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut h = harness();
        press(&mut h.app, KeyCode::Char('?'));
        assert!(h.app.show_help);

        // 'q' closes help instead of quitting
        press(&mut h.app, KeyCode::Char('q'));
        assert!(!h.app.show_help);
        assert!(h.app.running);

        press(&mut h.app, KeyCode::Char('?'));
        press(&mut h.app, KeyCode::Esc);
        assert!(!h.app.show_help);
    }

    #[test]
    fn test_reload_key() {
        let mut h = harness();
        press(&mut h.app, KeyCode::Char('r'));
        assert_eq!(h.app.get_status_message(), Some("Reloaded"));
    }

    #[test]
    fn test_fatal_state_only_accepts_reload_and_quit() {
        let mut h = harness();
        h.app.record_fatal("boom".to_string());

        press(&mut h.app, KeyCode::Char('?'));
        assert!(!h.app.show_help);
        assert!(h.app.fatal.is_some());

        press(&mut h.app, KeyCode::Char('r'));
        assert!(h.app.fatal.is_none());

        h.app.record_fatal("boom".to_string());
        press(&mut h.app, KeyCode::Char('q'));
        assert!(!h.app.running);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut h = harness();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut h.app, key);
        assert!(h.app.running);
    }
}
