use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use karlink_core::{Command, LinkHandle};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    ToggleDeathLink,
    ShowStatus,
}

/// Spawn a thread that turns single key presses into link commands.
///
/// - Esc, `q`, `Q` or Ctrl+C stops the link
/// - `d` toggles death link
/// - `s` logs the Dolphin connection status
pub fn spawn_keyboard_monitor(handle: LinkHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Keyboard monitor started");

        while !handle.wake().is_shutdown() {
            if event::poll(Duration::from_millis(100)).unwrap_or(false)
                && let Ok(Event::Key(key_event)) = event::read()
                && let Some(action) = key_action(&key_event)
            {
                debug!("Key pressed: {:?} -> {:?}", key_event.code, action);
                match action {
                    KeyAction::Quit => {
                        handle.shutdown();
                        break;
                    }
                    KeyAction::ToggleDeathLink => {
                        handle.send(Command::ToggleDeathLink);
                    }
                    KeyAction::ShowStatus => {
                        handle.send(Command::ShowStatus);
                    }
                }
            }
        }

        debug!("Keyboard monitor stopped");
    })
}

fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    match event.code {
        KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(KeyAction::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char('d') | KeyCode::Char('D') => Some(KeyAction::ToggleDeathLink),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(KeyAction::ShowStatus),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(key_action(&esc), Some(KeyAction::Quit));

        let q = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(key_action(&q), Some(KeyAction::Quit));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_action(&ctrl_c), Some(KeyAction::Quit));
    }

    #[test]
    fn test_command_keys() {
        let d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE);
        assert_eq!(key_action(&d), Some(KeyAction::ToggleDeathLink));

        let s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(key_action(&s), Some(KeyAction::ShowStatus));
    }

    #[test]
    fn test_other_keys_ignored() {
        let a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(key_action(&a), None);

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(key_action(&enter), None);

        let c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(key_action(&c), None);
    }
}
