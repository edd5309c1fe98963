use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ddi_core::PendingSubmission;

use super::app::{AppState, Focus};

/// What the event loop has to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KeyAction {
    None,
    Dispatch(PendingSubmission),
    Quit,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    if app.confirm_quit {
        if key.code == KeyCode::Esc {
            return KeyAction::Quit;
        }
        app.confirm_quit = false;
    }

    match key.code {
        KeyCode::Esc => app.confirm_quit = true,
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Char('l') if ctrl => app.clear(),
        KeyCode::Char('s') if ctrl => app.export_history(),
        KeyCode::Enter if app.focus == Focus::History => app.recall_selected(),
        KeyCode::Enter => {
            if let Some(pending) = app.submit() {
                return KeyAction::Dispatch(pending);
            }
        }
        KeyCode::Down if app.focus == Focus::History => app.select_next(),
        KeyCode::Up if app.focus == Focus::History => app.select_prev(),
        KeyCode::Down => app.focus_next(),
        KeyCode::Up => app.focus_prev(),
        KeyCode::Backspace => {
            if let Some(input) = app.focused_input_mut() {
                input.pop();
            }
        }
        KeyCode::Char(ch) if !ctrl => {
            if let Some(input) = app.focused_input_mut() {
                input.push(ch);
            }
        }
        _ => {}
    }
    KeyAction::None
}
