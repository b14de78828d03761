//! Keyboard Input Handling Module
//!
//! Routes each key event according to the current input mode and applies
//! the matching action to the browser state.

use crate::app::{App, InputMode};
use crate::models::KeyValueStore;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const PAGE: usize = 10;

/// Handles one key event. Returns `true` when the application should quit.
pub fn handle_key_events<B: KeyValueStore>(key: KeyEvent, app: &mut App<B>) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    // Ctrl-C quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.input_mode.clone() {
        InputMode::Normal => handle_normal_keys(key, app),
        InputMode::Search => {
            handle_search_keys(key, app);
            false
        }
        InputMode::ImportPath => {
            handle_import_keys(key, app);
            false
        }
        InputMode::ConfirmDelete { id } => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    app.input_mode = InputMode::Normal;
                    app.delete_snippet(&id);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.input_mode = InputMode::Normal;
                }
                _ => {}
            }
            false
        }
        InputMode::HelpMenu => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.input_mode = InputMode::Normal;
            }
            false
        }
    }
}

fn handle_normal_keys<B: KeyValueStore>(key: KeyEvent, app: &mut App<B>) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Esc => {
            if app.search_query.is_empty() {
                app.clear_messages();
            } else {
                app.set_search_query(String::new());
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.next_snippet(),
        KeyCode::Up | KeyCode::Char('k') => app.previous_snippet(),
        KeyCode::Tab => app.next_category(),
        KeyCode::BackTab => app.previous_category(),
        KeyCode::PageDown => app.scroll_content(true, PAGE),
        KeyCode::PageUp => app.scroll_content(false, PAGE),
        KeyCode::Char('/') => {
            app.clear_messages();
            app.input_buffer = app.search_query.clone();
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('y') => app.copy_selected(),
        KeyCode::Char('x') => app.export(),
        KeyCode::Char('i') => {
            app.clear_messages();
            app.input_buffer.clear();
            app.input_mode = InputMode::ImportPath;
        }
        KeyCode::Char('r') => {
            app.clear_messages();
            app.reload();
        }
        KeyCode::Char('?') => app.input_mode = InputMode::HelpMenu,
        _ => {}
    }
    false
}

/// Search filters live while typing; Enter keeps the query, Esc clears it
fn handle_search_keys<B: KeyValueStore>(key: KeyEvent, app: &mut App<B>) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.input_buffer.clear();
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.input_buffer.clear();
            app.set_search_query(String::new());
        }
        KeyCode::Backspace => {
            app.input_buffer.pop();
            app.set_search_query(app.input_buffer.clone());
        }
        KeyCode::Char(c) => {
            app.input_buffer.push(c);
            app.set_search_query(app.input_buffer.clone());
        }
        KeyCode::Down => app.next_snippet(),
        KeyCode::Up => app.previous_snippet(),
        _ => {}
    }
}

fn handle_import_keys<B: KeyValueStore>(key: KeyEvent, app: &mut App<B>) {
    match key.code {
        KeyCode::Enter => {
            let path = app.input_buffer.trim().to_string();
            app.input_buffer.clear();
            app.input_mode = InputMode::Normal;
            if !path.is_empty() {
                app.import_from(&path);
            }
        }
        KeyCode::Esc => {
            app.input_buffer.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => app.input_buffer.push(c),
        _ => {}
    }
}
