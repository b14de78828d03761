//! User Interface Module
//!
//! Rendering for the interactive snippet browser. Everything here reads
//! the `App` state and draws it; state changes live in `app` and
//! `handlers`.

pub mod browser;
pub mod colors;
pub mod components;

use crate::app::{App, InputMode};
use crate::models::KeyValueStore;
use ratatui::Frame;

pub fn render<B: KeyValueStore>(frame: &mut Frame, app: &App<B>) {
    browser::render(frame, app);

    match &app.input_mode {
        InputMode::ConfirmDelete { id } => components::render_confirm_delete(frame, app, id),
        InputMode::ImportPath => components::render_import_prompt(frame, app),
        InputMode::HelpMenu => components::render_help(frame),
        InputMode::Normal | InputMode::Search => {}
    }
}
