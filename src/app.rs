use crate::clipboard;
use crate::models::{KeyValueStore, Snippet, SnippetStore, export, import_str};
use crate::search::{self, ALL_CATEGORIES, Stats};
use log::warn;
use ratatui::Frame;
use std::path::PathBuf;

/// What keyboard input is currently driving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    ImportPath,
    ConfirmDelete { id: String },
    HelpMenu,
}

/// Browser state.
///
/// `snippets` is a copy of the persisted collection, re-read after every
/// mutation; the store stays the only writer.
pub struct App<B: KeyValueStore> {
    pub store: SnippetStore<B>,
    pub export_dir: PathBuf,
    pub snippets: Vec<Snippet>,
    pub search_query: String,
    pub selected_category: String,
    pub selected: usize,
    pub content_scroll_position: usize,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl<B: KeyValueStore> App<B> {
    pub fn new(store: SnippetStore<B>, export_dir: PathBuf) -> Self {
        let mut app = Self {
            store,
            export_dir,
            snippets: Vec::new(),
            search_query: String::new(),
            selected_category: ALL_CATEGORIES.to_string(),
            selected: 0,
            content_scroll_position: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            error_message: None,
            success_message: None,
        };
        app.reload();
        app
    }

    pub fn render(&self, frame: &mut Frame) {
        crate::ui::render(frame, self);
    }

    /// Re-reads the collection from the store
    pub fn reload(&mut self) {
        match self.store.read_all() {
            Ok(snippets) => self.snippets = snippets,
            Err(e) => {
                warn!("Error loading snippets: {}", e);
                self.snippets.clear();
                self.set_error_message(format!("Could not load snippets: {}", e));
            }
        }

        // A category can vanish after a delete or an external edit
        if !self.categories().contains(&self.selected_category) {
            self.selected_category = ALL_CATEGORIES.to_string();
        }
        self.clamp_selection();
    }

    pub fn filtered(&self) -> Vec<&Snippet> {
        search::filter(&self.snippets, &self.search_query, &self.selected_category)
    }

    pub fn categories(&self) -> Vec<String> {
        search::categories(&self.snippets)
    }

    pub fn stats(&self) -> Stats {
        Stats::compute(&self.snippets, &self.search_query, &self.selected_category)
    }

    pub fn selected_snippet(&self) -> Option<&Snippet> {
        self.filtered().get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn next_snippet(&mut self) {
        let len = self.filtered().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
            self.content_scroll_position = 0;
        }
    }

    pub fn previous_snippet(&mut self) {
        let len = self.filtered().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
            self.content_scroll_position = 0;
        }
    }

    fn step_category(&mut self, forward: bool) {
        let categories = self.categories();
        let current = categories
            .iter()
            .position(|c| *c == self.selected_category)
            .unwrap_or(0);
        let len = categories.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };

        self.selected_category = categories[next].clone();
        self.selected = 0;
        self.content_scroll_position = 0;
    }

    pub fn next_category(&mut self) {
        self.step_category(true);
    }

    pub fn previous_category(&mut self) {
        self.step_category(false);
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
        self.selected = 0;
        self.content_scroll_position = 0;
    }

    pub fn scroll_content(&mut self, down: bool, lines: usize) {
        self.content_scroll_position = if down {
            self.content_scroll_position.saturating_add(lines)
        } else {
            self.content_scroll_position.saturating_sub(lines)
        };
    }

    /// Asks for confirmation before deleting the selected snippet
    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_snippet().map(|s| s.id.clone()) {
            self.input_mode = InputMode::ConfirmDelete { id };
        }
    }

    pub fn delete_snippet(&mut self, id: &str) {
        match self.store.delete(id) {
            Ok(true) => self.set_success_message("Snippet deleted".to_string()),
            Ok(false) => self.set_error_message("Snippet no longer exists".to_string()),
            Err(e) => self.set_error_message(format!("Failed to delete snippet: {}", e)),
        }
        self.reload();
    }

    /// Copies the selected snippet's code to the system clipboard
    pub fn copy_selected(&mut self) {
        self.copy_selected_with(clipboard::copy_to_clipboard);
    }

    pub fn copy_selected_with(&mut self, copy: impl FnOnce(&str) -> anyhow::Result<()>) {
        let Some(snippet) = self.selected_snippet() else {
            self.set_error_message("No snippet selected".to_string());
            return;
        };
        let title = snippet.title.clone();

        match copy(&snippet.code) {
            Ok(()) => self.set_success_message(format!("Copied {} to clipboard", title)),
            Err(e) => {
                warn!("Failed to copy to clipboard: {:#}", e);
                self.set_error_message(format!("Copy failed: {:#}", e));
            }
        }
    }

    pub fn export(&mut self) {
        match export::export_to_dir(&self.store, &self.export_dir) {
            Ok(path) => self.set_success_message(format!("Exported to {}", path.display())),
            Err(e) => self.set_error_message(format!("Export failed: {:#}", e)),
        }
    }

    pub fn import_from(&mut self, path: &str) {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                self.set_error_message(format!("Could not read {}: {}", path, e));
                return;
            }
        };

        let mut refresh = false;
        let result = import_str(&self.store, &contents, |_| refresh = true);
        if refresh {
            self.reload();
        }

        match result {
            Ok(report) => self.set_success_message(format!(
                "Imported {} new snippets ({} skipped)",
                report.imported,
                report.duplicates + report.invalid
            )),
            Err(e) => self.set_error_message(format!(
                "Error importing file. Please check the file format. ({})",
                e
            )),
        }
    }

    pub fn set_error_message(&mut self, message: String) {
        self.success_message = None;
        self.error_message = Some(message);
    }

    pub fn set_success_message(&mut self, message: String) {
        self.error_message = None;
        self.success_message = Some(message);
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }
}
