//! codevault - Code Snippet Vault
//!
//! Stores small pieces of source code with a title, description,
//! language, category and tags. The whole collection lives in one JSON
//! document in the user's data directory and can be exported to, and
//! merged back from, dated backup files.
//!
//! - `models` holds the snippet type, the store and the import/export codec
//! - `search` and `highlight` are pure helpers for presenting snippets
//! - `cli`, `app`, `ui` and `handlers` make up the terminal front ends
//! - `clipboard` copies snippet code out of the browser

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod handlers;
pub mod highlight;
pub mod models;
pub mod search;
pub mod ui;

pub use config::Config;
pub use error::{ImportError, StoreError};
pub use models::{ImportReport, NewSnippet, Snippet, SnippetDraft, SnippetStore};
