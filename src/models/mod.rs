pub mod export;
pub mod id;
pub mod snippet;
pub mod storage;

pub use export::{
    ImportReport, MergeReport, ParsedImport, backup_file_name, export_json, export_to_dir,
    import_file, import_str, merge, parse_import,
};
pub use snippet::{
    DEFAULT_CATEGORIES, DraftError, KNOWN_LANGUAGES, NewSnippet, Snippet, SnippetDraft, parse_tags,
};
pub use storage::{DEFAULT_STORE_KEY, FileStore, KeyValueStore, MemoryStore, SnippetStore};
