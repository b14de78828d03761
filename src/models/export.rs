use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ImportError;
use crate::models::Snippet;
use crate::models::storage::{KeyValueStore, SnippetStore};

/// Fields an imported record must carry as non-empty strings
const REQUIRED_FIELDS: [&str; 5] = ["id", "title", "code", "language", "category"];

/// Name of the backup file for the given day
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("codevault-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-printed JSON array of the whole collection
pub fn export_json(snippets: &[Snippet]) -> Result<String> {
    serde_json::to_string_pretty(snippets).context("Failed to serialize snippets to JSON")
}

/// Writes today's backup file into `dir` and returns its path.
/// The collection itself is never modified.
pub fn export_to_dir<B: KeyValueStore>(store: &SnippetStore<B>, dir: &Path) -> Result<PathBuf> {
    let snippets = store.read_all().context("Failed to read snippets for export")?;
    let json = export_json(&snippets)?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(backup_file_name(Utc::now().date_naive()));
    fs::write(&path, json).context("Failed to write JSON export file")?;

    info!("Exported {} snippets to {}", snippets.len(), path.display());
    Ok(path)
}

/// Result of parsing an import document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedImport {
    /// Records that passed validation, in file order
    pub snippets: Vec<Snippet>,
    /// Elements in the document
    pub records: usize,
    /// Elements dropped by validation
    pub invalid: usize,
}

/// Counts from merging imported records into a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub duplicates: usize,
}

/// Outcome of a successful import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub records: usize,
    pub invalid: usize,
    pub duplicates: usize,
    pub imported: usize,
}

/// Optional fields are filled in when the exporter left them out
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    code: String,
    language: String,
    category: String,
    #[serde(default)]
    tags: Option<Vec<Value>>,
    #[serde(default)]
    created_at: Option<Millis>,
    #[serde(default)]
    updated_at: Option<Millis>,
}

/// Epoch milliseconds; some exporters write them as floats
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Millis {
    Integer(i64),
    Float(f64),
}

impl Millis {
    fn millis(self) -> i64 {
        match self {
            Millis::Integer(value) => value,
            Millis::Float(value) => value as i64,
        }
    }
}

impl ImportRecord {
    fn into_snippet(self, now: i64) -> Snippet {
        let tags = self
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| match tag {
                Value::String(tag) if !tag.is_empty() => Some(tag),
                _ => None,
            })
            .collect();
        let created_at = self.created_at.map_or(now, Millis::millis);

        Snippet {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            code: self.code,
            language: self.language,
            category: self.category,
            tags,
            created_at,
            updated_at: self.updated_at.map_or(created_at, Millis::millis),
        }
    }
}

fn has_required_fields(item: &Value) -> bool {
    REQUIRED_FIELDS.iter().all(|field| {
        item.get(field)
            .and_then(Value::as_str)
            .is_some_and(|value| !value.is_empty())
    })
}

fn validate_record(item: Value, now: i64) -> Option<Snippet> {
    if !has_required_fields(&item) {
        return None;
    }

    match serde_json::from_value::<ImportRecord>(item) {
        Ok(record) => Some(record.into_snippet(now)),
        Err(e) => {
            debug!("Dropping malformed import record: {}", e);
            None
        }
    }
}

/// Parses an import document. The top level must be a JSON array;
/// elements that fail validation are dropped and counted.
pub fn parse_import(contents: &str) -> Result<ParsedImport, ImportError> {
    let value: Value = serde_json::from_str(contents)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    let now = Utc::now().timestamp_millis();
    let records = items.len();
    let snippets: Vec<Snippet> = items
        .into_iter()
        .filter_map(|item| validate_record(item, now))
        .collect();
    let invalid = records - snippets.len();

    if invalid > 0 {
        warn!("Skipped {} invalid records during import", invalid);
    }

    Ok(ParsedImport {
        snippets,
        records,
        invalid,
    })
}

/// Appends imported records whose id is not already present.
///
/// Existing records are never replaced and keep their order. A repeated
/// id inside the imported batch keeps only its first occurrence.
pub fn merge(existing: Vec<Snippet>, imported: Vec<Snippet>) -> (Vec<Snippet>, MergeReport) {
    let mut seen: HashSet<String> = existing.iter().map(|s| s.id.clone()).collect();
    let mut merged = existing;
    let mut report = MergeReport::default();

    for snippet in imported {
        if seen.insert(snippet.id.clone()) {
            merged.push(snippet);
            report.added += 1;
        } else {
            report.duplicates += 1;
        }
    }

    (merged, report)
}

/// Imports a document into the store with a single write and then calls
/// `on_complete`. On error the stored collection is left untouched.
pub fn import_str<B, F>(
    store: &SnippetStore<B>,
    contents: &str,
    on_complete: F,
) -> Result<ImportReport, ImportError>
where
    B: KeyValueStore,
    F: FnOnce(&ImportReport),
{
    let parsed = parse_import(contents)?;
    let existing = store.read_all()?;
    let (merged, merge_report) = merge(existing, parsed.snippets);

    if merge_report.added > 0 {
        store.replace_all(&merged)?;
    }

    let report = ImportReport {
        records: parsed.records,
        invalid: parsed.invalid,
        duplicates: merge_report.duplicates,
        imported: merge_report.added,
    };
    info!(
        "Imported {} of {} records ({} invalid, {} duplicates)",
        report.imported, report.records, report.invalid, report.duplicates
    );

    on_complete(&report);
    Ok(report)
}

/// Reads `path` and imports its contents
pub fn import_file<B, F>(
    store: &SnippetStore<B>,
    path: &Path,
    on_complete: F,
) -> Result<ImportReport, ImportError>
where
    B: KeyValueStore,
    F: FnOnce(&ImportReport),
{
    let contents = fs::read_to_string(path)?;
    import_str(store, &contents, on_complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::storage::MemoryStore;
    use serde_json::json;

    fn snippet(id: &str, title: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            code: "x".to_string(),
            language: "js".to_string(),
            category: "misc".to_string(),
            tags: Vec::new(),
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn backup_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(backup_file_name(date), "codevault-backup-2024-03-07.json");
    }

    #[test]
    fn export_is_indented_array() {
        let json = export_json(&[snippet("a", "A")]).unwrap();
        assert!(json.starts_with("[\n  {\n    \"id\": \"a\""));
        assert!(json.contains("\"createdAt\": 1"));
    }

    #[test]
    fn parse_rejects_non_arrays() {
        assert!(matches!(
            parse_import(r#"{"not":"an array"}"#),
            Err(ImportError::NotAnArray)
        ));
        assert!(matches!(parse_import("nope"), Err(ImportError::Parse(_))));
    }

    #[test]
    fn parse_drops_incomplete_records() {
        let doc = json!([
            {"id": "c"},
            {"id": "d", "title": "", "code": "x", "language": "js", "category": "misc"},
            {"id": "e", "title": "E", "code": "x", "language": "js", "category": "misc"},
            "string element",
            {"id": 5, "title": "N", "code": "x", "language": "js", "category": "misc"}
        ]);
        let parsed = parse_import(&doc.to_string()).unwrap();

        assert_eq!(parsed.records, 5);
        assert_eq!(parsed.invalid, 4);
        assert_eq!(parsed.snippets.len(), 1);
        assert_eq!(parsed.snippets[0].id, "e");
        assert_eq!(parsed.snippets[0].description, "");
        assert!(parsed.snippets[0].tags.is_empty());
    }

    #[test]
    fn parse_keeps_string_tags_only() {
        let doc = json!([{
            "id": "t", "title": "T", "code": "x", "language": "js", "category": "misc",
            "tags": ["a", "", 3, "b"], "createdAt": 10
        }]);
        let parsed = parse_import(&doc.to_string()).unwrap();

        assert_eq!(parsed.snippets[0].tags, vec!["a", "b"]);
        assert_eq!(parsed.snippets[0].created_at, 10);
        assert_eq!(parsed.snippets[0].updated_at, 10);
    }

    #[test]
    fn parse_truncates_float_timestamps() {
        let doc = json!([{
            "id": "f", "title": "F", "code": "x", "language": "js", "category": "misc",
            "createdAt": 1.7e12, "updatedAt": 1700000000123.9
        }]);
        let parsed = parse_import(&doc.to_string()).unwrap();

        assert_eq!(parsed.invalid, 0);
        assert_eq!(parsed.snippets[0].created_at, 1_700_000_000_000);
        assert_eq!(parsed.snippets[0].updated_at, 1_700_000_000_123);
    }

    #[test]
    fn merge_keeps_existing_and_appends() {
        let existing = vec![snippet("a", "original")];
        let imported = vec![snippet("a", "X"), snippet("b", "Y"), snippet("b", "Y again")];

        let (merged, report) = merge(existing, imported);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "original");
        assert_eq!(merged[1].title, "Y");
        assert_eq!(report, MergeReport { added: 1, duplicates: 2 });
    }

    #[test]
    fn import_invokes_callback_on_success_only() {
        let store = SnippetStore::with_default_key(MemoryStore::new());
        let mut notified = None;

        let doc = json!([{"id": "b", "title": "Y", "code": "c", "language": "js", "category": "misc"}]);
        let report = import_str(&store, &doc.to_string(), |r| notified = Some(*r)).unwrap();
        assert_eq!(notified, Some(report));
        assert_eq!(report.imported, 1);

        let mut called = false;
        let result = import_str(&store, "[1, 2", |_| called = true);
        assert!(matches!(result, Err(ImportError::Parse(_))));
        assert!(!called);
    }
}
