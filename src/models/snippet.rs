use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Languages offered when adding or editing a snippet. Any other string
/// is still accepted and stored as-is.
pub const KNOWN_LANGUAGES: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "java",
    "cpp",
    "css",
    "html",
    "sql",
    "bash",
    "json",
    "yaml",
    "markdown",
    "php",
    "ruby",
    "go",
    "rust",
];

/// Categories offered when adding or editing a snippet.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "react",
    "css",
    "html",
    "node",
    "utility",
    "algorithm",
    "api",
    "database",
    "other",
];

pub const DEFAULT_LANGUAGE: &str = "javascript";
pub const DEFAULT_CATEGORY: &str = "javascript";

/// A stored code sample with its metadata.
///
/// Field names are part of the persisted and exported format and must
/// not change: `id, title, description, code, language, category, tags,
/// createdAt, updatedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: String,
    pub category: String,
    pub tags: Vec<String>,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every edit
    pub updated_at: i64,
}

/// Insert payload: a snippet without its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: String,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl NewSnippet {
    pub fn with_id(self, id: String) -> Snippet {
        Snippet {
            id,
            title: self.title,
            description: self.description,
            code: self.code,
            language: self.language,
            category: self.category,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Snippet {
    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }

    pub fn language_name(&self) -> String {
        language_display_name(&self.language)
    }
}

/// Why a draft cannot be saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    MissingTitle,
    MissingCode,
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::MissingTitle => write!(f, "title must not be empty"),
            DraftError::MissingCode => write!(f, "code must not be empty"),
        }
    }
}

impl std::error::Error for DraftError {}

/// Raw user input for a snippet, before trimming and validation.
///
/// Tags are entered as one comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetDraft {
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: String,
    pub category: String,
    pub tags: String,
}

impl Default for SnippetDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            code: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            tags: String::new(),
        }
    }
}

impl SnippetDraft {
    /// Prefills a draft from an existing snippet, for editing
    pub fn from_snippet(snippet: &Snippet) -> Self {
        Self {
            title: snippet.title.clone(),
            description: snippet.description.clone(),
            code: snippet.code.clone(),
            language: snippet.language.clone(),
            category: snippet.category.clone(),
            tags: snippet.tags.join(", "),
        }
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.code.trim().is_empty() {
            return Err(DraftError::MissingCode);
        }
        Ok(())
    }

    /// Builds the insert payload. The store stamps the final timestamps.
    pub fn into_new_snippet(self) -> Result<NewSnippet, DraftError> {
        self.validate()?;
        let now = Utc::now().timestamp_millis();

        Ok(NewSnippet {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            code: self.code.trim().to_string(),
            language: self.language,
            category: self.category,
            tags: parse_tags(&self.tags),
            created_at: now,
            updated_at: now,
        })
    }

    /// Produces the edited copy of `original`, keeping its id and
    /// creation time and refreshing `updatedAt`.
    pub fn apply_to(self, original: &Snippet) -> Result<Snippet, DraftError> {
        self.validate()?;

        Ok(Snippet {
            id: original.id.clone(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            code: self.code.trim().to_string(),
            language: self.language,
            category: self.category,
            tags: parse_tags(&self.tags),
            created_at: original.created_at,
            updated_at: Utc::now().timestamp_millis(),
        })
    }
}

/// Splits a comma-separated tag string, dropping blanks
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Human readable name for a language key
pub fn language_display_name(language: &str) -> String {
    let name = match language {
        "javascript" => "JavaScript",
        "typescript" => "TypeScript",
        "python" => "Python",
        "java" => "Java",
        "cpp" => "C++",
        "css" => "CSS",
        "html" => "HTML",
        "sql" => "SQL",
        "bash" => "Bash",
        "json" => "JSON",
        "yaml" => "YAML",
        "markdown" => "Markdown",
        "php" => "PHP",
        "ruby" => "Ruby",
        "go" => "Go",
        "rust" => "Rust",
        other => return capitalize(other),
    };
    name.to_string()
}

/// Uppercases the first character
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snippet {
        Snippet {
            id: "abc".to_string(),
            title: "Debounce".to_string(),
            description: "Delay calls".to_string(),
            code: "function debounce() {}".to_string(),
            language: "javascript".to_string(),
            category: "utility".to_string(),
            tags: vec!["timing".to_string(), "Hooks".to_string()],
            created_at: 1_000,
            updated_at: 2_000,
        }
    }

    #[test]
    fn serializes_with_original_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort();

        assert_eq!(
            keys,
            vec![
                "category",
                "code",
                "createdAt",
                "description",
                "id",
                "language",
                "tags",
                "title",
                "updatedAt"
            ]
        );
        assert_eq!(value["createdAt"], 1_000);
    }

    #[test]
    fn parse_tags_trims_and_drops_blanks() {
        assert_eq!(parse_tags(" react, hooks ,, ,state"), vec!["react", "hooks", "state"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn draft_requires_title_and_code() {
        let mut draft = SnippetDraft {
            title: "   ".to_string(),
            code: "x".to_string(),
            ..SnippetDraft::default()
        };
        assert_eq!(draft.validate(), Err(DraftError::MissingTitle));

        draft.title = "Title".to_string();
        draft.code = "\n\t".to_string();
        assert_eq!(draft.validate(), Err(DraftError::MissingCode));
    }

    #[test]
    fn draft_trims_fields() {
        let draft = SnippetDraft {
            title: "  Fetch wrapper ".to_string(),
            description: " retries ".to_string(),
            code: "\nawait fetch(url)\n".to_string(),
            tags: "http, async".to_string(),
            ..SnippetDraft::default()
        };
        let new = draft.into_new_snippet().unwrap();

        assert_eq!(new.title, "Fetch wrapper");
        assert_eq!(new.description, "retries");
        assert_eq!(new.code, "await fetch(url)");
        assert_eq!(new.language, "javascript");
        assert_eq!(new.tags, vec!["http", "async"]);
    }

    #[test]
    fn apply_keeps_identity_and_creation_time() {
        let original = sample();
        let mut draft = SnippetDraft::from_snippet(&original);
        assert_eq!(draft.tags, "timing, Hooks");

        draft.title = "Throttle".to_string();
        let edited = draft.apply_to(&original).unwrap();

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.created_at, original.created_at);
        assert_eq!(edited.title, "Throttle");
        assert!(edited.updated_at > original.updated_at);
    }

    #[test]
    fn display_names() {
        assert_eq!(language_display_name("cpp"), "C++");
        assert_eq!(language_display_name("elixir"), "Elixir");
        assert_eq!(language_display_name(""), "");
        assert_eq!(sample().line_count(), 1);
    }
}
