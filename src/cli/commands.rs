use crate::cli::{SnippetFlags, bar};
use crate::highlight::{TokenKind, highlight_lines};
use crate::models::snippet::{DEFAULT_CATEGORIES, KNOWN_LANGUAGES};
use crate::models::{KeyValueStore, Snippet, SnippetDraft, SnippetStore, export, import_file};
use crate::search::{self, ALL_CATEGORIES};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};
use colored::{Color, Colorize};
use std::io::Read;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const TITLE_WIDTH: usize = 36;

/// Colour used for a category badge
pub fn category_color(category: &str) -> Color {
    match category {
        "javascript" => Color::Yellow,
        "typescript" => Color::Blue,
        "python" => Color::Green,
        "react" => Color::Cyan,
        "css" => Color::BrightMagenta,
        "html" => Color::BrightRed,
        "node" => Color::BrightGreen,
        "utility" => Color::White,
        _ => Color::Magenta,
    }
}

fn token_color(kind: TokenKind) -> Option<Color> {
    match kind {
        TokenKind::Plain => None,
        TokenKind::Comment => Some(Color::Green),
        TokenKind::Keyword | TokenKind::Property | TokenKind::Tag => Some(Color::Magenta),
        TokenKind::String => Some(Color::BrightGreen),
        TokenKind::Number | TokenKind::Selector => Some(Color::Blue),
        TokenKind::Attribute => Some(Color::Yellow),
    }
}

fn format_time(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Cuts `text` to at most `width` terminal columns
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }

    let mut out = String::new();
    for ch in text.chars() {
        if out.width() + ch.to_string().width() + 1 > width {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

fn print_row(index: usize, snippet: &Snippet) {
    let title = truncate(&snippet.title, TITLE_WIDTH);
    let padding = TITLE_WIDTH.saturating_sub(title.width());

    println!(
        "{}  {}. {}{} {} {}",
        bar(),
        (index + 1).to_string().bright_yellow(),
        title.bright_white().bold(),
        " ".repeat(padding),
        format!("[{}]", snippet.category).color(category_color(&snippet.category)),
        snippet.language_name().bright_black()
    );
    println!("{}     {}: {}", bar(), "ID".bright_black(), snippet.id);
}

/// Lists all snippets, newest first, optionally restricted to a category
pub fn list_snippets<B: KeyValueStore>(
    store: &SnippetStore<B>,
    category: Option<&str>,
) -> Result<()> {
    let snippets = store.read_all()?;
    let category = category.unwrap_or(ALL_CATEGORIES);
    let shown = search::filter(&snippets, "", category);

    println!(
        "{}  {} ({} of {})",
        bar(),
        search::category_label(category).to_uppercase().bold(),
        shown.len(),
        snippets.len()
    );
    println!("{}", "─".repeat(60).bright_magenta());

    if shown.is_empty() {
        println!("{}  No snippets found.", bar());
        return Ok(());
    }

    for (idx, snippet) in shown.iter().enumerate() {
        print_row(idx, snippet);
    }

    Ok(())
}

/// Lists categories with the number of snippets in each
pub fn list_categories<B: KeyValueStore>(store: &SnippetStore<B>) -> Result<()> {
    let snippets = store.read_all()?;
    let categories = search::categories(&snippets);

    println!(
        "{}  {} categories, {} snippets",
        bar(),
        categories.len() - 1,
        snippets.len()
    );
    for category in categories.iter().skip(1) {
        let count = search::filter(&snippets, "", category).len();
        println!(
            "{}  {:<20} {}",
            bar(),
            category.color(category_color(category)),
            count.to_string().bright_yellow()
        );
    }

    Ok(())
}

/// Shows a snippet looked up by id or title
pub fn show_snippet<B: KeyValueStore>(store: &SnippetStore<B>, needle: &str) -> Result<()> {
    match store.find(needle)? {
        Some(snippet) => display_snippet_content(&snippet),
        None => {
            println!("{}  No snippet found matching: {}", bar(), needle);
            let snippets = store.read_all()?;
            if !snippets.is_empty() {
                println!("{}  Available snippets:", bar());
                for (idx, snippet) in snippets.iter().enumerate().take(10) {
                    println!(
                        "{}  {}. {}",
                        bar(),
                        (idx + 1).to_string().yellow(),
                        snippet.title.bright_white()
                    );
                }
                if snippets.len() > 10 {
                    println!("{}  ... and {} more", bar(), snippets.len() - 10);
                }
            }
        }
    }

    Ok(())
}

fn display_snippet_content(snippet: &Snippet) {
    println!(
        "{}  {} {}",
        bar(),
        "SNIPPET".bright_green().bold(),
        snippet.title.bold()
    );
    println!("{}", "─".repeat(60).bright_magenta());

    if !snippet.description.is_empty() {
        println!(
            "{}  {}: {}",
            bar(),
            "Description".bright_cyan(),
            snippet.description
        );
    }
    println!(
        "{}  {}: {}",
        bar(),
        "Language".bright_yellow(),
        snippet.language_name()
    );
    println!(
        "{}  {}: {}",
        bar(),
        "Lines".bright_yellow(),
        snippet.line_count()
    );
    println!(
        "{}  {}: {}",
        bar(),
        "Category".bright_blue(),
        snippet.category.color(category_color(&snippet.category))
    );
    if !snippet.tags.is_empty() {
        let tags: Vec<String> = snippet.tags.iter().map(|t| format!("#{}", t)).collect();
        println!("{}  {}: {}", bar(), "Tags".bright_magenta(), tags.join(" "));
    }
    println!(
        "{}  {}: {}",
        bar(),
        "Updated".bright_black(),
        format_time(snippet.updated_at)
    );
    println!("{}  {}: {}", bar(), "ID".bright_black(), snippet.id);
    println!("{}", "─".repeat(60).bright_magenta());

    for line in highlight_lines(&snippet.code, &snippet.language) {
        let rendered: String = line
            .iter()
            .map(|token| match token_color(token.kind) {
                Some(color) => token.text.color(color).to_string(),
                None => token.text.to_string(),
            })
            .collect();
        println!("{}  {}", bar(), rendered);
    }
}

/// Searches snippets and prints where each one matched
pub fn search_snippets<B: KeyValueStore>(
    store: &SnippetStore<B>,
    query: &str,
    category: Option<&str>,
) -> Result<()> {
    let snippets = store.read_all()?;
    let results = search::filter(&snippets, query, category.unwrap_or(ALL_CATEGORIES));

    println!(
        "{}  {} '{}'",
        bar(),
        "SEARCH RESULTS FOR".bold(),
        query.bright_white()
    );

    if results.is_empty() {
        println!("{}  No snippets found matching query: {}", bar(), query);
        return Ok(());
    }

    println!("{}  Found {} snippets:", bar(), results.len());
    println!("{}", "─".repeat(60).bright_magenta());

    for (idx, snippet) in results.iter().enumerate() {
        print_row(idx, snippet);
        if let Some((line_num, line)) = search::matching_line(snippet, query) {
            println!(
                "{}     {}: {}",
                bar(),
                format!("Line {}", line_num).bright_green(),
                truncate(&line, 60)
            );
        }
    }

    Ok(())
}

fn read_code(source: Option<&str>) -> Result<String> {
    match source {
        None | Some("-") => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("Failed to read code from stdin")?;
            Ok(code)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read code from {}", path)),
    }
}

fn note_unknown_vocabulary(draft: &SnippetDraft) {
    if !KNOWN_LANGUAGES.contains(&draft.language.as_str()) {
        println!(
            "{}  {} '{}' is not a known language; it will be shown without highlighting",
            bar(),
            "Note:".bright_yellow(),
            draft.language
        );
    }
    if !DEFAULT_CATEGORIES.contains(&draft.category.as_str()) {
        println!(
            "{}  {} '{}' is a new category",
            bar(),
            "Note:".bright_yellow(),
            draft.category
        );
    }
}

/// Applies the given flags on top of a draft
fn fill_draft(mut draft: SnippetDraft, flags: SnippetFlags, code: Option<String>) -> SnippetDraft {
    if let Some(title) = flags.title {
        draft.title = title;
    }
    if let Some(description) = flags.description {
        draft.description = description;
    }
    if let Some(language) = flags.language {
        draft.language = language.to_lowercase();
    }
    if let Some(category) = flags.category {
        draft.category = category.to_lowercase();
    }
    if let Some(tags) = flags.tags {
        draft.tags = tags;
    }
    if let Some(code) = code {
        draft.code = code;
    }
    draft
}

/// Adds a new snippet
pub fn add_snippet<B: KeyValueStore>(store: &SnippetStore<B>, flags: SnippetFlags) -> Result<()> {
    let code = read_code(flags.code_file.as_deref())?;
    let draft = fill_draft(SnippetDraft::default(), flags, Some(code));
    note_unknown_vocabulary(&draft);

    let new_snippet = draft.into_new_snippet()?;
    let snippet = store.insert(new_snippet).context("Failed to save snippet")?;

    println!(
        "{}  {} {} ({})",
        bar(),
        "Saved".bright_green().bold(),
        snippet.title.bold(),
        snippet.id
    );
    Ok(())
}

/// Edits fields of an existing snippet; omitted flags keep their value
pub fn edit_snippet<B: KeyValueStore>(
    store: &SnippetStore<B>,
    id: &str,
    flags: SnippetFlags,
) -> Result<()> {
    let Some(original) = store.get(id)? else {
        bail!("No snippet with ID: {}", id);
    };

    let code = match flags.code_file.as_deref() {
        Some(source) => Some(read_code(Some(source))?),
        None => None,
    };
    let draft = fill_draft(SnippetDraft::from_snippet(&original), flags, code);
    note_unknown_vocabulary(&draft);

    let updated = draft.apply_to(&original)?;
    if !store.update(&updated).context("Failed to update snippet")? {
        bail!("Snippet {} disappeared before it could be updated", original.id);
    }

    println!(
        "{}  {} {}",
        bar(),
        "Updated".bright_green().bold(),
        updated.title.bold()
    );
    Ok(())
}

/// Deletes the snippet with exactly this id; anything else is a no-op
pub fn delete_snippet<B: KeyValueStore>(store: &SnippetStore<B>, id: &str) -> Result<()> {
    let Some(snippet) = store.get(id)? else {
        println!("{}  No snippet with ID: {}", bar(), id);
        return Ok(());
    };

    store
        .delete(&snippet.id)
        .context("Failed to delete snippet")?;
    println!(
        "{}  {} {}",
        bar(),
        "Deleted".bright_red().bold(),
        snippet.title
    );
    Ok(())
}

/// Writes the backup file into `dir`
pub fn export_snippets<B: KeyValueStore>(store: &SnippetStore<B>, dir: &Path) -> Result<()> {
    let path = export::export_to_dir(store, dir)?;
    println!(
        "{}  {} {}",
        bar(),
        "Exported to".bright_green().bold(),
        path.display()
    );
    Ok(())
}

/// Merges a backup file into the collection
pub fn import_snippets<B: KeyValueStore>(store: &SnippetStore<B>, path: &Path) -> Result<()> {
    let report = import_file(store, path, |report| {
        println!(
            "{}  {} {} new snippets",
            bar(),
            "Imported".bright_green().bold(),
            report.imported
        );
    })
    .context("Error importing file. Please check the file format.")?;

    if report.duplicates > 0 {
        println!(
            "{}  Skipped {} snippets that already exist",
            bar(),
            report.duplicates
        );
    }
    if report.invalid > 0 {
        println!(
            "{}  Skipped {} records missing required fields",
            bar(),
            report.invalid
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemoryStore;

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 8), "a longe…");
        assert!(truncate("日本語のタイトル", 7).width() <= 7);
    }

    #[test]
    fn flags_override_draft_fields() {
        let flags = SnippetFlags {
            title: Some("New".to_string()),
            language: Some("Python".to_string()),
            ..SnippetFlags::default()
        };
        let draft = fill_draft(SnippetDraft::default(), flags, None);

        assert_eq!(draft.title, "New");
        assert_eq!(draft.language, "python");
        assert_eq!(draft.category, "javascript");
    }

    fn store_with(titles: &[&str]) -> SnippetStore<MemoryStore> {
        let store = SnippetStore::with_default_key(MemoryStore::new());
        for title in titles {
            store
                .insert(
                    SnippetDraft {
                        title: title.to_string(),
                        code: "fn() {}".to_string(),
                        ..SnippetDraft::default()
                    }
                    .into_new_snippet()
                    .unwrap(),
                )
                .unwrap();
        }
        store
    }

    fn titles(store: &SnippetStore<MemoryStore>) -> Vec<String> {
        store
            .read_all()
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect()
    }

    #[test]
    fn delete_ignores_title_fragments() {
        let store = store_with(&["Array helpers", "Debounce"]);

        delete_snippet(&store, "a").unwrap();
        delete_snippet(&store, "Debounce").unwrap();
        delete_snippet(&store, "").unwrap();

        assert_eq!(titles(&store), vec!["Debounce", "Array helpers"]);
    }

    #[test]
    fn delete_by_id_removes_one() {
        let store = store_with(&["Array helpers", "Debounce"]);
        let id = store.read_all().unwrap()[0].id.clone();

        delete_snippet(&store, &id).unwrap();
        delete_snippet(&store, &id).unwrap();

        assert_eq!(titles(&store), vec!["Array helpers"]);
    }

    #[test]
    fn edit_requires_an_exact_id() {
        let store = store_with(&["Debounce"]);
        let flags = SnippetFlags {
            title: Some("Throttle".to_string()),
            ..SnippetFlags::default()
        };

        assert!(edit_snippet(&store, "Debounce", flags.clone()).is_err());
        assert!(edit_snippet(&store, "", flags.clone()).is_err());
        assert_eq!(titles(&store), vec!["Debounce"]);

        let id = store.read_all().unwrap()[0].id.clone();
        edit_snippet(&store, &id, flags).unwrap();
        assert_eq!(titles(&store), vec!["Throttle"]);
    }

    #[test]
    fn timestamps_format_or_fall_back() {
        assert_ne!(format_time(0), "unknown");
        assert_eq!(format_time(i64::MAX), "unknown");
    }
}
