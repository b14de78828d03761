//! Search and category filtering over a snippet collection.

use crate::models::Snippet;
use crate::models::snippet::capitalize;

/// Pseudo-category that matches every snippet
pub const ALL_CATEGORIES: &str = "all";

/// Case-insensitive substring match over title, description, code and tags.
/// An empty term matches everything.
pub fn matches_search(snippet: &Snippet, term: &str) -> bool {
    let term = term.to_lowercase();
    if term.is_empty() {
        return true;
    }

    snippet.title.to_lowercase().contains(&term)
        || snippet.description.to_lowercase().contains(&term)
        || snippet.code.to_lowercase().contains(&term)
        || snippet
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&term))
}

pub fn matches_category(snippet: &Snippet, category: &str) -> bool {
    category == ALL_CATEGORIES || snippet.category == category
}

/// Snippets matching both the search term and the category, in
/// collection order
pub fn filter<'a>(snippets: &'a [Snippet], term: &str, category: &str) -> Vec<&'a Snippet> {
    snippets
        .iter()
        .filter(|s| matches_search(s, term) && matches_category(s, category))
        .collect()
}

/// `"all"` followed by every distinct category in first-seen order
pub fn categories(snippets: &[Snippet]) -> Vec<String> {
    let mut result = vec![ALL_CATEGORIES.to_string()];
    for snippet in snippets {
        if !result.contains(&snippet.category) {
            result.push(snippet.category.clone());
        }
    }
    result
}

pub fn category_label(category: &str) -> String {
    if category == ALL_CATEGORIES {
        "All Categories".to_string()
    } else {
        capitalize(category)
    }
}

/// Figures shown above the snippet list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub categories: usize,
    pub filtered: usize,
}

impl Stats {
    pub fn compute(snippets: &[Snippet], term: &str, category: &str) -> Self {
        Self {
            total: snippets.len(),
            categories: categories(snippets).len() - 1,
            filtered: filter(snippets, term, category).len(),
        }
    }
}

/// First line of the code containing the term, for search result context
pub fn matching_line(snippet: &Snippet, term: &str) -> Option<(usize, String)> {
    let term = term.to_lowercase();
    if term.is_empty() {
        return None;
    }

    snippet
        .code
        .lines()
        .enumerate()
        .find(|(_, line)| line.to_lowercase().contains(&term))
        .map(|(i, line)| (i + 1, line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(title: &str, category: &str, tags: &[&str], code: &str) -> Snippet {
        Snippet {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: format!("{} description", title),
            code: code.to_string(),
            language: "javascript".to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn collection() -> Vec<Snippet> {
        vec![
            snippet("Debounce", "utility", &["Timing"], "let t;\nclearTimeout(t);"),
            snippet("useFetch", "react", &["hooks"], "const data = useState();"),
            snippet("Flatten", "utility", &[], "arr.flat(Infinity)"),
        ]
    }

    #[test]
    fn search_covers_all_text_fields() {
        let all = collection();
        assert_eq!(filter(&all, "debounce", ALL_CATEGORIES).len(), 1);
        assert_eq!(filter(&all, "timing", ALL_CATEGORIES)[0].title, "Debounce");
        assert_eq!(filter(&all, "USESTATE", ALL_CATEGORIES)[0].title, "useFetch");
        assert_eq!(filter(&all, "description", ALL_CATEGORIES).len(), 3);
        assert_eq!(filter(&all, "", ALL_CATEGORIES).len(), 3);
    }

    #[test]
    fn category_filter_combines_with_search() {
        let all = collection();
        let utility = filter(&all, "", "utility");
        assert_eq!(utility.len(), 2);
        assert_eq!(utility[0].title, "Debounce");
        assert!(filter(&all, "usestate", "utility").is_empty());
    }

    #[test]
    fn categories_in_first_seen_order() {
        assert_eq!(categories(&collection()), vec!["all", "utility", "react"]);
        assert_eq!(category_label("all"), "All Categories");
        assert_eq!(category_label("react"), "React");
    }

    #[test]
    fn stats_and_matching_line() {
        let all = collection();
        let stats = Stats::compute(&all, "", "react");
        assert_eq!(
            stats,
            Stats {
                total: 3,
                categories: 2,
                filtered: 1
            }
        );
        assert_eq!(
            matching_line(&all[0], "cleartimeout"),
            Some((2, "clearTimeout(t);".to_string()))
        );
    }
}
