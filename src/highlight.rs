//! Cosmetic pattern-based highlighting.
//!
//! Code is split into tokens by a handful of regular expressions per
//! language. This is display formatting only: nested or unusual
//! constructs may be coloured wrongly, and languages without a rule set
//! come back as a single plain token.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Plain,
    Comment,
    Keyword,
    String,
    Number,
    Selector,
    Property,
    Tag,
    Attribute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

struct Rule {
    pattern: Regex,
    /// Capture group that receives the style; the rest of the match stays plain
    group: usize,
    kind: TokenKind,
}

fn rule(pattern: &str, group: usize, kind: TokenKind) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("highlight patterns are valid"),
        group,
        kind,
    }
}

const QUOTED: &str = r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\.)*`"#;

static SCRIPT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r"(?s)/\*.*?\*/", 0, TokenKind::Comment),
        rule(r"//[^\n]*", 0, TokenKind::Comment),
        rule(QUOTED, 0, TokenKind::String),
        rule(
            r"\b(const|let|var|function|class|if|else|for|while|return|import|export|from|default|async|await|try|catch|finally)\b",
            0,
            TokenKind::Keyword,
        ),
        rule(r"\b\d+\b", 0, TokenKind::Number),
    ]
});

static PYTHON_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r"#[^\n]*", 0, TokenKind::Comment),
        rule(QUOTED, 0, TokenKind::String),
        rule(
            r"\b(def|class|if|elif|else|for|while|return|import|from|try|except|finally|with|as|lambda|yield|global|nonlocal)\b",
            0,
            TokenKind::Keyword,
        ),
        rule(r"\b\d+\b", 0, TokenKind::Number),
    ]
});

static CSS_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r"(?s)/\*.*?\*/", 0, TokenKind::Comment),
        rule(QUOTED, 0, TokenKind::String),
        rule(r"([.#]?[a-zA-Z-]+)(\s*\{)", 1, TokenKind::Selector),
        rule(r"([a-zA-Z-]+)(\s*:)", 1, TokenKind::Property),
    ]
});

static HTML_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(r"(?s)<!--.*?-->", 0, TokenKind::Comment),
        rule(QUOTED, 0, TokenKind::String),
        rule(r"</?([a-zA-Z][a-zA-Z0-9-]*)", 1, TokenKind::Tag),
        rule(r"([a-zA-Z-]+)(=)", 1, TokenKind::Attribute),
    ]
});

fn rules_for(language: &str) -> Option<&'static [Rule]> {
    match language {
        "javascript" | "typescript" => Some(SCRIPT_RULES.as_slice()),
        "python" => Some(PYTHON_RULES.as_slice()),
        "css" => Some(CSS_RULES.as_slice()),
        "html" => Some(HTML_RULES.as_slice()),
        _ => None,
    }
}

/// Splits `code` into styled tokens. Joining every token's text gives
/// back `code` unchanged.
pub fn highlight<'a>(code: &'a str, language: &str) -> Vec<Token<'a>> {
    if code.is_empty() {
        return Vec::new();
    }

    let mut tokens = vec![Token {
        kind: TokenKind::Plain,
        text: code,
    }];

    let Some(rules) = rules_for(language) else {
        return tokens;
    };

    // Later rules only see text that earlier rules left plain
    for rule in rules {
        tokens = tokens
            .into_iter()
            .flat_map(|token| match token.kind {
                TokenKind::Plain => apply_rule(token.text, rule),
                _ => vec![token],
            })
            .collect();
    }

    tokens
}

fn apply_rule<'a>(text: &'a str, rule: &Rule) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for captures in rule.pattern.captures_iter(text) {
        let Some(styled) = captures.get(rule.group) else {
            continue;
        };
        if styled.as_str().is_empty() {
            continue;
        }

        if styled.start() > last {
            tokens.push(Token {
                kind: TokenKind::Plain,
                text: &text[last..styled.start()],
            });
        }
        tokens.push(Token {
            kind: rule.kind,
            text: styled.as_str(),
        });
        last = styled.end();
    }

    if last < text.len() {
        tokens.push(Token {
            kind: TokenKind::Plain,
            text: &text[last..],
        });
    }

    tokens
}

/// Highlights code line by line, for renderers that lay out rows
pub fn highlight_lines<'a>(code: &'a str, language: &str) -> Vec<Vec<Token<'a>>> {
    let mut lines = vec![Vec::new()];

    for token in highlight(code, language) {
        let mut pieces = token.text.split('\n');
        if let Some(first) = pieces.next() {
            push_piece(&mut lines, token.kind, first);
        }
        for piece in pieces {
            lines.push(Vec::new());
            push_piece(&mut lines, token.kind, piece);
        }
    }

    lines
}

fn push_piece<'a>(lines: &mut [Vec<Token<'a>>], kind: TokenKind, text: &'a str) {
    if text.is_empty() {
        return;
    }
    if let Some(line) = lines.last_mut() {
        line.push(Token { kind, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text).collect()
    }

    fn kinds_of<'a>(tokens: &[Token<'a>], kind: TokenKind) -> Vec<&'a str> {
        tokens
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn javascript_tokens() {
        let code = "const n = 42; // answer\nreturn \"const\";";
        let tokens = highlight(code, "javascript");

        assert_eq!(joined(&tokens), code);
        assert_eq!(kinds_of(&tokens, TokenKind::Keyword), vec!["const", "return"]);
        assert_eq!(kinds_of(&tokens, TokenKind::Comment), vec!["// answer"]);
        assert_eq!(kinds_of(&tokens, TokenKind::String), vec!["\"const\""]);
        assert_eq!(kinds_of(&tokens, TokenKind::Number), vec!["42"]);
    }

    #[test]
    fn python_comment_and_keywords() {
        let code = "def f(x):\n    # double it\n    return x * 2";
        let tokens = highlight(code, "python");

        assert_eq!(joined(&tokens), code);
        assert_eq!(kinds_of(&tokens, TokenKind::Keyword), vec!["def", "return"]);
        assert_eq!(kinds_of(&tokens, TokenKind::Comment), vec!["# double it"]);
    }

    #[test]
    fn css_selectors_and_properties() {
        let code = ".card { color: red; }";
        let tokens = highlight(code, "css");

        assert_eq!(joined(&tokens), code);
        assert_eq!(kinds_of(&tokens, TokenKind::Selector), vec![".card"]);
        assert_eq!(kinds_of(&tokens, TokenKind::Property), vec!["color"]);
    }

    #[test]
    fn html_tags_and_attributes() {
        let code = "<a href=\"/\">home</a>";
        let tokens = highlight(code, "html");

        assert_eq!(joined(&tokens), code);
        assert_eq!(kinds_of(&tokens, TokenKind::Tag), vec!["a", "a"]);
        assert_eq!(kinds_of(&tokens, TokenKind::Attribute), vec!["href"]);
    }

    #[test]
    fn unknown_language_is_plain() {
        let tokens = highlight("fn main() {}", "rust");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Plain);
        assert!(highlight("", "javascript").is_empty());
    }

    #[test]
    fn lines_split_multiline_tokens() {
        let lines = highlight_lines("/* a\nb */\nlet x", "javascript");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0][0].text, "/* a");
        assert_eq!(lines[1][0].kind, TokenKind::Comment);
        assert_eq!(lines[2][0].text, "let");
    }
}
