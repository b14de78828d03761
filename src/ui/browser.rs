use crate::app::{App, InputMode};
use crate::highlight::highlight_lines;
use crate::models::{KeyValueStore, Snippet};
use crate::search::category_label;
use crate::ui::colors::{RosePine, category_color, token_color};
use crate::ui::components::render_bottom_bar;
use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

const SEARCH_PLACEHOLDER: &str = "Search snippets, tags, or content...";

pub fn render<B: KeyValueStore>(frame: &mut Frame, app: &App<B>) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(3),
    ])
    .split(frame.area());

    render_header(frame, chunks[0], app);
    render_search_box(frame, chunks[1], app);
    render_category_tabs(frame, chunks[2], app);

    let body = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);
    render_snippet_list(frame, body[0], app);
    render_preview(frame, body[1], app);

    render_bottom_bar(frame, chunks[4], app);
}

fn rounded_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        RosePine::IRIS
    } else {
        RosePine::HIGHLIGHT_HIGH
    };
    Block::bordered()
        .title(title)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

fn render_header<B: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let stats = app.stats();
    let label = Style::default().fg(RosePine::SUBTLE);
    let line = Line::from(vec![
        Span::styled(
            " 󰅩 CodeVault ",
            Style::default().fg(RosePine::BASE).bg(RosePine::IRIS).bold(),
        ),
        Span::raw("  "),
        Span::styled(
            stats.total.to_string(),
            Style::default().fg(RosePine::GOLD).bold(),
        ),
        Span::styled(" snippets │ ", label),
        Span::styled(
            stats.categories.to_string(),
            Style::default().fg(RosePine::FOAM).bold(),
        ),
        Span::styled(" categories │ ", label),
        Span::styled(
            stats.filtered.to_string(),
            Style::default().fg(RosePine::LOVE).bold(),
        ),
        Span::styled(" shown", label),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(rounded_block(String::new(), false)),
        area,
    );
}

fn render_search_box<B: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let editing = app.input_mode == InputMode::Search;
    let text = if editing {
        Span::styled(app.input_buffer.clone(), Style::default().fg(RosePine::TEXT))
    } else if app.search_query.is_empty() {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(RosePine::MUTED))
    } else {
        Span::styled(app.search_query.clone(), Style::default().fg(RosePine::TEXT))
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::raw("  "), text]))
        .block(rounded_block(" Search ".to_string(), editing));
    frame.render_widget(paragraph, area);

    if editing {
        let typed = unicode_width::UnicodeWidthStr::width(app.input_buffer.as_str()) as u16;
        let x = (area.x + 3 + typed).min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn render_category_tabs<B: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let categories = app.categories();
    let selected = categories
        .iter()
        .position(|c| *c == app.selected_category)
        .unwrap_or(0);

    let titles: Vec<Line> = categories
        .iter()
        .map(|c| Line::from(category_label(c)).fg(category_color(c)))
        .collect();

    let tabs = Tabs::new(titles)
        .select(selected)
        .divider("│")
        .highlight_style(
            Style::default()
                .fg(RosePine::BASE)
                .bg(RosePine::IRIS)
                .bold(),
        )
        .block(rounded_block(" Categories [Tab] ".to_string(), false));
    frame.render_widget(tabs, area);
}

fn render_snippet_list<B: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let filtered = app.filtered();
    let block = rounded_block(format!(" Snippets ({}) ", filtered.len()), false);

    if filtered.is_empty() {
        let hint = if app.snippets.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No snippets yet",
                    Style::default().fg(RosePine::LOVE).bold(),
                )),
                Line::from(""),
                Line::from("Add one with `codevault add`"),
                Line::from("or press [i] to import a backup."),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No snippets found",
                    Style::default().fg(RosePine::GOLD).bold(),
                )),
                Line::from("Try a different search or category."),
            ]
        };
        let paragraph = Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(RosePine::SUBTLE))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = filtered
        .iter()
        .map(|snippet| {
            let mut meta = vec![Span::styled(
                format!("  {}", snippet.language_name()),
                Style::default().fg(RosePine::MUTED),
            )];
            if !snippet.tags.is_empty() {
                meta.push(Span::styled(
                    format!("  #{}", snippet.tags.join(" #")),
                    Style::default().fg(RosePine::SUBTLE),
                ));
            }

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        snippet.title.clone(),
                        Style::default().fg(RosePine::TEXT).bold(),
                    ),
                    Span::styled(
                        format!(" [{}]", snippet.category),
                        Style::default().fg(category_color(&snippet.category)),
                    ),
                ]),
                Line::from(meta),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(RosePine::HIGHLIGHT_LOW)
                .fg(RosePine::IRIS),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn format_time(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn preview_lines(snippet: &Snippet) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    if !snippet.description.is_empty() {
        lines.push(Line::from(Span::styled(
            snippet.description.as_str(),
            Style::default().fg(RosePine::SUBTLE).italic(),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled(snippet.language_name(), Style::default().fg(RosePine::GOLD)),
        Span::styled(
            format!(
                "  {} lines  updated {}",
                snippet.line_count(),
                format_time(snippet.updated_at)
            ),
            Style::default().fg(RosePine::MUTED),
        ),
    ]));
    lines.push(Line::from(""));

    let code = highlight_lines(&snippet.code, &snippet.language);
    let gutter = code.len().to_string().len();
    for (i, tokens) in code.into_iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!("{:>width$} │ ", i + 1, width = gutter),
            Style::default().fg(RosePine::HIGHLIGHT_HIGH),
        )];
        spans.extend(
            tokens
                .into_iter()
                .map(|t| Span::styled(t.text, Style::default().fg(token_color(t.kind)))),
        );
        lines.push(Line::from(spans));
    }

    lines
}

fn render_preview<B: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let Some(snippet) = app.selected_snippet() else {
        frame.render_widget(rounded_block(" Preview ".to_string(), false), area);
        return;
    };

    let lines = preview_lines(snippet);
    let visible = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    let scroll = app.content_scroll_position.min(max_scroll) as u16;

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(RosePine::SURFACE))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(rounded_block(format!(" {} ", snippet.title), false));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemoryStore, SnippetStore};
    use ratatui::{Terminal, backend::TestBackend};

    fn snippet() -> Snippet {
        Snippet {
            id: "s1".to_string(),
            title: "Sleep helper".to_string(),
            description: "Promise based delay".to_string(),
            code: "const sleep = ms => new Promise(r => setTimeout(r, ms));".to_string(),
            language: "javascript".to_string(),
            category: "utility".to_string(),
            tags: vec!["async".to_string()],
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn preview_numbers_code_lines() {
        let s = snippet();
        let lines = preview_lines(&s);
        // description, meta, blank, one code line
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].spans[0].content, "1 │ ");
    }

    #[test]
    fn renders_list_and_preview() {
        let store = SnippetStore::with_default_key(MemoryStore::new());
        store.replace_all(&[snippet()]).unwrap();
        let app = App::new(store, std::env::temp_dir());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Sleep helper"));
        assert!(text.contains("Utility"));
    }
}
