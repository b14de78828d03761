//! UI Components Module
//!
//! Reusable pieces drawn around and on top of the browser: the bottom
//! status bar and the centered dialogs for delete confirmation, import
//! path entry and help.

use crate::app::{App, InputMode};
use crate::models::KeyValueStore;
use crate::ui::colors::RosePine;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

/// Renders the bottom bar: status message on the left, shortcuts on the right
pub fn render_bottom_bar<B: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<B>) {
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let status = if let Some(error) = &app.error_message {
        Span::styled(format!(" ✗ {}", error), Style::default().fg(RosePine::LOVE))
    } else if let Some(success) = &app.success_message {
        Span::styled(format!(" ✓ {}", success), Style::default().fg(RosePine::FOAM))
    } else {
        Span::styled(
            format!(" {}", app.store.key()),
            Style::default().fg(RosePine::SUBTLE),
        )
    };

    let bar_block = || {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(RosePine::HIGHLIGHT_HIGH))
    };

    frame.render_widget(
        Paragraph::new(Line::from(status)).block(bar_block()),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(get_context_shortcuts(&app.input_mode))
            .alignment(Alignment::Right)
            .style(Style::default().fg(RosePine::MUTED))
            .block(bar_block()),
        chunks[1],
    );
}

fn get_context_shortcuts(mode: &InputMode) -> &'static str {
    match mode {
        InputMode::Search | InputMode::ImportPath => " [⏎] Confirm │ [Esc] Cancel ",
        InputMode::ConfirmDelete { .. } => " [y] Delete │ [n] Keep ",
        InputMode::HelpMenu => " [?] [Esc] Close ",
        InputMode::Normal => {
            " [/] Search │ [Tab] Category │ [y] Copy │ [d] Delete │ [x] Export │ [i] Import │ [?] Help │ [q] Quit "
        }
    }
}

/// Rectangle of the given size centered in `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [centered] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vertical);
    centered
}

fn dialog(
    frame: &mut Frame,
    title: &str,
    lines: Vec<Line>,
    width: u16,
    accent: ratatui::style::Color,
) {
    let height = lines.len() as u16 + 2;
    let area = centered_rect(frame.area(), width, height);

    let block = Block::bordered()
        .title(title.to_string())
        .title_alignment(Alignment::Center)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(RosePine::BASE));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(RosePine::TEXT))
            .block(block),
        area,
    );
}

pub fn render_confirm_delete<B: KeyValueStore>(frame: &mut Frame, app: &App<B>, id: &str) {
    let title = app
        .snippets
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.title.as_str())
        .unwrap_or(id);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" Delete "),
            Span::styled(title.to_string(), Style::default().fg(RosePine::GOLD).bold()),
            Span::raw("?"),
        ]),
        Line::from(" This cannot be undone.").fg(RosePine::SUBTLE),
        Line::from(""),
        Line::from(" [y] Delete   [n] Keep").fg(RosePine::MUTED),
    ];
    dialog(frame, " Confirm Delete ", lines, 50, RosePine::LOVE);
}

pub fn render_import_prompt<B: KeyValueStore>(frame: &mut Frame, app: &App<B>) {
    let lines = vec![
        Line::from(" Path to a codevault backup (.json):").fg(RosePine::SUBTLE),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ❯ ", Style::default().fg(RosePine::IRIS)),
            Span::raw(app.input_buffer.clone()),
            Span::styled("█", Style::default().fg(RosePine::IRIS)),
        ]),
        Line::from(""),
        Line::from(" Existing snippets are kept; duplicates are skipped.").fg(RosePine::MUTED),
    ];
    dialog(frame, " Import Snippets ", lines, 70, RosePine::IRIS);
}

pub fn render_help(frame: &mut Frame) {
    let entries = [
        ("↑↓ / j k", "Move through the list"),
        ("Tab / Shift-Tab", "Next / previous category"),
        ("/", "Edit the search text"),
        ("PgUp / PgDn", "Scroll the preview"),
        ("y", "Copy the selected snippet's code"),
        ("d", "Delete the selected snippet"),
        ("x", "Export a backup file"),
        ("i", "Import a backup file"),
        ("r", "Reload from disk"),
        ("q", "Quit"),
    ];

    let lines: Vec<Line> = entries
        .iter()
        .map(|(keys, about)| {
            Line::from(vec![
                Span::styled(format!(" {:<16}", keys), Style::default().fg(RosePine::GOLD)),
                Span::raw(*about),
            ])
        })
        .collect();
    dialog(frame, " Keyboard Shortcuts ", lines, 56, RosePine::FOAM);
}
