//! 画面描画
//!
//! 左に最近のディレクトリとファイル一覧、右に文書プレビュー、最下行にステータス

use super::session::{PromptState, Session};
use crate::model::DocumentMode;
use crate::notify::{Notification, NotificationLevel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

const KEY_HELP: &str = "o:開く 1-5:最近 m:モード s:保存 q:終了";

pub fn draw(frame: &mut Frame<'_>, session: &Session) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(outer[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(columns[0]);

    draw_recent(frame, sidebar[0], session);
    draw_files(frame, sidebar[1], session);
    draw_preview(frame, columns[1], session);

    match session.prompt() {
        Some(prompt) => draw_prompt(frame, outer[1], prompt),
        None => draw_status(frame, outer[1], session),
    }
}

fn draw_recent(frame: &mut Frame<'_>, area: Rect, session: &Session) {
    let state = session.store().state();
    let items: Vec<ListItem<'_>> = state
        .recent_dirs
        .iter()
        .enumerate()
        .map(|(index, dir)| {
            let current = state.current_dir.as_deref() == Some(dir.path.as_str());
            let style = if current {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", index + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(dir.path.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("最近のディレクトリ"));
    frame.render_widget(list, area);
}

fn draw_files(frame: &mut Frame<'_>, area: Rect, session: &Session) {
    let state = session.store().state();
    let title = match state.current_mode {
        DocumentMode::Memory => format!("[{}] 文書", state.current_mode.label()),
        DocumentMode::Local => format!(
            "[{}] {} ({})",
            state.current_mode.label(),
            state.current_dir.as_deref().unwrap_or("-"),
            state.markdown_files().count()
        ),
    };

    let items: Vec<ListItem<'_>> = session
        .rows()
        .into_iter()
        .map(|row| {
            let style = if row.is_directory {
                Style::default().fg(Color::Blue)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(row.label, style))
        })
        .collect();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(session.selected()));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_preview(frame: &mut Frame<'_>, area: Rect, session: &Session) {
    let (title, content) = match session.documents().active_post() {
        Some(post) => (post.title.clone(), post.content.clone()),
        None => ("プレビュー".to_string(), String::new()),
    };

    let paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_prompt(frame: &mut Frame<'_>, area: Rect, prompt: &PromptState) {
    let mut text = format!("ディレクトリ: {}", prompt.input);
    if !prompt.candidates.is_empty() {
        text.push_str("  [");
        text.push_str(&prompt.candidates.join(" "));
        text.push(']');
    }
    let line = truncate_to_width(&text, area.width as usize);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status(frame: &mut Frame<'_>, area: Rect, session: &Session) {
    let state = session.store().state();
    let prefix = format!(
        "[{}] {} ",
        state.current_mode.label(),
        state.current_dir.as_deref().unwrap_or("-")
    );
    let (text, style) = match session.message() {
        Some(message) => (message.message.clone(), message_style(message)),
        None => (KEY_HELP.to_string(), Style::default().fg(Color::DarkGray)),
    };

    let width = area.width as usize;
    let prefix = truncate_to_width(&prefix, width);
    let rest = truncate_to_width(&text, width.saturating_sub(display_width(&prefix)));
    let line = Line::from(vec![
        Span::styled(prefix, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(rest, style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn message_style(message: &Notification) -> Style {
    match message.level {
        NotificationLevel::Success => Style::default().fg(Color::Green),
        NotificationLevel::Info => Style::default(),
        NotificationLevel::Warning => Style::default().fg(Color::Yellow),
        NotificationLevel::Error => Style::default().fg(Color::Red),
    }
}

fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

/// 表示幅で切り詰め（全角は2桁）
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        width += ch_width;
        result.push(ch);
    }
    result
}
