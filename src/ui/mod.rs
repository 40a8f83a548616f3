pub mod formatters;
mod news;

use crate::app::{App, FeedPhase, ViewMode};
use formatters::format_timestamp;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);

    match app.phase() {
        FeedPhase::LoadingInitial => draw_notice(frame, chunks[1], "Loading…", Color::Cyan),
        FeedPhase::Error if app.view_mode == ViewMode::Feed => {
            let message = app.error_message.as_deref().unwrap_or_default();
            draw_notice(frame, chunks[1], &format!("{}\n\n[r] Retry", message), Color::Red)
        }
        _ => news::draw_articles(frame, chunks[1], app),
    }

    draw_footer(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let current_time = chrono::Local::now().format("%H:%M:%S").to_string();
    let status = if app.is_loading_initial || app.is_loading_more {
        "[Loading...]".to_string()
    } else {
        format!("[{}]", current_time)
    };

    let view_indicator = match app.view_mode {
        ViewMode::Feed => app.category.label().to_string(),
        ViewMode::Bookmarks => "Bookmarks".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Crypto News ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(view_indicator, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(" ", Style::default()),
        Span::styled(status, Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_notice(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let inner_height = area.height.saturating_sub(2);
    let lines = text.lines().count() as u16;
    let padding = inner_height.saturating_sub(lines) / 2;
    let mut content: Vec<Line> = (0..padding).map(|_| Line::from("")).collect();
    content.extend(
        text.lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(color)))),
    );

    let notice = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(notice, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = match app.view_mode {
        ViewMode::Feed => " [r] Refresh [c] Category [b] Bookmarks [Enter] Open [s] Save [m] Read [↑↓] Nav [q] Quit ",
        ViewMode::Bookmarks => " [b] Feed [Enter] Open [s] Unsave [m] Read [↑↓] Nav [q] Quit ",
    };

    let mut spans = Vec::new();
    if let Some(msg) = &app.status_message {
        spans.push(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" | "));
    } else if let Some(article) = app.selected_article() {
        spans.push(Span::styled(
            format!("{} · {}", article.source_name, format_timestamp(article.published_at)),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(help, Style::default().fg(Color::DarkGray)));

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
