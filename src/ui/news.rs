use super::formatters::truncate_str;
use crate::api::Article;
use crate::app::{App, ViewMode};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

struct ColumnDef {
    name: &'static str,
    width: u16,
    priority: u8,
}

const NEWS_COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: "",
        width: 2,
        priority: 1,
    },
    ColumnDef {
        name: "Time",
        width: 10,
        priority: 1,
    },
    ColumnDef {
        name: "Source",
        width: 20,
        priority: 2,
    },
    ColumnDef {
        name: "Headline",
        width: 40,
        priority: 1,
    },
];
const HEADLINE_COLUMN: usize = 3;

/// Indices of the columns that fit, dropping low-priority ones first.
fn visible_columns(available_width: u16) -> Vec<usize> {
    let max_priority = NEWS_COLUMNS.iter().map(|c| c.priority).max().unwrap_or(1);
    let mut visible: Vec<usize> = Vec::new();
    for cutoff in 1..=max_priority {
        let candidate: Vec<usize> = NEWS_COLUMNS
            .iter()
            .enumerate()
            .filter(|(_, c)| c.priority <= cutoff)
            .map(|(i, _)| i)
            .collect();
        let total: u16 = candidate.iter().map(|&i| NEWS_COLUMNS[i].width).sum();
        if total > available_width && !visible.is_empty() {
            break;
        }
        visible = candidate;
    }
    visible
}

fn column_constraints(vis: &[usize]) -> Vec<Constraint> {
    vis.iter()
        .map(|&i| {
            if i == HEADLINE_COLUMN {
                Constraint::Min(NEWS_COLUMNS[i].width)
            } else {
                Constraint::Length(NEWS_COLUMNS[i].width)
            }
        })
        .collect()
}

fn marker(app: &App, article: &Article) -> &'static str {
    if app.is_bookmarked(article) {
        "★"
    } else if !app.is_read(article) {
        "•"
    } else {
        ""
    }
}

fn article_row(i: usize, article: &Article, vis: &[usize], app: &App) -> Row<'static> {
    let is_selected = i == app.selected;
    let mut text_style = if app.is_read(article) {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    if is_selected {
        text_style = text_style.fg(Color::White);
    }
    let bold_text = if is_selected {
        text_style.add_modifier(Modifier::BOLD)
    } else {
        text_style
    };

    let cells: Vec<Cell> = vis
        .iter()
        .map(|&col| match col {
            0 => Cell::from(marker(app, article)).style(Style::default().fg(Color::Yellow)),
            1 => Cell::from(article.relative_time()).style(text_style),
            2 => Cell::from(truncate_str(&article.source_name, 18)).style(text_style),
            3 => Cell::from(article.title.clone()).style(bold_text),
            _ => Cell::from(""),
        })
        .collect();

    let row_style = if is_selected {
        Style::default().bg(Color::Rgb(40, 60, 100))
    } else {
        Style::default()
    };
    Row::new(cells).style(row_style)
}

pub fn draw_articles(frame: &mut Frame, area: Rect, app: &App) {
    let available_width = area.width.saturating_sub(2);
    let vis = visible_columns(available_width);
    let header = Row::new(
        vis.iter()
            .map(|&i| {
                Cell::from(NEWS_COLUMNS[i].name)
                    .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
            })
            .collect::<Vec<_>>(),
    )
    .height(1);

    let articles = app.visible_articles();
    let rows: Vec<Row> = articles
        .iter()
        .enumerate()
        .map(|(i, article)| article_row(i, article, &vis, app))
        .collect();

    let title = match app.view_mode {
        ViewMode::Feed if app.is_loading_more => {
            format!(" {} ({} articles) [Loading more...] ", app.category.label(), articles.len())
        }
        ViewMode::Feed => format!(" {} ({} articles) ", app.category.label(), articles.len()),
        ViewMode::Bookmarks => format!(" Bookmarks ({}) ", articles.len()),
    };

    let table = Table::new(rows, column_constraints(&vis))
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    let mut state = TableState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}
