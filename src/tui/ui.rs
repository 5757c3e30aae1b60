use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{questions, quiz};
use super::{App, View};
use crate::engine::QuestionFilter;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_help_bar(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let selected = match app.view {
        View::Questions => 0,
        View::Quiz => 1,
    };

    let tabs = Tabs::new(vec!["Questions", "Quiz"])
        .block(Block::default().borders(Borders::ALL).title(" Trivia "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Questions => questions::draw(f, app, area),
        View::Quiz => quiz::draw(f, app, area),
    }
}

fn key(label: &str) -> Span<'_> {
    Span::styled(label, Style::default().fg(Color::Cyan))
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.search_mode {
        vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(&app.search_input),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            key("<CR>"),
            Span::raw(" Search  "),
            key("<Esc>"),
            Span::raw(" Cancel"),
        ]
    } else if let Some(status) = &app.status {
        vec![
            Span::styled(status.as_str(), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            key("q"),
            Span::raw(" Quit"),
        ]
    } else {
        let mut spans = vec![key("h/l"), Span::raw(" Views  ")];

        match app.view {
            View::Questions => {
                spans.extend(vec![
                    key("j/k"),
                    Span::raw(" Nav  "),
                    key("n/p"),
                    Span::raw(" Page  "),
                    key("/"),
                    Span::raw(" Search  "),
                    key("c"),
                    Span::raw(" Category  "),
                    key("d"),
                    Span::raw(" Delete  "),
                ]);
                if app.filter != QuestionFilter::All {
                    spans.extend(vec![key("<Esc>"), Span::raw(" Clear  ")]);
                }
            }
            View::Quiz => {
                if app.quiz.revealed {
                    spans.extend(vec![key("y/n"), Span::raw(" Right/Wrong  ")]);
                } else if !app.quiz.finished() {
                    spans.extend(vec![key("<CR>"), Span::raw(" Reveal  ")]);
                }
                spans.extend(vec![
                    key("c"),
                    Span::raw(" Category  "),
                    key("r"),
                    Span::raw(" Restart  "),
                ]);
            }
        }

        spans.extend(vec![key("q"), Span::raw(" Quit")]);

        spans
    };

    let help = Paragraph::new(Line::from(help_text)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
