use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::CategoryScope;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Scope and score
            Constraint::Min(0),    // Question
        ])
        .split(area);

    draw_status(f, app, chunks[0]);

    if app.quiz.finished() {
        draw_finished(f, app, chunks[1]);
    } else {
        draw_question(f, app, chunks[1]);
    }
}

fn scope_label(app: &App) -> String {
    match app.quiz.scope {
        CategoryScope::All => "All categories".to_string(),
        CategoryScope::Category(id) => app.category_name(id).to_string(),
    }
}

fn answered(app: &App) -> usize {
    // The current question is already in the asked list
    if app.quiz.finished() {
        app.quiz.asked.len()
    } else {
        app.quiz.asked.len().saturating_sub(1)
    }
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled("Scope: ", Style::default().fg(Color::DarkGray)),
        Span::styled(scope_label(app), Style::default().fg(Color::Cyan)),
        Span::raw("    "),
        Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}/{}", app.quiz.correct, answered(app)),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let status = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Quiz "));
    f.render_widget(status, area);
}

fn draw_question(f: &mut Frame, app: &App, area: Rect) {
    let Some(question) = &app.quiz.current else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "#{} · {} · difficulty {}",
                app.quiz.asked.len(),
                app.category_name(question.category),
                question.difficulty
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            question.question.as_str(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if app.quiz.revealed {
        lines.push(Line::from(vec![
            Span::styled("Answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(question.answer.as_str(), Style::default().fg(Color::Green)),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "Press <CR> to reveal the answer",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn draw_finished(f: &mut Frame, app: &App, area: Rect) {
    let lines = if app.quiz.asked.is_empty() {
        vec![Line::from(Span::styled(
            "No questions in this category",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        vec![
            Line::from(Span::styled(
                "Quiz complete",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!(
                "You got {} of {} right",
                app.quiz.correct,
                app.quiz.asked.len()
            )),
            Line::from(""),
            Line::from(Span::styled(
                "r to play again · c to change category",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(paragraph, area);
}
