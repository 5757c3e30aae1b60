use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::engine::QuestionFilter;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    draw_list(f, app, chunks[0]);
    draw_answer(f, app, chunks[1]);
}

fn filter_label(app: &App) -> String {
    match &app.filter {
        QuestionFilter::All => "all".to_string(),
        QuestionFilter::Category(id) => app.category_name(*id).to_string(),
        QuestionFilter::Search(term) => format!("search: {}", term),
    }
}

fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " Questions ({}) page {}/{} · {} total ",
        filter_label(app),
        app.page,
        app.page_total().max(1),
        app.total_questions
    );

    let question_width = (area.width as usize).saturating_sub(30).max(10);

    let items: Vec<ListItem> = app
        .questions
        .items
        .iter()
        .map(|q| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<5}", q.id), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:<15}", truncate(app.category_name(q.category), 14)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<3}", q.difficulty),
                    Style::default().fg(difficulty_color(q.difficulty)),
                ),
                Span::styled(
                    truncate(&q.question, question_width),
                    Style::default().fg(Color::White),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(Color::Cyan));

    let header = Line::from(vec![
        Span::styled(
            format!("{:<5}", "ID"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:<15}", "Category"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:<3}", "D"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Question",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.questions.selected);

    let header_area = Rect {
        x: area.x + 3,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: 1,
    };
    f.render_widget(Paragraph::new(header), header_area);

    let list_area = Rect {
        x: area.x,
        y: area.y + 1,
        width: area.width,
        height: area.height.saturating_sub(1),
    };

    f.render_stateful_widget(list, list_area, &mut state);
}

fn draw_answer(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.questions.selected_item() {
        Some(q) => Line::from(vec![
            Span::styled("Answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(q.answer.as_str(), Style::default().fg(Color::Green)),
        ]),
        None => Line::from(Span::styled(
            "No questions",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn difficulty_color(difficulty: i64) -> Color {
    match difficulty {
        i64::MIN..=1 => Color::Green,
        2 => Color::LightGreen,
        3 => Color::Yellow,
        4 => Color::LightRed,
        _ => Color::Red,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
