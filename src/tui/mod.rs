mod ui;
mod widgets;

use std::collections::HashSet;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::engine::pagination::page_count;
use crate::engine::quiz::next_quiz_question;
use crate::engine::{fetch_page, QuestionFilter};
use crate::error::TriviaError;
use crate::models::{Category, CategoryScope, Question};
use crate::store::sqlite::Database;
use crate::store::CategoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Questions,
    Quiz,
}

impl View {
    fn next(&self) -> Self {
        match self {
            View::Questions => View::Quiz,
            View::Quiz => View::Questions,
        }
    }
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

/// One run through a quiz. The session is the quiz client: it owns the
/// list of asked ids and hands it to the selector on every draw.
pub struct QuizSession {
    pub scope: CategoryScope,
    pub asked: Vec<i64>,
    pub current: Option<Question>,
    pub revealed: bool,
    pub correct: usize,
}

impl QuizSession {
    fn new(scope: CategoryScope) -> Self {
        Self {
            scope,
            asked: Vec::new(),
            current: None,
            revealed: false,
            correct: 0,
        }
    }

    pub fn finished(&self) -> bool {
        self.current.is_none()
    }
}

pub struct App {
    db: Database,
    rng: StdRng,
    page_size: usize,
    pub view: View,
    pub categories: Vec<Category>,
    pub questions: StatefulList<Question>,
    pub filter: QuestionFilter,
    pub page: usize,
    pub total_questions: usize,
    pub search_input: String,
    pub search_mode: bool,
    pub status: Option<String>,
    pub quiz: QuizSession,
    pub should_quit: bool,
}

impl App {
    pub fn new(db: Database, page_size: usize) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_rng(db, page_size, StdRng::from_entropy())
    }

    fn with_rng(
        db: Database,
        page_size: usize,
        rng: StdRng,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let categories = db.list_categories()?;

        let mut app = Self {
            db,
            rng,
            page_size,
            view: View::Questions,
            categories,
            questions: StatefulList::with_items(Vec::new()),
            filter: QuestionFilter::All,
            page: 1,
            total_questions: 0,
            search_input: String::new(),
            search_mode: false,
            status: None,
            quiz: QuizSession::new(CategoryScope::All),
            should_quit: false,
        };
        app.load_page()?;
        app.draw_quiz_question()?;
        Ok(app)
    }

    pub fn page_total(&self) -> usize {
        page_count(self.total_questions, self.page_size)
    }

    pub fn category_name(&self, id: i64) -> &str {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.kind.as_str())
            .unwrap_or("?")
    }

    // Returns false when the requested page doesn't exist
    fn load_page(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
        match fetch_page(&self.db, &self.filter, self.page, self.page_size) {
            Ok(listed) => {
                self.total_questions = listed.total_questions;
                self.questions = StatefulList::with_items(listed.questions);
                Ok(true)
            }
            Err(TriviaError::NotFound(_)) => Ok(false),
            Err(TriviaError::InvalidArgument(msg)) => {
                self.status = Some(msg);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_filter(&mut self, filter: QuestionFilter) -> Result<(), Box<dyn std::error::Error>> {
        self.filter = filter;
        self.page = 1;
        self.status = None;
        self.load_page()?;
        Ok(())
    }

    fn next_page(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.page += 1;
        if !self.load_page()? {
            self.page -= 1;
            self.status = Some("Already on the last page".to_string());
        } else {
            self.status = None;
        }
        Ok(())
    }

    fn previous_page(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.page > 1 {
            self.page -= 1;
            self.load_page()?;
            self.status = None;
        }
        Ok(())
    }

    fn cycle_category_filter(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let current = match &self.filter {
            QuestionFilter::Category(id) => Some(*id),
            _ => None,
        };
        let next = next_category(&self.categories, current);
        self.search_input.clear();
        self.set_filter(next.map_or(QuestionFilter::All, QuestionFilter::Category))
    }

    fn delete_selected(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(id) = self.questions.selected_item().map(|q| q.id) else {
            return Ok(());
        };

        match crate::handlers::delete_question(&self.db, id) {
            Ok(_) => self.status = Some(format!("Deleted question {}", id)),
            Err(TriviaError::NotFound(_)) => self.status = Some(format!("Question {} is already gone", id)),
            Err(e) => return Err(e.into()),
        }

        // Deleting the last item on a page steps back a page
        if !self.load_page()? && self.page > 1 {
            self.page -= 1;
            self.load_page()?;
        }
        Ok(())
    }

    fn draw_quiz_question(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let excluded: HashSet<i64> = self.quiz.asked.iter().copied().collect();
        let next = next_quiz_question(&self.db, self.quiz.scope, &excluded, &mut self.rng)?;
        debug!(asked = self.quiz.asked.len(), found = next.is_some(), "quiz draw");

        if let Some(q) = &next {
            self.quiz.asked.push(q.id);
        }
        self.quiz.current = next;
        self.quiz.revealed = false;
        Ok(())
    }

    fn grade_quiz_answer(&mut self, correct: bool) -> Result<(), Box<dyn std::error::Error>> {
        if self.quiz.finished() || !self.quiz.revealed {
            return Ok(());
        }
        if correct {
            self.quiz.correct += 1;
        }
        self.draw_quiz_question()
    }

    fn restart_quiz(&mut self, scope: CategoryScope) -> Result<(), Box<dyn std::error::Error>> {
        self.quiz = QuizSession::new(scope);
        self.draw_quiz_question()
    }

    fn cycle_quiz_scope(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let next = next_category(&self.categories, self.quiz.scope.category_id());
        self.restart_quiz(next.map_or(CategoryScope::All, CategoryScope::Category))
    }

    fn handle_key(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // Search input mode (vim-like /)
        if self.search_mode {
            match key {
                KeyCode::Esc => {
                    self.search_mode = false;
                    self.search_input.clear();
                }
                KeyCode::Enter => {
                    self.search_mode = false;
                    if self.search_input.is_empty() {
                        self.set_filter(QuestionFilter::All)?;
                    } else {
                        self.set_filter(QuestionFilter::Search(self.search_input.clone()))?;
                    }
                }
                KeyCode::Backspace => {
                    self.search_input.pop();
                }
                KeyCode::Char(c) => {
                    self.search_input.push(c);
                }
                _ => {}
            }
            return Ok(());
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }

            KeyCode::Tab | KeyCode::BackTab => self.view = self.view.next(),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('l') | KeyCode::Right => {
                self.view = self.view.next()
            }

            _ => match self.view {
                View::Questions => self.handle_questions_key(key)?,
                View::Quiz => self.handle_quiz_key(key)?,
            },
        }
        Ok(())
    }

    fn handle_questions_key(&mut self, key: KeyCode) -> Result<(), Box<dyn std::error::Error>> {
        match key {
            KeyCode::Char('j') | KeyCode::Down => self.questions.next(),
            KeyCode::Char('k') | KeyCode::Up => self.questions.previous(),
            KeyCode::Char('g') if !self.questions.items.is_empty() => {
                self.questions.selected = Some(0);
            }
            KeyCode::Char('G') if !self.questions.items.is_empty() => {
                self.questions.selected = Some(self.questions.items.len() - 1);
            }
            KeyCode::Char('n') | KeyCode::PageDown => self.next_page()?,
            KeyCode::Char('p') | KeyCode::PageUp => self.previous_page()?,
            KeyCode::Char('/') => {
                self.search_mode = true;
                self.search_input.clear();
            }
            KeyCode::Char('c') => self.cycle_category_filter()?,
            KeyCode::Char('d') => self.delete_selected()?,
            KeyCode::Esc if self.filter != QuestionFilter::All => {
                self.search_input.clear();
                self.set_filter(QuestionFilter::All)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_quiz_key(&mut self, key: KeyCode) -> Result<(), Box<dyn std::error::Error>> {
        match key {
            KeyCode::Enter | KeyCode::Char(' ') => self.quiz.revealed = true,
            KeyCode::Char('y') => self.grade_quiz_answer(true)?,
            KeyCode::Char('n') => self.grade_quiz_answer(false)?,
            KeyCode::Char('c') => self.cycle_quiz_scope()?,
            KeyCode::Char('r') => self.restart_quiz(self.quiz.scope)?,
            _ => {}
        }
        Ok(())
    }
}

/// Steps through `None` (all) and each category id in order, wrapping around.
fn next_category(categories: &[Category], current: Option<i64>) -> Option<i64> {
    match current {
        None => categories.first().map(|c| c.id),
        Some(id) => categories
            .iter()
            .position(|c| c.id == id)
            .and_then(|i| categories.get(i + 1))
            .map(|c| c.id),
    }
}

pub fn run(db: Database, page_size: usize) -> Result<(), Box<dyn std::error::Error>> {
    // Create app state before touching the terminal so load errors print normally
    let mut app = App::new(db, page_size)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers)?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
