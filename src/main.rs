mod config;
mod engine;
mod error;
mod handlers;
mod models;
mod store;
mod tui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use config::{Config, ConfigError};
use engine::QuestionPage;
use error::TriviaError;
use handlers::{PostQuestionsResponse, QuestionsPayload, QuizCategory, QuizPayload};
use models::{Dataset, JsonOutput, Question};
use store::sqlite::Database;
use store::QuestionStore;

const BUNDLED_DATASET: &str = include_str!("../data/trivia.json");

#[derive(Parser)]
#[command(name = "trivia")]
#[command(about = "Browse, search and quiz yourself on a trivia question bank")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Database file (overrides TRIVIA_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init {
        /// Load the bundled sample questions into an empty database
        #[arg(long)]
        seed: bool,
    },

    /// Import categories and questions from a JSON file
    Import {
        /// Path to a JSON dataset
        path: PathBuf,
    },

    /// List all categories
    Categories,

    /// Manage and browse questions
    #[command(subcommand)]
    Questions(QuestionCommands),

    /// List the questions in one category
    Category {
        /// Category ID
        id: i64,

        /// Page number (1-based)
        #[arg(long, short)]
        page: Option<String>,
    },

    /// Draw a random quiz question that hasn't been asked yet
    Quiz {
        /// Category ID, or "all"
        #[arg(long, short, default_value = "all")]
        category: String,

        /// Comma-separated IDs of questions already asked
        #[arg(long, short)]
        previous: Option<String>,

        /// Raw JSON quiz request, e.g. '{"previous_questions": [], "quiz_category": 0}'
        #[arg(long, conflicts_with_all = ["category", "previous"])]
        body: Option<String>,
    },

    /// Launch interactive terminal UI
    Tui,
}

#[derive(Subcommand)]
enum QuestionCommands {
    /// List questions a page at a time
    List {
        /// Page number (1-based)
        #[arg(long, short)]
        page: Option<String>,
    },

    /// Add a new question
    Add {
        /// Question text
        #[arg(long, short)]
        question: Option<String>,

        /// Answer text
        #[arg(long, short)]
        answer: Option<String>,

        /// Category ID
        #[arg(long, short)]
        category: Option<i64>,

        /// Difficulty rating
        #[arg(long, short)]
        difficulty: Option<i64>,
    },

    /// Show one question with its answer
    Show {
        /// Question ID
        id: i64,
    },

    /// Delete a question
    Delete {
        /// Question ID
        id: i64,
    },

    /// Search question text (case-insensitive)
    Search {
        /// Text to look for
        term: String,

        /// Page number (1-based)
        #[arg(long, short)]
        page: Option<String>,
    },

    /// Send a raw JSON body: searches when it has "searchTerm", creates otherwise
    Post {
        /// JSON payload
        body: String,

        /// Page number for searches (1-based)
        #[arg(long, short)]
        page: Option<String>,
    },
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        let (code, message) = outward_status(&*e);
        warn!(code, error = %e, "request rejected");
        if json {
            match serde_json::to_string(&JsonOutput::<()>::err(code, message)) {
                Ok(out) => println!("{}", out),
                Err(ser) => eprintln!("Error: {}", ser),
            }
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

const BAD_REQUEST: (u16, &str) = (400, "Bad Request");
const NOT_FOUND: (u16, &str) = (404, "Resource Not Found");
const NOT_PROCESSABLE: (u16, &str) = (422, "Not Processable");

/// Status code and message shown to callers for each failure class.
///
/// Config and JSON parse errors count as bad requests. Any other error that
/// never became a [`TriviaError`] (store, I/O) is not processable.
fn outward_status(err: &(dyn std::error::Error + 'static)) -> (u16, &'static str) {
    match err.downcast_ref::<TriviaError>() {
        Some(TriviaError::InvalidArgument(_)) => BAD_REQUEST,
        Some(TriviaError::NotFound(_)) => NOT_FOUND,
        Some(TriviaError::Unprocessable(_)) => NOT_PROCESSABLE,
        None if err.is::<ConfigError>() || err.is::<serde_json::Error>() => BAD_REQUEST,
        None => NOT_PROCESSABLE,
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(cli.db.as_deref())?;
    let db = Database::open(&config.db_path)?;
    db.init()?;

    match cli.command {
        Commands::Init { seed } => {
            let seeded = if seed && db.list_all()?.is_empty() {
                let dataset: Dataset = serde_json::from_str(BUNDLED_DATASET)?;
                Some(db.import(&dataset)?)
            } else {
                None
            };

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "path": config.db_path,
                        "seeded_questions": seeded.map(|(_, q)| q).unwrap_or(0)
                    })))?
                );
            } else {
                println!("Database initialized at: {}", config.db_path.display());
                match seeded {
                    Some((categories, questions)) => println!(
                        "Seeded {} categories and {} questions.",
                        categories, questions
                    ),
                    None if seed => println!("Database already has questions; skipped seeding."),
                    None => {}
                }
            }
        }

        Commands::Import { path } => {
            let raw = std::fs::read_to_string(&path)?;
            let dataset: Dataset = serde_json::from_str(&raw)?;
            let (categories, questions) = db.import(&dataset)?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "categories": categories,
                        "questions": questions
                    })))?
                );
            } else {
                println!(
                    "Imported {} categories and {} questions from {}.",
                    categories,
                    questions,
                    path.display()
                );
            }
        }

        Commands::Categories => {
            let response = handlers::list_categories(&db)?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&response))?);
            } else {
                println!("{:<5} TYPE", "ID");
                println!("{}", "-".repeat(30));
                for (id, kind) in &response.categories {
                    println!("{:<5} {}", id, kind);
                }
            }
        }

        Commands::Questions(question_cmd) => match question_cmd {
            QuestionCommands::List { page } => {
                let response = handlers::list_questions(&db, page.as_deref(), config.page_size)?;
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(&response))?);
                } else {
                    print_questions(&response.questions);
                    println!();
                    println!("{} questions in total.", response.total_questions);
                }
            }

            QuestionCommands::Add {
                question,
                answer,
                category,
                difficulty,
            } => {
                let payload = QuestionsPayload {
                    search_term: None,
                    question,
                    answer,
                    category,
                    difficulty,
                };
                let response = handlers::create_question(&db, payload)?;

                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(&response))?);
                } else {
                    println!("Added question with ID: {}", response.created);
                }
            }

            QuestionCommands::Show { id } => {
                let question = handlers::get_question(&db, id)?;
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(&question))?);
                } else {
                    println!("{}", question.question);
                    println!();
                    println!(
                        "Category: {}  Difficulty: {}  ID: {}",
                        question.category, question.difficulty, question.id
                    );
                    println!("Answer: {}", question.answer);
                }
            }

            QuestionCommands::Delete { id } => {
                let response = handlers::delete_question(&db, id)?;
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(&response))?);
                } else {
                    println!("Question {} deleted.", response.deleted);
                }
            }

            QuestionCommands::Search { term, page } => {
                let payload = QuestionsPayload {
                    search_term: Some(term),
                    ..Default::default()
                };
                let response =
                    handlers::post_questions(&db, payload, page.as_deref(), config.page_size)?;
                print_post_response(&response, cli.json)?;
            }

            QuestionCommands::Post { body, page } => {
                let payload: QuestionsPayload = serde_json::from_str(&body)
                    .map_err(|e| TriviaError::invalid(format!("malformed body: {}", e)))?;
                let response =
                    handlers::post_questions(&db, payload, page.as_deref(), config.page_size)?;
                print_post_response(&response, cli.json)?;
            }
        },

        Commands::Category { id, page } => {
            let response = handlers::category_questions(&db, id, page.as_deref(), config.page_size)?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&response))?);
            } else {
                print_page(&response);
            }
        }

        Commands::Quiz {
            category,
            previous,
            body,
        } => {
            let payload = match body {
                Some(body) => serde_json::from_str::<QuizPayload>(&body)
                    .map_err(|e| TriviaError::invalid(format!("malformed body: {}", e)))?,
                None => QuizPayload {
                    previous_questions: Some(parse_id_list(previous.as_deref())?),
                    quiz_category: Some(parse_quiz_category(&category)),
                },
            };
            let previous_ids = payload.previous_questions.clone().unwrap_or_default();
            let scope = payload.quiz_category.as_ref().map(|c| c.scope()).transpose()?;

            let response = handlers::next_quiz(&db, payload, &mut rand::thread_rng())?;

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&response))?);
            } else if let Some(q) = &response.question {
                println!("=== Quiz Question ===");
                println!();
                println!("{}", q.question);
                println!();
                println!("Category: {}  Difficulty: {}  ID: {}", q.category, q.difficulty, q.id);
                println!("Answer: {}", q.answer);
                println!();
                println!("Next question with:");
                let mut asked = previous_ids;
                asked.push(q.id);
                println!(
                    "  trivia quiz --category {} --previous {}",
                    scope.map(|s| s.to_string()).unwrap_or_else(|| "all".to_string()),
                    join_ids(&asked)
                );
            } else {
                println!("No more questions. Quiz complete!");
            }
        }

        Commands::Tui => {
            tui::run(db, config.page_size)?;
        }
    }

    Ok(())
}

fn print_post_response(
    response: &PostQuestionsResponse,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(&JsonOutput::ok(response))?);
        return Ok(());
    }

    match response {
        PostQuestionsResponse::Search(page) => print_page(page),
        PostQuestionsResponse::Created(created) => {
            println!("Added question with ID: {}", created.created)
        }
    }
    Ok(())
}

fn print_page(page: &QuestionPage) {
    if page.questions.is_empty() {
        println!("No questions found.");
        return;
    }
    print_questions(&page.questions);
    println!();
    match page.current_category {
        Some(category) => println!(
            "{} questions in category {}.",
            page.total_questions, category
        ),
        None => println!("{} matching questions.", page.total_questions),
    }
}

fn print_questions(questions: &[Question]) {
    println!("{:<5} {:<4} {:<5} QUESTION", "ID", "CAT", "DIFF");
    println!("{}", "-".repeat(70));
    for q in questions {
        println!(
            "{:<5} {:<4} {:<5} {}",
            q.id,
            q.category,
            q.difficulty,
            truncate(&q.question, 54)
        );
    }
}

fn parse_quiz_category(raw: &str) -> QuizCategory {
    match raw.trim().parse::<i64>() {
        Ok(id) => QuizCategory::Id(id),
        Err(_) => QuizCategory::Name(raw.to_string()),
    }
}

fn parse_id_list(raw: Option<&str>) -> Result<Vec<i64>, TriviaError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| TriviaError::invalid(format!("'{}' is not a question id", s)))
        })
        .collect()
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
