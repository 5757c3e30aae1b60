use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{debug, info};

use super::{CategoryStore, QuestionStore, StoreResult};
use crate::models::{Category, Dataset, NewQuestion, Question};

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> StoreResult<()> {
        // AUTOINCREMENT keeps deleted ids from being handed out again
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                type TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                category INTEGER NOT NULL,
                difficulty INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category);
            "#,
        )?;
        Ok(())
    }

    /// Loads a dataset, returning the number of (categories, questions) written.
    ///
    /// Categories already present by id are left alone. Questions always get
    /// fresh ids.
    pub fn import(&self, dataset: &Dataset) -> StoreResult<(usize, usize)> {
        let tx = self.conn.unchecked_transaction()?;

        let mut categories = 0;
        for category in &dataset.categories {
            categories += tx.execute(
                "INSERT OR IGNORE INTO categories (id, type) VALUES (?1, ?2)",
                params![category.id, category.kind],
            )?;
        }

        for question in &dataset.questions {
            self.insert(question)?;
        }

        tx.commit()?;
        info!(
            categories,
            questions = dataset.questions.len(),
            "imported dataset"
        );
        Ok((categories, dataset.questions.len()))
    }

    fn query_questions(&self, sql: &str, args: impl rusqlite::Params) -> StoreResult<Vec<Question>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, question_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        category: row.get(3)?,
        difficulty: row.get(4)?,
    })
}

impl QuestionStore for Database {
    fn list_all(&self) -> StoreResult<Vec<Question>> {
        self.query_questions(
            &format!("SELECT {} FROM questions ORDER BY id", QUESTION_COLUMNS),
            params![],
        )
    }

    fn list_by_category(&self, category_id: i64) -> StoreResult<Vec<Question>> {
        self.query_questions(
            &format!(
                "SELECT {} FROM questions WHERE category = ?1 ORDER BY id",
                QUESTION_COLUMNS
            ),
            params![category_id],
        )
    }

    fn search_by_text(&self, needle: &str) -> StoreResult<Vec<Question>> {
        // SQLite's lower() only folds ASCII, so matching happens on the Rust side
        debug!(needle, "searching question text");
        let needle = needle.to_lowercase();
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .collect())
    }

    fn get(&self, id: i64) -> StoreResult<Option<Question>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM questions WHERE id = ?1",
            QUESTION_COLUMNS
        ))?;

        match stmt.query_row(params![id], question_from_row) {
            Ok(q) => Ok(Some(q)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert(&self, question: &NewQuestion) -> StoreResult<Question> {
        self.conn.execute(
            "INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)",
            params![
                question.question,
                question.answer,
                question.category,
                question.difficulty
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, category = question.category, "inserted question");

        Ok(Question {
            id,
            question: question.question.clone(),
            answer: question.answer.clone(),
            category: question.category,
            difficulty: question.difficulty,
        })
    }

    fn delete(&self, id: i64) -> StoreResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM questions WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

impl CategoryStore for Database {
    fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, type FROM categories ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                kind: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        let db = Database::open(":memory:").expect("Failed to create in-memory database");
        db.init().expect("Failed to initialize database");
        db
    }

    fn new_question(text: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: text.to_string(),
            answer: "answer".to_string(),
            category,
            difficulty: 1,
        }
    }

    mod init_tests {
        use super::*;

        #[test]
        fn init_creates_tables() {
            let db = setup_db();
            let questions: i64 = db
                .conn
                .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))
                .expect("questions table should exist");
            assert_eq!(questions, 0);

            let categories: i64 = db
                .conn
                .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
                .expect("categories table should exist");
            assert_eq!(categories, 0);
        }

        #[test]
        fn init_is_idempotent() {
            let db = setup_db();
            db.insert(&new_question("Test?", 1)).unwrap();

            // Re-init should not fail or clear data
            db.init().expect("Re-init should succeed");

            assert_eq!(db.list_all().unwrap().len(), 1);
        }

        #[test]
        fn open_on_disk_persists_between_handles() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("trivia.db");

            {
                let db = Database::open(&path).unwrap();
                db.init().unwrap();
                db.insert(&new_question("Persisted?", 2)).unwrap();
            }

            let db = Database::open(&path).unwrap();
            let questions = db.list_all().unwrap();
            assert_eq!(questions.len(), 1);
            assert_eq!(questions[0].question, "Persisted?");
        }
    }

    mod question_tests {
        use super::*;

        #[test]
        fn insert_returns_stored_fields() {
            let db = setup_db();
            let input = NewQuestion {
                question: "Who discovered penicillin?".to_string(),
                answer: "Alexander Fleming".to_string(),
                category: 1,
                difficulty: 3,
            };
            let stored = db.insert(&input).unwrap();
            assert!(stored.id > 0);

            let fetched = db.get(stored.id).unwrap().unwrap();
            assert_eq!(fetched, stored);
            assert_eq!(fetched.question, input.question);
            assert_eq!(fetched.answer, input.answer);
            assert_eq!(fetched.category, input.category);
            assert_eq!(fetched.difficulty, input.difficulty);
        }

        #[test]
        fn get_not_found() {
            let db = setup_db();
            assert!(db.get(999).unwrap().is_none());
        }

        #[test]
        fn list_all_in_id_order() {
            let db = setup_db();
            let a = db.insert(&new_question("A?", 3)).unwrap();
            let b = db.insert(&new_question("B?", 1)).unwrap();
            let c = db.insert(&new_question("C?", 2)).unwrap();

            let ids: Vec<i64> = db.list_all().unwrap().iter().map(|q| q.id).collect();
            assert_eq!(ids, vec![a.id, b.id, c.id]);
        }

        #[test]
        fn list_by_category_filters() {
            let db = setup_db();
            db.insert(&new_question("Science 1?", 1)).unwrap();
            db.insert(&new_question("Art 1?", 2)).unwrap();
            db.insert(&new_question("Science 2?", 1)).unwrap();

            let science = db.list_by_category(1).unwrap();
            assert_eq!(science.len(), 2);
            assert!(science.iter().all(|q| q.category == 1));
        }

        #[test]
        fn list_by_unknown_category_is_empty() {
            let db = setup_db();
            db.insert(&new_question("Science?", 1)).unwrap();
            assert!(db.list_by_category(1000).unwrap().is_empty());
        }

        #[test]
        fn search_is_case_insensitive() {
            let db = setup_db();
            db.insert(&new_question("What is the heaviest organ in the human body?", 1))
                .unwrap();
            db.insert(&new_question("Who invented Peanut Butter?", 4))
                .unwrap();

            let lower = db.search_by_text("body").unwrap();
            let upper = db.search_by_text("BODY").unwrap();
            assert_eq!(lower.len(), 1);
            assert_eq!(lower, upper);
        }

        #[test]
        fn search_folds_non_ascii_case() {
            let db = setup_db();
            db.insert(&new_question("Which ÉCOLE is oldest?", 1)).unwrap();
            db.insert(&new_question("Where is the Straße of Gibraltar?", 3))
                .unwrap();

            let upper = db.search_by_text("ÉCOLE").unwrap();
            let lower = db.search_by_text("école").unwrap();
            assert_eq!(upper.len(), 1);
            assert_eq!(upper, lower);

            assert_eq!(
                db.search_by_text("STRASSE").unwrap().len(),
                0,
                "case folding is not full Unicode normalization"
            );
            assert_eq!(db.search_by_text("STRAßE").unwrap().len(), 1);
        }

        #[test]
        fn engine_search_agrees_with_memory_store() {
            use crate::engine::search::search;
            use crate::store::memory::MemoryStore;

            let db = setup_db();
            let memory = MemoryStore::new();
            for text in ["Qui a écrit ÉMILE?", "Who wrote Emile?", "ÑANDÚ or ostrich?"] {
                db.insert(&new_question(text, 1)).unwrap();
                memory.insert(&new_question(text, 1)).unwrap();
            }

            for term in ["émile", "ÉMILE", "ñandú", "NANDU", "emile"] {
                assert_eq!(search(&db, term).unwrap(), search(&memory, term).unwrap(), "{}", term);
            }
        }

        #[test]
        fn search_ignores_answer_text() {
            let db = setup_db();
            db.insert(&NewQuestion {
                question: "Who discovered penicillin?".to_string(),
                answer: "Alexander Fleming".to_string(),
                category: 1,
                difficulty: 3,
            })
            .unwrap();

            assert!(db.search_by_text("fleming").unwrap().is_empty());
        }

        #[test]
        fn search_treats_wildcards_literally() {
            let db = setup_db();
            db.insert(&new_question("What is 100% cotton?", 1)).unwrap();
            db.insert(&new_question("What is cotton?", 1)).unwrap();

            assert_eq!(db.search_by_text("%").unwrap().len(), 1);
            assert!(db.search_by_text("_").unwrap().is_empty());
        }

        #[test]
        fn delete_success() {
            let db = setup_db();
            let q = db.insert(&new_question("To delete?", 1)).unwrap();

            assert!(db.delete(q.id).unwrap());
            assert!(db.get(q.id).unwrap().is_none());
        }

        #[test]
        fn delete_not_found() {
            let db = setup_db();
            assert!(!db.delete(999).unwrap());
        }

        #[test]
        fn delete_twice_reports_missing() {
            let db = setup_db();
            let q = db.insert(&new_question("Once?", 1)).unwrap();
            assert!(db.delete(q.id).unwrap());
            assert!(!db.delete(q.id).unwrap());
        }

        #[test]
        fn deleted_ids_are_not_reused() {
            let db = setup_db();
            db.insert(&new_question("First?", 1)).unwrap();
            let last = db.insert(&new_question("Second?", 1)).unwrap();
            db.delete(last.id).unwrap();

            let next = db.insert(&new_question("Third?", 1)).unwrap();
            assert!(next.id > last.id);
        }
    }

    mod category_tests {
        use super::*;

        #[test]
        fn list_categories_empty() {
            let db = setup_db();
            assert!(db.list_categories().unwrap().is_empty());
        }

        #[test]
        fn list_categories_sorted_by_id() {
            let db = setup_db();
            db.import(&Dataset {
                categories: vec![
                    Category {
                        id: 3,
                        kind: "Geography".to_string(),
                    },
                    Category {
                        id: 1,
                        kind: "Science".to_string(),
                    },
                ],
                questions: vec![],
            })
            .unwrap();

            let ids: Vec<i64> = db.list_categories().unwrap().iter().map(|c| c.id).collect();
            assert_eq!(ids, vec![1, 3]);
        }
    }

    mod import_tests {
        use super::*;

        #[test]
        fn import_counts_rows() {
            let db = setup_db();
            let dataset = Dataset {
                categories: vec![Category {
                    id: 1,
                    kind: "Science".to_string(),
                }],
                questions: vec![new_question("A?", 1), new_question("B?", 1)],
            };

            let (categories, questions) = db.import(&dataset).unwrap();
            assert_eq!(categories, 1);
            assert_eq!(questions, 2);
            assert_eq!(db.list_all().unwrap().len(), 2);
        }

        #[test]
        fn import_skips_existing_categories() {
            let db = setup_db();
            let dataset = Dataset {
                categories: vec![Category {
                    id: 1,
                    kind: "Science".to_string(),
                }],
                questions: vec![],
            };
            db.import(&dataset).unwrap();

            let renamed = Dataset {
                categories: vec![Category {
                    id: 1,
                    kind: "Biology".to_string(),
                }],
                questions: vec![],
            };
            let (categories, _) = db.import(&renamed).unwrap();
            assert_eq!(categories, 0);
            assert_eq!(db.list_categories().unwrap()[0].kind, "Science");
        }

        #[test]
        fn import_bundled_dataset() {
            let db = setup_db();
            let dataset: Dataset =
                serde_json::from_str(include_str!("../../data/trivia.json")).unwrap();

            let (categories, questions) = db.import(&dataset).unwrap();
            assert_eq!(categories, 6);
            assert_eq!(questions, 19);
        }
    }
}
