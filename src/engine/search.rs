use tracing::debug;

use crate::error::{Result, TriviaError};
use crate::models::Question;
use crate::store::QuestionStore;

/// Case-insensitive substring search over question text.
///
/// Results are grouped by ascending category id; within a category the store's
/// own order is kept, so the same data always paginates the same way.
pub fn search<S: QuestionStore + ?Sized>(store: &S, term: &str) -> Result<Vec<Question>> {
    if term.is_empty() {
        return Err(TriviaError::invalid("search term must not be empty"));
    }

    let mut found = store.search_by_text(term)?;
    // sort_by_key is stable
    found.sort_by_key(|q| q.category);

    debug!(term, matches = found.len(), "search complete");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewQuestion;
    use crate::store::memory::MemoryStore;

    fn store_with(questions: &[(&str, i64)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (text, category) in questions {
            store
                .insert(&NewQuestion {
                    question: text.to_string(),
                    answer: "answer".to_string(),
                    category: *category,
                    difficulty: 1,
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn empty_term_is_invalid() {
        let store = MemoryStore::bundled();
        assert!(matches!(
            search(&store, ""),
            Err(TriviaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn case_insensitive() {
        let store = store_with(&[
            ("My dog ate it", 1),
            ("DOGS and cats", 2),
            ("A hotdog stand", 3),
            ("Cats only", 1),
        ]);

        let upper = search(&store, "DOG").unwrap();
        let lower = search(&store, "dog").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 3);
    }

    #[test]
    fn matches_question_text_only() {
        let store = MemoryStore::bundled();
        // "Blood" is an answer, never part of a question
        assert!(search(&store, "blood").unwrap().is_empty());
    }

    #[test]
    fn single_match_in_bundled_data() {
        let store = MemoryStore::bundled();
        let found = search(&store, "body").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].answer, "The Liver");
    }

    #[test]
    fn ordered_by_category_then_store_order() {
        let store = store_with(&[
            ("what about c", 3),
            ("what about a1", 1),
            ("what about b", 2),
            ("what about a2", 1),
            ("what about c2", 3),
        ]);

        let found: Vec<String> = search(&store, "what")
            .unwrap()
            .into_iter()
            .map(|q| q.question)
            .collect();
        assert_eq!(
            found,
            vec![
                "what about a1",
                "what about a2",
                "what about b",
                "what about c",
                "what about c2"
            ]
        );
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let store = MemoryStore::bundled();
        assert!(search(&store, "zzzzzz").unwrap().is_empty());
    }
}
