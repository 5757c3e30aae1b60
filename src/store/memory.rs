use std::cell::{Cell, RefCell};

use super::{CategoryStore, QuestionStore, StoreResult};
use crate::models::{Category, Dataset, NewQuestion, Question};

/// Vec-backed store with the same ordering and id rules as the SQLite one.
#[derive(Default)]
pub struct MemoryStore {
    questions: RefCell<Vec<Question>>,
    categories: Vec<Category>,
    next_id: Cell<i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories.extend(categories);
        self.categories.sort_by_key(|c| c.id);
        self
    }

    pub fn seeded(dataset: &Dataset) -> Self {
        let store = Self::new().with_categories(dataset.categories.clone());
        for question in &dataset.questions {
            store.insert(question).expect("in-memory insert cannot fail");
        }
        store
    }

    pub fn bundled() -> Self {
        let dataset: Dataset = serde_json::from_str(include_str!("../../data/trivia.json"))
            .expect("bundled dataset is valid JSON");
        Self::seeded(&dataset)
    }
}

impl QuestionStore for MemoryStore {
    fn list_all(&self) -> StoreResult<Vec<Question>> {
        Ok(self.questions.borrow().clone())
    }

    fn list_by_category(&self, category_id: i64) -> StoreResult<Vec<Question>> {
        Ok(self
            .questions
            .borrow()
            .iter()
            .filter(|q| q.category == category_id)
            .cloned()
            .collect())
    }

    fn search_by_text(&self, needle: &str) -> StoreResult<Vec<Question>> {
        let needle = needle.to_lowercase();
        Ok(self
            .questions
            .borrow()
            .iter()
            .filter(|q| q.question.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn get(&self, id: i64) -> StoreResult<Option<Question>> {
        Ok(self.questions.borrow().iter().find(|q| q.id == id).cloned())
    }

    fn insert(&self, question: &NewQuestion) -> StoreResult<Question> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let stored = Question {
            id,
            question: question.question.clone(),
            answer: question.answer.clone(),
            category: question.category,
            difficulty: question.difficulty,
        };
        self.questions.borrow_mut().push(stored.clone());
        Ok(stored)
    }

    fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut questions = self.questions.borrow_mut();
        let before = questions.len();
        questions.retain(|q| q.id != id);
        Ok(questions.len() < before)
    }
}

impl CategoryStore for MemoryStore {
    fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_has_nineteen_questions_in_six_categories() {
        let store = MemoryStore::bundled();
        assert_eq!(store.list_all().unwrap().len(), 19);
        assert_eq!(store.list_categories().unwrap().len(), 6);
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let store = MemoryStore::bundled();
        let ids: Vec<i64> = store.list_all().unwrap().iter().map(|q| q.id).collect();
        assert_eq!(ids, (1..=19).collect::<Vec<_>>());

        assert!(store.delete(19).unwrap());
        let next = store
            .insert(&NewQuestion {
                question: "New?".to_string(),
                answer: "Yes".to_string(),
                category: 1,
                difficulty: 1,
            })
            .unwrap();
        assert_eq!(next.id, 20);
    }
}
