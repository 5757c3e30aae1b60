//! Request-shaped entry points over the engine.
//!
//! Each handler takes decoded request input plus explicit store handles and
//! returns a serializable response or a [`TriviaError`]. Rendering and status
//! codes belong to the transport in `main.rs`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::info;

use crate::engine::pagination::parse_page;
use crate::engine::quiz::next_quiz_question;
use crate::engine::{fetch_page, QuestionFilter, QuestionPage};
use crate::error::{Result, TriviaError};
use crate::models::{CategoryScope, NewQuestion, Question};
use crate::store::{CategoryStore, QuestionStore};

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: BTreeMap<i64, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: BTreeMap<i64, String>,
    pub current_category: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub deleted: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    pub created: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PostQuestionsResponse {
    Search(QuestionPage),
    Created(CreatedResponse),
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResponse {
    pub question: Option<Question>,
}

/// Body of a question POST: a search when `searchTerm` is present, a create otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionsPayload {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

impl QuestionsPayload {
    pub fn into_new_question(self) -> Result<NewQuestion> {
        let missing: Vec<&str> = [
            ("question", self.question.is_none()),
            ("answer", self.answer.is_none()),
            ("category", self.category.is_none()),
            ("difficulty", self.difficulty.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (self.question, self.answer, self.category, self.difficulty) {
            (Some(question), Some(answer), Some(category), Some(difficulty)) => Ok(NewQuestion {
                question,
                answer,
                category,
                difficulty,
            }),
            _ => Err(TriviaError::invalid(format!(
                "missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum QuizCategory {
    Id(i64),
    Name(String),
}

impl QuizCategory {
    pub fn scope(&self) -> Result<CategoryScope> {
        match self {
            QuizCategory::Id(id) => Ok(CategoryScope::from_id(*id)),
            QuizCategory::Name(name) => CategoryScope::from_str(name).ok_or_else(|| {
                TriviaError::invalid(format!(
                    "quiz_category must be a category id or \"all\", got '{}'",
                    name
                ))
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizPayload {
    pub previous_questions: Option<Vec<i64>>,
    pub quiz_category: Option<QuizCategory>,
}

fn category_map<C: CategoryStore + ?Sized>(store: &C) -> Result<BTreeMap<i64, String>> {
    Ok(store
        .list_categories()?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}

pub fn list_categories<C: CategoryStore + ?Sized>(store: &C) -> Result<CategoriesResponse> {
    let categories = category_map(store)?;
    if categories.is_empty() {
        return Err(TriviaError::not_found("no categories"));
    }
    Ok(CategoriesResponse { categories })
}

pub fn list_questions<S>(store: &S, page: Option<&str>, page_size: usize) -> Result<QuestionsResponse>
where
    S: QuestionStore + CategoryStore + ?Sized,
{
    let page = parse_page(page)?;
    let listed = fetch_page(store, &QuestionFilter::All, page, page_size)?;
    if listed.questions.is_empty() {
        return Err(TriviaError::not_found("no questions"));
    }

    Ok(QuestionsResponse {
        questions: listed.questions,
        total_questions: listed.total_questions,
        categories: category_map(store)?,
        current_category: listed.current_category,
    })
}

pub fn get_question<S: QuestionStore + ?Sized>(store: &S, id: i64) -> Result<Question> {
    store
        .get(id)?
        .ok_or_else(|| TriviaError::not_found(format!("question {}", id)))
}

pub fn delete_question<S: QuestionStore + ?Sized>(store: &S, id: i64) -> Result<DeletedResponse> {
    if !store.delete(id)? {
        return Err(TriviaError::not_found(format!("question {}", id)));
    }
    info!(id, "deleted question");
    Ok(DeletedResponse { deleted: id })
}

pub fn post_questions<S: QuestionStore + ?Sized>(
    store: &S,
    payload: QuestionsPayload,
    page: Option<&str>,
    page_size: usize,
) -> Result<PostQuestionsResponse> {
    if let Some(term) = payload.search_term {
        let page = parse_page(page)?;
        let found = fetch_page(store, &QuestionFilter::Search(term), page, page_size)?;
        return Ok(PostQuestionsResponse::Search(found));
    }

    create_question(store, payload).map(PostQuestionsResponse::Created)
}

pub fn create_question<S: QuestionStore + ?Sized>(
    store: &S,
    payload: QuestionsPayload,
) -> Result<CreatedResponse> {
    let new_question = payload.into_new_question()?;
    let stored = store.insert(&new_question)?;
    info!(id = stored.id, category = stored.category, "created question");
    Ok(CreatedResponse { created: stored.id })
}

pub fn category_questions<S: QuestionStore + ?Sized>(
    store: &S,
    category_id: i64,
    page: Option<&str>,
    page_size: usize,
) -> Result<QuestionPage> {
    let page = parse_page(page)?;
    let listed = fetch_page(store, &QuestionFilter::Category(category_id), page, page_size)?;
    if listed.total_questions == 0 {
        return Err(TriviaError::not_found(format!(
            "no questions in category {}",
            category_id
        )));
    }
    Ok(listed)
}

pub fn next_quiz<S, R>(store: &S, payload: QuizPayload, rng: &mut R) -> Result<QuizResponse>
where
    S: QuestionStore + ?Sized,
    R: Rng + ?Sized,
{
    let (Some(previous), Some(category)) = (payload.previous_questions, payload.quiz_category)
    else {
        return Err(TriviaError::invalid(
            "previous_questions and quiz_category are required",
        ));
    };

    let scope = category.scope()?;
    let excluded: HashSet<i64> = previous.into_iter().collect();
    let question = next_quiz_question(store, scope, &excluded, rng)?;
    Ok(QuizResponse { question })
}
