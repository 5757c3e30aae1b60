//! Question selection: filter, paginate, search and quiz draws.
//!
//! Every listing goes through [`fetch_page`], which picks a question set by
//! [`QuestionFilter`] and hands it to [`pagination::paginate`].

pub mod pagination;
pub mod quiz;
pub mod search;

use serde::Serialize;

use crate::error::Result;
use crate::models::Question;
use crate::store::QuestionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionFilter {
    All,
    Category(i64),
    Search(String),
}

impl QuestionFilter {
    /// The category a page is reported under; search and the full list span all of them.
    pub fn current_category(&self) -> Option<i64> {
        match self {
            QuestionFilter::Category(id) => Some(*id),
            QuestionFilter::All | QuestionFilter::Search(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<i64>,
}

pub fn fetch_page<S: QuestionStore + ?Sized>(
    store: &S,
    filter: &QuestionFilter,
    page: usize,
    page_size: usize,
) -> Result<QuestionPage> {
    let matching = match filter {
        QuestionFilter::All => store.list_all()?,
        QuestionFilter::Category(id) => store.list_by_category(*id)?,
        QuestionFilter::Search(term) => search::search(store, term)?,
    };

    let questions = pagination::paginate(&matching, page, page_size)?;

    Ok(QuestionPage {
        questions,
        total_questions: matching.len(),
        current_category: filter.current_category(),
    })
}
