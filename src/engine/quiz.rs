use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

use crate::error::Result;
use crate::models::{CategoryScope, Question};
use crate::store::QuestionStore;

/// Draws one question uniformly at random from `scope`, skipping `excluded` ids.
///
/// `None` means the scope has nothing left to ask, which includes categories the
/// store has never heard of. The selector keeps no state between calls; callers
/// grow `excluded` themselves.
pub fn next_quiz_question<S, R>(
    store: &S,
    scope: CategoryScope,
    excluded: &HashSet<i64>,
    rng: &mut R,
) -> Result<Option<Question>>
where
    S: QuestionStore + ?Sized,
    R: Rng + ?Sized,
{
    let pool = match scope {
        CategoryScope::All => store.list_all()?,
        CategoryScope::Category(id) => store.list_by_category(id)?,
    };

    let mut eligible: Vec<Question> = pool
        .into_iter()
        .filter(|q| !excluded.contains(&q.id))
        .collect();

    debug!(
        %scope,
        excluded = excluded.len(),
        eligible = eligible.len(),
        "drawing quiz question"
    );

    if eligible.is_empty() {
        return Ok(None);
    }

    let index = rng.gen_range(0..eligible.len());
    Ok(Some(eligible.swap_remove(index)))
}
