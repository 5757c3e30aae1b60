use crate::error::{Result, TriviaError};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Reads a 1-based page number from request input, defaulting to page 1.
pub fn parse_page(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(1);
    };

    match raw.trim().parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(TriviaError::invalid(format!(
            "page must be a positive integer, got '{}'",
            raw
        ))),
    }
}

/// Number of pages holding at least one item.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Returns the `page`-th slice of `page_size` items.
///
/// Page 1 never fails, even on an empty input; whether an empty first page is
/// an error is the caller's decision. Any later page past the last non-empty
/// one is `NotFound`.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Result<Vec<T>> {
    if page == 0 {
        return Err(TriviaError::invalid("page must be a positive integer"));
    }
    if page_size == 0 {
        return Err(TriviaError::invalid("page size must be a positive integer"));
    }

    let pages = page_count(items.len(), page_size);
    if page > 1 && pages < page {
        return Err(TriviaError::not_found(format!(
            "page {} is beyond the last page ({})",
            page, pages
        )));
    }

    let start = (page - 1) * page_size;
    Ok(items.iter().skip(start).take(page_size).cloned().collect())
}
