use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::session::Session;
use crate::store::{PageCursor, SessionStore};
use crate::validation::session::{validate_page_size, validate_required};

/// Fetch size used when resolving a user's full session list internally.
const RESOLVE_PAGE_SIZE: i32 = 500;

/// Filters for the administrative search. Strategy selection is
/// priority-ordered: `token` wins over `user_id`, which wins over a full
/// table scan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilter {
    /// Point-lookup filter; the fastest strategy.
    pub token: Option<String>,
    /// Secondary-index filter.
    pub user_id: Option<String>,
    /// Maximum rows returned per page.
    pub page_size: i32,
    /// Opaque continuation cursor from a previous page.
    pub cursor: Option<PageCursor>,
}

/// One page of administrative search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    /// Up to `page_size` matching sessions.
    pub sessions: Vec<Session>,
    /// Cursor for the next page; `None` means no more rows.
    pub next: Option<PageCursor>,
}

/// Which query plan a [`SearchFilter`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Primary-key point lookup.
    Point(String),
    /// Secondary-index lookup on `user_id`.
    Index(String),
    /// Unfiltered full-table scan. Audit-only, slowest.
    Scan,
}

impl SearchStrategy {
    /// Picks the cheapest strategy the filter allows.
    pub fn choose(filter: &SearchFilter) -> Self {
        if let Some(token) = &filter.token {
            SearchStrategy::Point(token.clone())
        } else if let Some(user_id) = &filter.user_id {
            SearchStrategy::Index(user_id.clone())
        } else {
            SearchStrategy::Scan
        }
    }
}

/// Primary-key point lookup for refresh validation.
///
/// A missing row is not an error: it returns `Ok(None)`.
pub async fn get_by_token<S: SessionStore + ?Sized>(
    store: &S,
    token: &str,
) -> Result<Option<Session>> {
    validate_required("token", token)?;

    if !store.is_connected() {
        return Err(AppError::not_connected());
    }

    store.get_by_token(token).await
}

/// All current sessions of one user, via the secondary index.
///
/// Ordering is not guaranteed and the list may be empty. Pages are chained
/// internally; callers who need paging use [`admin_search`].
pub async fn get_all_by_user<S: SessionStore + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<Vec<Session>> {
    validate_required("userId", user_id)?;

    if !store.is_connected() {
        return Err(AppError::not_connected());
    }

    let mut sessions = Vec::new();
    let mut paging_state = None;

    loop {
        let page = store
            .page_by_user(user_id, RESOLVE_PAGE_SIZE, paging_state)
            .await?;
        sessions.extend(page.rows);

        match page.paging_state {
            Some(state) => paging_state = Some(state),
            None => break,
        }
    }

    Ok(sessions)
}

/// Administrative investigation query over all three lookup strategies.
///
/// Returns up to `page_size` rows plus an opaque continuation cursor the
/// caller passes back unmodified; a `None` cursor in the result means the
/// result set is exhausted.
pub async fn admin_search<S: SessionStore + ?Sized>(
    store: &S,
    filter: SearchFilter,
) -> Result<SearchPage> {
    validate_page_size(filter.page_size)?;
    let paging_state = match &filter.cursor {
        Some(cursor) => Some(cursor.to_bytes()?),
        None => None,
    };

    if !store.is_connected() {
        return Err(AppError::not_connected());
    }

    let page = match SearchStrategy::choose(&filter) {
        SearchStrategy::Point(token) => {
            validate_required("token", &token)?;
            let sessions = store.get_by_token(&token).await?.into_iter().collect();
            return Ok(SearchPage {
                sessions,
                next: None,
            });
        }
        SearchStrategy::Index(user_id) => {
            validate_required("userId", &user_id)?;
            store
                .page_by_user(&user_id, filter.page_size, paging_state)
                .await?
        }
        SearchStrategy::Scan => {
            tracing::warn!("Admin search running an unfiltered full-table scan");
            store.scan_page(filter.page_size, paging_state).await?
        }
    };

    Ok(SearchPage {
        sessions: page.rows,
        next: page.paging_state.as_deref().map(PageCursor::from_bytes),
    })
}
