//! Directory search among approved residents

use crate::core::error::AppResult;
use crate::models::UserRecord;
use crate::store::RecordStore;

/// Most results a single query returns
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Requester has no approved record
    NotVerified,
    EmptyQuery,
    NoMatches,
    Matches(Vec<UserRecord>),
}

/// Runs a free-text query on behalf of `requester`.
///
/// Only approved residents may search, and only approved records are
/// returned. Store failures are propagated, never reported as "no matches".
pub async fn search_directory(store: &dyn RecordStore, requester: i64, query: &str) -> AppResult<SearchOutcome> {
    match store.get(requester).await {
        Ok(record) if record.is_approved() => {}
        Ok(_) => return Ok(SearchOutcome::NotVerified),
        Err(e) if e.is_not_found() => return Ok(SearchOutcome::NotVerified),
        Err(e) => return Err(e),
    }

    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchOutcome::EmptyQuery);
    }

    let records = store.list_all().await?;
    let matches = find_matches(records, query);
    log::debug!("Search by {} for '{}': {} result(s)", requester, query, matches.len());

    if matches.is_empty() {
        Ok(SearchOutcome::NoMatches)
    } else {
        Ok(SearchOutcome::Matches(matches))
    }
}

/// Case-insensitive substring match over approved records, in store order,
/// stopping at [`MAX_RESULTS`].
pub fn find_matches(records: impl IntoIterator<Item = UserRecord>, query: &str) -> Vec<UserRecord> {
    let needle = query.to_lowercase();
    records
        .into_iter()
        .filter(|record| record.is_approved())
        .filter(|record| record.search_haystack().contains(&needle))
        .take(MAX_RESULTS)
        .collect()
}
