//! Free-text search over one entity group.
//!
//! A search validates the raw query, fetches every record whose searchable
//! column contains the query or one of its tokens, and ranks the candidates.

pub use error::SearchError;
mod fetcher;
mod ranker;
mod validator;

use rayon::prelude::*;
use tracing::{info, instrument};

pub use fetcher::{CandidateFetcher, SubstringClause, SubstringPredicate};
pub use ranker::RelevanceRanker;
pub use validator::{SearchValidator, ValidatedQuery, tokenize};

use crate::{group::EntityGroup, record::CatalogRecord, store::CatalogStore};
use error::Result;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum SearchError {
        #[error("Search query must not be blank!")]
        BlankQuery,
        #[error("Search query '{query}' is too short, it must be at least {min_length} characters long!")]
        QueryTooShort { query: String, min_length: usize },
        #[error("Store error: {0}")]
        Store(#[from] crate::store::StoreError),
    }
    pub type Result<T> = std::result::Result<T, SearchError>;
}

#[instrument(name = "Catalog search", level = "info", skip(store), fields(limit = ranker.limit()))]
pub fn search_inner<S: CatalogStore + ?Sized>(
    store: &S,
    ranker: &RelevanceRanker,
    group: EntityGroup,
    raw_query: &str,
) -> Result<Vec<CatalogRecord>> {
    let validated = SearchValidator::validate(group, raw_query)?;
    let candidates =
        CandidateFetcher::new(store).fetch(group, &validated.query, &validated.tokens)?;
    let candidate_count = candidates.len();
    let ranked = ranker.rank(group, &validated.tokens, candidates);
    info!(candidate_count, result_count = ranked.len(), "Search finished");
    Ok(ranked)
}

/// Run independent searches in parallel. Fails on the first failing query.
#[instrument(name = "Bulk catalog search", level = "info", skip_all, fields(count = raw_queries.len()))]
pub fn bulk_search_inner<S, Q>(
    store: &S,
    ranker: &RelevanceRanker,
    group: EntityGroup,
    raw_queries: &[Q],
) -> Result<Vec<Vec<CatalogRecord>>>
where
    S: CatalogStore + ?Sized,
    Q: AsRef<str> + Sync,
{
    raw_queries
        .par_iter()
        .map(|raw_query| search_inner(store, ranker, group, raw_query.as_ref()))
        .collect()
}
