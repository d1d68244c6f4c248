use tracing::debug;

use super::error::{Result, SearchError};
use crate::group::EntityGroup;

/// A query that passed the group's length gate, with its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub group: EntityGroup,
    /// Trimmed query text.
    pub query: String,
    pub tokens: Vec<String>,
}

/// Gates free-text queries on their trimmed length and tokenizes them.
pub struct SearchValidator;

impl SearchValidator {
    pub fn validate(group: EntityGroup, raw_query: &str) -> Result<ValidatedQuery> {
        let query = raw_query.trim();
        let length = query.chars().count();
        let policy = group.policy();

        if length == 0 {
            return Err(SearchError::BlankQuery);
        }
        if length <= policy.min_query_length {
            return Err(SearchError::QueryTooShort {
                query: query.to_string(),
                min_length: policy.min_required_length(),
            });
        }

        let tokens = tokenize(query, policy.token_filter_min_length);
        debug!(%group, query, ?tokens, "Validated search query");
        Ok(ValidatedQuery {
            group,
            query: query.to_string(),
            tokens,
        })
    }
}

/// Split on single spaces. Runs of spaces yield empty tokens, which are kept
/// unless `min_length` filters them out along with other short tokens.
pub fn tokenize(query: &str, min_length: usize) -> Vec<String> {
    query
        .split(' ')
        .filter(|token| min_length == 0 || token.chars().count() > min_length)
        .map(str::to_string)
        .collect()
}
