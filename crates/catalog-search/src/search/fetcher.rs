use std::fmt::Write as _;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::{
    group::EntityGroup,
    record::CatalogRecord,
    store::{CatalogStore, StoreError},
};

/// "`column` contains `needle`", case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringClause<'a> {
    pub column: &'static str,
    pub needle: &'a str,
}

/// A disjunction of substring clauses over a group's searchable columns.
/// A row qualifies when any clause matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringPredicate {
    pub group: EntityGroup,
    pub columns: &'static [&'static str],
    /// The whole query first, then each distinct token.
    pub needles: Vec<String>,
}

impl SubstringPredicate {
    pub fn new(group: EntityGroup, query: &str, tokens: &[String]) -> Self {
        let needles = std::iter::once(query)
            .chain(tokens.iter().map(String::as_str))
            .unique()
            .map(str::to_string)
            .collect();
        Self {
            group,
            columns: group.policy().searchable_columns,
            needles,
        }
    }

    pub fn clauses(&self) -> impl Iterator<Item = SubstringClause<'_>> {
        self.columns.iter().flat_map(move |&column| {
            self.needles.iter().map(move |needle| SubstringClause {
                column,
                needle: needle.as_str(),
            })
        })
    }

    /// Whether `value` of `column` satisfies any clause on that column.
    pub fn matches(&self, column: &str, value: &str) -> bool {
        self.clauses()
            .any(|clause| clause.column == column && value.contains(clause.needle))
    }

    /// Render as a SQL `WHERE` body against table alias `alias`.
    pub fn to_sql(&self, alias: &str) -> String {
        let mut sql = String::new();
        for (i, clause) in self.clauses().enumerate() {
            if i > 0 {
                sql.push_str(" OR ");
            }
            let _ = write!(
                sql,
                "{alias}.{} LIKE '%{}%' ESCAPE '\\'",
                clause.column,
                escape_like_pattern(clause.needle).replace('\'', "''")
            );
        }
        sql
    }
}

fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Pulls the unordered candidate set for a query from the store.
pub struct CandidateFetcher<'s, S: CatalogStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: CatalogStore + ?Sized> CandidateFetcher<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    #[instrument(name = "Fetch candidates", level = "debug", skip(self, tokens), fields(token_count = tokens.len()))]
    pub fn fetch(
        &self,
        group: EntityGroup,
        query: &str,
        tokens: &[String],
    ) -> Result<Vec<CatalogRecord>, StoreError> {
        let predicate = SubstringPredicate::new(group, query, tokens);
        let candidates = self.store.fetch_matching(&predicate)?;
        debug!(count = candidates.len(), "Fetched candidates");
        Ok(candidates)
    }
}
