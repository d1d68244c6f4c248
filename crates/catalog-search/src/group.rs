//! Entity groups and their search policies.

use std::fmt;

use catalog_search_data::{CatalogTable, columns};

/// The catalog entity kinds. Each group carries its own sort-key aliases and
/// search policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityGroup {
    /// Authors: searched by full name, ranked by first/second name prefixes.
    Person,
    /// Genres: searched by name, returned unranked.
    SingleField,
    /// Books: searched by title, ranked by progressively shorter query prefixes.
    Title,
}

impl EntityGroup {
    pub const ALL: [Self; 3] = [Self::Person, Self::SingleField, Self::Title];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Person => "author",
            Self::SingleField => "genre",
            Self::Title => "book",
        }
    }

    pub const fn table(self) -> CatalogTable {
        match self {
            Self::Person => CatalogTable::Authors,
            Self::SingleField => CatalogTable::Genres,
            Self::Title => CatalogTable::Books,
        }
    }

    /// Primary key column of the group's table.
    pub const fn id_column(self) -> &'static str {
        match self {
            Self::Person => columns::AUTHOR_ID,
            Self::SingleField => columns::GENRE_ID,
            Self::Title => columns::BOOK_ID,
        }
    }

    /// External sort key used when a listing does not name one.
    pub const fn default_sort_key(self) -> &'static str {
        match self {
            Self::Person => "authorId",
            Self::SingleField => "genreId",
            Self::Title => "bookId",
        }
    }

    pub const fn policy(self) -> &'static SearchPolicy {
        match self {
            Self::Person => &PERSON_POLICY,
            Self::SingleField => &SINGLE_FIELD_POLICY,
            Self::Title => &TITLE_POLICY,
        }
    }
}

impl fmt::Display for EntityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a group's free-text search is gated and which columns it scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Trimmed queries of this many characters or fewer are rejected.
    pub min_query_length: usize,
    /// Tokens of this many characters or fewer are dropped; `0` keeps all.
    pub token_filter_min_length: usize,
    pub searchable_columns: &'static [&'static str],
}

impl SearchPolicy {
    /// Shortest accepted query, as reported back to callers.
    pub const fn min_required_length(&self) -> usize {
        self.min_query_length + 1
    }
}

const PERSON_POLICY: SearchPolicy = SearchPolicy {
    min_query_length: 2,
    token_filter_min_length: 0,
    searchable_columns: &[columns::FULL_NAME],
};

const SINGLE_FIELD_POLICY: SearchPolicy = SearchPolicy {
    min_query_length: 2,
    token_filter_min_length: 2,
    searchable_columns: &[columns::GENRE_NAME],
};

const TITLE_POLICY: SearchPolicy = SearchPolicy {
    min_query_length: 4,
    token_filter_min_length: 0,
    searchable_columns: &[columns::BOOK_NAME],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_thresholds() {
        assert_eq!(EntityGroup::Person.policy().min_required_length(), 3);
        assert_eq!(EntityGroup::SingleField.policy().min_required_length(), 3);
        assert_eq!(EntityGroup::Title.policy().min_required_length(), 5);
        assert_eq!(EntityGroup::SingleField.policy().token_filter_min_length, 2);
    }

    #[test]
    fn test_groups_map_to_distinct_tables() {
        let tables: Vec<_> = EntityGroup::ALL.iter().map(|g| g.table()).collect();
        assert_eq!(
            tables,
            vec![CatalogTable::Authors, CatalogTable::Genres, CatalogTable::Books]
        );
    }
}
