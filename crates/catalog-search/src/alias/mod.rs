//! Translation of public sort keys into internal column names.
//!
//! The public JSON shape of a record (`authorName.first`, `additional.size.height`)
//! differs from the column names of the catalog frames (`firstName`,
//! `bookHeight`). Every key a caller sorts by goes through this registry, scoped
//! to one [`EntityGroup`]; a key outside the group is rejected before any store
//! access happens.

use ahash::AHashMap as HashMap;
use catalog_search_data::columns;
use once_cell::sync::Lazy;

use crate::{group::EntityGroup, query::QueryError};

/// One public key and the column it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasEntry {
    pub group: EntityGroup,
    pub external_key: &'static str,
    pub internal_field: &'static str,
}

impl AliasEntry {
    const fn new(group: EntityGroup, external_key: &'static str, internal_field: &'static str) -> Self {
        Self {
            group,
            external_key,
            internal_field,
        }
    }
}

use EntityGroup::{Person, SingleField, Title};

pub const ALIASES: [AliasEntry; 20] = [
    AliasEntry::new(Person, "authorName.first", columns::FIRST_NAME),
    AliasEntry::new(Person, "authorName.second", columns::SECOND_NAME),
    AliasEntry::new(Person, "birth.date", columns::BIRTH_DATE),
    AliasEntry::new(Person, "birth.country", columns::BIRTH_COUNTRY),
    AliasEntry::new(Person, "birth.city", columns::BIRTH_CITY),
    AliasEntry::new(Person, "authorId", columns::AUTHOR_ID),
    AliasEntry::new(Person, "authorDescription", columns::DESCRIPTION),
    AliasEntry::new(Person, "nationality", columns::NATIONALITY),
    AliasEntry::new(SingleField, "genreId", columns::GENRE_ID),
    AliasEntry::new(SingleField, "genreName", columns::GENRE_NAME),
    AliasEntry::new(SingleField, "genreDescription", columns::DESCRIPTION),
    AliasEntry::new(Title, "bookId", columns::BOOK_ID),
    AliasEntry::new(Title, "bookName", columns::BOOK_NAME),
    AliasEntry::new(Title, "bookLanguage", columns::BOOK_LANG),
    AliasEntry::new(Title, "bookDescription", columns::DESCRIPTION),
    AliasEntry::new(Title, "additional.pageCount", columns::PAGE_COUNT),
    AliasEntry::new(Title, "additional.size.height", columns::BOOK_HEIGHT),
    AliasEntry::new(Title, "additional.size.width", columns::BOOK_WIDTH),
    AliasEntry::new(Title, "additional.size.length", columns::BOOK_LENGTH),
    AliasEntry::new(Title, "publicationYear", columns::PUBLICATION_YEAR),
];

/// Book sort keys backed by computed columns rather than the alias table.
/// Matched ignoring ASCII case.
const DERIVED_BOOK_KEYS: [(&str, &str); 2] = [
    ("square", columns::SQUARE),
    ("volume", columns::VOLUME),
];

static REGISTRY: Lazy<KeyAliasRegistry> = Lazy::new(|| KeyAliasRegistry::from_entries(&ALIASES));

/// Alias lookups grouped per entity group.
#[derive(Debug)]
pub struct KeyAliasRegistry {
    by_group: HashMap<EntityGroup, HashMap<&'static str, &'static str>>,
    ordered_keys: HashMap<EntityGroup, Vec<&'static str>>,
}

impl KeyAliasRegistry {
    /// The process-wide registry built from [`ALIASES`].
    pub fn global() -> &'static Self {
        &REGISTRY
    }

    fn from_entries(entries: &[AliasEntry]) -> Self {
        let mut by_group: HashMap<_, HashMap<_, _>> = HashMap::new();
        let mut ordered_keys: HashMap<_, Vec<_>> = HashMap::new();
        for entry in entries {
            by_group
                .entry(entry.group)
                .or_default()
                .insert(entry.external_key, entry.internal_field);
            ordered_keys
                .entry(entry.group)
                .or_default()
                .push(entry.external_key);
        }
        Self {
            by_group,
            ordered_keys,
        }
    }

    fn derived_field(group: EntityGroup, external_key: &str) -> Option<&'static str> {
        if group != Title {
            return None;
        }
        DERIVED_BOOK_KEYS
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(external_key))
            .map(|&(_, field)| field)
    }

    fn lookup(&self, group: EntityGroup, external_key: &str) -> Option<&'static str> {
        Self::derived_field(group, external_key).or_else(|| {
            self.by_group
                .get(&group)
                .and_then(|keys| keys.get(external_key))
                .copied()
        })
    }

    /// Internal column for `external_key` within `group`.
    pub fn resolve(&self, group: EntityGroup, external_key: &str) -> Result<&'static str, QueryError> {
        self.lookup(group, external_key)
            .ok_or_else(|| QueryError::UnknownKey {
                group,
                key: external_key.to_string(),
            })
    }

    pub fn belongs_to(&self, group: EntityGroup, external_key: &str) -> bool {
        self.lookup(group, external_key).is_some()
    }

    /// Alias-table keys of `group` in table order; derived keys are not listed.
    pub fn keys(&self, group: EntityGroup) -> &[&'static str] {
        self.ordered_keys
            .get(&group)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Resolve a public sort key through the global registry.
pub fn resolve_sort_key(group: EntityGroup, external_key: &str) -> Result<&'static str, QueryError> {
    KeyAliasRegistry::global().resolve(group, external_key)
}
