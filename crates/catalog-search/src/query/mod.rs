//! Sort and pagination directives for catalog listings.
//!
//! A listing request arrives as raw strings (`sortBy`, `orderType`, `page`,
//! `size`). [`QueryDirective::build`] turns them into a validated directive or
//! fails with the first problem found, checking the sort key, then the order,
//! then the page, then the size.

use std::fmt;

use tracing::debug;

use crate::{alias::resolve_sort_key, config::CatalogConfig, group::EntityGroup};

pub use error::QueryError;

mod error {
    use thiserror::Error;

    use super::ListingScope;
    use crate::group::EntityGroup;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum QueryError {
        #[error("No such JSON property - '{key}' for {group}!")]
        UnknownKey { group: EntityGroup, key: String },
        #[error("Order type must be 'asc' or 'desc' instead '{0}'!")]
        InvalidOrder(String),
        #[error("Value of 'page' parameter must be positive and greater than zero, got '{0}'!")]
        InvalidPage(String),
        #[error("Value of 'size' parameter must be positive and greater than zero, got '{0}'!")]
        InvalidSize(String),
        #[error("Listing scope {scope} does not list {group} records")]
        ScopeMismatch {
            scope: ListingScope,
            group: EntityGroup,
        },
    }
}

type Result<T> = std::result::Result<T, QueryError>;

/// Sort order of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Accepts exactly `asc` or `desc`.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(QueryError::InvalidOrder(other.to_string())),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated sort and page request for one entity group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDirective {
    pub group: EntityGroup,
    /// Internal column to sort by.
    pub sort_field: &'static str,
    pub direction: SortDirection,
    page: usize,
    size: usize,
    paginate: bool,
}

impl QueryDirective {
    pub fn build(
        group: EntityGroup,
        sort_key_raw: &str,
        order_raw: &str,
        page_raw: &str,
        size_raw: &str,
    ) -> Result<Self> {
        let sort_field = resolve_sort_key(group, sort_key_raw)?;
        let direction = SortDirection::parse(order_raw)?;
        let page = parse_positive(page_raw).ok_or_else(|| QueryError::InvalidPage(page_raw.to_string()))?;
        let size = parse_positive(size_raw).ok_or_else(|| QueryError::InvalidSize(size_raw.to_string()))?;

        debug!(%group, sort_field, %direction, page, size, "Built query directive");
        Ok(Self {
            group,
            sort_field,
            direction,
            page,
            size,
            paginate: true,
        })
    }

    pub fn with_pagination(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    /// 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// When false the whole sorted set is returned; page and size are still validated.
    pub fn paginate(&self) -> bool {
        self.paginate
    }

    /// Number of rows skipped before the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }

    /// `(offset, size)` when paginating, `None` for a full listing.
    pub fn window(&self) -> Option<(usize, usize)> {
        self.paginate.then(|| (self.offset(), self.size))
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.parse::<i64>()
        .ok()
        .filter(|&v| v > 0)
        .and_then(|v| usize::try_from(v).ok())
}

/// Raw listing parameters as received from a caller. Unset values fall back
/// to the group's default sort key and the configured defaults. An unset
/// `pagination` follows [`ListingScope::paged_by_default`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub pagination: Option<bool>,
}

impl ListingParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = Some(key.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn pagination(mut self, enabled: bool) -> Self {
        self.pagination = Some(enabled);
        self
    }

    /// Fill in defaults and validate. Paginates unless told otherwise.
    pub fn directive(&self, group: EntityGroup, config: &CatalogConfig) -> Result<QueryDirective> {
        let default_page = config.default_page.to_string();
        let default_size = config.default_page_size.to_string();
        QueryDirective::build(
            group,
            self.sort_by.as_deref().unwrap_or(group.default_sort_key()),
            self.order.as_deref().unwrap_or(config.default_order.as_str()),
            self.page.as_deref().unwrap_or(&default_page),
            self.size.as_deref().unwrap_or(&default_size),
        )
        .map(|directive| directive.with_pagination(self.pagination.unwrap_or(true)))
    }

    /// Validated listing of `group` within `scope`, paged per the scope's
    /// default when `pagination` is unset.
    pub fn listing(
        &self,
        group: EntityGroup,
        scope: ListingScope,
        config: &CatalogConfig,
    ) -> Result<ListingQuery> {
        let paginate = self.pagination.unwrap_or(scope.paged_by_default());
        let directive = self.directive(group, config)?.with_pagination(paginate);
        ListingQuery::new(scope, directive)
    }
}

/// Which slice of a table a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListingScope {
    /// Every row of the listed group's table.
    #[default]
    All,
    BooksInGenre { genre_id: i64 },
    BooksOfAuthor { author_id: i64 },
    BooksOfAuthorInGenre { author_id: i64, genre_id: i64 },
    /// Distinct authors with at least one book in the genre.
    AuthorsInGenre { genre_id: i64 },
    /// Distinct genres of the author's books.
    GenresOfAuthor { author_id: i64 },
}

impl ListingScope {
    /// The group this scope lists, `None` for [`ListingScope::All`].
    pub const fn listed_group(self) -> Option<EntityGroup> {
        match self {
            Self::All => None,
            Self::BooksInGenre { .. }
            | Self::BooksOfAuthor { .. }
            | Self::BooksOfAuthorInGenre { .. } => Some(EntityGroup::Title),
            Self::AuthorsInGenre { .. } => Some(EntityGroup::Person),
            Self::GenresOfAuthor { .. } => Some(EntityGroup::SingleField),
        }
    }

    /// Author-centric scopes return the whole sorted set unless paging is
    /// requested explicitly.
    pub const fn paged_by_default(self) -> bool {
        !matches!(
            self,
            Self::BooksOfAuthor { .. }
                | Self::BooksOfAuthorInGenre { .. }
                | Self::GenresOfAuthor { .. }
        )
    }

    pub fn applies_to(self, group: EntityGroup) -> bool {
        self.listed_group().is_none_or(|listed| listed == group)
    }

    pub fn check(self, group: EntityGroup) -> Result<()> {
        if self.applies_to(group) {
            Ok(())
        } else {
            Err(QueryError::ScopeMismatch { scope: self, group })
        }
    }

    /// Entities that must exist for the scope to make sense.
    pub fn parents(self) -> Vec<(EntityGroup, i64)> {
        match self {
            Self::All => vec![],
            Self::BooksInGenre { genre_id } | Self::AuthorsInGenre { genre_id } => {
                vec![(EntityGroup::SingleField, genre_id)]
            }
            Self::BooksOfAuthor { author_id } | Self::GenresOfAuthor { author_id } => {
                vec![(EntityGroup::Person, author_id)]
            }
            Self::BooksOfAuthorInGenre {
                author_id,
                genre_id,
            } => vec![
                (EntityGroup::Person, author_id),
                (EntityGroup::SingleField, genre_id),
            ],
        }
    }
}

impl fmt::Display for ListingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::BooksInGenre { genre_id } => write!(f, "books in genre {genre_id}"),
            Self::BooksOfAuthor { author_id } => write!(f, "books of author {author_id}"),
            Self::BooksOfAuthorInGenre {
                author_id,
                genre_id,
            } => write!(f, "books of author {author_id} in genre {genre_id}"),
            Self::AuthorsInGenre { genre_id } => write!(f, "authors in genre {genre_id}"),
            Self::GenresOfAuthor { author_id } => write!(f, "genres of author {author_id}"),
        }
    }
}

/// A fully validated listing: what to list and how to order and page it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub scope: ListingScope,
    pub directive: QueryDirective,
}

impl ListingQuery {
    pub fn new(scope: ListingScope, directive: QueryDirective) -> Result<Self> {
        scope.check(directive.group)?;
        Ok(Self { scope, directive })
    }

    pub fn group(&self) -> EntityGroup {
        self.directive.group
    }
}
