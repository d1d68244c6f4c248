//! The [`CatalogSearcher`] facade.
//!
//! Ties the pieces together: free-text search goes through validation,
//! candidate fetching and ranking; listings go through the alias registry and
//! a [`QueryDirective`](crate::QueryDirective) before reaching the store.
//!
//! ```rust
//! use catalog_search::{CatalogSearcher, EntityGroup, ListingParams, ListingScope};
//! use catalog_search::data::{TestDataConfig, create_test_catalog};
//!
//! let searcher = CatalogSearcher::from_raw(&create_test_catalog(&TestDataConfig::minimal()))?;
//!
//! let authors = searcher.search_authors("Ann")?;
//! assert_eq!(authors[0].full_name(), "Ann Lee");
//!
//! let books = searcher.list(
//!     EntityGroup::Title,
//!     ListingScope::BooksOfAuthor { author_id: 1 },
//!     &ListingParams::new().sort_by("bookName").order("desc"),
//! )?;
//! assert_eq!(books.len(), 2);
//! # Ok::<(), catalog_search::error::CatalogError>(())
//! ```

use std::path::Path;

use catalog_search_data::{CatalogData, RawCatalog};
use tracing::{info, instrument};

use crate::{
    config::CatalogConfig,
    error::CatalogError,
    group::EntityGroup,
    query::{ListingParams, ListingScope},
    record::{Author, Book, CatalogRecord, Genre},
    search::{RelevanceRanker, bulk_search_inner, search_inner},
    store::{CatalogStore, FrameStore},
};

pub type SearchResults = Vec<CatalogRecord>;
pub type SearchResultsBatch = Vec<Vec<CatalogRecord>>;

/// Searches and lists catalog records held by a [`CatalogStore`].
#[derive(Debug, Clone)]
pub struct CatalogSearcher<S = FrameStore> {
    store: S,
    config: CatalogConfig,
}

impl CatalogSearcher<FrameStore> {
    /// Searcher over the catalog in the default data directory
    /// (`CATALOG_DATA_DIR`, else `./catalog_data`). Files are read on first use.
    pub fn new() -> Self {
        Self::from_data(CatalogData::new())
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::from_data(CatalogData::from_dir(dir))
    }

    pub fn from_data(data: CatalogData) -> Self {
        Self::with_store(FrameStore::new(data))
    }

    #[instrument(name = "Build CatalogSearcher from records", level = "info", skip_all)]
    pub fn from_raw(catalog: &RawCatalog) -> Result<Self, CatalogError> {
        let t_init = std::time::Instant::now();
        let data = CatalogData::from_raw(catalog)?;
        info!(
            authors = catalog.authors.len(),
            genres = catalog.genres.len(),
            books = catalog.books.len(),
            elapsed = ?t_init.elapsed(),
            "CatalogSearcher ready"
        );
        Ok(Self::from_data(data))
    }
}

impl Default for CatalogSearcher<FrameStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CatalogStore> CatalogSearcher<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            config: CatalogConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn ranker(&self) -> RelevanceRanker {
        RelevanceRanker::new(self.config.result_limit)
    }

    /// Free-text search within one group.
    ///
    /// Fails with [`SearchError::BlankQuery`](crate::SearchError::BlankQuery)
    /// or [`SearchError::QueryTooShort`](crate::SearchError::QueryTooShort)
    /// before touching the store. People and titles come back ranked and capped
    /// at the configured result limit; genres come back in storage order.
    pub fn search(&self, group: EntityGroup, raw_query: &str) -> Result<SearchResults, CatalogError> {
        search_inner(&self.store, &self.ranker(), group, raw_query).map_err(From::from)
    }

    pub fn search_authors(&self, raw_query: &str) -> Result<Vec<Author>, CatalogError> {
        Ok(self
            .search(EntityGroup::Person, raw_query)?
            .into_iter()
            .filter_map(CatalogRecord::into_author)
            .collect())
    }

    pub fn search_genres(&self, raw_query: &str) -> Result<Vec<Genre>, CatalogError> {
        Ok(self
            .search(EntityGroup::SingleField, raw_query)?
            .into_iter()
            .filter_map(CatalogRecord::into_genre)
            .collect())
    }

    pub fn search_books(&self, raw_query: &str) -> Result<Vec<Book>, CatalogError> {
        Ok(self
            .search(EntityGroup::Title, raw_query)?
            .into_iter()
            .filter_map(CatalogRecord::into_book)
            .collect())
    }

    /// Run several searches in parallel. One failing query fails the batch.
    ///
    /// ```rust
    /// # use catalog_search::{CatalogSearcher, EntityGroup};
    /// # use catalog_search::data::{TestDataConfig, create_test_catalog};
    /// # let searcher = CatalogSearcher::from_raw(&create_test_catalog(&TestDataConfig::minimal())).unwrap();
    /// let results = searcher
    ///     .search_bulk(EntityGroup::Title, &["The Road", "Killing Floor"])
    ///     .unwrap();
    /// assert_eq!(results.len(), 2);
    /// ```
    pub fn search_bulk<Q>(&self, group: EntityGroup, raw_queries: &[Q]) -> Result<SearchResultsBatch, CatalogError>
    where
        Q: AsRef<str> + Sync,
    {
        bulk_search_inner(&self.store, &self.ranker(), group, raw_queries).map_err(From::from)
    }

    /// Sorted, optionally paged listing of `group` within `scope`.
    ///
    /// The sort key is checked first, then the order, page and size. Listings
    /// of an author's books or genres are unpaged unless
    /// [`ListingParams::pagination`] says otherwise. Scoped
    /// listings fail with [`StoreError::EntityNotFound`](crate::StoreError::EntityNotFound)
    /// when the parent author or genre does not exist.
    #[instrument(name = "Catalog listing", level = "info", skip(self, params))]
    pub fn list(
        &self,
        group: EntityGroup,
        scope: ListingScope,
        params: &ListingParams,
    ) -> Result<SearchResults, CatalogError> {
        let listing = params.listing(group, scope, &self.config)?;
        self.store.fetch_listing(&listing).map_err(From::from)
    }
}

#[cfg(test)]
mod tests {
    use catalog_search_data::{TestDataConfig, create_test_catalog};

    use super::*;
    use crate::{
        SearchError, StoreError,
        config::CatalogConfigBuilder,
        query::{ListingQuery, QueryError},
        record::SearchCandidate,
        search::SubstringPredicate,
    };

    fn searcher() -> CatalogSearcher {
        CatalogSearcher::from_raw(&create_test_catalog(&TestDataConfig::minimal())).unwrap()
    }

    /// Fails every call.
    struct FailingStore;

    impl CatalogStore for FailingStore {
        fn fetch_matching(&self, predicate: &SubstringPredicate) -> Result<Vec<CatalogRecord>, StoreError> {
            Err(StoreError::EntityNotFound {
                group: predicate.group,
                id: -1,
            })
        }

        fn fetch_listing(&self, listing: &ListingQuery) -> Result<Vec<CatalogRecord>, StoreError> {
            Err(StoreError::EntityNotFound {
                group: listing.group(),
                id: -1,
            })
        }
    }

    #[test]
    fn test_search_people_ranks_first_names_first() {
        let authors = searcher().search_authors("Ann").unwrap();
        let ids: Vec<_> = authors.iter().map(|a| a.author_id).collect();
        // Ann Lee and Anna Smith by first name, Bob Annaway by second name.
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_search_titles_by_partial_tiers() {
        let books = searcher().search_books("The Road").unwrap();
        let names: Vec<_> = books.iter().map(|b| b.book_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "The Road",
                "The Road Home",
                "The Colour of Magic",
                "The Rover",
                "Theory of Roads"
            ]
        );
    }

    #[test]
    fn test_search_genres_is_unranked() {
        let genres = searcher().search_genres("Fiction").unwrap();
        let ids: Vec<_> = genres.iter().map(|g| g.genre_id).collect();
        assert_eq!(ids, vec![11, 12, 14]);
    }

    #[test]
    fn test_result_limit_comes_from_config() {
        let searcher = searcher().with_config(CatalogConfigBuilder::new().result_limit(2).build());
        assert_eq!(searcher.search(EntityGroup::Title, "The Road").unwrap().len(), 2);
        assert_eq!(searcher.search(EntityGroup::Person, "Ann").unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_queries_never_reach_the_store() {
        let searcher = CatalogSearcher::with_store(FailingStore);
        assert!(matches!(
            searcher.search(EntityGroup::Person, "  "),
            Err(CatalogError::Search(SearchError::BlankQuery))
        ));
        assert!(matches!(
            searcher.search(EntityGroup::Title, "Abcd"),
            Err(CatalogError::Search(SearchError::QueryTooShort { min_length: 5, .. }))
        ));
        assert!(matches!(
            searcher.list(EntityGroup::Person, ListingScope::All, &ListingParams::new().sort_by("bookId")),
            Err(CatalogError::Query(QueryError::UnknownKey { .. }))
        ));
    }

    #[test]
    fn test_store_errors_propagate() {
        let searcher = CatalogSearcher::with_store(FailingStore);
        assert!(matches!(
            searcher.search(EntityGroup::Title, "Abcde"),
            Err(CatalogError::Search(SearchError::Store(_)))
        ));
        assert!(matches!(
            searcher.list(EntityGroup::Title, ListingScope::All, &ListingParams::new()),
            Err(CatalogError::Store(_))
        ));
    }

    #[test]
    fn test_list_uses_group_defaults() {
        let authors = searcher()
            .list(EntityGroup::Person, ListingScope::All, &ListingParams::new())
            .unwrap();
        let ids: Vec<_> = authors.iter().map(CatalogRecord::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_author_books_are_unpaged_unless_asked() {
        let searcher = searcher();
        let one_per_page = ListingParams::new().size("1");
        let scope = ListingScope::BooksOfAuthor { author_id: 1 };

        let books = searcher.list(EntityGroup::Title, scope, &one_per_page).unwrap();
        assert_eq!(books.iter().map(CatalogRecord::id).collect::<Vec<_>>(), vec![100, 105]);

        let paged = one_per_page.clone().pagination(true);
        assert_eq!(searcher.list(EntityGroup::Title, scope, &paged).unwrap().len(), 1);

        let in_genre = ListingScope::BooksInGenre { genre_id: 10 };
        assert_eq!(searcher.list(EntityGroup::Title, in_genre, &one_per_page).unwrap().len(), 1);
    }

    #[test]
    fn test_list_rejects_mismatched_scope() {
        let result = searcher().list(
            EntityGroup::Title,
            ListingScope::AuthorsInGenre { genre_id: 10 },
            &ListingParams::new(),
        );
        assert!(matches!(
            result,
            Err(CatalogError::Query(QueryError::ScopeMismatch { .. }))
        ));
    }

    #[test]
    fn test_bulk_search_matches_single_searches() {
        let searcher = searcher();
        let queries = ["Ann", "Terry", "Lee Child"];
        let bulk = searcher.search_bulk(EntityGroup::Person, &queries).unwrap();

        assert_eq!(bulk.len(), queries.len());
        for (query, results) in queries.iter().zip(&bulk) {
            assert_eq!(results, &searcher.search(EntityGroup::Person, query).unwrap());
        }
        assert_eq!(bulk[1][0].primary_text(), "Terry");
    }

    #[test]
    fn test_bulk_search_fails_as_a_whole() {
        let result = searcher().search_bulk(EntityGroup::Person, &["Ann", "Al"]);
        assert!(matches!(
            result,
            Err(CatalogError::Search(SearchError::QueryTooShort { .. }))
        ));
    }
}
