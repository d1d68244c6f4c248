//! Catalog Search - sorting, paging and relevance search over a book catalog
//!
//! The catalog holds three kinds of records: authors, genres and books. Each
//! kind is an [`EntityGroup`] with its own public sort keys and its own search
//! policy.
//!
//! # Quick Start
//!
//! ```rust
//! use catalog_search::{CatalogSearcher, EntityGroup};
//! use catalog_search::data::{TestDataConfig, create_test_catalog};
//!
//! let searcher = CatalogSearcher::from_raw(&create_test_catalog(&TestDataConfig::minimal()))?;
//!
//! // Ranked by first/second name prefix, at most five results
//! let authors = searcher.search_authors("Ann")?;
//! println!("Best match: {}", authors[0].full_name());
//!
//! // Titles need at least five characters
//! assert!(searcher.search(EntityGroup::Title, "Road").is_err());
//! # Ok::<(), catalog_search::error::CatalogError>(())
//! ```
//!
//! # Listings
//!
//! Listings take the public JSON key to sort by (`authorName.first`,
//! `additional.size.height`, ...) and translate it through the
//! [`KeyAliasRegistry`]. Books can also be sorted by the derived `square` and
//! `volume` values.
//!
//! # Data
//!
//! By default the catalog is read from `authors.json`, `genres.json` and
//! `books.json` in `CATALOG_DATA_DIR` (falling back to `./catalog_data`).
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod alias;
mod config;
mod core;
pub mod error;
mod group;
mod query;
mod record;
mod search;
mod store;

pub use crate::core::{CatalogSearcher, SearchResults, SearchResultsBatch};

pub use alias::{ALIASES, AliasEntry, KeyAliasRegistry, resolve_sort_key};
pub use catalog_search_data as data;
pub use catalog_search_data::{CatalogData, CatalogTable, RawCatalog};
pub use config::{CatalogConfig, CatalogConfigBuilder};
pub use group::{EntityGroup, SearchPolicy};
pub use polars;
pub use query::{
    ListingParams, ListingQuery, ListingScope, QueryDirective, QueryError, SortDirection,
};
pub use record::{Author, Book, CatalogRecord, Genre, SearchCandidate};
pub use search::{
    CandidateFetcher, RelevanceRanker, SearchError, SearchValidator, SubstringClause,
    SubstringPredicate, ValidatedQuery, tokenize,
};
pub use store::{CatalogStore, FrameStore, StoreError};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the catalog library.
///
/// Installs a `tracing` fmt subscriber filtered at `level`, unless `RUST_LOG`
/// says otherwise. Calling it again is a no-op.
///
/// ```rust
/// use catalog_search::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), catalog_search::error::CatalogError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::CatalogError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("polars=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
