//! Storage behind searches and listings.
//!
//! The search pipeline only needs two things from storage: every record
//! matching a substring predicate, and a sorted (optionally paged) listing.
//! [`FrameStore`] answers both from the polars frames of
//! [`catalog_search_data::CatalogData`].

mod frame;

pub use error::StoreError;
pub use frame::FrameStore;

use crate::{query::ListingQuery, record::CatalogRecord, search::SubstringPredicate};

mod error {
    use thiserror::Error;

    use crate::group::EntityGroup;

    #[derive(Error, Debug)]
    pub enum StoreError {
        #[error("DataFrame error: {0}")]
        DataFrame(#[from] polars::prelude::PolarsError),
        #[error("Data error: {0}")]
        Data(#[from] catalog_search_data::DataError),
        #[error("Unexpected null in column '{column}'")]
        NullValue { column: &'static str },
        #[error("There is no {group} with id {id}!")]
        EntityNotFound { group: EntityGroup, id: i64 },
    }
    pub type Result<T> = std::result::Result<T, StoreError>;
}

/// Record source for searches and listings. Implementations return complete
/// result sets; ordering of [`CatalogStore::fetch_matching`] is storage order.
pub trait CatalogStore: Send + Sync {
    fn fetch_matching(
        &self,
        predicate: &SubstringPredicate,
    ) -> Result<Vec<CatalogRecord>, StoreError>;

    fn fetch_listing(&self, listing: &ListingQuery) -> Result<Vec<CatalogRecord>, StoreError>;
}

impl<T: CatalogStore + ?Sized> CatalogStore for std::sync::Arc<T> {
    fn fetch_matching(
        &self,
        predicate: &SubstringPredicate,
    ) -> Result<Vec<CatalogRecord>, StoreError> {
        (**self).fetch_matching(predicate)
    }

    fn fetch_listing(&self, listing: &ListingQuery) -> Result<Vec<CatalogRecord>, StoreError> {
        (**self).fetch_listing(listing)
    }
}
