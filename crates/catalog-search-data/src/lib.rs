//! Catalog loading for `catalog-search`.
//!
//! Reads the author, genre and book JSON files and turns them into polars
//! frames whose column names are the internal field names the search library
//! sorts and filters on.

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

mod error;
pub mod processed;
pub mod raw;
pub mod test_data;

pub const DATA_DIR_DEFAULT: &str = "./catalog_data";

/// Global data directory, `CATALOG_DATA_DIR` or [`DATA_DIR_DEFAULT`].
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    let dir =
        std::env::var("CATALOG_DATA_DIR").unwrap_or_else(|_| DATA_DIR_DEFAULT.to_string());
    PathBuf::from(dir)
});

pub fn get_data_dir() -> &'static Path {
    DATA_DIR.as_path()
}

/// The three catalog tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTable {
    Authors,
    Genres,
    Books,
}

impl CatalogTable {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Authors => "authors",
            Self::Genres => "genres",
            Self::Books => "books",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Authors => "authors.json",
            Self::Genres => "genres.json",
            Self::Books => "books.json",
        }
    }
}

pub use error::{DataError, Result};

// Re-export main types
pub use processed::{CatalogData, columns};
pub use raw::RawCatalog;
pub use test_data::{TestDataConfig, create_test_catalog, write_test_catalog};
