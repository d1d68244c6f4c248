//! Source records as they appear in the catalog JSON files.
//!
//! The shapes follow the public JSON representation (`authorName.first`,
//! `additional.size.height`, ...) so that the external sort keys map one to one
//! onto paths in these files.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{info, instrument, warn};

use super::error::{DataError, Result};
use crate::CatalogTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthor {
    pub author_id: i64,
    pub author_name: RawAuthorName,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub birth: RawBirth,
    #[serde(default)]
    pub author_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAuthorName {
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBirth {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGenre {
    pub genre_id: i64,
    pub genre_name: String,
    #[serde(default)]
    pub genre_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBook {
    pub book_id: i64,
    pub book_name: String,
    pub book_language: String,
    #[serde(default)]
    pub book_description: String,
    #[serde(default)]
    pub additional: RawAdditional,
    #[serde(default)]
    pub publication_year: i32,
    pub author_id: i64,
    pub genre_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAdditional {
    #[serde(default)]
    pub page_count: Option<i32>,
    #[serde(default)]
    pub size: RawSize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSize {
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub length: Option<f64>,
}

/// The three catalog tables as read from disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCatalog {
    pub authors: Vec<RawAuthor>,
    pub genres: Vec<RawGenre>,
    pub books: Vec<RawBook>,
}

impl RawCatalog {
    /// Rejects a catalog whose tables repeat a primary key.
    pub fn validate(&self) -> Result<()> {
        check_unique_ids(CatalogTable::Authors, self.authors.iter().map(|a| a.author_id))?;
        check_unique_ids(CatalogTable::Genres, self.genres.iter().map(|g| g.genre_id))?;
        check_unique_ids(CatalogTable::Books, self.books.iter().map(|b| b.book_id))?;
        Ok(())
    }
}

fn check_unique_ids(table: CatalogTable, ids: impl Iterator<Item = i64>) -> Result<()> {
    match ids.duplicates().next() {
        Some(id) => Err(DataError::DuplicateId {
            table: table.name(),
            id,
        }),
        None => Ok(()),
    }
}

fn read_table<T: DeserializeOwned>(dir: &Path, table: CatalogTable) -> Result<Vec<T>> {
    let path = dir.join(table.file_name());
    if !path.exists() {
        warn!(path = ?path, "Catalog file missing");
        return Err(DataError::RequiredFileNotFound(path));
    }
    let contents = fs::read_to_string(&path)?;
    let rows: Vec<T> = serde_json::from_str(&contents)?;
    info!(table = table.name(), rows = rows.len(), "Read catalog table");
    Ok(rows)
}

pub fn read_authors(dir: &Path) -> Result<Vec<RawAuthor>> {
    read_table(dir, CatalogTable::Authors)
}

pub fn read_genres(dir: &Path) -> Result<Vec<RawGenre>> {
    read_table(dir, CatalogTable::Genres)
}

pub fn read_books(dir: &Path) -> Result<Vec<RawBook>> {
    read_table(dir, CatalogTable::Books)
}

/// Reads all three catalog files from `dir`.
#[instrument(name = "Read catalog directory", skip_all, level = "info")]
pub fn read_catalog_dir(dir: &Path) -> Result<RawCatalog> {
    info!("Reading catalog from: {}", dir.display());
    let catalog = RawCatalog {
        authors: read_authors(dir)?,
        genres: read_genres(dir)?,
        books: read_books(dir)?,
    };
    catalog.validate()?;
    Ok(catalog)
}

/// Writes the catalog as `authors.json`, `genres.json` and `books.json` into `dir`.
pub fn write_catalog_dir(catalog: &RawCatalog, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(
        dir.join(CatalogTable::Authors.file_name()),
        serde_json::to_string_pretty(&catalog.authors)?,
    )?;
    fs::write(
        dir.join(CatalogTable::Genres.file_name()),
        serde_json::to_string_pretty(&catalog.genres)?,
    )?;
    fs::write(
        dir.join(CatalogTable::Books.file_name()),
        serde_json::to_string_pretty(&catalog.books)?,
    )?;
    Ok(())
}
