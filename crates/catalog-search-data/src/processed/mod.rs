use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use polars::prelude::*;
use tracing::{info, info_span};

use super::error::{DataError, Result};
use crate::CatalogTable;
use crate::raw::{self, RawAuthor, RawBook, RawCatalog, RawGenre};

/// Internal column names of the catalog frames.
pub mod columns {
    pub const AUTHOR_ID: &str = "authorId";
    pub const FIRST_NAME: &str = "firstName";
    pub const SECOND_NAME: &str = "secondName";
    /// `firstName + " " + secondName`, the column author search runs against.
    pub const FULL_NAME: &str = "fullName";
    pub const NATIONALITY: &str = "nationality";
    pub const BIRTH_DATE: &str = "birthDate";
    pub const BIRTH_COUNTRY: &str = "birthCountry";
    pub const BIRTH_CITY: &str = "birthCity";
    pub const DESCRIPTION: &str = "description";

    pub const GENRE_ID: &str = "genreId";
    pub const GENRE_NAME: &str = "genreName";

    pub const BOOK_ID: &str = "bookId";
    pub const BOOK_NAME: &str = "bookName";
    pub const BOOK_LANG: &str = "bookLang";
    pub const PAGE_COUNT: &str = "pageCount";
    pub const BOOK_HEIGHT: &str = "bookHeight";
    pub const BOOK_WIDTH: &str = "bookWidth";
    pub const BOOK_LENGTH: &str = "bookLength";
    pub const PUBLICATION_YEAR: &str = "publicationYear";
    /// `bookWidth * bookLength`
    pub const SQUARE: &str = "square";
    /// `bookHeight * bookWidth * bookLength`
    pub const VOLUME: &str = "volume";
}

use columns::*;

/// In-memory catalog frames, one `LazyFrame` per table.
///
/// Frames backed by a directory are read on first access and kept for the
/// lifetime of the value; frames built from a [`RawCatalog`] are available
/// immediately.
#[derive(Clone)]
pub struct CatalogData {
    dir: Option<PathBuf>,
    authors: OnceCell<LazyFrame>,
    genres: OnceCell<LazyFrame>,
    books: OnceCell<LazyFrame>,
}

impl std::fmt::Debug for CatalogData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogData")
            .field("dir", &self.dir)
            .field("authors_loaded", &self.authors.get().is_some())
            .field("genres_loaded", &self.genres.get().is_some())
            .field("books_loaded", &self.books.get().is_some())
            .finish()
    }
}

impl CatalogData {
    /// Catalog read from the default data directory (`CATALOG_DATA_DIR`).
    pub fn new() -> Self {
        Self::from_dir(crate::get_data_dir())
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        info!("CatalogData: Using catalog directory {}", dir.display());
        Self {
            dir: Some(dir),
            authors: OnceCell::new(),
            genres: OnceCell::new(),
            books: OnceCell::new(),
        }
    }

    pub fn from_raw(catalog: &RawCatalog) -> Result<Self> {
        let _span = info_span!("Build catalog frames").entered();
        catalog.validate()?;
        Ok(Self {
            dir: None,
            authors: OnceCell::with_value(authors_frame(&catalog.authors)?),
            genres: OnceCell::with_value(genres_frame(&catalog.genres)?),
            books: OnceCell::with_value(books_frame(&catalog.books)?),
        })
    }

    fn load_table(&self, table: CatalogTable) -> Result<LazyFrame> {
        let dir = self
            .dir
            .as_deref()
            .ok_or(DataError::NoDataDirProvided(table.name()))?;
        let t_load = std::time::Instant::now();
        let lf = match table {
            CatalogTable::Authors => authors_frame(&raw::read_authors(dir)?)?,
            CatalogTable::Genres => genres_frame(&raw::read_genres(dir)?)?,
            CatalogTable::Books => books_frame(&raw::read_books(dir)?)?,
        };
        // Materialise once so every later query starts from memory.
        let lf = lf.collect()?.lazy();
        info!(
            table = table.name(),
            time_loaded = ?t_load.elapsed(),
            "Loaded catalog table into memory"
        );
        Ok(lf)
    }

    pub fn frame(&self, table: CatalogTable) -> Result<&LazyFrame> {
        let cell = match table {
            CatalogTable::Authors => &self.authors,
            CatalogTable::Genres => &self.genres,
            CatalogTable::Books => &self.books,
        };
        cell.get_or_try_init(|| self.load_table(table))
    }

    pub fn authors_df(&self) -> Result<&LazyFrame> {
        self.frame(CatalogTable::Authors)
    }

    pub fn genres_df(&self) -> Result<&LazyFrame> {
        self.frame(CatalogTable::Genres)
    }

    pub fn books_df(&self) -> Result<&LazyFrame> {
        self.frame(CatalogTable::Books)
    }
}

impl Default for CatalogData {
    fn default() -> Self {
        Self::new()
    }
}

pub fn authors_frame(authors: &[RawAuthor]) -> Result<LazyFrame> {
    let df = df!(
        AUTHOR_ID => authors.iter().map(|a| a.author_id).collect::<Vec<_>>(),
        FIRST_NAME => authors.iter().map(|a| a.author_name.first.as_str()).collect::<Vec<_>>(),
        SECOND_NAME => authors.iter().map(|a| a.author_name.second.as_str()).collect::<Vec<_>>(),
        FULL_NAME => authors
            .iter()
            .map(|a| format!("{} {}", a.author_name.first, a.author_name.second))
            .collect::<Vec<_>>(),
        NATIONALITY => authors.iter().map(|a| a.nationality.as_str()).collect::<Vec<_>>(),
        BIRTH_DATE => authors
            .iter()
            .map(|a| a.birth.date.map(|d| d.format("%Y-%m-%d").to_string()))
            .collect::<Vec<_>>(),
        BIRTH_COUNTRY => authors.iter().map(|a| a.birth.country.as_str()).collect::<Vec<_>>(),
        BIRTH_CITY => authors.iter().map(|a| a.birth.city.as_str()).collect::<Vec<_>>(),
        DESCRIPTION => authors.iter().map(|a| a.author_description.as_str()).collect::<Vec<_>>(),
    )?;
    Ok(df.lazy())
}

pub fn genres_frame(genres: &[RawGenre]) -> Result<LazyFrame> {
    let df = df!(
        GENRE_ID => genres.iter().map(|g| g.genre_id).collect::<Vec<_>>(),
        GENRE_NAME => genres.iter().map(|g| g.genre_name.as_str()).collect::<Vec<_>>(),
        DESCRIPTION => genres.iter().map(|g| g.genre_description.as_str()).collect::<Vec<_>>(),
    )?;
    Ok(df.lazy())
}

pub fn books_frame(books: &[RawBook]) -> Result<LazyFrame> {
    let df = df!(
        BOOK_ID => books.iter().map(|b| b.book_id).collect::<Vec<_>>(),
        BOOK_NAME => books.iter().map(|b| b.book_name.as_str()).collect::<Vec<_>>(),
        BOOK_LANG => books.iter().map(|b| b.book_language.as_str()).collect::<Vec<_>>(),
        DESCRIPTION => books.iter().map(|b| b.book_description.as_str()).collect::<Vec<_>>(),
        PAGE_COUNT => books.iter().map(|b| b.additional.page_count).collect::<Vec<_>>(),
        BOOK_HEIGHT => books.iter().map(|b| b.additional.size.height).collect::<Vec<_>>(),
        BOOK_WIDTH => books.iter().map(|b| b.additional.size.width).collect::<Vec<_>>(),
        BOOK_LENGTH => books.iter().map(|b| b.additional.size.length).collect::<Vec<_>>(),
        PUBLICATION_YEAR => books.iter().map(|b| b.publication_year).collect::<Vec<_>>(),
        AUTHOR_ID => books.iter().map(|b| b.author_id).collect::<Vec<_>>(),
        GENRE_ID => books.iter().map(|b| b.genre_id).collect::<Vec<_>>(),
    )?;
    Ok(df.lazy().with_columns([
        (col(BOOK_WIDTH) * col(BOOK_LENGTH)).alias(SQUARE),
        (col(BOOK_HEIGHT) * col(BOOK_WIDTH) * col(BOOK_LENGTH)).alias(VOLUME),
    ]))
}
