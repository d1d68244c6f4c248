//! Records returned by searches and listings.

use crate::group::EntityGroup;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Author {
    pub author_id: i64,
    pub first_name: String,
    pub second_name: String,
    pub nationality: String,
    /// `YYYY-MM-DD`
    pub birth_date: Option<String>,
    pub birth_country: String,
    pub birth_city: String,
    pub description: String,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.second_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Genre {
    pub genre_id: i64,
    pub genre_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Book {
    pub book_id: i64,
    pub book_name: String,
    pub book_lang: String,
    pub description: String,
    pub page_count: Option<i32>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub publication_year: i32,
    pub author_id: i64,
    pub genre_id: i64,
    /// `width * length`
    pub square: Option<f64>,
    /// `height * width * length`
    pub volume: Option<f64>,
}

/// The text fields the ranker looks at, plus the key it deduplicates on.
pub trait SearchCandidate {
    /// Primary key within the candidate's group.
    fn candidate_key(&self) -> i64;

    /// First name for people, the name for titles and single-field records.
    fn primary_text(&self) -> &str;

    /// Second name for people.
    fn secondary_text(&self) -> Option<&str> {
        None
    }
}

impl SearchCandidate for Author {
    fn candidate_key(&self) -> i64 {
        self.author_id
    }

    fn primary_text(&self) -> &str {
        &self.first_name
    }

    fn secondary_text(&self) -> Option<&str> {
        Some(&self.second_name)
    }
}

impl SearchCandidate for Genre {
    fn candidate_key(&self) -> i64 {
        self.genre_id
    }

    fn primary_text(&self) -> &str {
        &self.genre_name
    }
}

impl SearchCandidate for Book {
    fn candidate_key(&self) -> i64 {
        self.book_id
    }

    fn primary_text(&self) -> &str {
        &self.book_name
    }
}

/// One record of any group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CatalogRecord {
    Author(Author),
    Genre(Genre),
    Book(Book),
}

impl CatalogRecord {
    pub fn group(&self) -> EntityGroup {
        match self {
            Self::Author(_) => EntityGroup::Person,
            Self::Genre(_) => EntityGroup::SingleField,
            Self::Book(_) => EntityGroup::Title,
        }
    }

    pub fn id(&self) -> i64 {
        self.candidate_key()
    }

    pub fn as_author(&self) -> Option<&Author> {
        match self {
            Self::Author(author) => Some(author),
            _ => None,
        }
    }

    pub fn as_genre(&self) -> Option<&Genre> {
        match self {
            Self::Genre(genre) => Some(genre),
            _ => None,
        }
    }

    pub fn as_book(&self) -> Option<&Book> {
        match self {
            Self::Book(book) => Some(book),
            _ => None,
        }
    }

    pub fn into_author(self) -> Option<Author> {
        match self {
            Self::Author(author) => Some(author),
            _ => None,
        }
    }

    pub fn into_genre(self) -> Option<Genre> {
        match self {
            Self::Genre(genre) => Some(genre),
            _ => None,
        }
    }

    pub fn into_book(self) -> Option<Book> {
        match self {
            Self::Book(book) => Some(book),
            _ => None,
        }
    }
}

impl SearchCandidate for CatalogRecord {
    fn candidate_key(&self) -> i64 {
        match self {
            Self::Author(author) => author.candidate_key(),
            Self::Genre(genre) => genre.candidate_key(),
            Self::Book(book) => book.candidate_key(),
        }
    }

    fn primary_text(&self) -> &str {
        match self {
            Self::Author(author) => author.primary_text(),
            Self::Genre(genre) => genre.primary_text(),
            Self::Book(book) => book.primary_text(),
        }
    }

    fn secondary_text(&self) -> Option<&str> {
        match self {
            Self::Author(author) => author.secondary_text(),
            Self::Genre(genre) => genre.secondary_text(),
            Self::Book(book) => book.secondary_text(),
        }
    }
}

impl From<Author> for CatalogRecord {
    fn from(author: Author) -> Self {
        Self::Author(author)
    }
}

impl From<Genre> for CatalogRecord {
    fn from(genre: Genre) -> Self {
        Self::Genre(genre)
    }
}

impl From<Book> for CatalogRecord {
    fn from(book: Book) -> Self {
        Self::Book(book)
    }
}
