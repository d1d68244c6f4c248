use chrono::NaiveDate;
use tempfile::TempDir;
use tracing::info;

use super::error::Result;
use crate::raw::{
    RawAdditional, RawAuthor, RawAuthorName, RawBirth, RawBook, RawCatalog, RawGenre, RawSize,
    write_catalog_dir,
};

/// Configuration for test catalog generation
#[derive(Debug, Clone)]
pub struct TestDataConfig {
    /// Number of authors to generate
    pub author_rows: usize,
    /// Number of genres to generate
    pub genre_rows: usize,
    /// Number of books to generate
    pub book_rows: usize,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self::sample()
    }
}

impl TestDataConfig {
    /// Hand-picked rows only, for unit tests
    pub fn minimal() -> Self {
        Self {
            author_rows: SEED_AUTHORS.len(),
            genre_rows: SEED_GENRES.len(),
            book_rows: SEED_BOOKS.len(),
        }
    }

    /// Seed rows followed by generated ones, for integration tests and demos
    pub fn sample() -> Self {
        Self {
            author_rows: 50,
            genre_rows: 15,
            book_rows: 200,
        }
    }
}

// (id, first, second, nationality, birth year)
const SEED_AUTHORS: [(i64, &str, &str, &str, i32); 6] = [
    (1, "Ann", "Lee", "British", 1951),
    (2, "Anna", "Smith", "American", 1962),
    (3, "Bob", "Annaway", "Irish", 1948),
    (4, "Tove", "Jansson", "Swedish", 1920),
    (5, "Terry", "Pratchett", "British", 1948),
    (6, "Lee", "Child", "British", 1954),
];

const SEED_GENRES: [(i64, &str); 5] = [
    (10, "Fantasy"),
    (11, "Science Fiction"),
    (12, "Historical Fiction"),
    (13, "Poetry"),
    (14, "Fiction"),
];

// (id, name, author, genre)
const SEED_BOOKS: [(i64, &str, i64, i64); 9] = [
    (100, "The Road", 1, 11),
    (101, "The Rover", 3, 10),
    (102, "Zen and the Art", 2, 12),
    (103, "The Colour of Magic", 5, 10),
    (104, "Moominsummer Madness", 4, 10),
    (105, "The Road Home", 1, 12),
    (106, "Theory of Roads", 2, 11),
    (107, "the roaring days", 3, 13),
    (108, "Killing Floor", 6, 14),
];

const FIRST_NAMES: [&str; 12] = [
    "Desiree", "Hermann", "Olga", "Marco", "Ines", "Pavel", "Yuki", "Amara", "Lars", "Noor",
    "Felix", "Rosa",
];
const SECOND_NAMES: [&str; 10] = [
    "Hartmann", "Kovalenko", "Moreau", "Lindqvist", "Okafor", "Tanaka", "Ferreira", "Novak",
    "Quinn", "Abbott",
];
const NATIONALITIES: [&str; 8] = [
    "Albanian", "Austrian", "Canadian", "Dutch", "Greek", "Irish", "Polish", "Welsh",
];
const GENRE_NAMES: [&str; 12] = [
    "Mystery", "Thriller", "Romance", "Horror", "Biography", "Satire", "Western", "Drama",
    "Mythology", "Fable", "Tragedy", "Humor",
];
const WORDS: [&str; 16] = [
    "lorem", "ipsum", "dolor", "amet", "velit", "magna", "porta", "nulla", "vitae", "tempus",
    "auctor", "fames", "cursus", "lectus", "massa", "rhoncus",
];
const LANGUAGES: [&str; 6] = ["english", "german", "polish", "spanish", "french", "ukrainian"];
const COUNTRIES: [&str; 5] = ["Ireland", "Canada", "Japan", "Kenya", "Peru"];
const CITIES: [&str; 5] = ["Cork", "Halifax", "Osaka", "Mombasa", "Cusco"];

/// Create a deterministic catalog.
///
/// The seed rows come first and are always present (up to the requested
/// counts); further rows are generated from fixed word lists.
pub fn create_test_catalog(config: &TestDataConfig) -> RawCatalog {
    info!("Creating test catalog with config: {:?}", config);

    let authors = (0..config.author_rows).map(author_row).collect::<Vec<_>>();
    let genres = (0..config.genre_rows).map(genre_row).collect::<Vec<_>>();
    let books = (0..config.book_rows)
        .map(|i| book_row(i, &authors, &genres))
        .collect();

    RawCatalog {
        authors,
        genres,
        books,
    }
}

/// Write a generated catalog into a fresh temporary directory.
pub fn write_test_catalog(config: &TestDataConfig) -> Result<TempDir> {
    let dir = TempDir::new()?;
    write_catalog_dir(&create_test_catalog(config), dir.path())?;
    Ok(dir)
}

fn author_row(i: usize) -> RawAuthor {
    let (id, first, second, nationality, year) = SEED_AUTHORS.get(i).copied().unwrap_or_else(|| {
        (
            1000 + i as i64,
            FIRST_NAMES[i % FIRST_NAMES.len()],
            SECOND_NAMES[(i / FIRST_NAMES.len() + i) % SECOND_NAMES.len()],
            NATIONALITIES[i % NATIONALITIES.len()],
            1920 + (i * 7 % 80) as i32,
        )
    });
    RawAuthor {
        author_id: id,
        author_name: RawAuthorName {
            first: first.to_string(),
            second: second.to_string(),
        },
        nationality: nationality.to_string(),
        birth: RawBirth {
            date: NaiveDate::from_ymd_opt(year, (i % 12) as u32 + 1, (i % 28) as u32 + 1),
            country: COUNTRIES[i % COUNTRIES.len()].to_string(),
            city: CITIES[i % CITIES.len()].to_string(),
        },
        author_description: sentence(i, 8),
    }
}

fn genre_row(i: usize) -> RawGenre {
    let (id, name) = SEED_GENRES.get(i).copied().unwrap_or_else(|| {
        let j = i - SEED_GENRES.len();
        (20 + j as i64, GENRE_NAMES[j % GENRE_NAMES.len()])
    });
    // Past the word list, suffix to keep generated names distinct.
    let name = if i >= SEED_GENRES.len() + GENRE_NAMES.len() {
        format!("{name} {}", i / GENRE_NAMES.len())
    } else {
        name.to_string()
    };
    RawGenre {
        genre_id: id,
        genre_name: name,
        genre_description: sentence(i + 3, 10),
    }
}

fn book_row(i: usize, authors: &[RawAuthor], genres: &[RawGenre]) -> RawBook {
    let (id, name, author_id, genre_id) = match SEED_BOOKS.get(i) {
        Some(&(id, name, author_id, genre_id)) => (id, name.to_string(), author_id, genre_id),
        None => {
            let author_id = authors.get(i % authors.len().max(1)).map_or(0, |a| a.author_id);
            let genre_id = genres.get(i % genres.len().max(1)).map_or(0, |g| g.genre_id);
            (5000 + i as i64, title(i), author_id, genre_id)
        }
    };
    RawBook {
        book_id: id,
        book_name: name,
        book_language: LANGUAGES[i % LANGUAGES.len()].to_string(),
        book_description: sentence(i + 5, 12),
        additional: RawAdditional {
            page_count: Some(10 + (i * 37 % 990) as i32),
            size: RawSize {
                height: Some(5.0 + (i % 35) as f64),
                width: Some(5.0 + (i * 3 % 35) as f64),
                length: Some(1.0 + (i % 4) as f64),
            },
        },
        publication_year: 1970 + (i * 11 % 49) as i32,
        author_id,
        genre_id,
    }
}

fn sentence(seed: usize, words: usize) -> String {
    (0..words)
        .map(|k| WORDS[(seed * 5 + k * 3) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn title(seed: usize) -> String {
    let words = 2 + seed % 4;
    let mut name = (0..words)
        .map(|k| WORDS[(seed * 7 + k * 5) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    name
}
