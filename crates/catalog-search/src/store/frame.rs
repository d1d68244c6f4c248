use std::path::Path;

use catalog_search_data::{CatalogData, RawCatalog, columns::*};
use itertools::izip;
use polars::prelude::*;
use tracing::{debug, info, instrument};

use super::{
    CatalogStore,
    error::{Result, StoreError},
};
use crate::{
    group::EntityGroup,
    query::{ListingQuery, ListingScope, QueryDirective},
    record::{Author, Book, CatalogRecord, Genre},
    search::SubstringPredicate,
};

/// [`CatalogStore`] over in-memory polars frames.
#[derive(Debug, Clone)]
pub struct FrameStore {
    data: CatalogData,
}

impl FrameStore {
    pub fn new(data: CatalogData) -> Self {
        Self { data }
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(CatalogData::from_dir(dir))
    }

    pub fn from_raw(catalog: &RawCatalog) -> Result<Self> {
        Ok(Self::new(CatalogData::from_raw(catalog)?))
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    fn table(&self, group: EntityGroup) -> Result<LazyFrame> {
        Ok(self.data.frame(group.table())?.clone())
    }

    fn ensure_exists(&self, group: EntityGroup, id: i64) -> Result<()> {
        let found = self
            .table(group)?
            .filter(col(group.id_column()).eq(lit(id)))
            .limit(1)
            .collect()?
            .height();
        if found == 0 {
            return Err(StoreError::EntityNotFound { group, id });
        }
        Ok(())
    }

    fn books_where(&self, author_id: Option<i64>, genre_id: Option<i64>) -> Result<LazyFrame> {
        let mut books = self.table(EntityGroup::Title)?;
        if let Some(author_id) = author_id {
            books = books.filter(col(AUTHOR_ID).eq(lit(author_id)));
        }
        if let Some(genre_id) = genre_id {
            books = books.filter(col(GENRE_ID).eq(lit(genre_id)));
        }
        Ok(books)
    }

    /// Rows of `group` having at least one book in `books`, joined on `key`.
    fn having_books(&self, group: EntityGroup, books: LazyFrame, key: &str) -> Result<LazyFrame> {
        Ok(self.table(group)?.join(
            books.select([col(key)]),
            [col(key)],
            [col(key)],
            JoinArgs::new(JoinType::Semi),
        ))
    }

    fn scoped(&self, group: EntityGroup, scope: ListingScope) -> Result<LazyFrame> {
        match scope {
            ListingScope::All => self.table(group),
            ListingScope::BooksInGenre { genre_id } => self.books_where(None, Some(genre_id)),
            ListingScope::BooksOfAuthor { author_id } => self.books_where(Some(author_id), None),
            ListingScope::BooksOfAuthorInGenre {
                author_id,
                genre_id,
            } => self.books_where(Some(author_id), Some(genre_id)),
            ListingScope::AuthorsInGenre { genre_id } => {
                self.having_books(group, self.books_where(None, Some(genre_id))?, AUTHOR_ID)
            }
            ListingScope::GenresOfAuthor { author_id } => {
                self.having_books(group, self.books_where(Some(author_id), None)?, GENRE_ID)
            }
        }
    }
}

fn ordered(lf: LazyFrame, directive: &QueryDirective) -> LazyFrame {
    let descending = directive.direction.is_descending();
    let lf = lf.sort(
        [directive.sort_field],
        SortMultipleOptions::default()
            .with_order_descending(descending)
            .with_nulls_last(descending)
            .with_maintain_order(true),
    );
    match directive.window() {
        Some((offset, size)) => lf.slice(
            i64::try_from(offset).unwrap_or(i64::MAX),
            IdxSize::try_from(size).unwrap_or(IdxSize::MAX),
        ),
        None => lf,
    }
}

impl CatalogStore for FrameStore {
    #[instrument(name = "Fetch matching rows", level = "debug", skip_all, fields(group = %predicate.group))]
    fn fetch_matching(&self, predicate: &SubstringPredicate) -> Result<Vec<CatalogRecord>> {
        let group = predicate.group;
        let Some(filter) = predicate
            .clauses()
            .map(|clause| col(clause.column).str().contains_literal(lit(clause.needle)))
            .reduce(|acc, expr| acc.or(expr))
        else {
            return Ok(vec![]);
        };

        let t_fetch = std::time::Instant::now();
        let df = self.table(group)?.filter(filter).collect()?;
        debug!(rows = df.height(), elapsed = ?t_fetch.elapsed(), "Matched rows");
        records_from_frame(group, &df)
    }

    #[instrument(name = "Fetch listing", level = "debug", skip_all, fields(group = %listing.group(), scope = %listing.scope))]
    fn fetch_listing(&self, listing: &ListingQuery) -> Result<Vec<CatalogRecord>> {
        for (parent_group, id) in listing.scope.parents() {
            self.ensure_exists(parent_group, id)?;
        }
        let group = listing.group();
        let df = ordered(self.scoped(group, listing.scope)?, &listing.directive).collect()?;
        info!(rows = df.height(), "Listed catalog rows");
        records_from_frame(group, &df)
    }
}

fn required<T>(value: Option<T>, column: &'static str) -> Result<T> {
    value.ok_or(StoreError::NullValue { column })
}

fn records_from_frame(group: EntityGroup, df: &DataFrame) -> Result<Vec<CatalogRecord>> {
    match group {
        EntityGroup::Person => Ok(authors_from_frame(df)?.into_iter().map(Into::into).collect()),
        EntityGroup::SingleField => Ok(genres_from_frame(df)?.into_iter().map(Into::into).collect()),
        EntityGroup::Title => Ok(books_from_frame(df)?.into_iter().map(Into::into).collect()),
    }
}

fn authors_from_frame(df: &DataFrame) -> Result<Vec<Author>> {
    let ids = df.column(AUTHOR_ID)?.i64()?;
    let first_names = df.column(FIRST_NAME)?.str()?;
    let second_names = df.column(SECOND_NAME)?.str()?;
    let nationalities = df.column(NATIONALITY)?.str()?;
    let birth_dates = df.column(BIRTH_DATE)?.str()?;
    let birth_countries = df.column(BIRTH_COUNTRY)?.str()?;
    let birth_cities = df.column(BIRTH_CITY)?.str()?;
    let descriptions = df.column(DESCRIPTION)?.str()?;

    izip!(
        ids,
        first_names,
        second_names,
        nationalities,
        birth_dates,
        birth_countries,
        birth_cities,
        descriptions
    )
    .map(
        |(id, first, second, nationality, birth_date, country, city, description)| {
            Ok(Author {
                author_id: required(id, AUTHOR_ID)?,
                first_name: required(first, FIRST_NAME)?.to_string(),
                second_name: required(second, SECOND_NAME)?.to_string(),
                nationality: nationality.unwrap_or_default().to_string(),
                birth_date: birth_date.map(str::to_string),
                birth_country: country.unwrap_or_default().to_string(),
                birth_city: city.unwrap_or_default().to_string(),
                description: description.unwrap_or_default().to_string(),
            })
        },
    )
    .collect()
}

fn genres_from_frame(df: &DataFrame) -> Result<Vec<Genre>> {
    let ids = df.column(GENRE_ID)?.i64()?;
    let names = df.column(GENRE_NAME)?.str()?;
    let descriptions = df.column(DESCRIPTION)?.str()?;

    izip!(ids, names, descriptions)
        .map(|(id, name, description)| {
            Ok(Genre {
                genre_id: required(id, GENRE_ID)?,
                genre_name: required(name, GENRE_NAME)?.to_string(),
                description: description.unwrap_or_default().to_string(),
            })
        })
        .collect()
}

fn books_from_frame(df: &DataFrame) -> Result<Vec<Book>> {
    let ids = df.column(BOOK_ID)?.i64()?;
    let names = df.column(BOOK_NAME)?.str()?;
    let langs = df.column(BOOK_LANG)?.str()?;
    let descriptions = df.column(DESCRIPTION)?.str()?;
    let page_counts = df.column(PAGE_COUNT)?.i32()?;
    let heights = df.column(BOOK_HEIGHT)?.f64()?;
    let widths = df.column(BOOK_WIDTH)?.f64()?;
    let lengths = df.column(BOOK_LENGTH)?.f64()?;
    let years = df.column(PUBLICATION_YEAR)?.i32()?;
    let author_ids = df.column(AUTHOR_ID)?.i64()?;
    let genre_ids = df.column(GENRE_ID)?.i64()?;
    let squares = df.column(SQUARE)?.f64()?;
    let volumes = df.column(VOLUME)?.f64()?;

    izip!(
        ids,
        names,
        langs,
        descriptions,
        page_counts,
        heights,
        widths,
        lengths,
        years,
        author_ids,
        genre_ids,
        squares,
        volumes
    )
    .map(
        |(
            id,
            name,
            lang,
            description,
            page_count,
            height,
            width,
            length,
            year,
            author_id,
            genre_id,
            square,
            volume,
        )| {
            Ok(Book {
                book_id: required(id, BOOK_ID)?,
                book_name: required(name, BOOK_NAME)?.to_string(),
                book_lang: lang.unwrap_or_default().to_string(),
                description: description.unwrap_or_default().to_string(),
                page_count,
                height,
                width,
                length,
                publication_year: required(year, PUBLICATION_YEAR)?,
                author_id: required(author_id, AUTHOR_ID)?,
                genre_id: required(genre_id, GENRE_ID)?,
                square,
                volume,
            })
        },
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use catalog_search_data::{TestDataConfig, create_test_catalog, write_test_catalog};

    use super::*;
    use crate::record::SearchCandidate;

    fn store() -> FrameStore {
        FrameStore::from_raw(&create_test_catalog(&TestDataConfig::minimal())).unwrap()
    }

    fn ids(records: &[CatalogRecord]) -> Vec<i64> {
        records.iter().map(CatalogRecord::id).collect()
    }

    fn listing(group: EntityGroup, scope: ListingScope, key: &str, order: &str) -> ListingQuery {
        let directive = QueryDirective::build(group, key, order, "1", "10").unwrap();
        ListingQuery::new(scope, directive).unwrap()
    }

    #[test]
    fn test_fetch_matching_is_case_sensitive_and_storage_ordered() {
        let predicate = SubstringPredicate::new(EntityGroup::Title, "Road", &["Road".to_string()]);
        let records = store().fetch_matching(&predicate).unwrap();
        // "the roaring days" has no "Road".
        assert_eq!(ids(&records), vec![100, 105, 106]);
    }

    #[test]
    fn test_fetch_matching_on_full_name() {
        let tokens = vec!["Ann".to_string(), "Lee".to_string()];
        let predicate = SubstringPredicate::new(EntityGroup::Person, "Ann Lee", &tokens);
        let records = store().fetch_matching(&predicate).unwrap();
        // Ann Lee, Anna Smith, Bob Annaway, Lee Child
        assert_eq!(ids(&records), vec![1, 2, 3, 6]);
        assert_eq!(records[3].secondary_text(), Some("Child"));
    }

    #[test]
    fn test_empty_token_matches_every_row() {
        let tokens = vec!["The".to_string(), String::new(), "Road".to_string()];
        let predicate = SubstringPredicate::new(EntityGroup::Title, "The  Road", &tokens);
        let records = store().fetch_matching(&predicate).unwrap();
        assert_eq!(ids(&records), (100..=108).collect::<Vec<_>>());
    }

    #[test]
    fn test_fetch_matching_without_hits() {
        let predicate = SubstringPredicate::new(EntityGroup::SingleField, "Western", &[]);
        assert!(store().fetch_matching(&predicate).unwrap().is_empty());
    }

    #[test]
    fn test_listing_sorted_and_paged() {
        let store = store();
        let directive = QueryDirective::build(EntityGroup::Title, "bookName", "asc", "2", "3").unwrap();
        let records = store
            .fetch_listing(&ListingQuery::new(ListingScope::All, directive).unwrap())
            .unwrap();
        let names: Vec<_> = records.iter().map(|r| r.primary_text().to_string()).collect();
        // Full order: Killing Floor, Moominsummer Madness, The Colour of Magic,
        // The Road, The Road Home, The Rover, Theory of Roads, Zen and the Art, the roaring days
        assert_eq!(names, vec!["The Road", "The Road Home", "The Rover"]);
    }

    #[test]
    fn test_listing_without_pagination_returns_everything() {
        let directive = QueryDirective::build(EntityGroup::SingleField, "genreName", "desc", "1", "1")
            .unwrap()
            .with_pagination(false);
        let records = store()
            .fetch_listing(&ListingQuery::new(ListingScope::All, directive).unwrap())
            .unwrap();
        assert_eq!(ids(&records), vec![11, 13, 12, 14, 10]);
    }

    #[test]
    fn test_listing_by_derived_volume() {
        let records = store()
            .fetch_listing(&listing(EntityGroup::Title, ListingScope::All, "volume", "desc"))
            .unwrap();
        let volumes: Vec<_> = records
            .iter()
            .filter_map(|r| r.as_book().and_then(|b| b.volume))
            .collect();
        assert!(volumes.windows(2).all(|w| w[0] >= w[1]), "{volumes:?}");
    }

    #[test]
    fn test_scoped_book_listings() {
        let store = store();
        let in_genre = store
            .fetch_listing(&listing(EntityGroup::Title, ListingScope::BooksInGenre { genre_id: 10 }, "bookId", "asc"))
            .unwrap();
        assert_eq!(ids(&in_genre), vec![101, 103, 104]);

        let of_author = store
            .fetch_listing(&listing(EntityGroup::Title, ListingScope::BooksOfAuthor { author_id: 1 }, "bookId", "desc"))
            .unwrap();
        assert_eq!(ids(&of_author), vec![105, 100]);

        let both = store
            .fetch_listing(&listing(
                EntityGroup::Title,
                ListingScope::BooksOfAuthorInGenre {
                    author_id: 2,
                    genre_id: 11,
                },
                "bookId",
                "asc",
            ))
            .unwrap();
        assert_eq!(ids(&both), vec![106]);
    }

    #[test]
    fn test_authors_in_genre_are_distinct() {
        // Genre 10 holds books 101 (author 3), 103 (author 5), 104 (author 4).
        let records = store()
            .fetch_listing(&listing(EntityGroup::Person, ListingScope::AuthorsInGenre { genre_id: 10 }, "authorId", "asc"))
            .unwrap();
        assert_eq!(ids(&records), vec![3, 4, 5]);
    }

    #[test]
    fn test_genres_of_author_are_distinct() {
        // Author 1 wrote books in genres 11 and 12.
        let records = store()
            .fetch_listing(&listing(
                EntityGroup::SingleField,
                ListingScope::GenresOfAuthor { author_id: 1 },
                "genreId",
                "asc",
            ))
            .unwrap();
        assert_eq!(ids(&records), vec![11, 12]);
    }

    #[test]
    fn test_missing_parent_is_not_found() {
        let err = store()
            .fetch_listing(&listing(EntityGroup::Title, ListingScope::BooksOfAuthor { author_id: 999 }, "bookId", "asc"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::EntityNotFound {
                group: EntityGroup::Person,
                id: 999
            }
        ));
    }

    #[test]
    fn test_store_reads_catalog_directory() {
        let dir = write_test_catalog(&TestDataConfig::minimal()).unwrap();
        let store = FrameStore::from_dir(dir.path());
        let records = store
            .fetch_listing(&listing(EntityGroup::Person, ListingScope::All, "birth.date", "asc"))
            .unwrap();
        // Tove Jansson (1920) is the oldest seed author.
        assert_eq!(records[0].id(), 4);
        assert_eq!(records.len(), 6);
    }
}
