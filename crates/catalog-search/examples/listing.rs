//! Sorted and paged listings
//!
//! This example writes a generated catalog to a temporary directory, loads it
//! from there and lists records by their public JSON keys.

use catalog_search::{
    CatalogSearcher, EntityGroup, ListingParams, ListingScope, SearchCandidate,
    data::{TestDataConfig, write_test_catalog},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = write_test_catalog(&TestDataConfig::sample())?;
    let searcher = CatalogSearcher::from_dir(dir.path());

    println!("Authors by second name, page 2 of 5:");
    let authors = searcher.list(
        EntityGroup::Person,
        ListingScope::All,
        &ListingParams::new()
            .sort_by("authorName.second")
            .page("2")
            .size("5"),
    )?;
    for author in authors.iter().filter_map(|r| r.as_author()) {
        println!("  {} ({})", author.full_name(), author.nationality);
    }

    println!("\nLargest books by volume:");
    let books = searcher.list(
        EntityGroup::Title,
        ListingScope::All,
        &ListingParams::new().sort_by("volume").order("desc").size("3"),
    )?;
    for book in books.iter().filter_map(|r| r.as_book()) {
        println!("  {} - {:?} cm3", book.book_name, book.volume);
    }

    println!("\nGenres of author 1:");
    let genres = searcher.list(
        EntityGroup::SingleField,
        ListingScope::GenresOfAuthor { author_id: 1 },
        &ListingParams::new().pagination(false),
    )?;
    for genre in &genres {
        println!("  {}", genre.primary_text());
    }

    if let Err(e) = searcher.list(
        EntityGroup::Title,
        ListingScope::All,
        &ListingParams::new().sort_by("bookLang"),
    ) {
        println!("\nRejected: {e}");
    }

    Ok(())
}
