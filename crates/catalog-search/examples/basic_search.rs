//! Basic catalog search
//!
//! This example demonstrates the fundamental search operations:
//! - Creating a searcher over a generated catalog
//! - Searching each entity group
//! - Handling queries that are too short

use catalog_search::{
    CatalogConfigBuilder, CatalogRecord, CatalogSearcher, EntityGroup, SearchCandidate,
    data::{TestDataConfig, create_test_catalog},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let searcher = CatalogSearcher::from_raw(&create_test_catalog(&TestDataConfig::sample()))?;

    // Authors: first-name prefix matches rank ahead of second-name matches
    println!("Searching authors for 'Ann':");
    let results = searcher.search(EntityGroup::Person, "Ann")?;
    print_search_results(&results);

    // Books: longer title prefixes rank first
    println!("\nSearching books for 'The Road':");
    let results = searcher.search(EntityGroup::Title, "The Road")?;
    print_search_results(&results);

    // Genres come back in catalog order
    println!("\nSearching genres for 'Fiction':");
    let results = searcher.search(EntityGroup::SingleField, "Fiction")?;
    print_search_results(&results);

    // Queries below the group's minimum length are rejected
    if let Err(e) = searcher.search(EntityGroup::Title, "Road") {
        println!("\nRejected: {e}");
    }

    // A smaller result limit
    let searcher = searcher.with_config(CatalogConfigBuilder::new().result_limit(2).build());
    println!("\nTop two books for 'The Road':");
    print_search_results(&searcher.search(EntityGroup::Title, "The Road")?);

    Ok(())
}

fn print_search_results(results: &[CatalogRecord]) {
    for (i, record) in results.iter().enumerate() {
        let label = match record {
            CatalogRecord::Author(author) => author.full_name(),
            other => other.primary_text().to_string(),
        };
        println!("  {}. {} (id {})", i + 1, label, record.id());
    }
    if results.is_empty() {
        println!("  no results");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = catalog_search::init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_basic_search_example() {
        setup_test_env();
        assert!(
            main().is_ok(),
            "Basic search example should run successfully"
        );
    }
}
