use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Query error: {0}")]
    Query(#[from] crate::query::QueryError),
    #[error("Search error: {0}")]
    Search(#[from] crate::search::SearchError),
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),
    #[error("Data error: {0}")]
    Data(#[from] catalog_search_data::DataError),
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
