use crate::{error::CatalogError, query::SortDirection};

pub const RESULT_LIMIT_ENV: &str = "CATALOG_RESULT_LIMIT";
pub const PAGE_SIZE_ENV: &str = "CATALOG_PAGE_SIZE";

/// Settings shared by searches and listings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogConfig {
    /// Maximum number of ranked search results
    pub result_limit: usize,
    /// Page used when a listing does not name one
    pub default_page: usize,
    /// Page size used when a listing does not name one
    pub default_page_size: usize,
    pub default_order: SortDirection,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            result_limit: 5,
            default_page: 1,
            default_page_size: 10,
            default_order: SortDirection::Asc,
        }
    }
}

/// Builder for creating catalog configurations
#[derive(Debug, Clone, Default)]
pub struct CatalogConfigBuilder {
    config: CatalogConfig,
}

impl CatalogConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: CatalogConfig::default(),
        }
    }

    /// Start from the defaults, overridden by `CATALOG_RESULT_LIMIT` and
    /// `CATALOG_PAGE_SIZE` when set
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CatalogError> {
        let mut builder = Self::new();
        if let Some(limit) = parse_var(&lookup, RESULT_LIMIT_ENV)? {
            builder = builder.result_limit(limit);
        }
        if let Some(size) = parse_var(&lookup, PAGE_SIZE_ENV)? {
            builder = builder.default_page_size(size);
        }
        Ok(builder)
    }

    /// Set the maximum number of ranked results (at least 1)
    pub fn result_limit(mut self, limit: usize) -> Self {
        self.config.result_limit = limit.max(1);
        self
    }

    pub fn default_page(mut self, page: usize) -> Self {
        self.config.default_page = page.max(1);
        self
    }

    pub fn default_page_size(mut self, size: usize) -> Self {
        self.config.default_page_size = size.max(1);
        self
    }

    pub fn default_order(mut self, order: SortDirection) -> Self {
        self.config.default_order = order;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> CatalogConfig {
        self.config
    }
}

fn parse_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<usize>, CatalogError> {
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<usize>().map_err(|e| {
                CatalogError::ConfigError(format!("{key} must be a positive integer, got '{raw}': {e}"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_config_default() {
        let config = CatalogConfig::default();

        assert_eq!(config.result_limit, 5);
        assert_eq!(config.default_page, 1);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.default_order, SortDirection::Asc);
    }

    #[test]
    fn test_builder_fluent_interface() {
        let config = CatalogConfigBuilder::new()
            .result_limit(3)
            .default_page(2)
            .default_page_size(25)
            .default_order(SortDirection::Desc)
            .build();

        assert_eq!(config.result_limit, 3);
        assert_eq!(config.default_page, 2);
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.default_order, SortDirection::Desc);
    }

    #[test]
    fn test_builder_clamps_zero_values() {
        let config = CatalogConfigBuilder::new()
            .result_limit(0)
            .default_page(0)
            .default_page_size(0)
            .build();

        assert_eq!(config.result_limit, 1);
        assert_eq!(config.default_page, 1);
        assert_eq!(config.default_page_size, 1);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = CatalogConfigBuilder::from_lookup(|key| match key {
            RESULT_LIMIT_ENV => Some("8".to_string()),
            PAGE_SIZE_ENV => Some(" 20 ".to_string()),
            _ => None,
        })
        .unwrap()
        .build();

        assert_eq!(config.result_limit, 8);
        assert_eq!(config.default_page_size, 20);
    }

    #[test]
    fn test_lookup_without_vars_keeps_defaults() {
        let config = CatalogConfigBuilder::from_lookup(|_| None).unwrap().build();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let result = CatalogConfigBuilder::from_lookup(|key| {
            (key == RESULT_LIMIT_ENV).then(|| "five".to_string())
        });
        assert!(matches!(result, Err(CatalogError::ConfigError(msg)) if msg.contains(RESULT_LIMIT_ENV)));
    }
}
