//! Application configuration, persisted as TOML through confy.

use std::collections::HashSet;
use std::time::Duration;

use nexttogo_types::{Category, default_categories};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "nexttogo";

pub const DEFAULT_API_BASE_URL: &str = "https://api.neds.com.au/";
/// Races requested from the feed per fetch.
pub const DEFAULT_RACE_RETRIEVAL_COUNT: usize = 10;
/// Races shown at once; expiry below this triggers a refill.
pub const DEFAULT_RACE_DISPLAY_COUNT: usize = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = concat!("nexttogo/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[source] confy::ConfyError),
    #[error("failed to store configuration: {0}")]
    Store(#[source] confy::ConfyError),
    #[error("category with empty id")]
    EmptyCategoryId,
    #[error("duplicate category id {0:?}")]
    DuplicateCategory(String),
    #[error("race_display_count must be between 1 and race_retrieval_count")]
    InvalidDisplayCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub race_retrieval_count: usize,
    pub race_display_count: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub categories: Vec<Category>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            race_retrieval_count: DEFAULT_RACE_RETRIEVAL_COUNT,
            race_display_count: DEFAULT_RACE_DISPLAY_COUNT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            categories: default_categories(),
        }
    }
}

impl AppConfig {
    /// Load from the platform config directory, creating defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = confy::load(APP_NAME, None).map_err(ConfigError::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, self).map_err(ConfigError::Store)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.race_display_count == 0 || self.race_display_count > self.race_retrieval_count {
            return Err(ConfigError::InvalidDisplayCount);
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.id.is_empty() {
                return Err(ConfigError::EmptyCategoryId);
            }
            if !seen.insert(category.id.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.id.clone()));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.race_display_count, 5);
        assert_eq!(config.race_retrieval_count, 10);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
race_display_count = 3
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.race_display_count, 3);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.categories.len(), 3);
    }

    #[test]
    fn test_validate_rejects_duplicate_categories() {
        let mut config = AppConfig::default();
        config.categories = vec![
            Category::new("1", "Greyhound", ""),
            Category::new("1", "Harness", ""),
        ];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateCategory(id)) if id == "1"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_category_id() {
        let mut config = AppConfig::default();
        config.categories.push(Category::new("", "Unknown", ""));
        assert!(matches!(config.validate(), Err(ConfigError::EmptyCategoryId)));
    }

    #[test]
    fn test_validate_rejects_bad_display_count() {
        let mut config = AppConfig::default();
        config.race_display_count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDisplayCount)));

        config.race_display_count = config.race_retrieval_count + 1;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDisplayCount)));
    }

    #[test]
    fn test_category_lookup() {
        let config = AppConfig::default();
        let horse = config.category(nexttogo_types::HORSE_CATEGORY_ID).unwrap();
        assert_eq!(horse.title, "Horse");
        assert!(config.category("missing").is_none());
    }
}
