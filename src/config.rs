use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Settings for talking to the meal catalog
#[derive(Debug, Deserialize, Clone)]
pub struct FinderConfig {
    /// Base URL of the catalog API, without the endpoint file name
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds, applied to every catalog call
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// How many detail lookups may be in flight at once (1 = strictly sequential)
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            enrichment_concurrency: default_enrichment_concurrency(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_enrichment_concurrency() -> usize {
    1
}

impl FinderConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEAL_FINDER__ prefix
    /// 2. meal-finder.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEAL_FINDER__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`FinderConfig::load`] for the source priority.
pub fn load_config() -> Result<FinderConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("meal-finder").required(false))
        .add_source(
            Environment::with_prefix("MEAL_FINDER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
