use serde::{Deserialize, Serialize};

fn default_catalog_dir() -> String {
    "translations".to_string()
}

fn default_language() -> String {
    "en_US".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Directory scanned by `catalog.load_dir` and used for preloading.
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: String,

    /// Language the host falls back to when a switch fails.
    #[serde(default = "default_language", alias = "language")]
    pub default_language: String,

    #[serde(default)]
    pub treat_empty_as_missing: bool,

    /// Languages loaded from `catalog_dir` at startup.
    #[serde(default)]
    pub preload: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            catalog_dir: default_catalog_dir(),
            default_language: default_language(),
            treat_empty_as_missing: false,
            preload: Vec::new(),
        }
    }
}
