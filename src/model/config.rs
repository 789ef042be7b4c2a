use serde::{Deserialize, Serialize};

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}

/// Remote endpoint configuration. Defaults target the public hosted
/// service; tests and self-hosted deployments override both bases.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL for raw file content. Only used for viewer handoffs; the
    /// core never fetches content itself.
    #[serde(default = "default_raw_base")]
    pub raw_base: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            raw_base: default_raw_base(),
        }
    }
}
