use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";

/// Path on the host where the runtime [`ClientConfig`] is published.
pub const CONFIG_PATH: &str = "/config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin of the file-sharing API. An empty string means same-origin.
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
        }
    }

    /// Uses `FILEDROP_API_BASE_URL` as seen at compile time, falling back to
    /// [`DEFAULT_API_BASE_URL`].
    pub fn from_build_env() -> Self {
        Self::new(option_env!("FILEDROP_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL))
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }
}
