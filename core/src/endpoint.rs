//! URLs for the graph database's server-plugin extension endpoints.
//!
//! Plugin methods live under `{base}/db/data/ext/{plugin}/graphdb/{method}`
//! and are invoked with a JSON POST, which is what `RequestFactory` builds.

pub const DEFAULT_BASE_URL: &str = "http://localhost:7474";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionEndpoint {
    base_url: String,
}

impl Default for ExtensionEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ExtensionEndpoint {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, plugin: &str, method: &str) -> String {
        format!("{}/db/data/ext/{plugin}/graphdb/{method}", self.base_url)
    }
}
