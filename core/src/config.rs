//! Header defaults applied by `RequestFactory`.
//!
//! The content type keeps the historical `"Application/json"` spelling.
//! Servers that insist on the lowercase form can be targeted with
//! `with_content_type`.

use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_ACCEPT: &str = "";
pub const DEFAULT_CONTENT_TYPE: &str = "Application/json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FactoryConfig {
    #[serde(default = "default_accept")]
    pub accept: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            accept: default_accept(),
            content_type: default_content_type(),
        }
    }
}

impl FactoryConfig {
    /// Load a config from JSON. Missing fields fall back to the defaults.
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        serde_json::from_str(raw).map_err(|e| ApiError::Config(e.to_string()))
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }
}
