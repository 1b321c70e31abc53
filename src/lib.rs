use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod api;
pub mod catalog;
pub mod config;
pub mod decode;
pub mod error;
pub mod filter;
pub mod preview;
pub mod routes;
pub mod session;
pub mod upload;

#[cfg(test)]
mod testing;

/// Opaque file identifier as issued by the API. Numeric ids are kept in
/// their decimal form so they can be spliced into retrieval URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawFileId", into = "String")]
pub struct FileId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFileId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawFileId> for FileId {
    fn from(raw: RawFileId) -> Self {
        match raw {
            RawFileId::Text(text) => FileId(text),
            RawFileId::Number(number) => FileId(number.to_string()),
        }
    }
}

impl From<FileId> for String {
    fn from(id: FileId) -> Self {
        id.0
    }
}

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        FileId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    #[serde(alias = "_id")]
    pub id: FileId,
    pub name: String,
    pub mimetype: String,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    /// Kept as sent; a timestamp the client cannot parse only affects its own cell.
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

impl FileRecord {
    pub fn uploader(&self) -> &str {
        self.uploaded_by.as_deref().unwrap_or_default()
    }

    pub fn uploaded_at_display(&self) -> String {
        let Some(raw) = self.uploaded_at.as_deref() else {
            return String::new();
        };
        match DateTime::parse_from_rfc3339(raw) {
            Ok(at) => at.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S").to_string(),
            Err(_) => raw.to_string(),
        }
    }
}

/// Body of both the login and the registration request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(feature = "frontend")]
pub mod web;

#[cfg(feature = "frontend")]
pub mod frontend;

#[cfg(feature = "frontend")]
pub use frontend::*;
