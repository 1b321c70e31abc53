use thiserror::Error;

/// Message shown in place of any preview that could not be fetched or decoded.
pub const PREVIEW_FAILED_MESSAGE: &str = "Unable to load preview";

/// Network-level failure: the request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        StoreError(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no session token available")]
    Unauthenticated,

    #[error("request failed with status {0}")]
    Status(u16),

    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),

    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload is not valid UTF-8 text: {0}")]
    InvalidText(#[from] std::str::Utf8Error),

    #[error("unreadable workbook: {0}")]
    Workbook(String),

    #[error("workbook contains no sheets")]
    NoSheets,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl PreviewError {
    pub fn user_message(&self) -> &'static str {
        PREVIEW_FAILED_MESSAGE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please select a file to upload.")]
    NoFileSelected,

    /// Server-provided message, or the generic fallback.
    #[error("{0}")]
    Rejected(String),

    #[error("Server error")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Server-provided message, or the generic fallback.
    #[error("{0}")]
    Rejected(String),

    #[error("Server error")]
    Transport(#[from] TransportError),

    #[error("Unable to store session: {0}")]
    Storage(#[from] StoreError),
}
