//! Request plumbing shared by every flow that talks to the file-sharing API.
//!
//! Flows build an [`Endpoint`] plus a [`RequestBody`] and hand them to an
//! [`ApiClient`]; the client resolves the URL against its [`ClientConfig`],
//! attaches the bearer token only where the endpoint requires one, and sends
//! the request through whichever [`HttpTransport`] it was built with.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::{ErrorResponse, FileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    Files,
    File(FileId),
    Upload,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Files | Endpoint::File(_) => Method::Get,
            Endpoint::Login | Endpoint::Register | Endpoint::Upload => Method::Post,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/api/admin/login".to_string(),
            Endpoint::Register => "/api/admin/register".to_string(),
            Endpoint::Files => "/api/files".to_string(),
            Endpoint::File(id) => format!("/api/file/{}", id),
            Endpoint::Upload => "/api/upload".to_string(),
        }
    }

    /// Only the catalog listing is behind the bearer token; payload
    /// retrieval stays open so image and document surfaces can load it.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Endpoint::Files)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// The `error` field of a JSON error body, if the server sent a non-empty one.
    pub fn error_message(&self) -> Option<String> {
        self.json::<ErrorResponse>()
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.is_empty())
    }
}

pub type TransportFuture<'a> = LocalBoxFuture<'a, Result<ApiResponse, TransportError>>;

/// Sends a fully resolved request. Implementations report only network-level
/// failures as errors; any HTTP status comes back as an [`ApiResponse`].
pub trait HttpTransport {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_>;
}

#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: Rc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, transport: Rc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        self.config.endpoint_url(&endpoint.path())
    }

    pub async fn send(
        &self,
        endpoint: Endpoint,
        body: RequestBody,
        token: Option<&str>,
    ) -> Result<ApiResponse, TransportError> {
        let bearer = if endpoint.requires_auth() {
            token.map(str::to_owned)
        } else {
            None
        };
        let request = ApiRequest {
            method: endpoint.method(),
            url: self.url(&endpoint),
            bearer,
            body,
        };

        log::debug!("{:?} {}", request.method, request.url);
        let response = self.transport.send(request).await;
        match &response {
            Ok(response) => log::debug!("{} -> {}", endpoint.path(), response.status),
            Err(e) => log::warn!("{} failed: {}", endpoint.path(), e),
        }
        response
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        payload: &T,
    ) -> Result<ApiResponse, TransportError> {
        let body = serde_json::to_value(payload)
            .map_err(|e| TransportError::new(format!("Failed to encode request: {}", e)))?;
        self.send(endpoint, RequestBody::Json(body), None).await
    }
}
