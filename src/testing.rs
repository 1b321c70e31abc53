use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::api::{ApiClient, ApiRequest, ApiResponse, HttpTransport, TransportFuture};
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::{FileId, FileRecord};

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond_json(&self, status: u16, body: serde_json::Value) {
        self.respond_bytes(status, body.to_string().into_bytes());
    }

    pub fn respond_bytes(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.responses.borrow_mut().push_back(Ok(ApiResponse {
            status,
            content_type: None,
            body: body.into(),
        }));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(TransportError::new(message)));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        self.requests.borrow_mut().push(request);
        let next = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no mock response queued")));
        Box::pin(async move { next })
    }
}

pub fn mock_client(transport: &Rc<MockTransport>) -> ApiClient {
    ApiClient::new(ClientConfig::new("http://api.test"), transport.clone())
}

pub fn record(id: &str, name: &str, mimetype: &str) -> FileRecord {
    FileRecord {
        id: FileId::new(id),
        name: name.to_string(),
        mimetype: mimetype.to_string(),
        uploaded_by: Some("anonymous".to_string()),
        uploaded_at: Some("2024-03-01T10:15:00Z".to_string()),
    }
}
