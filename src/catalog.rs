use crate::api::{ApiClient, Endpoint, RequestBody};
use crate::error::FetchError;
use crate::filter::{filter, FilterState};
use crate::session::Session;
use crate::{FileId, FileRecord};

/// Where the browser loads or downloads a stored file from.
pub fn file_url(api: &ApiClient, id: &FileId) -> String {
    api.url(&Endpoint::File(id.clone()))
}

pub async fn list_files(api: &ApiClient, session: &Session) -> Result<Vec<FileRecord>, FetchError> {
    let token = session.token().ok_or(FetchError::Unauthenticated)?;
    let response = api
        .send(Endpoint::Files, RequestBody::Empty, Some(&token))
        .await?;

    if !response.is_success() {
        return Err(FetchError::Status(response.status));
    }

    let payload: serde_json::Value = response
        .json()
        .map_err(|e| FetchError::UnexpectedPayload(format!("Failed to parse files response: {}", e)))?;
    if !payload.is_array() {
        return Err(FetchError::UnexpectedPayload(
            "files response is not an array".to_string(),
        ));
    }
    serde_json::from_value(payload)
        .map_err(|e| FetchError::UnexpectedPayload(format!("Failed to parse file record: {}", e)))
}

pub async fn fetch_file_payload(api: &ApiClient, id: &FileId) -> Result<Vec<u8>, FetchError> {
    let response = api
        .send(Endpoint::File(id.clone()), RequestBody::Empty, None)
        .await?;
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(FetchError::Status(response.status))
    }
}

/// The admin session's file list. Each refresh replaces the whole set; a
/// failed refresh leaves it empty and remembers why.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<FileRecord>,
    loading: bool,
    last_error: Option<FetchError>,
}

impl Catalog {
    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    pub fn finish_refresh(&mut self, result: Result<Vec<FileRecord>, FetchError>) {
        self.loading = false;
        match result {
            Ok(records) => {
                log::info!("Loaded {} files", records.len());
                self.records = records;
                self.last_error = None;
            }
            Err(e) => {
                log::error!("Error loading files: {}", e);
                self.records.clear();
                self.last_error = Some(e);
            }
        }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn filtered(&self, state: &FilterState) -> Vec<FileRecord> {
        filter(&self.records, state).into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FileTypeFilter;
    use crate::session::MemoryTokenStore;
    use crate::testing::{mock_client, record, MockTransport};
    use futures::executor::block_on;
    use serde_json::json;
    use std::rc::Rc;

    fn signed_in() -> Session {
        let store = MemoryTokenStore::with_token("secret-token");
        Session::new(Rc::new(store))
    }

    #[test]
    fn list_files_sends_bearer_and_parses_records() {
        let transport = MockTransport::new();
        transport.respond_json(
            200,
            json!([
                {"id": "a1", "name": "scan.pdf", "mimetype": "application/pdf",
                 "uploaded_by": "kim", "uploaded_at": "2024-05-02T08:00:00Z"},
                {"id": "b2", "name": "cat.jpg", "mimetype": "image/jpeg",
                 "uploaded_by": "anonymous", "uploaded_at": "2024-05-03T09:30:00Z"}
            ]),
        );
        let api = mock_client(&transport);

        let files = block_on(list_files(&api, &signed_in())).expect("files");
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].name, "cat.jpg");

        let requests = transport.requests();
        let request = &requests[0];
        assert_eq!(request.url, "http://api.test/api/files");
        assert_eq!(request.bearer.as_deref(), Some("secret-token"));
    }

    #[test]
    fn one_malformed_record_does_not_drop_the_listing() {
        let transport = MockTransport::new();
        transport.respond_json(
            200,
            json!([
                {"id": "a1", "name": "scan.pdf", "mimetype": "application/pdf",
                 "uploaded_by": "kim", "uploaded_at": "2024-05-02T08:00:00Z"},
                {"id": "b2", "name": "old.csv", "mimetype": "text/csv",
                 "uploaded_by": null, "uploaded_at": "2024-05-02 08:00:00"}
            ]),
        );
        let api = mock_client(&transport);

        let mut catalog = Catalog::default();
        catalog.finish_refresh(block_on(list_files(&api, &signed_in())));

        assert_eq!(catalog.last_error(), None);
        let records = catalog.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].uploaded_at_display(), "2024-05-02 08:00:00");
        assert_eq!(records[1].uploader(), "");
        assert_eq!(records[1].uploaded_at_display(), "2024-05-02 08:00:00");
    }

    #[test]
    fn non_array_payload_leaves_catalog_empty() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({}));
        let api = mock_client(&transport);

        let mut catalog = Catalog::default();
        catalog.begin_refresh();
        assert!(catalog.is_loading());
        catalog.finish_refresh(block_on(list_files(&api, &signed_in())));

        assert!(!catalog.is_loading());
        assert!(catalog.records().is_empty());
        assert!(matches!(
            catalog.last_error(),
            Some(FetchError::UnexpectedPayload(_))
        ));
    }

    #[test]
    fn failed_refresh_replaces_previous_records() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!([
            {"id": 1, "name": "a.csv", "mimetype": "text/csv", "uploaded_at": "2024-05-02T08:00:00Z"}
        ]));
        transport.respond_json(401, json!({"error": "token expired"}));
        let api = mock_client(&transport);
        let session = signed_in();

        let mut catalog = Catalog::default();
        catalog.finish_refresh(block_on(list_files(&api, &session)));
        assert_eq!(catalog.records().len(), 1);

        catalog.finish_refresh(block_on(list_files(&api, &session)));
        assert!(catalog.records().is_empty());
        assert_eq!(catalog.last_error(), Some(&FetchError::Status(401)));
    }

    #[test]
    fn transport_failure_surfaces_as_fetch_error() {
        let transport = MockTransport::new();
        transport.fail("connection refused");
        let api = mock_client(&transport);

        let err = block_on(list_files(&api, &signed_in())).unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn missing_token_skips_the_request() {
        let transport = MockTransport::new();
        let api = mock_client(&transport);
        let session = Session::new(Rc::new(MemoryTokenStore::default()));

        let err = block_on(list_files(&api, &session)).unwrap_err();
        assert_eq!(err, FetchError::Unauthenticated);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn payload_fetch_returns_raw_bytes_without_auth() {
        let transport = MockTransport::new();
        transport.respond_bytes(200, b"a,b\n1,2".to_vec());
        transport.respond_bytes(404, b"missing".to_vec());
        let api = mock_client(&transport);
        let id = FileId::new("f9");

        assert_eq!(block_on(fetch_file_payload(&api, &id)).unwrap(), b"a,b\n1,2");
        assert_eq!(
            block_on(fetch_file_payload(&api, &id)).unwrap_err(),
            FetchError::Status(404)
        );

        let requests = transport.requests();
        assert_eq!(requests[0].url, "http://api.test/api/file/f9");
        assert_eq!(requests[0].bearer, None);
        assert_eq!(file_url(&api, &id), "http://api.test/api/file/f9");
    }

    #[test]
    fn filtered_view_does_not_touch_the_catalog() {
        let mut catalog = Catalog::default();
        catalog.finish_refresh(Ok(vec![
            record("1", "a.pdf", "application/pdf"),
            record("2", "b.png", "image/png"),
        ]));
        let state = FilterState {
            search_term: String::new(),
            selected_type: FileTypeFilter::Image,
        };

        let shown = catalog.filtered(&state);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].name, "b.png");
        assert_eq!(catalog.records().len(), 2);
    }
}
