use crate::api::{ApiClient, Endpoint, FormPart, RequestBody};
use crate::error::UploadError;

/// File input filter for the public upload form.
pub const ACCEPTED_UPLOAD_TYPES: &str = ".pdf,.csv,.json,.xlsx,image/*";
pub const ANONYMOUS_UPLOADER: &str = "anonymous";
pub const UPLOAD_FAILED: &str = "Upload failed";
pub const UPLOAD_SUCCESS: &str = "File uploaded successfully!";

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A blank name uploads as anonymous; anything else is sent as typed.
pub fn uploader_name(display_name: &str) -> &str {
    if display_name.trim().is_empty() {
        ANONYMOUS_UPLOADER
    } else {
        display_name
    }
}

fn multipart_body(file: &SelectedFile, display_name: &str) -> RequestBody {
    let content_type = if file.content_type.is_empty() {
        "application/octet-stream"
    } else {
        file.content_type.as_str()
    };
    RequestBody::Multipart(vec![
        FormPart::File {
            name: "file".to_string(),
            file_name: file.name.clone(),
            content_type: content_type.to_string(),
            bytes: file.bytes.clone(),
        },
        FormPart::Text {
            name: "user".to_string(),
            value: uploader_name(display_name).to_string(),
        },
    ])
}

/// Posts one file to the upload endpoint. Without a file nothing is sent.
pub async fn submit(
    api: &ApiClient,
    file: Option<&SelectedFile>,
    display_name: &str,
) -> Result<(), UploadError> {
    let file = file.ok_or(UploadError::NoFileSelected)?;
    log::info!("Uploading {} ({} bytes)", file.name, file.bytes.len());

    let response = api
        .send(Endpoint::Upload, multipart_body(file, display_name), None)
        .await?;
    if response.is_success() {
        return Ok(());
    }
    Err(UploadError::Rejected(
        response
            .error_message()
            .unwrap_or_else(|| UPLOAD_FAILED.to_string()),
    ))
}

/// Snapshot handed from the form to [`submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload {
    pub file: SelectedFile,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadForm {
    pub display_name: String,
    file: Option<SelectedFile>,
    in_flight: bool,
    message: Option<String>,
    error: Option<String>,
}

impl UploadForm {
    pub fn select_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates the form and marks it in flight. Returns `None` and records
    /// the validation error when no file is selected.
    pub fn begin_submit(&mut self) -> Option<PendingUpload> {
        let Some(file) = self.file.clone() else {
            self.error = Some(UploadError::NoFileSelected.to_string());
            return None;
        };
        self.in_flight = true;
        self.error = None;
        self.message = None;
        Some(PendingUpload {
            file,
            display_name: self.display_name.clone(),
        })
    }

    pub fn finish_submit(&mut self, result: Result<(), UploadError>) {
        self.in_flight = false;
        match result {
            Ok(()) => {
                self.file = None;
                self.display_name.clear();
                self.message = Some(UPLOAD_SUCCESS.to_string());
            }
            Err(e) => {
                log::error!("Upload failed: {:?}", e);
                self.error = Some(e.to_string());
            }
        }
    }
}
