//! Browser bindings: gloo-net transport, `localStorage` token store and a
//! console logger.

use gloo_net::http::Request;
use web_sys::FormData;

use crate::api::{ApiRequest, ApiResponse, FormPart, HttpTransport, Method, RequestBody, TransportFuture};
use crate::config::{ClientConfig, CONFIG_PATH};
use crate::error::{StoreError, TransportError};
use crate::session::{TokenStore, TOKEN_STORAGE_KEY};

#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl HttpTransport for GlooTransport {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        Box::pin(send_request(request))
    }
}

async fn send_request(request: ApiRequest) -> Result<ApiResponse, TransportError> {
    let mut builder = match request.method {
        Method::Get => Request::get(&request.url),
        Method::Post => Request::post(&request.url),
    };
    if let Some(token) = &request.bearer {
        builder = builder.header("Authorization", &format!("Bearer {}", token));
    }

    let prepared = match request.body {
        RequestBody::Empty => builder.build(),
        RequestBody::Json(value) => builder.json(&value),
        RequestBody::Multipart(parts) => builder.body(form_data(parts)?),
    }
    .map_err(|e| TransportError::new(format!("Failed to build request: {:?}", e)))?;

    let response = prepared
        .send()
        .await
        .map_err(|e| TransportError::new(format!("Request failed: {:?}", e)))?;
    let status = response.status();
    let content_type = response.headers().get("content-type");
    let body = response
        .binary()
        .await
        .map_err(|e| TransportError::new(format!("Failed to read response: {:?}", e)))?;

    Ok(ApiResponse {
        status,
        content_type,
        body,
    })
}

fn form_data(parts: Vec<FormPart>) -> Result<FormData, TransportError> {
    let form = FormData::new().map_err(|_| TransportError::new("Failed to create FormData"))?;

    for part in parts {
        let appended = match part {
            FormPart::Text { name, value } => form.append_with_str(&name, &value),
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let blob: web_sys::Blob =
                    gloo_file::Blob::new_with_options(bytes.as_slice(), Some(&content_type)).into();
                form.append_with_blob_and_filename(&name, &blob, &file_name)
            }
        };
        appended.map_err(|_| TransportError::new("Failed to append to FormData"))?;
    }

    Ok(form)
}

/// Token store backed by `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageTokenStore;

fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| StoreError::new("localStorage unavailable"))
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        local_storage().ok()?.get_item(TOKEN_STORAGE_KEY).ok().flatten()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        local_storage()?
            .set_item(TOKEN_STORAGE_KEY, token)
            .map_err(|e| StoreError::new(format!("localStorage set_item failed: {:?}", e)))
    }

    fn clear(&self) -> Result<(), StoreError> {
        local_storage()?
            .remove_item(TOKEN_STORAGE_KEY)
            .map_err(|e| StoreError::new(format!("localStorage remove_item failed: {:?}", e)))
    }
}

async fn fetch_config() -> Result<ClientConfig, String> {
    let response = Request::get(CONFIG_PATH)
        .send()
        .await
        .map_err(|e| format!("Config request failed: {:?}", e))?;
    if !response.ok() {
        return Err(format!("Config request failed with status: {}", response.status()));
    }
    response
        .json::<ClientConfig>()
        .await
        .map_err(|e| format!("Failed to parse config: {:?}", e))
}

/// Reads the host-published config, falling back to the build-time default.
pub async fn load_runtime_config() -> ClientConfig {
    fetch_config().await.unwrap_or_else(|e| {
        log::warn!("{}; using build-time API base URL", e);
        ClientConfig::from_build_env()
    })
}

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line: wasm_bindgen::JsValue = format!("[{}] {}", record.level(), record.args()).into();
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

pub fn init_logging(level: log::LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
