//! Admin session: token storage, the login/register exchange, and the state
//! of the login form.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{ApiClient, Endpoint};
use crate::error::{SessionError, StoreError, TransportError};
use crate::{Credentials, LoginResponse};

/// Key under which the bearer token is persisted.
pub const TOKEN_STORAGE_KEY: &str = "adminToken";

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const REGISTRATION_SUCCESS: &str = "Registration successful! Please login.";

/// Persistent home of the bearer token.
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Process-local token store, used by tests and non-browser hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Some(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.inner.borrow().clone()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.inner.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.inner.borrow_mut().take();
        Ok(())
    }
}

/// Handle passed to every flow that needs the admin's credential.
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Rc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.load().filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn persist(&self, token: &str) -> Result<(), StoreError> {
        self.store.save(token)
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        log::info!("Clearing admin session");
        self.store.clear()
    }
}

/// Exchanges credentials for a bearer token and persists it.
pub async fn login(
    api: &ApiClient,
    session: &Session,
    credentials: &Credentials,
) -> Result<String, SessionError> {
    let response = api.post_json(Endpoint::Login, credentials).await?;
    let body: LoginResponse = response.json().map_err(|e| {
        TransportError::new(format!("Failed to parse login response: {}", e))
    })?;

    match body.token.filter(|token| !token.is_empty()) {
        Some(token) if response.is_success() => {
            session.persist(&token)?;
            log::info!("Admin {} signed in", credentials.username);
            Ok(token)
        }
        _ => Err(SessionError::Rejected(
            body.error
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| LOGIN_FAILED.to_string()),
        )),
    }
}

/// Creates an admin account. Never signs in.
pub async fn register(api: &ApiClient, credentials: &Credentials) -> Result<(), SessionError> {
    let response = api.post_json(Endpoint::Register, credentials).await?;
    if response.is_success() {
        log::info!("Registered admin {}", credentials.username);
        return Ok(());
    }
    Err(SessionError::Rejected(
        response
            .error_message()
            .unwrap_or_else(|| REGISTRATION_FAILED.to_string()),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    mode: AuthMode,
    error: Option<String>,
    success: Option<String>,
}

impl AuthForm {
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.error = None;
        self.success = None;
    }

    /// Clears previous messages and returns the credentials to submit.
    pub fn begin_submit(&mut self) -> Credentials {
        self.error = None;
        self.success = None;
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    /// Returns `true` when the admin is now signed in.
    pub fn finish_login(&mut self, result: Result<String, SessionError>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Login failed: {:?}", e);
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn finish_register(&mut self, result: Result<(), SessionError>) {
        match result {
            Ok(()) => {
                self.username.clear();
                self.password.clear();
                self.mode = AuthMode::Login;
                self.success = Some(REGISTRATION_SUCCESS.to_string());
            }
            Err(e) => {
                log::warn!("Registration failed: {:?}", e);
                self.error = Some(e.to_string());
            }
        }
    }
}
