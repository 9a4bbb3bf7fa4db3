//! REST API client for the school-administration backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every outbound call goes through `ApiClient::execute`, which layers two
//! cross-cutting behaviors onto the transport:
//!
//! - outbound: attach `Authorization: Bearer <token>` whenever the session
//!   authority holds a credential token;
//! - inbound: a 401 from any endpoint is reported to the session authority
//!   as an invalidation, and surfaces to the caller as
//!   `ApiError::SessionInvalidated`.
//!
//! The client never writes durable storage itself; the session store is the
//! only writer and reacts to the invalidation signal with its own teardown.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result<_, ApiError>` and decide how to notify the user. There
//! is no retry, caching, or request coalescing.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use super::types::{AuthGrant, Credentials};

/// Base URL used when `CLASS_CENTRAL_API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Backend base URL fixed at build time.
pub fn configured_base_url() -> &'static str {
    option_env!("CLASS_CENTRAL_API_URL").unwrap_or(DEFAULT_API_URL)
}

/// Failures surfaced by API calls.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The backend rejected the credential (HTTP 401). The session has been
    /// torn down by the time the caller sees this.
    #[error("session invalidated{}", suffix(.message.as_deref()))]
    SessionInvalidated { message: Option<String> },
    #[error("request failed with status {status}{}", suffix(.message.as_deref()))]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("could not encode request body: {0}")]
    Encode(String),
}

fn suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ApiError {
    /// The backend-supplied human-readable message, when the error carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::SessionInvalidated { message } | Self::Status { message, .. } => message.as_deref(),
            Self::Transport(_) | Self::Decode(_) | Self::Encode(_) => None,
        }
    }
}

/// The session capability handed to the API client.
///
/// Implemented by the session store; the client reads the bearer token from
/// it and reports credential rejection back to it.
pub trait SessionAuthority {
    fn bearer_token(&self) -> Option<String>;
    fn session_invalidated(&self);
}

/// The credential-exchange collaborator used by the session store's login.
#[allow(async_fn_in_trait)]
pub trait Authenticator {
    /// # Errors
    ///
    /// Returns the API error when the backend rejects the credentials or the
    /// exchange fails.
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError>;
}

/// Ordered query-string parameters; empty values are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.0.push((key.to_owned(), value));
        }
        self
    }

    #[must_use]
    pub fn opt_param<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode as `k=v&k2=v2` (no leading `?`).
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Join a base URL, a resource path, and an optional query.
fn build_url(base_url: &str, path: &str, query: &Query) -> String {
    let mut url = format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'));
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.encode());
    }
    url
}

/// REST client parameterized over the wire transport and the session handle.
#[derive(Clone, Debug)]
pub struct ApiClient<T, A> {
    base_url: String,
    transport: T,
    authority: A,
}

impl<T: Transport, A: SessionAuthority> ApiClient<T, A> {
    pub fn new(base_url: impl Into<String>, transport: T, authority: A) -> Self {
        Self { base_url: base_url.into(), transport, authority }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn request(&self, method: Method, path: &str, query: &Query) -> ApiRequest {
        ApiRequest::new(method, build_url(&self.base_url, path, query))
    }

    pub(crate) fn request_with_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiRequest, ApiError> {
        let mut request = self.request(method, path, &Query::new());
        request.body = Some(serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?);
        request.set_header("Content-Type", "application/json");
        Ok(request)
    }

    /// Attach the bearer credential, if any. Runs for every request.
    fn attach_credentials(&self, request: &mut ApiRequest) {
        if let Some(token) = self.authority.bearer_token() {
            request.set_header("Authorization", format!("Bearer {token}"));
        }
    }

    /// Map a raw response onto the client's error taxonomy.
    fn normalize(&self, response: ApiResponse) -> Result<ApiResponse, ApiError> {
        if response.status == 401 {
            let message = response.error_message();
            leptos::logging::warn!("credential rejected by backend; invalidating session");
            self.authority.session_invalidated();
            return Err(ApiError::SessionInvalidated { message });
        }
        if !response.is_success() {
            return Err(ApiError::Status { status: response.status, message: response.error_message() });
        }
        Ok(response)
    }

    /// Send a request through both interceptors.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.attach_credentials(&mut request);
        let response = self.transport.send(request).await?;
        self.normalize(response)
    }

    pub(crate) async fn get_json<R: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<R, ApiError> {
        let response = self.execute(self.request(Method::Get, path, query)).await?;
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.request_with_body(method, path, body)?;
        self.execute(request).await
    }

    pub(crate) async fn delete_path(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.execute(self.request(Method::Delete, path, &Query::new())).await
    }
}

impl<T: Transport, A: SessionAuthority> Authenticator for ApiClient<T, A> {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        self.login(credentials).await
    }
}
