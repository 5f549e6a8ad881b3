//! Session-aware HTTP client.
//!
//! Every request gets the bearer token attached when one is held. A 401
//! from a non-exempt path is recovered exactly once: refresh the access
//! token (single-flight across concurrent requests), then re-issue the
//! original request with the new token. An unrecoverable refresh clears
//! the session and surfaces [`ApiError::MustReauthenticate`]; redirecting
//! the user is the subscriber's job, never this layer's.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use validator::Validate;

use client_core::{config::ClientConfig, ApiError};

use crate::dtos::auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
use crate::session::SessionStore;

/// Paths whose 401s are terminal for the caller and must never trigger a
/// token refresh: a rejected login is a credential problem, and the
/// refresh endpoint cannot recover itself.
const AUTH_EXEMPT_PATHS: &[&str] = &["/login/", "/token/refresh/"];

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn is_auth_exempt(path: &str) -> bool {
        AUTH_EXEMPT_PATHS.iter().any(|exempt| path.starts_with(exempt))
    }

    fn build_request(
        &self,
        method: &Method,
        path: &str,
        query: Option<&[(String, String)]>,
        body: Option<&serde_json::Value>,
        access: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut request = self.http.request(method.clone(), self.endpoint(path));
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(token) = access {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
    }

    /// Send a request, transparently recovering once from an expired
    /// access token. The retried response is returned as-is: a second 401
    /// propagates to the caller instead of looping.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<Vec<(String, String)>>,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let access = self.session.access_token();
        let response = self
            .build_request(&method, path, query.as_deref(), body.as_ref(), access.as_deref())
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED || Self::is_auth_exempt(path) {
            return Ok(response);
        }

        let fresh = self.refresh_access_token(access.as_deref()).await?;
        tracing::debug!(path, "re-issuing request with refreshed token");
        let retried = self
            .build_request(&method, path, query.as_deref(), body.as_ref(), Some(&fresh))
            .send()
            .await?;
        Ok(retried)
    }

    /// Obtain a usable access token after a 401, sharing one refresh call
    /// among all concurrent victims.
    ///
    /// `stale` is the token the failed request carried. Whoever acquires
    /// the gate first performs the network refresh; later arrivals find
    /// the session token already rotated away from their stale value and
    /// adopt it without a second call. A rejected refresh clears the
    /// session, so later arrivals observe the missing refresh token and
    /// share the rejection outcome.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.session.access_token() {
            if stale != Some(current.as_str()) {
                return Ok(current);
            }
        }

        let Some(refresh) = self.session.refresh_token() else {
            self.session.invalidate()?;
            return Err(ApiError::MustReauthenticate);
        };

        tracing::info!("access token rejected, refreshing");
        let response = self
            .http
            .post(self.endpoint("/token/refresh/"))
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await;

        let rotated: RefreshResponse = match response {
            Ok(response) if response.status().is_success() => {
                let body = response.text().await?;
                serde_json::from_str(&body)?
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "token refresh rejected, clearing session");
                self.session.invalidate()?;
                return Err(ApiError::MustReauthenticate);
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, clearing session");
                self.session.invalidate()?;
                return Err(ApiError::MustReauthenticate);
            }
        };

        self.session
            .store_tokens(&rotated.access, &rotated.refresh)?;
        Ok(rotated.access)
    }

    /// Authenticate and store the returned tokens (and display name)
    /// before handing the payload back. A rejected login propagates
    /// untouched; it never triggers a refresh.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response = self
            .send(
                Method::POST,
                "/login/",
                None,
                Some(serde_json::to_value(&request)?),
            )
            .await?;
        let payload: LoginResponse = Self::decode(response).await?;

        if let (Some(access), Some(refresh)) = (&payload.access, &payload.refresh) {
            self.session.store_tokens(access, refresh)?;
            if let Some(name) = &payload.first_name {
                self.session.store_display_name(name)?;
            }
            tracing::info!("login succeeded");
        }

        Ok(payload)
    }

    /// Drop the session locally. No network call is made.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None, None).await?;
        Self::decode(response).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, Some(query), None).await?;
        Self::decode(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(Method::POST, path, None, Some(serde_json::to_value(body)?))
            .await?;
        Self::decode(response).await
    }

    pub async fn post_with_query<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(
                Method::POST,
                path,
                Some(query),
                Some(serde_json::to_value(body)?),
            )
            .await?;
        Self::decode(response).await
    }

    /// POST without a body (e.g. creating a chat session).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, None, None).await?;
        Self::decode(response).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(Method::PUT, path, None, Some(serde_json::to_value(body)?))
            .await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send(Method::DELETE, path, None, None).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(Self::error_from_parts(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }
        Err(Self::error_from_parts(status, &body))
    }

    /// Map a failed response onto the error taxonomy. Server-reported
    /// bodies are carried through, never swallowed.
    fn error_from_parts(status: StatusCode, body: &str) -> ApiError {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

        if status == StatusCode::UNAUTHORIZED {
            let message = parsed
                .as_ref()
                .and_then(extract_message)
                .unwrap_or_else(|| "unauthorized".to_string());
            return ApiError::Unauthorized(message);
        }

        if status.is_client_error() {
            if let Some(value) = &parsed {
                if let Some(fields) = field_errors(value) {
                    return ApiError::Validation { fields };
                }
                if let Some(message) = extract_message(value) {
                    return ApiError::Api {
                        status: status.as_u16(),
                        message,
                    };
                }
            }
            return ApiError::Api {
                status: status.as_u16(),
                message: non_empty_or(body, status),
            };
        }

        let message = parsed
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| non_empty_or(body, status));
        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

fn non_empty_or(body: &str, status: StatusCode) -> String {
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.trim().to_string()
    }
}

/// Pull a human-readable message out of the common error body shapes:
/// `{"error": ...}`, `{"message": ...}`, `{"detail": ...}`.
fn extract_message(value: &serde_json::Value) -> Option<String> {
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| value.get(key))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Detect a field-level validation payload: an object whose values are
/// all arrays of strings, e.g. `{"email": ["Enter a valid email."]}`.
fn field_errors(value: &serde_json::Value) -> Option<BTreeMap<String, Vec<String>>> {
    let object = value.as_object()?;
    if object.is_empty() {
        return None;
    }

    let mut fields = BTreeMap::new();
    for (key, entry) in object {
        let messages: Vec<String> = entry
            .as_array()?
            .iter()
            .map(|m| m.as_str().map(str::to_string))
            .collect::<Option<_>>()?;
        fields.insert(key.clone(), messages);
    }
    Some(fields)
}
