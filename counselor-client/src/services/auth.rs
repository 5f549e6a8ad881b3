//! Account lifecycle endpoints. Login and logout delegate to the
//! [`ApiClient`] because they mutate the session; everything else is
//! plain request glue.

use std::sync::Arc;

use validator::Validate;

use client_core::ApiError;

use crate::dtos::auth::{
    DetailResponse, ForgotPasswordRequest, LoginResponse, RegisterRequest, RegisterResponse,
    ResetPasswordRequest,
};
use crate::services::api_client::ApiClient;

#[derive(Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.api.login(email, password).await
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.api.logout()
    }

    /// Create an account. Tokens in the response are returned to the
    /// caller but not stored; the session starts with an explicit login.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        request.validate()?;
        self.api.post("/register/", request).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<DetailResponse, ApiError> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        request.validate()?;
        self.api.post("/forgot-password/", &request).await
    }

    pub async fn reset_password(
        &self,
        uid: &str,
        token: &str,
        password: &str,
    ) -> Result<DetailResponse, ApiError> {
        let request = ResetPasswordRequest {
            password: password.to_string(),
        };
        request.validate()?;
        self.api
            .post_with_query(
                "/reset-password/",
                vec![
                    ("uid".to_string(), uid.to_string()),
                    ("token".to_string(), token.to_string()),
                ],
                &request,
            )
            .await
    }
}
