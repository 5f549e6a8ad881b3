//! counselor-client: headless SDK for the study-abroad counselor API.
//!
//! The two load-bearing pieces are [`ApiClient`] (bearer-token injection
//! with single-flight refresh-and-retry on 401) and
//! [`RecommendationFeed`] (the buffered, category-bucketed infinite feed
//! over paginated recommendations). The typed services cover the rest of
//! the API surface: accounts, profile, onboarding, universities, chat.

pub mod dtos;
pub mod models;
pub mod services;
pub mod session;

use std::sync::Arc;

pub use client_core::config::ClientConfig;
pub use client_core::ApiError;

pub use models::{Category, RecommendationItem};
pub use services::{
    ApiClient, AuthService, ChatService, FeedPhase, FeedView, OnboardingService, ProfileService,
    RecommendationFeed, UniversityService,
};
pub use session::{Session, SessionEvent, SessionStore};

/// Everything wired together: one shared [`ApiClient`] plus the typed
/// services over it.
#[derive(Clone)]
pub struct CounselorClient {
    api: Arc<ApiClient>,
    pub auth: AuthService,
    pub profile: ProfileService,
    pub onboarding: OnboardingService,
    pub universities: UniversityService,
    pub chat: ChatService,
}

impl CounselorClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::new(config, session)?);
        Ok(Self {
            auth: AuthService::new(Arc::clone(&api)),
            profile: ProfileService::new(Arc::clone(&api)),
            onboarding: OnboardingService::new(Arc::clone(&api)),
            universities: UniversityService::new(Arc::clone(&api)),
            chat: ChatService::new(Arc::clone(&api)),
            api,
        })
    }

    /// Convenience constructor: configuration from the environment and the
    /// session from its platform-default file.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = ClientConfig::load()?;
        let session = SessionStore::open_default()?;
        Self::new(&config, session)
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }

    /// A fresh feed instance over this client's recommendations endpoint.
    pub fn feed(&self) -> RecommendationFeed {
        RecommendationFeed::new(self.universities.clone())
    }
}
