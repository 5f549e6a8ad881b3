use std::sync::Arc;

use client_core::ApiError;

use crate::dtos::profile::{Profile, ProfileUpdate};
use crate::services::api_client::ApiClient;

#[derive(Clone)]
pub struct ProfileService {
    api: Arc<ApiClient>,
}

impl ProfileService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get(&self) -> Result<Profile, ApiError> {
        self.api.get("/profile/").await
    }

    pub async fn update(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        self.api.put("/profile/", update).await
    }
}
