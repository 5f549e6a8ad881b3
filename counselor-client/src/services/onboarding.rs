//! Onboarding wizard endpoints: one GET/POST pair per step plus the
//! overall status. Draft persistence between steps is the embedding
//! layer's concern, not the SDK's.

use std::sync::Arc;

use client_core::ApiError;

use crate::dtos::onboarding::{
    AcademicBackground, Budget, ExamsReadiness, OnboardingStatus, StudyGoal,
};
use crate::services::api_client::ApiClient;

#[derive(Clone)]
pub struct OnboardingService {
    api: Arc<ApiClient>,
}

impl OnboardingService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn status(&self) -> Result<OnboardingStatus, ApiError> {
        self.api.get("/onboarding/status/").await
    }

    pub async fn academic(&self) -> Result<AcademicBackground, ApiError> {
        self.api.get("/onboarding/academic/").await
    }

    pub async fn submit_academic(
        &self,
        data: &AcademicBackground,
    ) -> Result<serde_json::Value, ApiError> {
        self.api.post("/onboarding/academic/", data).await
    }

    pub async fn study_goal(&self) -> Result<StudyGoal, ApiError> {
        self.api.get("/onboarding/study-goal/").await
    }

    pub async fn submit_study_goal(&self, data: &StudyGoal) -> Result<serde_json::Value, ApiError> {
        self.api.post("/onboarding/study-goal/", data).await
    }

    pub async fn budget(&self) -> Result<Budget, ApiError> {
        self.api.get("/onboarding/budget/").await
    }

    pub async fn submit_budget(&self, data: &Budget) -> Result<serde_json::Value, ApiError> {
        self.api.post("/onboarding/budget/", data).await
    }

    pub async fn exams(&self) -> Result<ExamsReadiness, ApiError> {
        self.api.get("/onboarding/exams/").await
    }

    pub async fn submit_exams(&self, data: &ExamsReadiness) -> Result<serde_json::Value, ApiError> {
        self.api.post("/onboarding/exams/", data).await
    }
}
