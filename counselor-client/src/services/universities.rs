//! Typed access to the universities endpoints: recommendations,
//! browse-all, shortlist mutations, locked list, and evaluation.

use std::sync::Arc;

use client_core::ApiError;

use crate::dtos::universities::{
    LockedUniversity, RecommendationsPage, ShortlistAction, ShortlistRequest, UniversityPage,
    UniversityQuery,
};
use crate::dtos::Envelope;
use crate::models::Category;
use crate::services::api_client::ApiClient;

#[derive(Clone)]
pub struct UniversityService {
    api: Arc<ApiClient>,
}

impl UniversityService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// One page of tiered recommendations. The caller (normally the feed)
    /// is responsible for partitioning into displayed/buffered slices.
    pub async fn recommendations(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<RecommendationsPage, ApiError> {
        let response: RecommendationsPage = self
            .api
            .get_with_query(
                "/universities/recommendations/",
                vec![
                    ("page".to_string(), page.to_string()),
                    ("limit".to_string(), limit.to_string()),
                ],
            )
            .await?;

        if response.status != "success" {
            return Err(ApiError::Api {
                status: 200,
                message: response
                    .message
                    .unwrap_or_else(|| "recommendations unavailable".to_string()),
            });
        }

        tracing::debug!(
            page,
            dream = response.data.dream.len(),
            target = response.data.target.len(),
            safe = response.data.safe.len(),
            has_next = response.has_next(),
            "fetched recommendations page"
        );
        Ok(response)
    }

    /// Browse the full database with filters.
    pub async fn all(&self, query: &UniversityQuery) -> Result<UniversityPage, ApiError> {
        let response: UniversityPage = self
            .api
            .get_with_query("/universities/all/", query.to_query())
            .await?;

        if response.status != "success" {
            return Err(ApiError::Api {
                status: 200,
                message: response
                    .message
                    .unwrap_or_else(|| "university listing unavailable".to_string()),
            });
        }
        Ok(response)
    }

    /// Forward a lock/unlock mutation. An application-level rejection
    /// (e.g. the lock cap) surfaces as [`ApiError::Api`] with the server's
    /// message.
    pub async fn shortlist(
        &self,
        action: ShortlistAction,
        university_name: &str,
        category: Option<Category>,
        country: Option<&str>,
    ) -> Result<(), ApiError> {
        let request = ShortlistRequest {
            action,
            university_name: university_name.to_string(),
            category,
            country: country.map(str::to_string),
        };

        let reply: Envelope<serde_json::Value> =
            self.api.post("/universities/shortlist/", &request).await?;
        reply.ensure_success()
    }

    /// The universities the user has committed to.
    pub async fn locked(&self) -> Result<Vec<LockedUniversity>, ApiError> {
        let reply: Envelope<Vec<LockedUniversity>> =
            self.api.get("/universities/locked/").await?;
        reply.into_data()
    }

    /// Detailed fit evaluation for one university; the payload shape is
    /// owned by the server and passed through opaquely.
    pub async fn evaluate(&self, name: &str) -> Result<serde_json::Value, ApiError> {
        let reply: Envelope<serde_json::Value> = self
            .api
            .get_with_query(
                "/universities/evaluate/",
                vec![("name".to_string(), name.to_string())],
            )
            .await?;
        reply.into_data()
    }
}
