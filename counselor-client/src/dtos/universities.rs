use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Category, RecommendationItem};

/// Pagination metadata. Recommendations report `has_next`; the browse-all
/// endpoint reports `total_pages`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub has_next: bool,

    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// The per-category arrays of a recommendations page, keyed by tier name
/// on the wire.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RecommendationBuckets {
    #[serde(default, rename = "Dream")]
    pub dream: Vec<RecommendationItem>,

    #[serde(default, rename = "Target")]
    pub target: Vec<RecommendationItem>,

    #[serde(default, rename = "Safe")]
    pub safe: Vec<RecommendationItem>,
}

impl RecommendationBuckets {
    pub fn total(&self) -> usize {
        self.dream.len() + self.target.len() + self.safe.len()
    }

    /// Consume into per-category vectors, ordered by [`Category::ALL`].
    pub(crate) fn into_ordered(self) -> [Vec<RecommendationItem>; 3] {
        [self.dream, self.target, self.safe]
    }
}

/// `GET /universities/recommendations/?page=&limit=` response.
#[derive(Debug, Deserialize)]
pub struct RecommendationsPage {
    pub status: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub data: RecommendationBuckets,

    #[serde(default)]
    pub pagination: Option<Pagination>,

    #[serde(default)]
    pub locked_universities: Vec<String>,
}

impl RecommendationsPage {
    pub fn has_next(&self) -> bool {
        self.pagination.as_ref().map(|p| p.has_next).unwrap_or(false)
    }
}

/// One row of the browse-all listing.
#[derive(Debug, Clone, Deserialize)]
pub struct UniversitySummary {
    pub name: String,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub is_locked: bool,

    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// `GET /universities/all/` response.
#[derive(Debug, Deserialize)]
pub struct UniversityPage {
    pub status: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub data: Vec<UniversitySummary>,

    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Filters for the browse-all listing.
#[derive(Debug, Clone)]
pub struct UniversityQuery {
    pub page: u32,
    pub limit: u32,
    pub country: Option<String>,
    pub rank_min: Option<u32>,
    pub rank_max: Option<u32>,
    pub search: Option<String>,
}

impl Default for UniversityQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 12,
            country: None,
            rank_min: None,
            rank_max: None,
            search: None,
        }
    }
}

impl UniversityQuery {
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(country) = &self.country {
            query.push(("country".to_string(), country.clone()));
        }
        if let Some(rank_min) = self.rank_min {
            query.push(("rank_min".to_string(), rank_min.to_string()));
        }
        if let Some(rank_max) = self.rank_max {
            query.push(("rank_max".to_string(), rank_max.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search".to_string(), search.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortlistAction {
    Lock,
    Unlock,
}

/// `POST /universities/shortlist/` payload.
#[derive(Debug, Serialize)]
pub struct ShortlistRequest {
    pub action: ShortlistAction,
    pub university_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// One committed entry from `GET /universities/locked/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LockedUniversity {
    pub university_name: String,

    #[serde(default)]
    pub category: Option<Category>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub locked_at: Option<DateTime<Utc>>,
}
