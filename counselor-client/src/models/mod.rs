use std::fmt;

use serde::{Deserialize, Serialize};

/// Recommendation tier. The order of [`Category::ALL`] is the fixed walk
/// order used when partitioning fetched pages and revealing buffered items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Dream,
    Target,
    Safe,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Dream, Category::Target, Category::Safe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dream => "Dream",
            Category::Target => "Target",
            Category::Safe => "Safe",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Category::Dream => 0,
            Category::Target => 1,
            Category::Safe => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One university suggestion. `name` is the identity within a category;
/// everything beyond name and country (rank, cost, fit explanation, ...)
/// is opaque payload the UI renders verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub name: String,

    #[serde(default)]
    pub country: String,

    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl RecommendationItem {
    /// Bare item for callers that only have a name and country (manual
    /// locks from the browse-all page).
    pub fn named(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            details: serde_json::Map::new(),
        }
    }
}
