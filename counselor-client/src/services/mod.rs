pub mod api_client;
pub mod auth;
pub mod chat;
pub mod feed;
pub mod onboarding;
mod partition;
pub mod profile;
pub mod universities;

pub use api_client::ApiClient;
pub use auth::AuthService;
pub use chat::ChatService;
pub use feed::{FeedPhase, FeedView, RecommendationFeed, PAGE_SIZE};
pub use onboarding::OnboardingService;
pub use profile::ProfileService;
pub use universities::UniversityService;
