use serde::{Deserialize, Serialize};

use super::onboarding::{AcademicBackground, Budget, ExamsReadiness, StudyGoal};

/// Full profile as returned by `GET /profile/`: flat user fields plus the
/// nested onboarding sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub onboarding_step: Option<String>,

    #[serde(default)]
    pub academic_background: Option<AcademicBackground>,

    #[serde(default)]
    pub study_goal: Option<StudyGoal>,

    #[serde(default)]
    pub budget: Option<Budget>,

    #[serde(default)]
    pub exams_readiness: Option<ExamsReadiness>,
}

/// Partial update for `PUT /profile/`; absent fields are left untouched
/// server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_background: Option<AcademicBackground>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_goal: Option<StudyGoal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exams_readiness: Option<ExamsReadiness>,
}
