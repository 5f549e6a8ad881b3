use serde::{Deserialize, Serialize};

/// Step 1 of the onboarding wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcademicBackground {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_major: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

/// Step 2 of the onboarding wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyGoal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intended_degree: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_intake: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_countries: Option<String>,
}

/// Step 3 of the onboarding wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_plan: Option<String>,
}

/// Step 4 of the onboarding wizard. Scores are only meaningful when the
/// matching status is "Taken"/"Completed".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamsReadiness {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ielts_toefl_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ielts_toefl_score: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gre_gmat_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gre_gmat_score: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sop_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnboardingStatus {
    #[serde(default)]
    pub onboarding_step: Option<String>,

    #[serde(default)]
    pub completed: Option<bool>,
}
