use chrono::{Utc, Weekday};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FieldErrors, WizardForm, check};
use crate::models::{ApprovalStatus, ClientProfile};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PersonalStep {
    #[validate(length(min = 2, max = 80, message = "Please enter your full name."))]
    pub full_name: String,
    #[validate(length(min = 7, max = 20, message = "Please enter a valid phone number."))]
    pub phone: String,
    #[validate(length(max = 500, message = "Keep your bio under 500 characters."))]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PreferencesStep {
    #[validate(length(min = 1, message = "Pick at least one subject."))]
    pub subjects: Vec<String>,
    #[validate(length(min = 10, message = "Tell us a little more about your goals."))]
    pub goals: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AvailabilityStep {
    #[validate(length(min = 1, message = "Choose at least one day."))]
    pub days: Vec<String>,
}

/// Client onboarding: who you are, what you want to learn, when you are free.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDraft {
    pub personal: PersonalStep,
    pub preferences: PreferencesStep,
    pub availability: AvailabilityStep,
}

impl ProfileDraft {
    pub fn to_profile(&self, user_id: &str) -> ClientProfile {
        let mut profile = ClientProfile {
            user_id: user_id.to_string(),
            full_name: self.personal.full_name.trim().to_string(),
            phone: self.personal.phone.trim().to_string(),
            bio: self
                .personal
                .bio
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            subjects: self.preferences.subjects.clone(),
            goals: self.preferences.goals.trim().to_string(),
            availability: self.availability.days.clone(),
            completion: 0,
            approval: ApprovalStatus::Pending,
            updated_at: Utc::now(),
        };
        profile.completion = profile.completion_percent();
        profile
    }
}

impl WizardForm for ProfileDraft {
    const STEPS: usize = 3;

    fn step_title(step: usize) -> &'static str {
        match step {
            1 => "About you",
            2 => "Learning preferences",
            _ => "Availability",
        }
    }

    fn validate_step(&self, step: usize) -> FieldErrors {
        match step {
            1 => check(&self.personal),
            2 => check(&self.preferences),
            3 => {
                let mut errors = check(&self.availability);
                for day in &self.availability.days {
                    if day.parse::<Weekday>().is_err() {
                        errors.add("days", format!("{day:?} is not a day of the week."));
                    }
                }
                errors
            }
            _ => FieldErrors::new(),
        }
    }
}
