use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


string_enum! {
    ApprovalStatus("approval status") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub user_id: String,
    pub full_name: String,
    pub phone: String,
    pub bio: Option<String>,
    pub subjects: Vec<String>,
    pub goals: String,
    pub availability: Vec<String>,
    pub completion: i32,
    pub approval: ApprovalStatus,
    pub updated_at: DateTime<Utc>,
}

impl ClientProfile {
    /// Share of profile fields filled in, as a rounded percentage.
    pub fn completion_percent(&self) -> i32 {
        let filled = [
            !self.full_name.trim().is_empty(),
            !self.phone.trim().is_empty(),
            self.bio.as_deref().is_some_and(|b| !b.trim().is_empty()),
            !self.subjects.is_empty(),
            !self.goals.trim().is_empty(),
            !self.availability.is_empty(),
        ];
        let count = filled.iter().filter(|f| **f).count();
        crate::listing::projector::percent(count as f64, filled.len() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub user_id: String,
    pub full_name: String,
    pub headline: String,
    pub subjects: Vec<String>,
    pub document_path: Option<String>,
    pub approval: ApprovalStatus,
    pub updated_at: DateTime<Utc>,
}
