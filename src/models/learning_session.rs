use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


string_enum! {
    SessionStatus("session status") {
        Scheduled => "scheduled",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningSession {
    pub id: String,
    pub course_id: String,
    pub course_title: String,
    pub client_id: String,
    pub teacher_name: String,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: SessionStatus,
    pub recording_url: Option<String>,
    pub materials: Vec<String>,
}
