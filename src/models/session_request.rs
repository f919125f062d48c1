use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;


string_enum! {
    RequestStatus("session request status") {
        Pending => "pending",
        UnderReview => "under_review",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

impl RequestStatus {
    /// Requests a client may still withdraw or a teacher may still decide on.
    pub fn is_open(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::UnderReview)
    }
}

/// A client's ask for a one-to-one session with a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub id: String,
    pub client_id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub topic: String,
    pub subject: String,
    pub notes: Option<String>,
    pub requested_date: NaiveDate,
    pub requested_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSessionRequest {
    #[validate(length(min = 1, message = "Please choose a teacher."))]
    pub teacher_id: String,
    pub teacher_name: String,
    #[validate(length(min = 3, max = 120, message = "The topic must be between 3 and 120 characters."))]
    pub topic: String,
    #[validate(length(min = 1, message = "Please choose a subject."))]
    pub subject: String,
    #[validate(length(max = 1000, message = "Keep your notes under 1000 characters."))]
    pub notes: Option<String>,
    pub requested_date: NaiveDate,
    pub requested_time: NaiveTime,
    #[validate(range(min = 15, max = 240, message = "Sessions last between 15 and 240 minutes."))]
    pub duration_minutes: i32,
}

impl NewSessionRequest {
    pub fn into_request(self, id: String, client_id: &str, now: DateTime<Utc>) -> SessionRequest {
        SessionRequest {
            id,
            client_id: client_id.to_string(),
            teacher_id: self.teacher_id,
            teacher_name: self.teacher_name,
            topic: self.topic.trim().to_string(),
            subject: self.subject,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            requested_date: self.requested_date,
            requested_time: self.requested_time,
            duration_minutes: self.duration_minutes,
            status: RequestStatus::Pending,
            created_at: now,
        }
    }
}
