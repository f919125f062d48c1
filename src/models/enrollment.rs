use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


string_enum! {
    EnrollmentStatus("enrollment status") {
        InProgress => "in_progress",
        Paused => "paused",
        Completed => "completed",
        Archived => "archived",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub course_title: String,
    pub instructor: String,
    pub category: String,
    pub progress: i32,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub certificate_date: Option<DateTime<Utc>>,
}

impl Enrollment {
    /// Records progress, clamped to `0..=100`. Reaching 100 completes the
    /// enrollment and stamps the certificate date once.
    pub fn record_progress(&mut self, progress: i32, now: DateTime<Utc>) {
        self.progress = clamp_progress(progress);
        self.last_accessed_at = now;
        if self.progress == 100 {
            self.status = EnrollmentStatus::Completed;
            self.certificate_date.get_or_insert(now);
        } else if self.status == EnrollmentStatus::Completed {
            self.status = EnrollmentStatus::InProgress;
            self.certificate_date = None;
        }
    }
}

pub fn clamp_progress(progress: i32) -> i32 {
    progress.clamp(0, 100)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEnrollment {
    pub course_id: String,
}
