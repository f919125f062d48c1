use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;
use crate::listing::pipeline::week_bounds;
use crate::listing::projector::percent;
use crate::models::{EnrollmentStatus, SessionStatus};
use crate::repository::{EnrollmentRepository, LearningSessionRepository, SessionRequestRepository};

/// Headline numbers for a client's home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub enrolled: usize,
    pub active: usize,
    pub completed: usize,
    pub average_progress: i32,
    pub sessions_this_week: usize,
    pub pending_requests: usize,
}

pub struct DashboardService {
    enrollments: Arc<dyn EnrollmentRepository>,
    sessions: Arc<dyn LearningSessionRepository>,
    requests: Arc<dyn SessionRequestRepository>,
}

impl DashboardService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        sessions: Arc<dyn LearningSessionRepository>,
        requests: Arc<dyn SessionRequestRepository>,
    ) -> Self {
        Self {
            enrollments,
            sessions,
            requests,
        }
    }

    /// Archived enrollments and cancelled sessions do not count.
    pub async fn summary(&self, user_id: &str, today: NaiveDate) -> Result<DashboardSummary, AppError> {
        let enrollments: Vec<_> = self
            .enrollments
            .for_user(user_id)
            .await?
            .into_iter()
            .filter(|e| e.status != EnrollmentStatus::Archived)
            .collect();

        let active = enrollments
            .iter()
            .filter(|e| matches!(e.status, EnrollmentStatus::InProgress | EnrollmentStatus::Paused))
            .count();
        let completed = enrollments
            .iter()
            .filter(|e| e.status == EnrollmentStatus::Completed)
            .count();
        let progress: i32 = enrollments.iter().map(|e| e.progress).sum();
        let average_progress = percent(progress as f64, (enrollments.len() * 100) as f64);

        let (monday, sunday) = week_bounds(today);
        let sessions_this_week = self
            .sessions
            .for_client(user_id)
            .await?
            .iter()
            .filter(|s| s.status != SessionStatus::Cancelled)
            .filter(|s| (monday..=sunday).contains(&s.scheduled_at.date_naive()))
            .count();

        let pending_requests = self
            .requests
            .for_client(user_id)
            .await?
            .iter()
            .filter(|r| r.status.is_open())
            .count();

        Ok(DashboardSummary {
            enrolled: enrollments.len(),
            active,
            completed,
            average_progress,
            sessions_this_week,
            pending_requests,
        })
    }
}
