use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::listing::{FilterState, Page};
use crate::models::{NewSessionRequest, RequestStatus, SessionRequest};
use crate::notify::{self, Notification, Notifier};
use crate::repository::SessionRequestRepository;
use crate::wizard::FieldErrors;

/// A teacher's answer to an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

pub struct SessionRequestService {
    requests: Arc<dyn SessionRequestRepository>,
    notifier: Arc<dyn Notifier>,
}

impl SessionRequestService {
    pub fn new(requests: Arc<dyn SessionRequestRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { requests, notifier }
    }

    pub async fn list(
        &self,
        client_id: &str,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<SessionRequest>, AppError> {
        self.requests.query(client_id, state, today, per_page).await
    }

    pub async fn create(
        &self,
        client_id: &str,
        new: NewSessionRequest,
        now: DateTime<Utc>,
    ) -> Result<SessionRequest, AppError> {
        let mut errors = match new.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        if new.requested_date < now.date_naive() {
            errors.add("requested_date", "Please pick a date that is not in the past.");
        }
        errors.into_result()?;

        let request = new.into_request(Uuid::new_v4().to_string(), client_id, now);
        let request = self.requests.create(request).await?;
        info!("{} requested a session with {}", client_id, request.teacher_id);

        notify::send(
            self.notifier.as_ref(),
            Notification::success(
                "Request sent",
                format!("{} will get back to you soon.", request.teacher_name),
            )
            .with_redirect("/me/session-requests"),
        )
        .await;
        Ok(request)
    }

    /// Withdraws a request that is still pending or under review.
    pub async fn cancel(&self, client_id: &str, id: &str) -> Result<SessionRequest, AppError> {
        let mut request = self.find(id).await?;
        if request.client_id != client_id {
            return self.deny(client_id, id).await;
        }
        if !request.status.is_open() {
            return Err(AppError::Conflict(format!(
                "a {} request cannot be cancelled",
                request.status
            )));
        }
        request.status = RequestStatus::Cancelled;
        let request = self.requests.update(&request).await?;
        info!("session request {} cancelled", id);

        notify::send(
            self.notifier.as_ref(),
            Notification::info("Request cancelled", format!("\"{}\" was withdrawn.", request.topic)),
        )
        .await;
        Ok(request)
    }

    /// Approves or rejects an open request addressed to `teacher_id`.
    pub async fn review(
        &self,
        teacher_id: &str,
        id: &str,
        decision: ReviewDecision,
    ) -> Result<SessionRequest, AppError> {
        let mut request = self.find(id).await?;
        if request.teacher_id != teacher_id {
            return self.deny(teacher_id, id).await;
        }
        if !request.status.is_open() {
            return Err(AppError::Conflict(format!(
                "a {} request cannot be reviewed",
                request.status
            )));
        }
        request.status = match decision {
            ReviewDecision::Approve => RequestStatus::Approved,
            ReviewDecision::Reject => RequestStatus::Rejected,
        };
        let request = self.requests.update(&request).await?;
        info!("session request {} is now {}", id, request.status);
        Ok(request)
    }

    async fn find(&self, id: &str) -> Result<SessionRequest, AppError> {
        self.requests.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn deny(&self, actor: &str, id: &str) -> Result<SessionRequest, AppError> {
        warn!("{} tried to modify session request {}", actor, id);
        notify::send(self.notifier.as_ref(), Notification::denied()).await;
        Err(AppError::Forbidden)
    }
}
