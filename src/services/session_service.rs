use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::AppError;
use crate::listing::{FilterState, Page};
use crate::models::LearningSession;
use crate::repository::LearningSessionRepository;

pub struct SessionService {
    sessions: Arc<dyn LearningSessionRepository>,
}

impl SessionService {
    pub fn new(sessions: Arc<dyn LearningSessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn list(
        &self,
        client_id: &str,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<LearningSession>, AppError> {
        self.sessions.query(client_id, state, today, per_page).await
    }

    pub async fn get(&self, client_id: &str, id: &str) -> Result<LearningSession, AppError> {
        let session = self.sessions.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if session.client_id != client_id {
            return Err(AppError::Forbidden);
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::DEMO_CLIENT_ID;
    use crate::repository::MemoryStore;

    #[tokio::test]
    async fn test_upcoming_is_default_tab() {
        let service = SessionService::new(Arc::new(MemoryStore::with_fixtures()));
        let today = "2025-03-06".parse().unwrap();

        let page = service
            .list(DEMO_CLIENT_ID, &FilterState::default(), today, 10)
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["session-5", "session-1", "session-3"]);
    }

    #[tokio::test]
    async fn test_get_checks_owner() {
        let service = SessionService::new(Arc::new(MemoryStore::with_fixtures()));
        assert!(service.get(DEMO_CLIENT_ID, "session-2").await.is_ok());
        assert!(matches!(
            service.get("client-2", "session-2").await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            service.get(DEMO_CLIENT_ID, "session-9").await,
            Err(AppError::NotFound)
        ));
    }
}
