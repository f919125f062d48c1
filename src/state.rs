use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db::SqliteStore;
use crate::notify::Notifier;
use crate::repository::{
    CourseRepository, EnrollmentRepository, LearningSessionRepository, ProfileRepository,
    SessionRequestRepository,
};
use crate::services::{
    CourseService, DashboardService, EnrollmentService, ProfileService, SessionRequestService,
    SessionService,
};
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub courses: Arc<dyn CourseRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub requests: Arc<dyn SessionRequestRepository>,
    pub sessions: Arc<dyn LearningSessionRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub storage: Arc<dyn Storage>,
    pub notifier: Arc<dyn Notifier>,
    pub per_page: u32,
}

impl AppState {
    /// Wires every repository to one SQLite store.
    pub fn new(
        db: SqlitePool,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        per_page: u32,
    ) -> Self {
        let store = Arc::new(SqliteStore::new(db.clone()));
        Self {
            db,
            courses: store.clone(),
            enrollments: store.clone(),
            requests: store.clone(),
            sessions: store.clone(),
            profiles: store,
            storage,
            notifier,
            per_page,
        }
    }

    pub fn course_service(&self) -> CourseService {
        CourseService::new(self.courses.clone(), self.storage.clone(), self.notifier.clone())
    }

    pub fn enrollment_service(&self) -> EnrollmentService {
        EnrollmentService::new(self.enrollments.clone(), self.courses.clone(), self.notifier.clone())
    }

    pub fn request_service(&self) -> SessionRequestService {
        SessionRequestService::new(self.requests.clone(), self.notifier.clone())
    }

    pub fn session_service(&self) -> SessionService {
        SessionService::new(self.sessions.clone())
    }

    pub fn dashboard_service(&self) -> DashboardService {
        DashboardService::new(self.enrollments.clone(), self.sessions.clone(), self.requests.clone())
    }

    pub fn profile_service(&self) -> ProfileService {
        ProfileService::new(self.profiles.clone(), self.storage.clone(), self.notifier.clone())
    }
}
