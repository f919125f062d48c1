//! Data-access seams. Services only see these traits, so the same list
//! pipeline runs against the demo fixtures or the SQLite store.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::listing::{self, FilterState, Page};
use crate::models::{
    ClientProfile, Course, Enrollment, LearningSession, NewCourse, SessionRequest, TeacherProfile,
};
use crate::views::{CourseCatalog, MyEnrollments, MySessionRequests, MySessions, TeacherCourses};

pub use memory::MemoryStore;

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// `None` when no course has this id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Course>, AppError>;
    /// Every course, in insertion order.
    async fn all(&self) -> Result<Vec<Course>, AppError>;
    async fn for_teacher(&self, teacher_id: &str) -> Result<Vec<Course>, AppError>;
    async fn create(&self, new: NewCourse) -> Result<Course, AppError>;
    async fn update(&self, course: &Course) -> Result<Course, AppError>;
    /// Bumps the enrolled-student counter without touching any other column.
    async fn increment_students(&self, id: &str) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    async fn query(
        &self,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<Course>, AppError> {
        let candidates = self.all().await?;
        Ok(listing::run::<CourseCatalog>(candidates, state, today, per_page))
    }

    async fn query_for_teacher(
        &self,
        teacher_id: &str,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<Course>, AppError> {
        let candidates = self.for_teacher(teacher_id).await?;
        Ok(listing::run::<TeacherCourses>(candidates, state, today, per_page))
    }
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Enrollment>, AppError>;
    async fn for_user(&self, user_id: &str) -> Result<Vec<Enrollment>, AppError>;
    async fn create(&self, enrollment: Enrollment) -> Result<Enrollment, AppError>;
    async fn update(&self, enrollment: &Enrollment) -> Result<Enrollment, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    async fn query(
        &self,
        user_id: &str,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<Enrollment>, AppError> {
        let candidates = self.for_user(user_id).await?;
        Ok(listing::run::<MyEnrollments>(candidates, state, today, per_page))
    }
}

#[async_trait]
pub trait SessionRequestRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<SessionRequest>, AppError>;
    async fn for_client(&self, client_id: &str) -> Result<Vec<SessionRequest>, AppError>;
    async fn create(&self, request: SessionRequest) -> Result<SessionRequest, AppError>;
    async fn update(&self, request: &SessionRequest) -> Result<SessionRequest, AppError>;

    async fn query(
        &self,
        client_id: &str,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<SessionRequest>, AppError> {
        let candidates = self.for_client(client_id).await?;
        Ok(listing::run::<MySessionRequests>(candidates, state, today, per_page))
    }
}

#[async_trait]
pub trait LearningSessionRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<LearningSession>, AppError>;
    async fn for_client(&self, client_id: &str) -> Result<Vec<LearningSession>, AppError>;

    async fn query(
        &self,
        client_id: &str,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<LearningSession>, AppError> {
        let candidates = self.for_client(client_id).await?;
        Ok(listing::run::<MySessions>(candidates, state, today, per_page))
    }
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_client(&self, user_id: &str) -> Result<Option<ClientProfile>, AppError>;
    async fn save_client(&self, profile: &ClientProfile) -> Result<(), AppError>;
    async fn find_teacher(&self, user_id: &str) -> Result<Option<TeacherProfile>, AppError>;
    async fn save_teacher(&self, profile: &TeacherProfile) -> Result<(), AppError>;
}
