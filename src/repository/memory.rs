use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    CourseRepository, EnrollmentRepository, LearningSessionRepository, ProfileRepository,
    SessionRequestRepository,
};
use crate::error::AppError;
use crate::fixtures;
use crate::models::{
    ClientProfile, Course, Enrollment, LearningSession, NewCourse, SessionRequest, TeacherProfile,
};

/// Vector-backed store. Records keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    courses: RwLock<Vec<Course>>,
    enrollments: RwLock<Vec<Enrollment>>,
    requests: RwLock<Vec<SessionRequest>>,
    sessions: RwLock<Vec<LearningSession>>,
    clients: RwLock<Vec<ClientProfile>>,
    teachers: RwLock<Vec<TeacherProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the demo catalog.
    pub fn with_fixtures() -> Self {
        Self {
            courses: RwLock::new(fixtures::courses()),
            enrollments: RwLock::new(fixtures::enrollments()),
            requests: RwLock::new(fixtures::session_requests()),
            sessions: RwLock::new(fixtures::sessions()),
            clients: RwLock::default(),
            teachers: RwLock::default(),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, AppError> {
    lock.read().map_err(|_| AppError::InternalServerError)
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, AppError> {
    lock.write().map_err(|_| AppError::InternalServerError)
}

/// Replaces the record with the same id, or reports it missing.
fn replace<T: Clone>(
    items: &mut [T],
    item: &T,
    same: impl Fn(&T, &T) -> bool,
) -> Result<T, AppError> {
    let slot = items
        .iter_mut()
        .find(|existing| same(existing, item))
        .ok_or(AppError::NotFound)?;
    *slot = item.clone();
    Ok(item.clone())
}

fn remove<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Course>, AppError> {
        Ok(read(&self.courses)?.iter().find(|c| c.id == id).cloned())
    }

    async fn all(&self) -> Result<Vec<Course>, AppError> {
        Ok(read(&self.courses)?.clone())
    }

    async fn for_teacher(&self, teacher_id: &str) -> Result<Vec<Course>, AppError> {
        Ok(read(&self.courses)?
            .iter()
            .filter(|c| c.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn create(&self, new: NewCourse) -> Result<Course, AppError> {
        let course = new.into_course(Uuid::new_v4().to_string(), Utc::now());
        write(&self.courses)?.push(course.clone());
        Ok(course)
    }

    async fn update(&self, course: &Course) -> Result<Course, AppError> {
        let mut updated = course.clone();
        updated.updated_at = Utc::now();
        replace(&mut *write(&self.courses)?, &updated, |a, b| a.id == b.id)
    }

    async fn increment_students(&self, id: &str) -> Result<(), AppError> {
        let mut courses = write(&self.courses)?;
        let course = courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(AppError::NotFound)?;
        course.students_count += 1;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(remove(&mut *write(&self.courses)?, |c| c.id == id))
    }
}

#[async_trait]
impl EnrollmentRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Enrollment>, AppError> {
        Ok(read(&self.enrollments)?.iter().find(|e| e.id == id).cloned())
    }

    async fn for_user(&self, user_id: &str) -> Result<Vec<Enrollment>, AppError> {
        Ok(read(&self.enrollments)?
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, enrollment: Enrollment) -> Result<Enrollment, AppError> {
        write(&self.enrollments)?.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn update(&self, enrollment: &Enrollment) -> Result<Enrollment, AppError> {
        replace(&mut *write(&self.enrollments)?, enrollment, |a, b| a.id == b.id)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(remove(&mut *write(&self.enrollments)?, |e| e.id == id))
    }
}

#[async_trait]
impl SessionRequestRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<SessionRequest>, AppError> {
        Ok(read(&self.requests)?.iter().find(|r| r.id == id).cloned())
    }

    async fn for_client(&self, client_id: &str) -> Result<Vec<SessionRequest>, AppError> {
        Ok(read(&self.requests)?
            .iter()
            .filter(|r| r.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn create(&self, request: SessionRequest) -> Result<SessionRequest, AppError> {
        write(&self.requests)?.push(request.clone());
        Ok(request)
    }

    async fn update(&self, request: &SessionRequest) -> Result<SessionRequest, AppError> {
        replace(&mut *write(&self.requests)?, request, |a, b| a.id == b.id)
    }
}

#[async_trait]
impl LearningSessionRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<LearningSession>, AppError> {
        Ok(read(&self.sessions)?.iter().find(|s| s.id == id).cloned())
    }

    async fn for_client(&self, client_id: &str) -> Result<Vec<LearningSession>, AppError> {
        Ok(read(&self.sessions)?
            .iter()
            .filter(|s| s.client_id == client_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_client(&self, user_id: &str) -> Result<Option<ClientProfile>, AppError> {
        Ok(read(&self.clients)?.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn save_client(&self, profile: &ClientProfile) -> Result<(), AppError> {
        let mut clients = write(&self.clients)?;
        match clients.iter_mut().find(|p| p.user_id == profile.user_id) {
            Some(existing) => *existing = profile.clone(),
            None => clients.push(profile.clone()),
        }
        Ok(())
    }

    async fn find_teacher(&self, user_id: &str) -> Result<Option<TeacherProfile>, AppError> {
        Ok(read(&self.teachers)?.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn save_teacher(&self, profile: &TeacherProfile) -> Result<(), AppError> {
        let mut teachers = write(&self.teachers)?;
        match teachers.iter_mut().find(|p| p.user_id == profile.user_id) {
            Some(existing) => *existing = profile.clone(),
            None => teachers.push(profile.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn unknown_ids_are_absent_not_errors() {
        let store: Arc<dyn CourseRepository> = Arc::new(MemoryStore::with_fixtures());
        assert_eq!(store.find_by_id("course-404").await.unwrap(), None);
        assert!(store.find_by_id("course-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn updating_a_missing_record_is_not_found() {
        let store: Arc<dyn EnrollmentRepository> = Arc::new(MemoryStore::new());
        let mut e = fixtures::enrollments().remove(0);
        e.id = "nope".to_string();
        assert!(matches!(store.update(&e).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn teacher_listing_is_scoped() {
        let store: Arc<dyn CourseRepository> = Arc::new(MemoryStore::with_fixtures());
        let mine = store.for_teacher("teacher-1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.instructor == "Sarah Johnson"));
    }

    #[tokio::test]
    async fn delete_removes_only_the_matching_record() {
        let store = MemoryStore::with_fixtures();
        let before = CourseRepository::all(&store).await.unwrap().len();

        assert!(CourseRepository::delete(&store, "course-1").await.unwrap());
        assert!(!CourseRepository::delete(&store, "course-1").await.unwrap());

        let after = CourseRepository::all(&store).await.unwrap();
        assert_eq!(after.len(), before - 1);
        assert!(after.iter().all(|c| c.id != "course-1"));

        assert!(EnrollmentRepository::delete(&store, "enrollment-1").await.unwrap());
        assert_eq!(
            EnrollmentRepository::find_by_id(&store, "enrollment-1").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn increment_students_only_touches_the_counter() {
        let store = MemoryStore::with_fixtures();
        let before = CourseRepository::find_by_id(&store, "course-8").await.unwrap().unwrap();

        store.increment_students("course-8").await.unwrap();

        let after = CourseRepository::find_by_id(&store, "course-8").await.unwrap().unwrap();
        assert_eq!(after.students_count, before.students_count + 1);
        assert_eq!(after.status, before.status);
        assert_eq!(after.updated_at, before.updated_at);
        assert!(matches!(
            store.increment_students("course-404").await,
            Err(AppError::NotFound)
        ));
    }
}
