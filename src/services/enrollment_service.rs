use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::listing::{FilterState, Page};
use crate::models::{CourseStatus, Enrollment, EnrollmentStatus};
use crate::notify::{self, Notification, Notifier};
use crate::repository::{CourseRepository, EnrollmentRepository};

pub struct EnrollmentService {
    enrollments: Arc<dyn EnrollmentRepository>,
    courses: Arc<dyn CourseRepository>,
    notifier: Arc<dyn Notifier>,
}

impl EnrollmentService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        courses: Arc<dyn CourseRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            enrollments,
            courses,
            notifier,
        }
    }

    pub async fn list(
        &self,
        user_id: &str,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<Enrollment>, AppError> {
        self.enrollments.query(user_id, state, today, per_page).await
    }

    /// Enrolls `user_id` in an active course. A second enrollment in the same
    /// course is a conflict. If the student counter cannot be bumped the new
    /// enrollment is removed again.
    pub async fn enroll(
        &self,
        user_id: &str,
        course_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Enrollment, AppError> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if course.status != CourseStatus::Active {
            return Err(AppError::BadRequest(format!(
                "course {} is not open for enrollment",
                course_id
            )));
        }

        let existing = self.enrollments.for_user(user_id).await?;
        if existing.iter().any(|e| e.course_id == course_id) {
            return Err(AppError::Conflict(format!(
                "already enrolled in course {}",
                course_id
            )));
        }

        let enrollment = self
            .enrollments
            .create(Enrollment {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                course_id: course.id.clone(),
                course_title: course.title.clone(),
                instructor: course.instructor.clone(),
                category: course.category.clone(),
                progress: 0,
                status: EnrollmentStatus::InProgress,
                enrolled_at: now,
                last_accessed_at: now,
                certificate_date: None,
            })
            .await?;

        if let Err(e) = self.courses.increment_students(course_id).await {
            warn!("rolling back enrollment {}: {}", enrollment.id, e);
            self.enrollments.delete(&enrollment.id).await?;
            return Err(e);
        }
        info!("{} enrolled in course {}", user_id, course_id);

        notify::send(
            self.notifier.as_ref(),
            Notification::success("Enrolled", format!("You are now enrolled in \"{}\".", course.title))
                .with_action("Start learning", format!("/courses/{}", course.id))
                .with_redirect("/me/enrollments"),
        )
        .await;
        Ok(enrollment)
    }

    pub async fn update_progress(
        &self,
        user_id: &str,
        id: &str,
        progress: i32,
        now: DateTime<Utc>,
    ) -> Result<Enrollment, AppError> {
        let mut enrollment = self.owned(user_id, id).await?;
        if enrollment.status == EnrollmentStatus::Archived {
            return Err(AppError::Conflict("archived enrollments cannot change".to_string()));
        }
        let was_completed = enrollment.status == EnrollmentStatus::Completed;
        enrollment.record_progress(progress, now);
        let enrollment = self.enrollments.update(&enrollment).await?;

        if !was_completed && enrollment.status == EnrollmentStatus::Completed {
            info!("{} completed course {}", user_id, enrollment.course_id);
            notify::send(
                self.notifier.as_ref(),
                Notification::success(
                    "Course completed",
                    format!("Your certificate for \"{}\" is ready.", enrollment.course_title),
                ),
            )
            .await;
        }
        Ok(enrollment)
    }

    pub async fn pause(&self, user_id: &str, id: &str, now: DateTime<Utc>) -> Result<Enrollment, AppError> {
        self.transition(user_id, id, EnrollmentStatus::InProgress, EnrollmentStatus::Paused, now)
            .await
    }

    pub async fn resume(&self, user_id: &str, id: &str, now: DateTime<Utc>) -> Result<Enrollment, AppError> {
        self.transition(user_id, id, EnrollmentStatus::Paused, EnrollmentStatus::InProgress, now)
            .await
    }

    pub async fn archive(&self, user_id: &str, id: &str) -> Result<Enrollment, AppError> {
        let mut enrollment = self.owned(user_id, id).await?;
        enrollment.status = EnrollmentStatus::Archived;
        let enrollment = self.enrollments.update(&enrollment).await?;
        info!("enrollment {} archived", id);
        Ok(enrollment)
    }

    async fn transition(
        &self,
        user_id: &str,
        id: &str,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
        now: DateTime<Utc>,
    ) -> Result<Enrollment, AppError> {
        let mut enrollment = self.owned(user_id, id).await?;
        if enrollment.status != from {
            return Err(AppError::Conflict(format!(
                "enrollment is {}, expected {}",
                enrollment.status, from
            )));
        }
        enrollment.status = to;
        enrollment.last_accessed_at = now;
        self.enrollments.update(&enrollment).await
    }

    async fn owned(&self, user_id: &str, id: &str) -> Result<Enrollment, AppError> {
        let enrollment = self
            .enrollments
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;
        if enrollment.user_id != user_id {
            warn!("{} tried to modify enrollment {}", user_id, id);
            notify::send(self.notifier.as_ref(), Notification::denied()).await;
            return Err(AppError::Forbidden);
        }
        Ok(enrollment)
    }
}
