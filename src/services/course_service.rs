use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::listing::{FilterState, Page};
use crate::models::Course;
use crate::notify::{self, Notification, Notifier};
use crate::repository::CourseRepository;
use crate::storage::Storage;
use crate::wizard::{CourseDraft, validate_all};

/// An image picked in the last wizard step.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            courses,
            storage,
            notifier,
        }
    }

    pub async fn browse(
        &self,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<Course>, AppError> {
        self.courses.query(state, today, per_page).await
    }

    pub async fn get(&self, id: &str) -> Result<Course, AppError> {
        self.courses.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn teacher_courses(
        &self,
        teacher_id: &str,
        state: &FilterState,
        today: NaiveDate,
        per_page: u32,
    ) -> Result<Page<Course>, AppError> {
        self.courses
            .query_for_teacher(teacher_id, state, today, per_page)
            .await
    }

    /// Persists a finished wizard as a draft course. A failed cover upload is
    /// logged and the course is kept without a cover.
    pub async fn create_from_wizard(
        &self,
        teacher_id: &str,
        instructor: &str,
        draft: &CourseDraft,
        cover: Option<CoverUpload>,
    ) -> Result<Course, AppError> {
        if let Err(errors) = validate_all(draft) {
            notify::send(
                self.notifier.as_ref(),
                Notification::error("Course not saved", "Please fix the highlighted fields."),
            )
            .await;
            return Err(errors.into());
        }

        let mut course = self
            .courses
            .create(draft.to_new_course(teacher_id, instructor))
            .await?;
        info!("teacher {} created course {}", teacher_id, course.id);

        if let Some(cover) = cover {
            match self.attach_cover(&course, cover).await {
                Ok(updated) => course = updated,
                Err(e) => warn!("cover upload for course {} failed: {}", course.id, e),
            }
        }

        notify::send(
            self.notifier.as_ref(),
            Notification::success("Course created", format!("\"{}\" was saved as a draft.", course.title))
                .with_redirect(format!("/teacher/courses/{}", course.id)),
        )
        .await;
        Ok(course)
    }

    async fn attach_cover(&self, course: &Course, cover: CoverUpload) -> Result<Course, AppError> {
        let name = Path::new(&cover.file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::Storage(format!("invalid file name {:?}", cover.file_name)))?;
        let key = cover_key(&course.id, name);
        self.storage.put(&key, &cover.bytes).await?;

        let mut updated = course.clone();
        updated.cover_image = Some(self.storage.url(&key));
        self.courses.update(&updated).await
    }

    /// Flips a course between active and inactive.
    pub async fn toggle_status(&self, actor: &str, id: &str) -> Result<Course, AppError> {
        let mut course = self.owned_course(actor, id).await?;
        course.status = course.toggled_status();
        let course = self.courses.update(&course).await?;
        info!("course {} is now {}", course.id, course.status);

        notify::send(
            self.notifier.as_ref(),
            Notification::success(
                "Status updated",
                format!("\"{}\" is now {}.", course.title, course.status),
            ),
        )
        .await;
        Ok(course)
    }

    pub async fn delete(&self, actor: &str, id: &str) -> Result<(), AppError> {
        let course = self.owned_course(actor, id).await?;
        if !self.courses.delete(&course.id).await? {
            return Err(AppError::NotFound);
        }
        info!("course {} deleted by {}", course.id, actor);

        // Covers are stored under the course id; the URL ends in the file name.
        if let Some(name) = course.cover_image.as_deref().and_then(|url| url.rsplit('/').next()) {
            let key = cover_key(&course.id, name);
            if let Err(e) = self.storage.delete(&key).await {
                warn!("could not remove cover {} of course {}: {}", key, course.id, e);
            }
        }

        notify::send(
            self.notifier.as_ref(),
            Notification::success("Course deleted", format!("\"{}\" was removed.", course.title))
                .with_redirect("/teacher/courses"),
        )
        .await;
        Ok(())
    }

    async fn owned_course(&self, actor: &str, id: &str) -> Result<Course, AppError> {
        let course = self.get(id).await?;
        if !course.is_owned_by(actor) {
            warn!("{} tried to modify course {} owned by {}", actor, id, course.teacher_id);
            notify::send(self.notifier.as_ref(), Notification::denied()).await;
            return Err(AppError::Forbidden);
        }
        Ok(course)
    }
}

fn cover_key(course_id: &str, file_name: &str) -> String {
    format!("courses/{}/{}", course_id, file_name)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::CourseStatus;
    use crate::notify::{NotificationKind, RecordingNotifier};
    use crate::repository::MemoryStore;
    use crate::storage::MemoryStorage;
    use crate::wizard::course::tests::valid_draft;

    struct BrokenStorage;

    #[async_trait]
    impl Storage for BrokenStorage {
        async fn put(&self, _: &str, _: &[u8]) -> Result<(), AppError> {
            Err(AppError::Storage("disk full".to_string()))
        }
        async fn get(&self, _: &str) -> Result<Option<Vec<u8>>, AppError> {
            Ok(None)
        }
        async fn delete(&self, _: &str) -> Result<bool, AppError> {
            Err(AppError::Storage("read-only".to_string()))
        }
        fn url(&self, path: &str) -> String {
            path.to_string()
        }
    }

    fn service(storage: Arc<dyn Storage>) -> (CourseService, Arc<MemoryStore>, Arc<RecordingNotifier>) {
        let store = Arc::new(MemoryStore::with_fixtures());
        let notifier = Arc::new(RecordingNotifier::new());
        let service = CourseService::new(store.clone(), storage, notifier.clone());
        (service, store, notifier)
    }

    fn cover() -> CoverUpload {
        CoverUpload {
            file_name: "cover.png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn test_create_from_wizard_saves_draft_with_cover() {
        let storage = Arc::new(MemoryStorage::new());
        let (service, store, notifier) = service(storage.clone());

        let course = service
            .create_from_wizard("teacher-7", "Grace Hopper", &valid_draft(), Some(cover()))
            .await
            .unwrap();

        assert_eq!(course.status, CourseStatus::Draft);
        let key = format!("courses/{}/cover.png", course.id);
        assert_eq!(course.cover_image, Some(storage.url(&key)));
        assert_eq!(storage.get(&key).await.unwrap(), Some(vec![1, 2, 3]));

        let stored = CourseRepository::find_by_id(store.as_ref(), &course.id).await.unwrap();
        assert_eq!(stored.unwrap().cover_image, course.cover_image);

        let note = notifier.last().unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(note.redirect, Some(format!("/teacher/courses/{}", course.id)));
    }

    #[tokio::test]
    async fn test_failed_cover_upload_keeps_course() {
        let (service, store, notifier) = service(Arc::new(BrokenStorage));

        let course = service
            .create_from_wizard("teacher-7", "Grace Hopper", &valid_draft(), Some(cover()))
            .await
            .unwrap();

        assert!(course.cover_image.is_none());
        assert!(CourseRepository::find_by_id(store.as_ref(), &course.id).await.unwrap().is_some());
        assert_eq!(notifier.last().unwrap().kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_never_persisted() {
        let (service, store, _) = service(Arc::new(MemoryStorage::new()));
        let before = CourseRepository::all(store.as_ref()).await.unwrap().len();

        let mut draft = valid_draft();
        draft.schedule.end_date = draft.schedule.start_date.and_then(|d| d.pred_opt());

        let err = service
            .create_from_wizard("teacher-7", "Grace Hopper", &draft, None)
            .await
            .unwrap_err();
        match err {
            AppError::Validation(fields) => assert!(fields.has("end_date")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(CourseRepository::all(store.as_ref()).await.unwrap().len(), before);
    }

    #[tokio::test]
    async fn test_missing_course_is_not_found() {
        let (service, _, _) = service(Arc::new(MemoryStorage::new()));
        assert!(matches!(service.get("nope").await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_toggle_by_owner() {
        let (service, _, _) = service(Arc::new(MemoryStorage::new()));
        let course = service.toggle_status("teacher-1", "course-1").await.unwrap();
        assert_eq!(course.status, CourseStatus::Inactive);
        let course = service.toggle_status("teacher-1", "course-1").await.unwrap();
        assert_eq!(course.status, CourseStatus::Active);
    }

    #[tokio::test]
    async fn test_foreign_course_is_forbidden_and_unchanged() {
        let (service, store, notifier) = service(Arc::new(MemoryStorage::new()));

        let err = service.toggle_status("teacher-2", "course-1").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        let err = service.delete("teacher-2", "course-1").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let course = CourseRepository::find_by_id(store.as_ref(), "course-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(course.status, CourseStatus::Active);
        assert_eq!(notifier.sent().len(), 2);
        assert!(notifier.sent().iter().all(|n| n.kind == NotificationKind::Error));
    }

    #[tokio::test]
    async fn test_owner_can_delete() {
        let (service, store, _) = service(Arc::new(MemoryStorage::new()));
        service.delete("teacher-1", "course-1").await.unwrap();
        assert!(CourseRepository::find_by_id(store.as_ref(), "course-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_a_course_removes_its_cover() {
        let storage = Arc::new(MemoryStorage::new());
        let (service, _, _) = service(storage.clone());
        let course = service
            .create_from_wizard("teacher-7", "Grace Hopper", &valid_draft(), Some(cover()))
            .await
            .unwrap();
        let key = format!("courses/{}/cover.png", course.id);
        assert!(storage.get(&key).await.unwrap().is_some());

        service.delete("teacher-7", &course.id).await.unwrap();

        assert_eq!(storage.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cover_cleanup_failure_still_deletes_course() {
        let (service, store, _) = service(Arc::new(BrokenStorage));
        let mut course = CourseRepository::find_by_id(store.as_ref(), "course-1")
            .await
            .unwrap()
            .unwrap();
        course.cover_image = Some("/storage/courses/course-1/cover.png".to_string());
        CourseRepository::update(store.as_ref(), &course).await.unwrap();

        service.delete("teacher-1", "course-1").await.unwrap();
        assert!(CourseRepository::find_by_id(store.as_ref(), "course-1").await.unwrap().is_none());
    }
}
