use std::sync::Arc;

use chrono::NaiveDate;
use marketplace::error::AppError;
use marketplace::models::{CourseLevel, CourseStatus, CurriculumModule};
use marketplace::notify::{NotificationKind, RecordingNotifier};
use marketplace::repository::{CourseRepository, MemoryStore};
use marketplace::services::CourseService;
use marketplace::storage::MemoryStorage;
use marketplace::wizard::course::{BasicsStep, CurriculumStep, ReviewStep, ScheduleStep};
use marketplace::wizard::{CourseDraft, Wizard};

fn date(s: &str) -> Option<NaiveDate> {
    s.parse().ok()
}

fn basics() -> BasicsStep {
    BasicsStep {
        title: "Sourdough at Home".to_string(),
        description: "Starters, hydration and shaping for everyday bread.".to_string(),
        category: "cooking".to_string(),
        level: Some(CourseLevel::Beginner),
    }
}

fn complete_draft() -> CourseDraft {
    CourseDraft {
        basics: basics(),
        curriculum: CurriculumStep {
            modules: vec![CurriculumModule {
                title: "Starter".to_string(),
                lessons: vec!["Feeding".to_string(), "Timing".to_string()],
            }],
            learning_outcomes: vec!["Bake a loaf".to_string()],
            prerequisites: vec![],
        },
        schedule: ScheduleStep {
            price: 35.0,
            sale_price: None,
            start_date: date("2025-03-10"),
            end_date: date("2025-03-31"),
            max_students: 12,
            duration: "3 weeks".to_string(),
        },
        review: ReviewStep {
            terms_accepted: true,
        },
    }
}

#[test]
fn test_wizard_gates_each_step() {
    let mut wizard = Wizard::new(CourseDraft::default());
    assert_eq!(wizard.current_step(), 1);
    assert_eq!(wizard.total_steps(), 4);

    assert!(!wizard.next());
    assert_eq!(wizard.current_step(), 1);
    assert!(wizard.errors().has("title"));
    assert!(wizard.errors().has("level"));
    // Later steps are not checked yet.
    assert!(!wizard.errors().has("max_students"));

    wizard.form_mut().basics = basics();
    assert!(wizard.next());
    assert_eq!(wizard.current_step(), 2);
    assert!(wizard.errors().is_empty());

    assert!(!wizard.next());
    assert!(wizard.errors().has("modules"));

    wizard.back();
    assert_eq!(wizard.current_step(), 1);
    assert!(wizard.errors().is_empty());
    wizard.back();
    assert_eq!(wizard.current_step(), 1);
}

#[test]
fn test_submit_jumps_to_first_failing_step() {
    let mut draft = complete_draft();
    draft.schedule.end_date = date("2025-03-01");
    draft.review.terms_accepted = false;

    let mut wizard = Wizard::new(draft);
    let errors = wizard.submit().unwrap_err();

    assert_eq!(wizard.current_step(), 3);
    assert!(errors.has("end_date"));
    assert!(!errors.has("terms_accepted"));
}

#[tokio::test]
async fn test_end_before_start_is_never_persisted() {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let service = CourseService::new(store.clone(), Arc::new(MemoryStorage::new()), notifier.clone());

    let mut draft = complete_draft();
    draft.schedule.start_date = date("2025-04-10");
    draft.schedule.end_date = date("2025-04-01");

    let err = service
        .create_from_wizard("teacher-1", "Sarah Johnson", &draft, None)
        .await
        .unwrap_err();

    match err {
        AppError::Validation(fields) => {
            assert_eq!(
                fields.get("end_date"),
                Some(&["The end date must be after the start date.".to_string()][..])
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(CourseRepository::all(store.as_ref()).await.unwrap().is_empty());
    assert_eq!(notifier.last().unwrap().kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_completed_wizard_becomes_teacher_draft() {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let service = CourseService::new(store.clone(), Arc::new(MemoryStorage::new()), notifier.clone());

    let mut wizard = Wizard::new(complete_draft());
    while wizard.next() {}
    assert!(wizard.is_last_step());
    let draft = wizard.submit().unwrap().clone();

    let course = service
        .create_from_wizard("teacher-1", "Sarah Johnson", &draft, None)
        .await
        .unwrap();

    assert_eq!(course.status, CourseStatus::Draft);
    assert_eq!(course.lesson_count, 2);
    assert_eq!(course.teacher_id, "teacher-1");

    let listed = CourseRepository::for_teacher(store.as_ref(), "teacher-1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(
        notifier.last().unwrap().redirect,
        Some(format!("/teacher/courses/{}", course.id))
    );
}
