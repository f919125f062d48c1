use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::fixtures;
use crate::models::{
    ClientProfile, Course, CurriculumModule, Enrollment, LearningSession, NewCourse,
    ParseEnumError, SessionRequest, TeacherProfile,
};
use crate::repository::{
    CourseRepository, EnrollmentRepository, LearningSessionRepository, ProfileRepository,
    SessionRequestRepository,
};

/// SQLite-backed implementation of every repository trait.
#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Loads the demo catalog when the database has no courses yet.
    /// Returns whether anything was inserted.
    pub async fn seed_demo(&self) -> Result<bool, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.db)
            .await?;
        if count > 0 {
            return Ok(false);
        }

        for course in fixtures::courses() {
            self.insert_course(&course).await?;
        }
        for enrollment in fixtures::enrollments() {
            EnrollmentRepository::create(self, enrollment).await?;
        }
        for request in fixtures::session_requests() {
            SessionRequestRepository::create(self, request).await?;
        }
        for session in fixtures::sessions() {
            self.insert_session(&session).await?;
        }
        info!("seeded demo catalog");
        Ok(true)
    }

    async fn insert_course(&self, course: &Course) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO courses
                (id, teacher_id, title, description, price, sale_price, category, level,
                duration, lesson_count, rating, students_count, instructor, status,
                curriculum, learning_outcomes, prerequisites, start_date, end_date,
                max_students, cover_image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&course.id)
        .bind(&course.teacher_id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.price)
        .bind(course.sale_price)
        .bind(&course.category)
        .bind(course.level.as_str())
        .bind(&course.duration)
        .bind(course.lesson_count)
        .bind(course.rating)
        .bind(course.students_count)
        .bind(&course.instructor)
        .bind(course.status.as_str())
        .bind(Json(&course.curriculum))
        .bind(Json(&course.learning_outcomes))
        .bind(Json(&course.prerequisites))
        .bind(course.start_date)
        .bind(course.end_date)
        .bind(course.max_students)
        .bind(&course.cover_image)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    pub async fn insert_session(&self, session: &LearningSession) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO learning_sessions
                (id, course_id, course_title, client_id, teacher_name, title,
                scheduled_at, duration_minutes, status, recording_url, materials)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.course_id)
        .bind(&session.course_title)
        .bind(&session.client_id)
        .bind(&session.teacher_name)
        .bind(&session.title)
        .bind(session.scheduled_at)
        .bind(session.duration_minutes)
        .bind(session.status.as_str())
        .bind(&session.recording_url)
        .bind(Json(&session.materials))
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

/// Stored enum text that no longer parses means the row is corrupt.
fn corrupt(err: ParseEnumError) -> AppError {
    error!("corrupt row: {}", err);
    AppError::InternalServerError
}

#[derive(FromRow)]
struct CourseRecord {
    id: String,
    teacher_id: String,
    title: String,
    description: String,
    price: f64,
    sale_price: Option<f64>,
    category: String,
    level: String,
    duration: String,
    lesson_count: i32,
    rating: f64,
    students_count: i64,
    instructor: String,
    status: String,
    curriculum: Json<Vec<CurriculumModule>>,
    learning_outcomes: Json<Vec<String>>,
    prerequisites: Json<Vec<String>>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    max_students: i32,
    cover_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRecord {
    fn into_domain(self) -> Result<Course, AppError> {
        Ok(Course {
            id: self.id,
            teacher_id: self.teacher_id,
            title: self.title,
            description: self.description,
            price: self.price,
            sale_price: self.sale_price,
            category: self.category,
            level: self.level.parse().map_err(corrupt)?,
            duration: self.duration,
            lesson_count: self.lesson_count,
            rating: self.rating,
            students_count: self.students_count,
            instructor: self.instructor,
            status: self.status.parse().map_err(corrupt)?,
            curriculum: self.curriculum.0,
            learning_outcomes: self.learning_outcomes.0,
            prerequisites: self.prerequisites.0,
            start_date: self.start_date,
            end_date: self.end_date,
            max_students: self.max_students,
            cover_image: self.cover_image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct EnrollmentRecord {
    id: String,
    user_id: String,
    course_id: String,
    course_title: String,
    instructor: String,
    category: String,
    progress: i32,
    status: String,
    enrolled_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
    certificate_date: Option<DateTime<Utc>>,
}

impl EnrollmentRecord {
    fn into_domain(self) -> Result<Enrollment, AppError> {
        Ok(Enrollment {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            course_title: self.course_title,
            instructor: self.instructor,
            category: self.category,
            progress: self.progress,
            status: self.status.parse().map_err(corrupt)?,
            enrolled_at: self.enrolled_at,
            last_accessed_at: self.last_accessed_at,
            certificate_date: self.certificate_date,
        })
    }
}

#[derive(FromRow)]
struct SessionRequestRecord {
    id: String,
    client_id: String,
    teacher_id: String,
    teacher_name: String,
    topic: String,
    subject: String,
    notes: Option<String>,
    requested_date: NaiveDate,
    requested_time: NaiveTime,
    duration_minutes: i32,
    status: String,
    created_at: DateTime<Utc>,
}

impl SessionRequestRecord {
    fn into_domain(self) -> Result<SessionRequest, AppError> {
        Ok(SessionRequest {
            id: self.id,
            client_id: self.client_id,
            teacher_id: self.teacher_id,
            teacher_name: self.teacher_name,
            topic: self.topic,
            subject: self.subject,
            notes: self.notes,
            requested_date: self.requested_date,
            requested_time: self.requested_time,
            duration_minutes: self.duration_minutes,
            status: self.status.parse().map_err(corrupt)?,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct LearningSessionRecord {
    id: String,
    course_id: String,
    course_title: String,
    client_id: String,
    teacher_name: String,
    title: String,
    scheduled_at: DateTime<Utc>,
    duration_minutes: i32,
    status: String,
    recording_url: Option<String>,
    materials: Json<Vec<String>>,
}

impl LearningSessionRecord {
    fn into_domain(self) -> Result<LearningSession, AppError> {
        Ok(LearningSession {
            id: self.id,
            course_id: self.course_id,
            course_title: self.course_title,
            client_id: self.client_id,
            teacher_name: self.teacher_name,
            title: self.title,
            scheduled_at: self.scheduled_at,
            duration_minutes: self.duration_minutes,
            status: self.status.parse().map_err(corrupt)?,
            recording_url: self.recording_url,
            materials: self.materials.0,
        })
    }
}

#[derive(FromRow)]
struct ClientProfileRecord {
    user_id: String,
    full_name: String,
    phone: String,
    bio: Option<String>,
    subjects: Json<Vec<String>>,
    goals: String,
    availability: Json<Vec<String>>,
    completion: i32,
    approval: String,
    updated_at: DateTime<Utc>,
}

impl ClientProfileRecord {
    fn into_domain(self) -> Result<ClientProfile, AppError> {
        Ok(ClientProfile {
            user_id: self.user_id,
            full_name: self.full_name,
            phone: self.phone,
            bio: self.bio,
            subjects: self.subjects.0,
            goals: self.goals,
            availability: self.availability.0,
            completion: self.completion,
            approval: self.approval.parse().map_err(corrupt)?,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct TeacherProfileRecord {
    user_id: String,
    full_name: String,
    headline: String,
    subjects: Json<Vec<String>>,
    document_path: Option<String>,
    approval: String,
    updated_at: DateTime<Utc>,
}

impl TeacherProfileRecord {
    fn into_domain(self) -> Result<TeacherProfile, AppError> {
        Ok(TeacherProfile {
            user_id: self.user_id,
            full_name: self.full_name,
            headline: self.headline,
            subjects: self.subjects.0,
            document_path: self.document_path,
            approval: self.approval.parse().map_err(corrupt)?,
            updated_at: self.updated_at,
        })
    }
}

fn into_domain_all<R, T>(
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<T, AppError>,
) -> Result<Vec<T>, AppError> {
    rows.into_iter().map(convert).collect()
}

const COURSE_COLUMNS: &str = "id, teacher_id, title, description, price, sale_price, category, \
    level, duration, lesson_count, rating, students_count, instructor, status, curriculum, \
    learning_outcomes, prerequisites, start_date, end_date, max_students, cover_image, \
    created_at, updated_at";

#[async_trait]
impl CourseRepository for SqliteStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Course>, AppError> {
        sqlx::query_as::<_, CourseRecord>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(CourseRecord::into_domain)
        .transpose()
    }

    async fn all(&self) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query_as::<_, CourseRecord>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY rowid"
        ))
        .fetch_all(&self.db)
        .await?;
        into_domain_all(rows, CourseRecord::into_domain)
    }

    async fn for_teacher(&self, teacher_id: &str) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query_as::<_, CourseRecord>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE teacher_id = ? ORDER BY rowid"
        ))
        .bind(teacher_id)
        .fetch_all(&self.db)
        .await?;
        into_domain_all(rows, CourseRecord::into_domain)
    }

    async fn create(&self, new: NewCourse) -> Result<Course, AppError> {
        let course = new.into_course(Uuid::new_v4().to_string(), Utc::now());
        self.insert_course(&course).await?;
        Ok(course)
    }

    async fn update(&self, course: &Course) -> Result<Course, AppError> {
        let mut updated = course.clone();
        updated.updated_at = Utc::now();
        let affected = sqlx::query(
            r#"
            UPDATE courses
            SET title = ?, description = ?, price = ?, sale_price = ?, category = ?,
                level = ?, duration = ?, lesson_count = ?, rating = ?, students_count = ?,
                instructor = ?, status = ?, curriculum = ?, learning_outcomes = ?,
                prerequisites = ?, start_date = ?, end_date = ?, max_students = ?,
                cover_image = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(updated.price)
        .bind(updated.sale_price)
        .bind(&updated.category)
        .bind(updated.level.as_str())
        .bind(&updated.duration)
        .bind(updated.lesson_count)
        .bind(updated.rating)
        .bind(updated.students_count)
        .bind(&updated.instructor)
        .bind(updated.status.as_str())
        .bind(Json(&updated.curriculum))
        .bind(Json(&updated.learning_outcomes))
        .bind(Json(&updated.prerequisites))
        .bind(updated.start_date)
        .bind(updated.end_date)
        .bind(updated.max_students)
        .bind(&updated.cover_image)
        .bind(updated.updated_at)
        .bind(&updated.id)
        .execute(&self.db)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(updated)
    }

    async fn increment_students(&self, id: &str) -> Result<(), AppError> {
        let affected =
            sqlx::query("UPDATE courses SET students_count = students_count + 1 WHERE id = ?")
                .bind(id)
                .execute(&self.db)
                .await?
                .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let affected = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

const ENROLLMENT_COLUMNS: &str = "id, user_id, course_id, course_title, instructor, category, \
    progress, status, enrolled_at, last_accessed_at, certificate_date";

#[async_trait]
impl EnrollmentRepository for SqliteStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Enrollment>, AppError> {
        sqlx::query_as::<_, EnrollmentRecord>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(EnrollmentRecord::into_domain)
        .transpose()
    }

    async fn for_user(&self, user_id: &str) -> Result<Vec<Enrollment>, AppError> {
        let rows = sqlx::query_as::<_, EnrollmentRecord>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE user_id = ? ORDER BY rowid"
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        into_domain_all(rows, EnrollmentRecord::into_domain)
    }

    async fn create(&self, enrollment: Enrollment) -> Result<Enrollment, AppError> {
        sqlx::query(
            r#"
            INSERT INTO enrollments
                (id, user_id, course_id, course_title, instructor, category, progress,
                status, enrolled_at, last_accessed_at, certificate_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&enrollment.id)
        .bind(&enrollment.user_id)
        .bind(&enrollment.course_id)
        .bind(&enrollment.course_title)
        .bind(&enrollment.instructor)
        .bind(&enrollment.category)
        .bind(enrollment.progress)
        .bind(enrollment.status.as_str())
        .bind(enrollment.enrolled_at)
        .bind(enrollment.last_accessed_at)
        .bind(enrollment.certificate_date)
        .execute(&self.db)
        .await?;
        Ok(enrollment)
    }

    async fn update(&self, enrollment: &Enrollment) -> Result<Enrollment, AppError> {
        let affected = sqlx::query(
            r#"
            UPDATE enrollments
            SET progress = ?, status = ?, last_accessed_at = ?, certificate_date = ?
            WHERE id = ?
            "#,
        )
        .bind(enrollment.progress)
        .bind(enrollment.status.as_str())
        .bind(enrollment.last_accessed_at)
        .bind(enrollment.certificate_date)
        .bind(&enrollment.id)
        .execute(&self.db)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(enrollment.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let affected = sqlx::query("DELETE FROM enrollments WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

const REQUEST_COLUMNS: &str = "id, client_id, teacher_id, teacher_name, topic, subject, notes, \
    requested_date, requested_time, duration_minutes, status, created_at";

#[async_trait]
impl SessionRequestRepository for SqliteStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<SessionRequest>, AppError> {
        sqlx::query_as::<_, SessionRequestRecord>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM session_requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(SessionRequestRecord::into_domain)
        .transpose()
    }

    async fn for_client(&self, client_id: &str) -> Result<Vec<SessionRequest>, AppError> {
        let rows = sqlx::query_as::<_, SessionRequestRecord>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM session_requests WHERE client_id = ? ORDER BY rowid"
        ))
        .bind(client_id)
        .fetch_all(&self.db)
        .await?;
        into_domain_all(rows, SessionRequestRecord::into_domain)
    }

    async fn create(&self, request: SessionRequest) -> Result<SessionRequest, AppError> {
        sqlx::query(
            r#"
            INSERT INTO session_requests
                (id, client_id, teacher_id, teacher_name, topic, subject, notes,
                requested_date, requested_time, duration_minutes, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.id)
        .bind(&request.client_id)
        .bind(&request.teacher_id)
        .bind(&request.teacher_name)
        .bind(&request.topic)
        .bind(&request.subject)
        .bind(&request.notes)
        .bind(request.requested_date)
        .bind(request.requested_time)
        .bind(request.duration_minutes)
        .bind(request.status.as_str())
        .bind(request.created_at)
        .execute(&self.db)
        .await?;
        Ok(request)
    }

    async fn update(&self, request: &SessionRequest) -> Result<SessionRequest, AppError> {
        let affected = sqlx::query(
            r#"
            UPDATE session_requests
            SET notes = ?, requested_date = ?, requested_time = ?, duration_minutes = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&request.notes)
        .bind(request.requested_date)
        .bind(request.requested_time)
        .bind(request.duration_minutes)
        .bind(request.status.as_str())
        .bind(&request.id)
        .execute(&self.db)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(request.clone())
    }
}

const SESSION_COLUMNS: &str = "id, course_id, course_title, client_id, teacher_name, title, \
    scheduled_at, duration_minutes, status, recording_url, materials";

#[async_trait]
impl LearningSessionRepository for SqliteStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<LearningSession>, AppError> {
        sqlx::query_as::<_, LearningSessionRecord>(&format!(
            "SELECT {SESSION_COLUMNS} FROM learning_sessions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(LearningSessionRecord::into_domain)
        .transpose()
    }

    async fn for_client(&self, client_id: &str) -> Result<Vec<LearningSession>, AppError> {
        let rows = sqlx::query_as::<_, LearningSessionRecord>(&format!(
            "SELECT {SESSION_COLUMNS} FROM learning_sessions WHERE client_id = ? ORDER BY rowid"
        ))
        .bind(client_id)
        .fetch_all(&self.db)
        .await?;
        into_domain_all(rows, LearningSessionRecord::into_domain)
    }
}

#[async_trait]
impl ProfileRepository for SqliteStore {
    async fn find_client(&self, user_id: &str) -> Result<Option<ClientProfile>, AppError> {
        sqlx::query_as::<_, ClientProfileRecord>(
            "SELECT user_id, full_name, phone, bio, subjects, goals, availability, completion, approval, updated_at FROM client_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .map(ClientProfileRecord::into_domain)
        .transpose()
    }

    async fn save_client(&self, profile: &ClientProfile) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO client_profiles
                (user_id, full_name, phone, bio, subjects, goals, availability, completion, approval, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                full_name = excluded.full_name,
                phone = excluded.phone,
                bio = excluded.bio,
                subjects = excluded.subjects,
                goals = excluded.goals,
                availability = excluded.availability,
                completion = excluded.completion,
                approval = excluded.approval,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.phone)
        .bind(&profile.bio)
        .bind(Json(&profile.subjects))
        .bind(&profile.goals)
        .bind(Json(&profile.availability))
        .bind(profile.completion)
        .bind(profile.approval.as_str())
        .bind(profile.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn find_teacher(&self, user_id: &str) -> Result<Option<TeacherProfile>, AppError> {
        sqlx::query_as::<_, TeacherProfileRecord>(
            "SELECT user_id, full_name, headline, subjects, document_path, approval, updated_at FROM teacher_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .map(TeacherProfileRecord::into_domain)
        .transpose()
    }

    async fn save_teacher(&self, profile: &TeacherProfile) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO teacher_profiles
                (user_id, full_name, headline, subjects, document_path, approval, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                full_name = excluded.full_name,
                headline = excluded.headline,
                subjects = excluded.subjects,
                document_path = excluded.document_path,
                approval = excluded.approval,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.headline)
        .bind(Json(&profile.subjects))
        .bind(&profile.document_path)
        .bind(profile.approval.as_str())
        .bind(profile.updated_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db;
    use crate::listing::FilterState;
    use crate::models::{CourseLevel, CourseStatus, EnrollmentStatus};

    async fn setup_test_db() -> SqliteStore {
        let pool = db::connect_in_memory()
            .await
            .expect("Failed to create test db");

        db::migrate(&pool).await.expect("Failed to run migrations");

        SqliteStore::new(pool)
    }

    fn new_course() -> NewCourse {
        NewCourse {
            teacher_id: "teacher-9".to_string(),
            instructor: "Ada Lovelace".to_string(),
            title: "Analytical Engines".to_string(),
            description: "Programming before computers existed.".to_string(),
            price: 25.0,
            sale_price: None,
            category: "history".to_string(),
            level: CourseLevel::Intermediate,
            duration: "3 weeks".to_string(),
            curriculum: vec![CurriculumModule {
                title: "Notes".to_string(),
                lessons: vec!["Note G".to_string()],
            }],
            learning_outcomes: vec!["Read Note G".to_string()],
            prerequisites: vec![],
            start_date: "2025-04-01".parse().ok(),
            end_date: "2025-04-22".parse().ok(),
            max_students: 30,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_course() {
        let store = setup_test_db().await;
        let repo: Arc<dyn CourseRepository> = Arc::new(store);

        let course = repo.create(new_course()).await.expect("Failed to insert course");
        assert_eq!(course.status, CourseStatus::Draft);
        assert_eq!(course.lesson_count, 1);

        let fetched = repo
            .find_by_id(&course.id)
            .await
            .expect("Failed to fetch course")
            .expect("Course not found");
        assert_eq!(fetched.title, "Analytical Engines");
        assert_eq!(fetched.curriculum, course.curriculum);
        assert_eq!(fetched.start_date, course.start_date);

        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_course() {
        let repo: Arc<dyn CourseRepository> = Arc::new(setup_test_db().await);
        let mut course = repo.create(new_course()).await.unwrap();

        course.status = CourseStatus::Active;
        course.cover_image = Some("covers/x.png".to_string());
        repo.update(&course).await.expect("Failed to update course");

        let fetched = repo.find_by_id(&course.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, CourseStatus::Active);
        assert_eq!(fetched.cover_image.as_deref(), Some("covers/x.png"));

        assert!(repo.delete(&course.id).await.unwrap());
        assert!(!repo.delete(&course.id).await.unwrap());
        assert!(matches!(repo.update(&course).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_increment_students_keeps_other_columns() {
        let repo: Arc<dyn CourseRepository> = Arc::new(setup_test_db().await);
        let course = repo.create(new_course()).await.unwrap();

        repo.increment_students(&course.id).await.unwrap();
        repo.increment_students(&course.id).await.unwrap();

        let fetched = repo.find_by_id(&course.id).await.unwrap().unwrap();
        assert_eq!(fetched.students_count, course.students_count + 2);
        assert_eq!(fetched.status, course.status);
        assert_eq!(fetched.title, course.title);
        assert!(matches!(
            repo.increment_students("missing").await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_end_date_constraint_is_enforced() {
        let repo: Arc<dyn CourseRepository> = Arc::new(setup_test_db().await);
        let mut new = new_course();
        new.end_date = "2025-03-01".parse().ok();
        assert!(matches!(repo.create(new).await, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_seeded_store_matches_fixture_pipeline() {
        let store = setup_test_db().await;
        assert!(store.seed_demo().await.unwrap());
        assert!(!store.seed_demo().await.unwrap());

        let enrollments: Arc<dyn EnrollmentRepository> = Arc::new(store.clone());
        let mut state = FilterState::default();
        state.set_tab("completed");
        let today = "2025-03-06".parse().unwrap();
        let page = enrollments
            .query(fixtures::DEMO_CLIENT_ID, &state, today, 10)
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|e| e.status == EnrollmentStatus::Completed));

        let sessions: Arc<dyn LearningSessionRepository> = Arc::new(store);
        let all = sessions.for_client(fixtures::DEMO_CLIENT_ID).await.unwrap();
        assert_eq!(all, fixtures::sessions());
    }

    #[tokio::test]
    async fn test_client_profile_upsert() {
        let repo: Arc<dyn ProfileRepository> = Arc::new(setup_test_db().await);
        let mut profile = ClientProfile {
            user_id: "client-9".to_string(),
            full_name: "Jamie".to_string(),
            phone: "555-0100".to_string(),
            bio: None,
            subjects: vec!["design".to_string()],
            goals: "Portfolio".to_string(),
            availability: vec!["Mon".to_string()],
            completion: 83,
            approval: crate::models::ApprovalStatus::Pending,
            updated_at: Utc::now(),
        };
        repo.save_client(&profile).await.unwrap();
        profile.full_name = "Jamie Park".to_string();
        repo.save_client(&profile).await.unwrap();

        let stored = repo.find_client("client-9").await.unwrap().unwrap();
        assert_eq!(stored.full_name, "Jamie Park");
        assert_eq!(stored.subjects, vec!["design".to_string()]);
    }
}
