//! Demo catalog used by the in-memory repositories and by `SEED_DEMO`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::models::{
    Course, CourseLevel, CourseStatus, CurriculumModule, Enrollment, EnrollmentStatus,
    LearningSession, RequestStatus, SessionRequest, SessionStatus,
};

pub const DEMO_CLIENT_ID: &str = "client-1";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    date(y, m, d)
        .and_hms_opt(h, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn modules(titles: &[(&str, &[&str])]) -> Vec<CurriculumModule> {
    titles
        .iter()
        .map(|(title, lessons)| CurriculumModule {
            title: title.to_string(),
            lessons: strings(lessons),
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: &str,
    teacher: (&str, &str),
    title: &str,
    description: &str,
    category: &str,
    level: CourseLevel,
    price: (f64, Option<f64>),
    rating: f64,
    students: i64,
    created: DateTime<Utc>,
) -> Course {
    let curriculum = modules(&[
        ("Getting Started", &["Welcome", "Course tools"][..]),
        ("Core Concepts", &["Foundations", "Hands-on practice", "Review"][..]),
        ("Final Project", &["Project brief", "Showcase"][..]),
    ]);
    let lesson_count = curriculum.iter().map(|m| m.lessons.len() as i32).sum();
    Course {
        id: id.to_string(),
        teacher_id: teacher.0.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        price: price.0,
        sale_price: price.1,
        category: category.to_string(),
        level,
        duration: "8 weeks".to_string(),
        lesson_count,
        rating,
        students_count: students,
        instructor: teacher.1.to_string(),
        status: CourseStatus::Active,
        curriculum,
        learning_outcomes: strings(&["Apply the core techniques", "Ship a portfolio project"]),
        prerequisites: Vec::new(),
        start_date: Some(created.date_naive() + chrono::Days::new(30)),
        end_date: Some(created.date_naive() + chrono::Days::new(86)),
        max_students: 2000,
        cover_image: None,
        created_at: created,
        updated_at: created,
    }
}

const SARAH: (&str, &str) = ("teacher-1", "Sarah Johnson");
const MICHAEL: (&str, &str) = ("teacher-2", "Michael Chen");
const EMILY: (&str, &str) = ("teacher-3", "Emily Rodriguez");
const DAVID: (&str, &str) = ("teacher-4", "David Kim");
const LISA: (&str, &str) = ("teacher-5", "Lisa Thompson");

pub fn courses() -> Vec<Course> {
    vec![
        course(
            "course-1",
            SARAH,
            "Complete Web Development Bootcamp",
            "HTML, CSS, JavaScript and modern frameworks from scratch to deployment.",
            "programming",
            CourseLevel::Intermediate,
            (89.99, Some(49.99)),
            4.8,
            1250,
            at(2024, 9, 2, 10),
        ),
        course(
            "course-2",
            MICHAEL,
            "UI/UX Design Fundamentals",
            "User research, wireframing and prototyping for digital products.",
            "design",
            CourseLevel::Beginner,
            (69.99, None),
            4.7,
            980,
            at(2024, 10, 14, 9),
        ),
        course(
            "course-3",
            EMILY,
            "Data Science with Python",
            "Pandas, NumPy and visualization for real-world data analysis.",
            "data-science",
            CourseLevel::Intermediate,
            (99.99, Some(79.99)),
            4.9,
            1430,
            at(2024, 8, 19, 14),
        ),
        course(
            "course-4",
            SARAH,
            "Advanced React Patterns",
            "Hooks, context, render props and performance techniques for large apps.",
            "programming",
            CourseLevel::Advanced,
            (79.99, None),
            4.6,
            640,
            at(2024, 11, 4, 11),
        ),
        course(
            "course-5",
            DAVID,
            "Business Analytics Fundamentals",
            "Turn business data into decisions with spreadsheets and dashboards.",
            "business",
            CourseLevel::Beginner,
            (59.99, None),
            4.5,
            720,
            at(2024, 12, 2, 15),
        ),
        course(
            "course-6",
            EMILY,
            "Machine Learning Masterclass",
            "Supervised and unsupervised models with scikit-learn and beyond.",
            "data-science",
            CourseLevel::Advanced,
            (129.99, Some(99.99)),
            4.8,
            860,
            at(2025, 1, 6, 10),
        ),
        course(
            "course-7",
            LISA,
            "Digital Marketing Strategy",
            "SEO, social media and paid campaigns that grow an audience.",
            "marketing",
            CourseLevel::Intermediate,
            (49.99, None),
            4.4,
            540,
            at(2025, 1, 20, 16),
        ),
        course(
            "course-8",
            MICHAEL,
            "Brand Identity & Logo Design",
            "Build a memorable brand system from logo to style guide.",
            "design",
            CourseLevel::All,
            (74.99, None),
            4.6,
            410,
            at(2025, 2, 3, 9),
        ),
    ]
}

fn enrollment(
    id: &str,
    course: (&str, &str, &str, &str),
    progress: i32,
    status: EnrollmentStatus,
    enrolled: DateTime<Utc>,
    accessed: DateTime<Utc>,
) -> Enrollment {
    Enrollment {
        id: id.to_string(),
        user_id: DEMO_CLIENT_ID.to_string(),
        course_id: course.0.to_string(),
        course_title: course.1.to_string(),
        instructor: course.2.to_string(),
        category: course.3.to_string(),
        progress,
        status,
        enrolled_at: enrolled,
        last_accessed_at: accessed,
        certificate_date: (status == EnrollmentStatus::Completed).then_some(accessed),
    }
}

pub fn enrollments() -> Vec<Enrollment> {
    vec![
        enrollment(
            "enrollment-1",
            ("course-1", "Complete Web Development Bootcamp", "Sarah Johnson", "programming"),
            65,
            EnrollmentStatus::InProgress,
            at(2025, 1, 8, 9),
            at(2025, 3, 4, 18),
        ),
        enrollment(
            "enrollment-2",
            ("course-2", "UI/UX Design Fundamentals", "Michael Chen", "design"),
            100,
            EnrollmentStatus::Completed,
            at(2024, 11, 2, 10),
            at(2025, 2, 10, 20),
        ),
        enrollment(
            "enrollment-3",
            ("course-3", "Data Science with Python", "Emily Rodriguez", "data-science"),
            100,
            EnrollmentStatus::Completed,
            at(2024, 9, 15, 8),
            at(2025, 1, 28, 19),
        ),
        enrollment(
            "enrollment-4",
            ("course-4", "Advanced React Patterns", "Sarah Johnson", "programming"),
            30,
            EnrollmentStatus::Paused,
            at(2025, 1, 20, 12),
            at(2025, 2, 18, 21),
        ),
        enrollment(
            "enrollment-5",
            ("course-7", "Digital Marketing Strategy", "Lisa Thompson", "marketing"),
            10,
            EnrollmentStatus::Archived,
            at(2024, 12, 5, 9),
            at(2024, 12, 20, 17),
        ),
        enrollment(
            "enrollment-6",
            ("course-5", "Business Analytics Fundamentals", "David Kim", "business"),
            45,
            EnrollmentStatus::InProgress,
            at(2025, 2, 1, 10),
            at(2025, 3, 5, 8),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn request(
    id: &str,
    teacher: (&str, &str),
    topic: &str,
    subject: &str,
    on: NaiveDate,
    at_time: NaiveTime,
    minutes: i32,
    status: RequestStatus,
    created: DateTime<Utc>,
) -> SessionRequest {
    SessionRequest {
        id: id.to_string(),
        client_id: DEMO_CLIENT_ID.to_string(),
        teacher_id: teacher.0.to_string(),
        teacher_name: teacher.1.to_string(),
        topic: topic.to_string(),
        subject: subject.to_string(),
        notes: None,
        requested_date: on,
        requested_time: at_time,
        duration_minutes: minutes,
        status,
        created_at: created,
    }
}

pub fn session_requests() -> Vec<SessionRequest> {
    vec![
        request(
            "request-1",
            SARAH,
            "React Hooks Deep Dive",
            "programming",
            date(2025, 3, 12),
            time(15, 0),
            60,
            RequestStatus::Pending,
            at(2025, 3, 1, 10),
        ),
        request(
            "request-2",
            MICHAEL,
            "UI Design Portfolio Review",
            "design",
            date(2025, 3, 14),
            time(11, 0),
            45,
            RequestStatus::UnderReview,
            at(2025, 2, 27, 16),
        ),
        request(
            "request-3",
            EMILY,
            "Data Visualization Best Practices",
            "data-science",
            date(2025, 3, 8),
            time(10, 30),
            90,
            RequestStatus::Approved,
            at(2025, 2, 20, 9),
        ),
        request(
            "request-4",
            DAVID,
            "Business Analytics Project Review",
            "business",
            date(2025, 3, 18),
            time(13, 0),
            60,
            RequestStatus::Pending,
            at(2025, 3, 3, 12),
        ),
        request(
            "request-5",
            LISA,
            "Marketing Funnel Workshop",
            "marketing",
            date(2025, 2, 25),
            time(17, 0),
            60,
            RequestStatus::Rejected,
            at(2025, 2, 10, 14),
        ),
        request(
            "request-6",
            MICHAEL,
            "Logo Design Critique",
            "design",
            date(2025, 3, 20),
            time(16, 0),
            30,
            RequestStatus::UnderReview,
            at(2025, 3, 2, 18),
        ),
        request(
            "request-7",
            EMILY,
            "Python Debugging Session",
            "programming",
            date(2025, 2, 21),
            time(9, 0),
            45,
            RequestStatus::Cancelled,
            at(2025, 2, 12, 11),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn session(
    id: &str,
    course: (&str, &str, &str),
    title: &str,
    scheduled: DateTime<Utc>,
    minutes: i32,
    status: SessionStatus,
    recording: Option<&str>,
    materials: &[&str],
) -> LearningSession {
    LearningSession {
        id: id.to_string(),
        course_id: course.0.to_string(),
        course_title: course.1.to_string(),
        client_id: DEMO_CLIENT_ID.to_string(),
        teacher_name: course.2.to_string(),
        title: title.to_string(),
        scheduled_at: scheduled,
        duration_minutes: minutes,
        status,
        recording_url: recording.map(str::to_string),
        materials: strings(materials),
    }
}

pub fn sessions() -> Vec<LearningSession> {
    vec![
        session(
            "session-1",
            ("course-1", "Complete Web Development Bootcamp", "Sarah Johnson"),
            "Responsive Layouts Q&A",
            at(2025, 3, 7, 15),
            60,
            SessionStatus::Scheduled,
            None,
            &["layout-cheatsheet.pdf"],
        ),
        session(
            "session-2",
            ("course-2", "UI/UX Design Fundamentals", "Michael Chen"),
            "Wireframing Workshop",
            at(2025, 2, 11, 10),
            90,
            SessionStatus::Completed,
            Some("https://recordings.example.com/session-2"),
            &["wireframes.fig", "notes.pdf"],
        ),
        session(
            "session-3",
            ("course-3", "Data Science with Python", "Emily Rodriguez"),
            "Pandas Deep Dive",
            at(2025, 3, 10, 14),
            60,
            SessionStatus::Confirmed,
            None,
            &[],
        ),
        session(
            "session-4",
            ("course-4", "Advanced React Patterns", "Sarah Johnson"),
            "Hooks Review",
            at(2025, 2, 26, 18),
            45,
            SessionStatus::Cancelled,
            None,
            &[],
        ),
        session(
            "session-5",
            ("course-5", "Business Analytics Fundamentals", "David Kim"),
            "KPI Dashboard Walkthrough",
            at(2025, 3, 6, 11),
            60,
            SessionStatus::Scheduled,
            None,
            &["kpi-template.xlsx"],
        ),
    ]
}
