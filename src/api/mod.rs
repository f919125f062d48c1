use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path, Query, RawQuery, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::listing::{FilterState, Page};
use crate::models::{ClientProfile, Course, Enrollment, NewEnrollment, NewSessionRequest, SessionRequest, TeacherProfile};
use crate::services::{CoverUpload, DashboardSummary, ReviewDecision, TeacherProfileForm};
use crate::state::AppState;
use crate::views::{self, CourseCard, EnrollmentRow, SessionRequestRow, SessionRow, TeacherCourseRow};
use crate::wizard::{CourseDraft, ProfileDraft, WizardForm};

pub const USER_HEADER: &str = "x-user-id";

/// The acting user, taken from the `x-user-id` header.
#[derive(Debug, Clone)]
pub struct Actor(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Actor(v.to_string()))
            .ok_or_else(|| AppError::BadRequest(format!("missing {} header", USER_HEADER)))
    }
}

/// A page of rows plus the normalized query string that reproduces it.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub query: String,
}

impl<T> ListResponse<T> {
    fn new(page: Page<T>, state: &FilterState) -> Self {
        Self {
            page,
            query: state.to_query_string(),
        }
    }
}

#[derive(Deserialize)]
struct ProgressUpdate {
    progress: i32,
}

#[derive(Deserialize)]
struct ReviewRequest {
    decision: ReviewDecision,
}

#[derive(Deserialize)]
struct CreateCourseRequest {
    draft: CourseDraft,
    cover: Option<CoverUpload>,
}

#[derive(Deserialize)]
struct DocumentParams {
    file_name: String,
}

#[derive(Debug, Serialize)]
struct WizardStepResponse {
    step: usize,
    total_steps: usize,
    title: &'static str,
    next_step: Option<usize>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses))
        .route("/courses/{id}", get(get_course))
        .route("/me/enrollments", get(list_enrollments).post(enroll))
        .route("/enrollments/{id}/progress", patch(update_progress))
        .route("/enrollments/{id}/pause", patch(pause_enrollment))
        .route("/enrollments/{id}/resume", patch(resume_enrollment))
        .route("/enrollments/{id}/archive", patch(archive_enrollment))
        .route("/me/session-requests", get(list_requests).post(create_request))
        .route("/session-requests/{id}/cancel", patch(cancel_request))
        .route("/me/sessions", get(list_sessions))
        .route("/me/sessions/{id}", get(get_session))
        .route("/me/dashboard", get(dashboard))
        .route("/me/profile", get(get_profile).put(submit_profile))
        .route("/teacher/courses", get(list_teacher_courses).post(create_course))
        .route("/teacher/courses/wizard/{step}", post(validate_wizard_step))
        .route("/teacher/courses/{id}/status", patch(toggle_course_status))
        .route("/teacher/courses/{id}", axum::routing::delete(delete_course))
        .route("/teacher/session-requests/{id}", patch(review_request))
        .route("/teacher/profile", get(get_teacher_profile).put(save_teacher_profile))
        .route("/teacher/profile/document", put(upload_document))
        .with_state(state)
}

fn filter_state(query: Option<String>) -> FilterState {
    let state = FilterState::from_query_str(query.as_deref().unwrap_or_default());
    debug!("list query {:?}", state.to_query_string());
    state
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_courses(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<ListResponse<CourseCard>>, AppError> {
    let filters = filter_state(query);
    let page = state
        .course_service()
        .browse(&filters, Utc::now().date_naive(), state.per_page)
        .await?;
    Ok(Json(ListResponse::new(page.map(|c| views::courses::project(&c)), &filters)))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = state.course_service().get(&id).await?;
    Ok(Json(course))
}

async fn list_enrollments(
    State(state): State<AppState>,
    Actor(user): Actor,
    RawQuery(query): RawQuery,
) -> Result<Json<ListResponse<EnrollmentRow>>, AppError> {
    let filters = filter_state(query);
    let now = Utc::now();
    let page = state
        .enrollment_service()
        .list(&user, &filters, now.date_naive(), state.per_page)
        .await?;
    Ok(Json(ListResponse::new(
        page.map(|e| views::enrollments::project(&e, now)),
        &filters,
    )))
}

async fn enroll(
    State(state): State<AppState>,
    Actor(user): Actor,
    Json(req): Json<NewEnrollment>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = state
        .enrollment_service()
        .enroll(&user, &req.course_id, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

async fn update_progress(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(id): Path<String>,
    Json(req): Json<ProgressUpdate>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = state
        .enrollment_service()
        .update_progress(&user, &id, req.progress, Utc::now())
        .await?;
    Ok(Json(enrollment))
}

async fn pause_enrollment(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(id): Path<String>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = state.enrollment_service().pause(&user, &id, Utc::now()).await?;
    Ok(Json(enrollment))
}

async fn resume_enrollment(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(id): Path<String>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = state.enrollment_service().resume(&user, &id, Utc::now()).await?;
    Ok(Json(enrollment))
}

async fn archive_enrollment(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(id): Path<String>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = state.enrollment_service().archive(&user, &id).await?;
    Ok(Json(enrollment))
}

async fn list_requests(
    State(state): State<AppState>,
    Actor(user): Actor,
    RawQuery(query): RawQuery,
) -> Result<Json<ListResponse<SessionRequestRow>>, AppError> {
    let filters = filter_state(query);
    let now = Utc::now();
    let page = state
        .request_service()
        .list(&user, &filters, now.date_naive(), state.per_page)
        .await?;
    Ok(Json(ListResponse::new(
        page.map(|r| views::session_requests::project(&r, now)),
        &filters,
    )))
}

async fn create_request(
    State(state): State<AppState>,
    Actor(user): Actor,
    Json(req): Json<NewSessionRequest>,
) -> Result<(StatusCode, Json<SessionRequest>), AppError> {
    let request = state.request_service().create(&user, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn cancel_request(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(id): Path<String>,
) -> Result<Json<SessionRequest>, AppError> {
    let request = state.request_service().cancel(&user, &id).await?;
    Ok(Json(request))
}

async fn list_sessions(
    State(state): State<AppState>,
    Actor(user): Actor,
    RawQuery(query): RawQuery,
) -> Result<Json<ListResponse<SessionRow>>, AppError> {
    let filters = filter_state(query);
    let now = Utc::now();
    let page = state
        .session_service()
        .list(&user, &filters, now.date_naive(), state.per_page)
        .await?;
    Ok(Json(ListResponse::new(
        page.map(|s| views::sessions::project(&s, now)),
        &filters,
    )))
}

async fn get_session(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(id): Path<String>,
) -> Result<Json<SessionRow>, AppError> {
    let session = state.session_service().get(&user, &id).await?;
    Ok(Json(views::sessions::project(&session, Utc::now())))
}

async fn dashboard(
    State(state): State<AppState>,
    Actor(user): Actor,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = state
        .dashboard_service()
        .summary(&user, Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}

async fn get_profile(
    State(state): State<AppState>,
    Actor(user): Actor,
) -> Result<Json<ClientProfile>, AppError> {
    let profile = state.profile_service().client_profile(&user).await?;
    Ok(Json(profile))
}

async fn submit_profile(
    State(state): State<AppState>,
    Actor(user): Actor,
    Json(draft): Json<ProfileDraft>,
) -> Result<Json<ClientProfile>, AppError> {
    let profile = state.profile_service().submit(&user, &draft).await?;
    Ok(Json(profile))
}

async fn list_teacher_courses(
    State(state): State<AppState>,
    Actor(teacher): Actor,
    RawQuery(query): RawQuery,
) -> Result<Json<ListResponse<TeacherCourseRow>>, AppError> {
    let filters = filter_state(query);
    let now = Utc::now();
    let page = state
        .course_service()
        .teacher_courses(&teacher, &filters, now.date_naive(), state.per_page)
        .await?;
    Ok(Json(ListResponse::new(
        page.map(|c| views::teacher_courses::project(&c, now)),
        &filters,
    )))
}

async fn create_course(
    State(state): State<AppState>,
    Actor(teacher): Actor,
    Json(req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let instructor = state
        .profiles
        .find_teacher(&teacher)
        .await?
        .map(|p| p.full_name)
        .unwrap_or_else(|| teacher.clone());
    let course = state
        .course_service()
        .create_from_wizard(&teacher, &instructor, &req.draft, req.cover)
        .await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// Checks one wizard step so the client can gate its "next" button.
async fn validate_wizard_step(
    Path(step): Path<usize>,
    Json(draft): Json<CourseDraft>,
) -> Result<Json<WizardStepResponse>, AppError> {
    if !(1..=CourseDraft::STEPS).contains(&step) {
        return Err(AppError::BadRequest(format!("unknown wizard step {}", step)));
    }
    draft.validate_step(step).into_result()?;
    Ok(Json(WizardStepResponse {
        step,
        total_steps: CourseDraft::STEPS,
        title: CourseDraft::step_title(step),
        next_step: (step < CourseDraft::STEPS).then_some(step + 1),
    }))
}

async fn toggle_course_status(
    State(state): State<AppState>,
    Actor(teacher): Actor,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = state.course_service().toggle_status(&teacher, &id).await?;
    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Actor(teacher): Actor,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.course_service().delete(&teacher, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn review_request(
    State(state): State<AppState>,
    Actor(teacher): Actor,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<SessionRequest>, AppError> {
    let request = state
        .request_service()
        .review(&teacher, &id, req.decision)
        .await?;
    Ok(Json(request))
}

async fn get_teacher_profile(
    State(state): State<AppState>,
    Actor(teacher): Actor,
) -> Result<Json<TeacherProfile>, AppError> {
    let profile = state.profile_service().teacher_profile(&teacher).await?;
    Ok(Json(profile))
}

async fn save_teacher_profile(
    State(state): State<AppState>,
    Actor(teacher): Actor,
    Json(form): Json<TeacherProfileForm>,
) -> Result<Json<TeacherProfile>, AppError> {
    let profile = state.profile_service().save_teacher(&teacher, form).await?;
    Ok(Json(profile))
}

async fn upload_document(
    State(state): State<AppState>,
    Actor(teacher): Actor,
    Query(params): Query<DocumentParams>,
    body: Bytes,
) -> Result<Json<TeacherProfile>, AppError> {
    let profile = state
        .profile_service()
        .upload_document(&teacher, &params.file_name, &body)
        .await?;
    Ok(Json(profile))
}
