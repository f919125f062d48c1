pub mod course_service;
pub mod dashboard;
pub mod enrollment_service;
pub mod profile_service;
pub mod request_service;
pub mod session_service;

pub use course_service::{CourseService, CoverUpload};
pub use dashboard::{DashboardService, DashboardSummary};
pub use enrollment_service::EnrollmentService;
pub use profile_service::{ProfileService, TeacherProfileForm};
pub use request_service::{ReviewDecision, SessionRequestService};
pub use session_service::SessionService;
