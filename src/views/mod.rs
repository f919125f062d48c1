//! Concrete list views built on [`crate::listing`].

pub mod courses;
pub mod enrollments;
pub mod session_requests;
pub mod sessions;
pub mod teacher_courses;

pub use courses::{CourseCard, CourseCatalog};
pub use enrollments::{EnrollmentRow, MyEnrollments};
pub use session_requests::{MySessionRequests, SessionRequestRow};
pub use sessions::{MySessions, SessionRow};
pub use teacher_courses::{TeacherCourseRow, TeacherCourses};
