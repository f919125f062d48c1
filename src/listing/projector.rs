//! Pure helpers that turn stored values into what a view displays.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{ApprovalStatus, CourseStatus, EnrollmentStatus, RequestStatus, SessionStatus};

/// Absolute date, e.g. `Mar 05, 2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

pub fn format_datetime(at: DateTime<Utc>) -> String {
    format_date(at.date_naive())
}

pub fn format_time(at: DateTime<Utc>) -> String {
    at.format("%I:%M %p").to_string()
}

/// Human-readable distance between `at` and `now`: `3 hours ago`, `in 2 days`.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds();
    let future = seconds < 0;
    let seconds = seconds.unsigned_abs();

    if seconds < 60 {
        return "just now".to_string();
    }

    let (amount, unit) = match seconds {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 7 * 86_400 => (s / 86_400, "day"),
        s if s < 30 * 86_400 => (s / (7 * 86_400), "week"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };
    let plural = if amount == 1 { "" } else { "s" };

    if future {
        format!("in {amount} {unit}{plural}")
    } else {
        format!("{amount} {unit}{plural} ago")
    }
}

/// `part / whole` as a whole percentage, rounded half away from zero.
/// An empty whole is 0%.
pub fn percent(part: f64, whole: f64) -> i32 {
    if whole <= 0.0 {
        return 0;
    }
    ((part / whole) * 100.0).round() as i32
}

pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Style classes and labels for a status pill.
pub trait Badge {
    fn badge_class(&self) -> &'static str;
    fn label(&self) -> &'static str;
}

const GREEN: &str = "bg-green-100 text-green-800";
const YELLOW: &str = "bg-yellow-100 text-yellow-800";
const BLUE: &str = "bg-blue-100 text-blue-800";
const INDIGO: &str = "bg-indigo-100 text-indigo-800";
const RED: &str = "bg-red-100 text-red-800";
const GRAY: &str = "bg-gray-100 text-gray-800";

impl Badge for CourseStatus {
    fn badge_class(&self) -> &'static str {
        match self {
            CourseStatus::Draft => GRAY,
            CourseStatus::Active => GREEN,
            CourseStatus::Inactive => RED,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "Draft",
            CourseStatus::Active => "Active",
            CourseStatus::Inactive => "Inactive",
        }
    }
}

impl Badge for EnrollmentStatus {
    fn badge_class(&self) -> &'static str {
        match self {
            EnrollmentStatus::InProgress => BLUE,
            EnrollmentStatus::Paused => YELLOW,
            EnrollmentStatus::Completed => GREEN,
            EnrollmentStatus::Archived => GRAY,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            EnrollmentStatus::InProgress => "In Progress",
            EnrollmentStatus::Paused => "Paused",
            EnrollmentStatus::Completed => "Completed",
            EnrollmentStatus::Archived => "Archived",
        }
    }
}

impl Badge for RequestStatus {
    fn badge_class(&self) -> &'static str {
        match self {
            RequestStatus::Pending => YELLOW,
            RequestStatus::UnderReview => BLUE,
            RequestStatus::Approved => GREEN,
            RequestStatus::Rejected => RED,
            RequestStatus::Cancelled => GRAY,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::UnderReview => "Under Review",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Cancelled => "Cancelled",
        }
    }
}

impl Badge for SessionStatus {
    fn badge_class(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => BLUE,
            SessionStatus::Confirmed => INDIGO,
            SessionStatus::Completed => GREEN,
            SessionStatus::Cancelled => RED,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "Scheduled",
            SessionStatus::Confirmed => "Confirmed",
            SessionStatus::Completed => "Completed",
            SessionStatus::Cancelled => "Cancelled",
        }
    }
}

impl Badge for ApprovalStatus {
    fn badge_class(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => YELLOW,
            ApprovalStatus::Approved => GREEN,
            ApprovalStatus::Rejected => RED,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Pending Approval",
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::Rejected => "Rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn absolute_dates_pad_the_day() {
        assert_eq!(format_date("2025-03-05".parse().unwrap()), "Mar 05, 2025");
        assert_eq!(format_datetime(at("2024-12-31T23:00:00Z")), "Dec 31, 2024");
    }

    #[test]
    fn relative_time_picks_largest_unit() {
        let now = at("2025-06-15T12:00:00Z");
        assert_eq!(relative_time(now - Duration::seconds(20), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2 days ago");
        assert_eq!(relative_time(now - Duration::days(8), now), "1 week ago");
        assert_eq!(relative_time(now - Duration::days(125), now), "4 months ago");
        assert_eq!(relative_time(now - Duration::days(400), now), "1 year ago");
        assert_eq!(relative_time(now + Duration::days(2), now), "in 2 days");
    }

    #[test]
    fn percent_rounds_and_handles_empty_whole() {
        assert_eq!(percent(1.0, 3.0), 33);
        assert_eq!(percent(2.0, 3.0), 67);
        assert_eq!(percent(1.0, 8.0), 13);
        assert_eq!(percent(5.0, 0.0), 0);
    }

    #[test]
    fn every_status_has_a_badge() {
        for status in RequestStatus::ALL {
            assert!(status.badge_class().starts_with("bg-"));
            assert!(!status.label().is_empty());
        }
        assert_eq!(EnrollmentStatus::Completed.badge_class(), GREEN);
        assert_eq!(RequestStatus::UnderReview.label(), "Under Review");
    }
}
