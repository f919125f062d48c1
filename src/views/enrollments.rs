use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::listing::pipeline::compare_text;
use crate::listing::projector::{Badge, format_datetime, relative_time};
use crate::listing::{Facet, ListView, SortDirection, choice_enum};
use crate::models::{Enrollment, EnrollmentStatus};

choice_enum! {
    EnrollmentTab {
        All => "all",
        Active => "active",
        Completed => "completed",
        Archived => "archived",
    }
}

choice_enum! {
    EnrollmentSort {
        LastAccessed => "last_accessed",
        EnrollmentDate => "enrollment_date",
        Progress => "progress",
        Title => "title",
    }
}

/// A client's "my courses" list.
pub struct MyEnrollments;

impl ListView for MyEnrollments {
    type Record = Enrollment;
    type Tab = EnrollmentTab;
    type SortKey = EnrollmentSort;

    fn tab_contains(tab: EnrollmentTab, e: &Enrollment) -> bool {
        match tab {
            EnrollmentTab::All => true,
            EnrollmentTab::Active => matches!(
                e.status,
                EnrollmentStatus::InProgress | EnrollmentStatus::Paused
            ),
            EnrollmentTab::Completed => e.status == EnrollmentStatus::Completed,
            EnrollmentTab::Archived => e.status == EnrollmentStatus::Archived,
        }
    }

    fn facet(e: &Enrollment, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(e.status.as_str()),
            Facet::Category => Some(e.category.as_str()),
            Facet::Level => None,
        }
    }

    fn search_fields(e: &Enrollment) -> Vec<&str> {
        vec![e.course_title.as_str(), e.instructor.as_str()]
    }

    fn date_of(e: &Enrollment) -> Option<NaiveDate> {
        Some(e.last_accessed_at.date_naive())
    }

    fn natural_direction(key: EnrollmentSort) -> SortDirection {
        match key {
            EnrollmentSort::Title => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    fn compare(key: EnrollmentSort, a: &Enrollment, b: &Enrollment) -> Ordering {
        match key {
            EnrollmentSort::LastAccessed => a.last_accessed_at.cmp(&b.last_accessed_at),
            EnrollmentSort::EnrollmentDate => a.enrolled_at.cmp(&b.enrolled_at),
            EnrollmentSort::Progress => a.progress.cmp(&b.progress),
            EnrollmentSort::Title => compare_text(&a.course_title, &b.course_title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentRow {
    pub id: String,
    pub course_id: String,
    pub course_title: String,
    pub instructor: String,
    pub progress: i32,
    pub progress_label: String,
    pub status: EnrollmentStatus,
    pub status_label: &'static str,
    pub badge_class: &'static str,
    pub enrolled_on: String,
    pub last_accessed: String,
    pub certificate_on: Option<String>,
}

pub fn project(e: &Enrollment, now: DateTime<Utc>) -> EnrollmentRow {
    EnrollmentRow {
        id: e.id.clone(),
        course_id: e.course_id.clone(),
        course_title: e.course_title.clone(),
        instructor: e.instructor.clone(),
        progress: e.progress,
        progress_label: format!("{}%", e.progress),
        status: e.status,
        status_label: e.status.label(),
        badge_class: e.status.badge_class(),
        enrolled_on: format_datetime(e.enrolled_at),
        last_accessed: relative_time(e.last_accessed_at, now),
        certificate_on: e.certificate_date.map(format_datetime),
    }
}
