use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::listing::pipeline::compare_text;
use crate::listing::projector::{Badge, format_datetime, format_time};
use crate::listing::{Facet, ListView, SortDirection, choice_enum};
use crate::models::{LearningSession, SessionStatus};

choice_enum! {
    SessionTab {
        Upcoming => "upcoming",
        Completed => "completed",
        Cancelled => "cancelled",
        All => "all",
    }
}

choice_enum! {
    SessionSort {
        Date => "date",
        Title => "title",
        Duration => "duration",
    }
}

pub struct MySessions;

impl ListView for MySessions {
    type Record = LearningSession;
    type Tab = SessionTab;
    type SortKey = SessionSort;

    fn tab_contains(tab: SessionTab, s: &LearningSession) -> bool {
        match tab {
            SessionTab::Upcoming => matches!(
                s.status,
                SessionStatus::Scheduled | SessionStatus::Confirmed
            ),
            SessionTab::Completed => s.status == SessionStatus::Completed,
            SessionTab::Cancelled => s.status == SessionStatus::Cancelled,
            SessionTab::All => true,
        }
    }

    fn facet(s: &LearningSession, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(s.status.as_str()),
            Facet::Category | Facet::Level => None,
        }
    }

    fn search_fields(s: &LearningSession) -> Vec<&str> {
        vec![s.title.as_str(), s.course_title.as_str(), s.teacher_name.as_str()]
    }

    fn date_of(s: &LearningSession) -> Option<NaiveDate> {
        Some(s.scheduled_at.date_naive())
    }

    fn natural_direction(key: SessionSort) -> SortDirection {
        match key {
            SessionSort::Duration => SortDirection::Desc,
            SessionSort::Date | SessionSort::Title => SortDirection::Asc,
        }
    }

    fn compare(key: SessionSort, a: &LearningSession, b: &LearningSession) -> Ordering {
        match key {
            SessionSort::Date => a.scheduled_at.cmp(&b.scheduled_at),
            SessionSort::Title => compare_text(&a.title, &b.title),
            SessionSort::Duration => a.duration_minutes.cmp(&b.duration_minutes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    pub id: String,
    pub title: String,
    pub course_title: String,
    pub teacher_name: String,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub status: SessionStatus,
    pub status_label: &'static str,
    pub badge_class: &'static str,
    pub recording_url: Option<String>,
    pub materials: usize,
    pub is_today: bool,
}

pub fn project(s: &LearningSession, now: DateTime<Utc>) -> SessionRow {
    SessionRow {
        id: s.id.clone(),
        title: s.title.clone(),
        course_title: s.course_title.clone(),
        teacher_name: s.teacher_name.clone(),
        date: format_datetime(s.scheduled_at),
        time: format_time(s.scheduled_at),
        duration: format!("{} min", s.duration_minutes),
        status: s.status,
        status_label: s.status.label(),
        badge_class: s.status.badge_class(),
        recording_url: s.recording_url.clone(),
        materials: s.materials.len(),
        is_today: s.scheduled_at.date_naive() == now.date_naive(),
    }
}
