use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::listing::pipeline::compare_text;
use crate::listing::projector::{Badge, format_date, relative_time};
use crate::listing::{Facet, ListView, SortDirection, choice_enum};
use crate::models::{RequestStatus, SessionRequest};

choice_enum! {
    RequestTab {
        All => "all",
        Pending => "pending",
        Approved => "approved",
        Closed => "closed",
    }
}

choice_enum! {
    RequestSort {
        CreatedAt => "created_at",
        Date => "date",
        Status => "status",
    }
}

pub struct MySessionRequests;

impl ListView for MySessionRequests {
    type Record = SessionRequest;
    type Tab = RequestTab;
    type SortKey = RequestSort;

    fn tab_contains(tab: RequestTab, r: &SessionRequest) -> bool {
        match tab {
            RequestTab::All => true,
            RequestTab::Pending => r.status.is_open(),
            RequestTab::Approved => r.status == RequestStatus::Approved,
            RequestTab::Closed => matches!(
                r.status,
                RequestStatus::Rejected | RequestStatus::Cancelled
            ),
        }
    }

    fn facet(r: &SessionRequest, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(r.status.as_str()),
            Facet::Category => Some(r.subject.as_str()),
            Facet::Level => None,
        }
    }

    fn search_fields(r: &SessionRequest) -> Vec<&str> {
        vec![r.topic.as_str(), r.teacher_name.as_str(), r.subject.as_str()]
    }

    fn date_of(r: &SessionRequest) -> Option<NaiveDate> {
        Some(r.requested_date)
    }

    fn natural_direction(key: RequestSort) -> SortDirection {
        match key {
            RequestSort::CreatedAt => SortDirection::Desc,
            RequestSort::Date | RequestSort::Status => SortDirection::Asc,
        }
    }

    fn compare(key: RequestSort, a: &SessionRequest, b: &SessionRequest) -> Ordering {
        match key {
            RequestSort::CreatedAt => a.created_at.cmp(&b.created_at),
            RequestSort::Date => (a.requested_date, a.requested_time)
                .cmp(&(b.requested_date, b.requested_time)),
            RequestSort::Status => compare_text(a.status.as_str(), b.status.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRequestRow {
    pub id: String,
    pub topic: String,
    pub teacher_name: String,
    pub subject: String,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub status: RequestStatus,
    pub status_label: &'static str,
    pub badge_class: &'static str,
    pub submitted: String,
    pub can_cancel: bool,
}

pub fn project(r: &SessionRequest, now: DateTime<Utc>) -> SessionRequestRow {
    SessionRequestRow {
        id: r.id.clone(),
        topic: r.topic.clone(),
        teacher_name: r.teacher_name.clone(),
        subject: r.subject.clone(),
        date: format_date(r.requested_date),
        time: r.requested_time.format("%I:%M %p").to_string(),
        duration: format!("{} min", r.duration_minutes),
        status: r.status,
        status_label: r.status.label(),
        badge_class: r.status.badge_class(),
        submitted: relative_time(r.created_at, now),
        can_cancel: r.status.is_open(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn only_open_requests_can_be_cancelled() {
        let now = Utc::now();
        for r in fixtures::session_requests() {
            let row = project(&r, now);
            assert_eq!(
                row.can_cancel,
                matches!(r.status, RequestStatus::Pending | RequestStatus::UnderReview)
            );
        }
    }

    #[test]
    fn time_is_twelve_hour() {
        let mut r = fixtures::session_requests().remove(0);
        r.requested_time = "14:30:00".parse().unwrap();
        assert_eq!(project(&r, Utc::now()).time, "02:30 PM");
    }
}
