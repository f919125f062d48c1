use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::listing::pipeline::{compare_f64, compare_text};
use crate::listing::projector::{Badge, format_datetime, format_price, relative_time};
use crate::listing::{Facet, ListView, SortDirection, choice_enum};
use crate::models::{Course, CourseStatus};

choice_enum! {
    TeacherCourseTab {
        All => "all",
        Active => "active",
        Draft => "draft",
        Inactive => "inactive",
    }
}

choice_enum! {
    TeacherCourseSort {
        CreatedAt => "created_at",
        Title => "title",
        Price => "price",
        Students => "students",
    }
}

/// A teacher's own courses, drafts included.
pub struct TeacherCourses;

impl ListView for TeacherCourses {
    type Record = Course;
    type Tab = TeacherCourseTab;
    type SortKey = TeacherCourseSort;

    fn tab_contains(tab: TeacherCourseTab, course: &Course) -> bool {
        match tab {
            TeacherCourseTab::All => true,
            TeacherCourseTab::Active => course.status == CourseStatus::Active,
            TeacherCourseTab::Draft => course.status == CourseStatus::Draft,
            TeacherCourseTab::Inactive => course.status == CourseStatus::Inactive,
        }
    }

    fn facet(course: &Course, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(course.status.as_str()),
            Facet::Category => Some(course.category.as_str()),
            Facet::Level => Some(course.level.as_str()),
        }
    }

    fn search_fields(course: &Course) -> Vec<&str> {
        vec![course.title.as_str(), course.description.as_str()]
    }

    fn date_of(course: &Course) -> Option<NaiveDate> {
        Some(course.created_at.date_naive())
    }

    fn natural_direction(key: TeacherCourseSort) -> SortDirection {
        match key {
            TeacherCourseSort::CreatedAt | TeacherCourseSort::Students => SortDirection::Desc,
            TeacherCourseSort::Title | TeacherCourseSort::Price => SortDirection::Asc,
        }
    }

    fn compare(key: TeacherCourseSort, a: &Course, b: &Course) -> Ordering {
        match key {
            TeacherCourseSort::CreatedAt => a.created_at.cmp(&b.created_at),
            TeacherCourseSort::Title => compare_text(&a.title, &b.title),
            TeacherCourseSort::Price => compare_f64(a.price, b.price),
            TeacherCourseSort::Students => a.students_count.cmp(&b.students_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherCourseRow {
    pub id: String,
    pub title: String,
    pub status: CourseStatus,
    pub status_label: &'static str,
    pub badge_class: &'static str,
    pub price: String,
    pub students: i64,
    pub capacity_percent: i32,
    pub lessons: i32,
    pub created: String,
    pub updated_on: String,
}

pub fn project(course: &Course, now: DateTime<Utc>) -> TeacherCourseRow {
    TeacherCourseRow {
        id: course.id.clone(),
        title: course.title.clone(),
        status: course.status,
        status_label: course.status.label(),
        badge_class: course.status.badge_class(),
        price: format_price(course.price),
        students: course.students_count,
        capacity_percent: crate::listing::projector::percent(
            course.students_count as f64,
            f64::from(course.max_students),
        ),
        lessons: course.lesson_count,
        created: relative_time(course.created_at, now),
        updated_on: format_datetime(course.updated_at),
    }
}
