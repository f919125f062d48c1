use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::listing::pipeline::{compare_f64, compare_text};
use crate::listing::projector::{format_date, format_price, percent};
use crate::listing::{Facet, ListView, SortDirection, choice_enum};
use crate::models::{Course, CourseStatus};

choice_enum! {
    CatalogTab { All => "all" }
}

choice_enum! {
    CatalogSort {
        Popularity => "popularity",
        PriceLow => "price_low",
        PriceHigh => "price_high",
        Newest => "newest",
        HighestRated => "highest_rated",
        Title => "title",
    }
}

/// Public course catalog. Only active courses are ever listed.
pub struct CourseCatalog;

impl ListView for CourseCatalog {
    type Record = Course;
    type Tab = CatalogTab;
    type SortKey = CatalogSort;

    fn tab_contains(_tab: CatalogTab, course: &Course) -> bool {
        course.status == CourseStatus::Active
    }

    fn facet(course: &Course, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(course.status.as_str()),
            Facet::Category => Some(course.category.as_str()),
            Facet::Level => Some(course.level.as_str()),
        }
    }

    fn search_fields(course: &Course) -> Vec<&str> {
        vec![
            course.title.as_str(),
            course.description.as_str(),
            course.instructor.as_str(),
        ]
    }

    fn date_of(course: &Course) -> Option<NaiveDate> {
        course.start_date
    }

    fn natural_direction(key: CatalogSort) -> SortDirection {
        match key {
            CatalogSort::PriceLow | CatalogSort::Title => SortDirection::Asc,
            CatalogSort::Popularity
            | CatalogSort::PriceHigh
            | CatalogSort::Newest
            | CatalogSort::HighestRated => SortDirection::Desc,
        }
    }

    fn compare(key: CatalogSort, a: &Course, b: &Course) -> Ordering {
        match key {
            CatalogSort::Popularity => a.students_count.cmp(&b.students_count),
            CatalogSort::PriceLow | CatalogSort::PriceHigh => {
                compare_f64(a.effective_price(), b.effective_price())
            }
            CatalogSort::Newest => a.created_at.cmp(&b.created_at),
            CatalogSort::HighestRated => compare_f64(a.rating, b.rating),
            CatalogSort::Title => compare_text(&a.title, &b.title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCard {
    pub id: String,
    pub title: String,
    pub instructor: String,
    pub category: String,
    pub level: String,
    pub price: String,
    pub sale_price: Option<String>,
    pub discount_percent: Option<i32>,
    pub rating: String,
    pub students: i64,
    pub lessons: i32,
    pub duration: String,
    pub starts_on: Option<String>,
    pub cover_image: Option<String>,
}

pub fn project(course: &Course) -> CourseCard {
    let on_sale = course.sale_price.filter(|sale| *sale < course.price);
    CourseCard {
        id: course.id.clone(),
        title: course.title.clone(),
        instructor: course.instructor.clone(),
        category: course.category.clone(),
        level: course.level.to_string(),
        price: format_price(course.price),
        sale_price: on_sale.map(format_price),
        discount_percent: on_sale.map(|sale| percent(course.price - sale, course.price)),
        rating: format!("{:.1}", course.rating),
        students: course.students_count,
        lessons: course.lesson_count,
        duration: course.duration.clone(),
        starts_on: course.start_date.map(format_date),
        cover_image: course.cover_image.clone(),
    }
}
