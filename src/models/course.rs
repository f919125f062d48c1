use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};


string_enum! {
    /// Publication state of a course; teachers move between these explicitly.
    CourseStatus("course status") {
        Draft => "draft",
        Active => "active",
        Inactive => "inactive",
    }
}

string_enum! {
    CourseLevel("course level") {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
        All => "all",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumModule {
    pub title: String,
    pub lessons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub teacher_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub category: String,
    pub level: CourseLevel,
    pub duration: String,
    pub lesson_count: i32,
    pub rating: f64,
    pub students_count: i64,
    pub instructor: String,
    pub status: CourseStatus,
    pub curriculum: Vec<CurriculumModule>,
    pub learning_outcomes: Vec<String>,
    pub prerequisites: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_students: i32,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Price a client actually pays.
    pub fn effective_price(&self) -> f64 {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    pub fn is_owned_by(&self, teacher_id: &str) -> bool {
        self.teacher_id == teacher_id
    }

    /// Next state of the active/inactive toggle. Drafts publish straight to active.
    pub fn toggled_status(&self) -> CourseStatus {
        match self.status {
            CourseStatus::Active => CourseStatus::Inactive,
            CourseStatus::Draft | CourseStatus::Inactive => CourseStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub teacher_id: String,
    pub instructor: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub category: String,
    pub level: CourseLevel,
    pub duration: String,
    pub curriculum: Vec<CurriculumModule>,
    pub learning_outcomes: Vec<String>,
    pub prerequisites: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_students: i32,
}

impl NewCourse {
    /// Builds the stored course. New courses always start as drafts.
    pub fn into_course(self, id: String, now: DateTime<Utc>) -> Course {
        let lesson_count = self.curriculum.iter().map(|m| m.lessons.len() as i32).sum();
        Course {
            id,
            teacher_id: self.teacher_id,
            title: self.title,
            description: self.description,
            price: self.price,
            sale_price: self.sale_price,
            category: self.category,
            level: self.level,
            duration: self.duration,
            lesson_count,
            rating: 0.0,
            students_count: 0,
            instructor: self.instructor,
            status: CourseStatus::Draft,
            curriculum: self.curriculum,
            learning_outcomes: self.learning_outcomes,
            prerequisites: self.prerequisites,
            start_date: self.start_date,
            end_date: self.end_date,
            max_students: self.max_students,
            cover_image: None,
            created_at: now,
            updated_at: now,
        }
    }
}
