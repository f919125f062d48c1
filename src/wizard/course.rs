use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FieldErrors, WizardForm, check};
use crate::models::{CourseLevel, CurriculumModule, NewCourse};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BasicsStep {
    #[validate(length(min = 5, max = 120, message = "The title must be between 5 and 120 characters."))]
    pub title: String,
    #[validate(length(min = 20, message = "The description must be at least 20 characters."))]
    pub description: String,
    #[validate(length(min = 1, message = "Please choose a category."))]
    pub category: String,
    pub level: Option<CourseLevel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CurriculumStep {
    #[validate(length(min = 1, message = "Add at least one module."))]
    pub modules: Vec<CurriculumModule>,
    #[validate(length(min = 1, message = "Add at least one learning outcome."))]
    pub learning_outcomes: Vec<String>,
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScheduleStep {
    #[validate(range(min = 0.0, message = "The price cannot be negative."))]
    pub price: f64,
    pub sale_price: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 500, message = "Capacity must be between 1 and 500 students."))]
    pub max_students: i32,
    #[validate(length(min = 1, message = "Please give the course duration."))]
    pub duration: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewStep {
    pub terms_accepted: bool,
}

/// Everything a teacher fills in across the four course-creation steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseDraft {
    pub basics: BasicsStep,
    pub curriculum: CurriculumStep,
    pub schedule: ScheduleStep,
    pub review: ReviewStep,
}

impl CourseDraft {
    pub fn to_new_course(&self, teacher_id: &str, instructor: &str) -> NewCourse {
        let trimmed = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };
        NewCourse {
            teacher_id: teacher_id.to_string(),
            instructor: instructor.to_string(),
            title: self.basics.title.trim().to_string(),
            description: self.basics.description.trim().to_string(),
            price: self.schedule.price,
            sale_price: self.schedule.sale_price,
            category: self.basics.category.trim().to_string(),
            level: self.basics.level.unwrap_or(CourseLevel::All),
            duration: self.schedule.duration.trim().to_string(),
            curriculum: self.curriculum.modules.clone(),
            learning_outcomes: trimmed(&self.curriculum.learning_outcomes),
            prerequisites: trimmed(&self.curriculum.prerequisites),
            start_date: self.schedule.start_date,
            end_date: self.schedule.end_date,
            max_students: self.schedule.max_students,
        }
    }

    fn validate_basics(&self) -> FieldErrors {
        let mut errors = check(&self.basics);
        if self.basics.level.is_none() {
            errors.add("level", "Please choose a level.");
        }
        errors
    }

    fn validate_curriculum(&self) -> FieldErrors {
        let mut errors = check(&self.curriculum);
        for (i, module) in self.curriculum.modules.iter().enumerate() {
            if module.title.trim().is_empty() {
                errors.add(format!("modules.{i}.title"), "Every module needs a title.");
            }
            if module.lessons.iter().all(|l| l.trim().is_empty()) {
                errors.add(format!("modules.{i}.lessons"), "Every module needs at least one lesson.");
            }
        }
        errors
    }

    fn validate_schedule(&self) -> FieldErrors {
        let schedule = &self.schedule;
        let mut errors = check(schedule);

        if let Some(sale) = schedule.sale_price {
            if sale < 0.0 {
                errors.add("sale_price", "The sale price cannot be negative.");
            } else if sale >= schedule.price {
                errors.add("sale_price", "The sale price must be lower than the price.");
            }
        }

        match (schedule.start_date, schedule.end_date) {
            (None, _) => errors.add("start_date", "Please pick a start date."),
            (Some(_), None) => errors.add("end_date", "Please pick an end date."),
            (Some(start), Some(end)) if end <= start => {
                errors.add("end_date", "The end date must be after the start date.")
            }
            _ => {}
        }
        errors
    }

    fn validate_review(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.review.terms_accepted {
            errors.add("terms_accepted", "Please accept the teaching terms.");
        }
        errors
    }
}

impl WizardForm for CourseDraft {
    const STEPS: usize = 4;

    fn step_title(step: usize) -> &'static str {
        match step {
            1 => "Course basics",
            2 => "Curriculum",
            3 => "Schedule & pricing",
            _ => "Review & publish",
        }
    }

    fn validate_step(&self, step: usize) -> FieldErrors {
        match step {
            1 => self.validate_basics(),
            2 => self.validate_curriculum(),
            3 => self.validate_schedule(),
            4 => self.validate_review(),
            _ => FieldErrors::new(),
        }
    }
}
