//! Linear multi-step forms with per-step validation.

pub mod course;
pub mod profile;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub use course::CourseDraft;
pub use profile::ProfileDraft;

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid ({})", error.code));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Runs `validator` rules for one step and returns them as [`FieldErrors`].
pub(crate) fn check<T: validator::Validate>(step: &T) -> FieldErrors {
    match step.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}

/// A form split into a fixed number of steps.
pub trait WizardForm {
    const STEPS: usize;

    fn step_title(step: usize) -> &'static str;

    /// Rules for the fields on `step` only (1-based).
    fn validate_step(&self, step: usize) -> FieldErrors;
}

#[derive(Debug, Clone)]
pub struct Wizard<F> {
    form: F,
    current_step: usize,
    errors: FieldErrors,
}

impl<F: WizardForm> Wizard<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            current_step: 1,
            errors: FieldErrors::new(),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        F::STEPS
    }

    pub fn step_title(&self) -> &'static str {
        F::step_title(self.current_step)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == F::STEPS
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validates the current step and advances when it passes.
    /// Returns whether the wizard moved.
    pub fn next(&mut self) -> bool {
        let errors = self.form.validate_step(self.current_step);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        self.errors = FieldErrors::new();
        if self.current_step < F::STEPS {
            self.current_step += 1;
            true
        } else {
            false
        }
    }

    /// Steps back without validating anything.
    pub fn back(&mut self) {
        self.errors = FieldErrors::new();
        if self.current_step > 1 {
            self.current_step -= 1;
        }
    }

    /// Re-checks every step. On failure the wizard jumps to the first step
    /// with errors.
    pub fn submit(&mut self) -> Result<&F, FieldErrors> {
        for step in 1..=F::STEPS {
            let errors = self.form.validate_step(step);
            if !errors.is_empty() {
                self.current_step = step;
                self.errors = errors.clone();
                return Err(errors);
            }
        }
        self.errors = FieldErrors::new();
        Ok(&self.form)
    }
}

/// Validates every step of a form outside a [`Wizard`].
pub fn validate_all<F: WizardForm>(form: &F) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for step in 1..=F::STEPS {
        errors.merge(form.validate_step(step));
    }
    errors.into_result()
}
