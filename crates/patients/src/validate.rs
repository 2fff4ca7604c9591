//! Visit form validation.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use uks_core::{Validated, ValidationErrors};

use crate::visit::VisitPayload;

const NAME_MIN_CHARS: usize = 2;
const COMPLAINT_MIN_CHARS: usize = 5;

/// Raw visit form input, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitDraft {
    pub name: String,
    pub class_or_role: String,
    pub visit_date: Option<NaiveDate>,
    pub visit_time: Option<NaiveTime>,
    pub complaint: String,
    pub diagnosis: String,
    pub medicine_given: String,
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl VisitDraft {
    /// Form defaults: visit stamped with the current date and time.
    pub fn stamped(today: NaiveDate, now: NaiveTime) -> Self {
        Self {
            visit_date: Some(today),
            visit_time: NaiveTime::from_hms_opt(now.hour(), now.minute(), 0),
            ..Self::default()
        }
    }

    /// Visits have no advisory rules; the `Validated` wrapper keeps the
    /// controller flow identical to medicines.
    pub fn validate(&self, today: NaiveDate) -> Result<Validated<VisitPayload>, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name", "patient name is required");
        } else if name.chars().count() < NAME_MIN_CHARS {
            errors.push("name", "patient name must be at least 2 characters");
        }

        let class_or_role = self.class_or_role.trim();
        if class_or_role.is_empty() {
            errors.push("class_or_role", "class/role is required");
        }

        match self.visit_date {
            None => errors.push("visit_date", "visit date is required"),
            Some(d) if d > today => errors.push("visit_date", "visit date cannot be in the future"),
            Some(_) => {}
        }

        if self.visit_time.is_none() {
            errors.push("visit_time", "visit time is required");
        }

        let complaint = self.complaint.trim();
        if complaint.is_empty() {
            errors.push("complaint", "complaint is required");
        } else if complaint.chars().count() < COMPLAINT_MIN_CHARS {
            errors.push("complaint", "complaint must be at least 5 characters");
        }

        errors.into_result()?;

        let (Some(visit_date), Some(visit_time)) = (self.visit_date, self.visit_time) else {
            return Err(ValidationErrors::new());
        };

        Ok(Validated::new(
            VisitPayload {
                name: name.to_string(),
                class_or_role: class_or_role.to_string(),
                visit_date,
                visit_time,
                complaint: complaint.to_string(),
                diagnosis: optional_text(&self.diagnosis),
                medicine_given: optional_text(&self.medicine_given),
            },
            Vec::new(),
        ))
    }
}
