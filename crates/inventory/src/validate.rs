//! Medicine form validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use uks_core::{Validated, ValidationErrors, ValidationWarning};

use crate::item::{LOW_STOCK_THRESHOLD, MAX_QUANTITY, MedicinePayload, expires_within_warning_window};

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;

/// Raw medicine form input, before validation.
///
/// Required inputs a form can leave blank are `Option`s; text fields are
/// trimmed during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineDraft {
    pub name: String,
    pub category: String,
    pub quantity: Option<i64>,
    pub expiry_date: Option<NaiveDate>,
    pub description: String,
}

fn name_char_allowed(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '+' | '%')
}

impl MedicineDraft {
    /// Check every rule and return the request payload.
    ///
    /// All blocking failures are collected; warnings (low quantity, expiry in
    /// the next 30 days) only come back alongside a valid payload.
    pub fn validate(&self, today: NaiveDate) -> Result<Validated<MedicinePayload>, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut warnings = Vec::new();

        let name = self.name.trim();
        let name_len = name.chars().count();
        if name.is_empty() {
            errors.push("name", "medicine name is required");
        } else if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            errors.push("name", "medicine name must be 2 to 100 characters");
        } else if !name.chars().all(name_char_allowed) {
            errors.push(
                "name",
                "medicine name may only contain letters, digits, spaces, '-', '+' and '%'",
            );
        }

        let category = self.category.trim();
        if category.is_empty() {
            errors.push("category", "category must be selected");
        }

        let quantity = match self.quantity {
            None => {
                errors.push("quantity", "quantity is required");
                None
            }
            Some(q) if !(0..=MAX_QUANTITY).contains(&q) => {
                errors.push("quantity", "quantity must be between 0 and 10000");
                None
            }
            Some(q) => {
                let q = u32::try_from(q).unwrap_or(0);
                if q < LOW_STOCK_THRESHOLD {
                    warnings.push(ValidationWarning::new(
                        "quantity",
                        format!("quantity {q} is below the low-stock threshold"),
                    ));
                }
                Some(q)
            }
        };

        let expiry_date = match self.expiry_date {
            None => {
                errors.push("expiry_date", "expiry date is required");
                None
            }
            Some(d) if d < today => {
                errors.push("expiry_date", "expiry date cannot be in the past");
                None
            }
            Some(d) => {
                if expires_within_warning_window(d, today) {
                    let days = (d - today).num_days();
                    warnings.push(ValidationWarning::new(
                        "expiry_date",
                        format!("medicine expires in {days} days"),
                    ));
                }
                Some(d)
            }
        };

        errors.into_result()?;

        let (Some(quantity), Some(expiry_date)) = (quantity, expiry_date) else {
            // Both are only `None` when an error was pushed above.
            return Err(ValidationErrors::new());
        };

        let description = self.description.trim();
        let payload = MedicinePayload {
            name: name.to_string(),
            category: category.to_string(),
            quantity,
            expiry_date,
            description: (!description.is_empty()).then(|| description.to_string()),
        };

        Ok(Validated::new(payload, warnings))
    }
}

impl From<&crate::item::MedicineItem> for MedicineDraft {
    /// Pre-fill the edit form from a cached record.
    fn from(item: &crate::item::MedicineItem) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: Some(i64::from(item.quantity)),
            expiry_date: Some(item.expiry_date),
            description: item.description.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn draft() -> MedicineDraft {
        MedicineDraft {
            name: "Paracetamol 500".into(),
            category: "Tablet".into(),
            quantity: Some(50),
            expiry_date: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            description: "  pereda nyeri  ".into(),
        }
    }

    #[test]
    fn valid_draft_produces_trimmed_payload_without_warnings() {
        let validated = draft().validate(today()).unwrap();
        assert!(!validated.has_warnings());
        assert_eq!(validated.value.name, "Paracetamol 500");
        assert_eq!(validated.value.quantity, 50);
        assert_eq!(validated.value.description.as_deref(), Some("pereda nyeri"));
    }

    #[test]
    fn negative_quantity_is_a_range_error() {
        let mut d = draft();
        d.quantity = Some(-1);
        let errors = d.validate(today()).unwrap_err();
        assert_eq!(
            errors.for_field("quantity").map(|e| e.message.as_str()),
            Some("quantity must be between 0 and 10000")
        );
    }

    #[test]
    fn quantity_above_maximum_is_rejected() {
        let mut d = draft();
        d.quantity = Some(10_001);
        assert!(d.validate(today()).unwrap_err().for_field("quantity").is_some());
    }

    #[test]
    fn zero_quantity_is_allowed_with_warning() {
        let mut d = draft();
        d.quantity = Some(0);
        let validated = d.validate(today()).unwrap();
        assert_eq!(validated.value.quantity, 0);
        assert_eq!(validated.warnings.len(), 1);
        assert_eq!(validated.warnings[0].field, "quantity");
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = MedicineDraft::default().validate(today()).unwrap_err();
        for field in ["name", "category", "quantity", "expiry_date"] {
            assert!(errors.for_field(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn name_rules() {
        let mut d = draft();
        d.name = "A".into();
        assert!(d.validate(today()).is_err());

        d.name = "x".repeat(101);
        assert!(d.validate(today()).is_err());

        d.name = "Obat <script>".into();
        assert!(d.validate(today()).is_err());

        d.name = "Alcohol 70%".into();
        assert!(d.validate(today()).is_ok());

        d.name = "Betadine+Plus-2".into();
        assert!(d.validate(today()).is_ok());
    }

    #[test]
    fn past_expiry_blocks_and_near_expiry_warns() {
        let mut d = draft();
        d.expiry_date = Some(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        assert!(d.validate(today()).unwrap_err().for_field("expiry_date").is_some());

        d.expiry_date = Some(today());
        let validated = d.validate(today()).unwrap();
        assert_eq!(validated.warnings[0].field, "expiry_date");

        d.expiry_date = Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert!(d.validate(today()).unwrap().has_warnings());

        d.expiry_date = Some(NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
        assert!(!d.validate(today()).unwrap().has_warnings());
    }

    #[test]
    fn blank_description_becomes_none() {
        let mut d = draft();
        d.description = "   ".into();
        assert!(d.validate(today()).unwrap().value.description.is_none());
    }

    proptest! {
        #[test]
        fn quantity_range_is_enforced(q in -20_000i64..20_000) {
            let mut d = draft();
            d.quantity = Some(q);
            let result = d.validate(today());
            prop_assert_eq!(result.is_ok(), (0..=10_000).contains(&q));
        }
    }
}
