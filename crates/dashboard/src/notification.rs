use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use uks_inventory::MedicineItem;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl Severity {
    /// Display order on the dashboard: most critical first.
    pub const DISPLAY_ORDER: [Severity; 4] = [
        Severity::Danger,
        Severity::Warning,
        Severity::Info,
        Severity::Success,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Info => "Information",
            Severity::Warning => "Warning",
            Severity::Danger => "Important",
        }
    }

    fn rank(&self) -> usize {
        Self::DISPLAY_ORDER
            .iter()
            .position(|s| s == self)
            .unwrap_or(Self::DISPLAY_ORDER.len())
    }
}

/// Transient system notification; regenerated on every fetch, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
    #[serde(default, with = "uks_core::timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp: Some(now),
        }
    }
}

pub const ALL_NORMAL_MESSAGE: &str = "All systems normal";

/// One warning per low-stock medicine, one danger per expired medicine, or a
/// single success notification when neither fires.
pub fn derive_notifications(medicines: &[MedicineItem], today: NaiveDate, now: DateTime<Utc>) -> Vec<Notification> {
    let mut out: Vec<Notification> = medicines
        .iter()
        .filter(|m| m.is_low_stock())
        .map(|m| {
            Notification::new(
                Severity::Warning,
                format!("Stock of {} is down to {} units", m.name, m.quantity),
                now,
            )
        })
        .collect();

    out.extend(
        medicines
            .iter()
            .filter(|m| m.is_expired(today))
            .map(|m| Notification::new(Severity::Danger, format!("{} has expired", m.name), now)),
    );

    if out.is_empty() {
        out.push(Notification::new(Severity::Success, ALL_NORMAL_MESSAGE, now));
    }
    out
}

/// Danger, warning, info, success; arrival order is kept within a severity.
pub fn group_by_severity(notifications: &[Notification]) -> Vec<Notification> {
    let mut grouped = notifications.to_vec();
    grouped.sort_by_key(|n| n.severity.rank());
    grouped
}

/// Relative age label shown under each notification.
pub fn relative_time_label(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    match minutes {
        m if m < 1 => "just now".to_string(),
        m if m < 60 => format!("{m} minutes ago"),
        m if m < 1440 => format!("{} hours ago", m / 60),
        m => format!("{} days ago", m / 1440),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uks_inventory::MedicineId;

    fn medicine(id: i64, name: &str, quantity: u32, expiry: &str) -> MedicineItem {
        MedicineItem {
            id: MedicineId::new(id),
            name: name.into(),
            category: "Tablet".into(),
            quantity,
            expiry_date: expiry.parse().unwrap(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    #[test]
    fn low_stock_and_expired_produce_warning_and_danger() {
        let medicines = vec![
            medicine(1, "Betadine", 3, "2025-06-30"),
            medicine(2, "Salep Luka", 12, "2024-01-31"),
            medicine(3, "Hansaplast", 25, "2025-03-15"),
        ];
        let notes = derive_notifications(&medicines, today(), now());
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].severity, Severity::Warning);
        assert_eq!(notes[0].message, "Stock of Betadine is down to 3 units");
        assert_eq!(notes[1].severity, Severity::Danger);
        assert_eq!(notes[1].message, "Salep Luka has expired");
    }

    #[test]
    fn one_medicine_can_fire_both() {
        let notes = derive_notifications(&[medicine(7, "Vitamin C", 1, "2024-05-15")], today(), now());
        let severities: Vec<_> = notes.iter().map(|n| n.severity).collect();
        assert_eq!(severities, [Severity::Warning, Severity::Danger]);
    }

    #[test]
    fn healthy_stock_yields_single_success() {
        let medicines = vec![medicine(1, "Paracetamol", 50, "2025-12-31")];
        let notes = derive_notifications(&medicines, today(), now());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Success);
        assert_eq!(notes[0].message, ALL_NORMAL_MESSAGE);
    }

    #[test]
    fn grouping_puts_danger_first_and_keeps_order() {
        let notes = vec![
            Notification::new(Severity::Success, "ok", now()),
            Notification::new(Severity::Warning, "w1", now()),
            Notification::new(Severity::Info, "i", now()),
            Notification::new(Severity::Danger, "d", now()),
            Notification::new(Severity::Warning, "w2", now()),
        ];
        let grouped = group_by_severity(&notes);
        let messages: Vec<_> = grouped.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["d", "w1", "w2", "i", "ok"]);
    }

    #[test]
    fn wire_shape_uses_type_key() {
        let json = r#"{"type":"danger","message":"X sudah kadaluarsa","timestamp":"2024-06-01T08:00:00.123456"}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.severity, Severity::Danger);
        assert!(n.timestamp.is_some());
    }

    #[test]
    fn relative_labels() {
        let t = now();
        assert_eq!(relative_time_label(t, t), "just now");
        assert_eq!(relative_time_label(t, t + chrono::Duration::minutes(5)), "5 minutes ago");
        assert_eq!(relative_time_label(t, t + chrono::Duration::minutes(130)), "2 hours ago");
        assert_eq!(relative_time_label(t, t + chrono::Duration::days(3)), "3 days ago");
    }
}
