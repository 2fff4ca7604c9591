use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use uks_core::{Entity, RecordId};

/// Below this many units a medicine counts as low on stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Expiry dates this many days ahead (inclusive) count as expiring soon.
pub const EXPIRY_WARNING_DAYS: u64 = 30;

/// Upper bound accepted for a stock quantity.
pub const MAX_QUANTITY: i64 = 10_000;

/// Medicine identifier (`obat.id`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicineId(pub RecordId);

impl MedicineId {
    pub const fn new(id: i64) -> Self {
        Self(RecordId::new(id))
    }
}

impl core::fmt::Display for MedicineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A medicine as echoed by the backend.
///
/// Wire field names follow the clinic API (`nama`, `jenis`, `stok`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineItem {
    pub id: MedicineId,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "jenis")]
    pub category: String,
    #[serde(rename = "stok")]
    pub quantity: u32,
    #[serde(rename = "tanggal_kadaluarsa")]
    pub expiry_date: NaiveDate,
    #[serde(rename = "deskripsi", default)]
    pub description: Option<String>,
    #[serde(default, with = "uks_core::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "uks_core::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Stock badge shown next to the quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Normal,
    Low,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Ok,
    ExpiringSoon,
    Expired,
}

impl MedicineItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }

    pub fn stock_level(&self) -> StockLevel {
        if self.is_low_stock() {
            StockLevel::Low
        } else {
            StockLevel::Normal
        }
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// Not yet expired, but expires within `EXPIRY_WARNING_DAYS` (inclusive).
    pub fn is_expiring_soon(&self, today: NaiveDate) -> bool {
        expires_within_warning_window(self.expiry_date, today)
    }

    pub fn expiry_status(&self, today: NaiveDate) -> ExpiryStatus {
        if self.is_expired(today) {
            ExpiryStatus::Expired
        } else if self.is_expiring_soon(today) {
            ExpiryStatus::ExpiringSoon
        } else {
            ExpiryStatus::Ok
        }
    }

    /// Signed number of days from `today` to the expiry date.
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }

    /// Build the record the mock provider stores for a create.
    pub fn from_payload(id: MedicineId, payload: MedicinePayload, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: payload.name,
            category: payload.category,
            quantity: payload.quantity,
            expiry_date: payload.expiry_date,
            description: payload.description,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Overwrite editable fields, keeping identity and creation time.
    pub fn apply_payload(&mut self, payload: MedicinePayload, now: DateTime<Utc>) {
        self.name = payload.name;
        self.category = payload.category;
        self.quantity = payload.quantity;
        self.expiry_date = payload.expiry_date;
        self.description = payload.description;
        self.updated_at = Some(now);
    }
}

impl Entity for MedicineItem {
    type Id = MedicineId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

pub(crate) fn expires_within_warning_window(expiry: NaiveDate, today: NaiveDate) -> bool {
    let horizon = today
        .checked_add_days(Days::new(EXPIRY_WARNING_DAYS))
        .unwrap_or(NaiveDate::MAX);
    expiry >= today && expiry <= horizon
}

/// Validated body for `POST /obat` and `PUT /obat/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicinePayload {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "jenis")]
    pub category: String,
    #[serde(rename = "stok")]
    pub quantity: u32,
    #[serde(rename = "tanggal_kadaluarsa")]
    pub expiry_date: NaiveDate,
    #[serde(rename = "deskripsi", default)]
    pub description: Option<String>,
}

#[cfg(test)]
pub(crate) fn sample(id: i64, name: &str, category: &str, quantity: u32, expiry: &str) -> MedicineItem {
    MedicineItem {
        id: MedicineId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        quantity,
        expiry_date: expiry.parse().unwrap(),
        description: None,
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = r#"{
            "id": 2,
            "nama": "Betadine",
            "jenis": "Cairan",
            "stok": 3,
            "tanggal_kadaluarsa": "2024-06-30",
            "deskripsi": "Antiseptik untuk luka",
            "created_at": "2024-01-15T10:00:00",
            "updated_at": "2024-01-15T10:00:00Z"
        }"#;
        let item: MedicineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, MedicineId::new(2));
        assert_eq!(item.name, "Betadine");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.expiry_date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert!(item.created_at.is_some());
    }

    #[test]
    fn null_description_and_timestamps_are_accepted() {
        let json = r#"{"id":1,"nama":"X-Ray","jenis":"Tablet","stok":9,
            "tanggal_kadaluarsa":"2025-01-01","deskripsi":null,"created_at":null}"#;
        let item: MedicineItem = serde_json::from_str(json).unwrap();
        assert!(item.description.is_none());
        assert!(item.created_at.is_none());
        assert!(item.updated_at.is_none());
    }

    #[test]
    fn expiry_status_boundaries() {
        let t = today();
        assert_eq!(sample(1, "A", "Tablet", 9, "2024-05-31").expiry_status(t), ExpiryStatus::Expired);
        assert_eq!(sample(1, "A", "Tablet", 9, "2024-06-01").expiry_status(t), ExpiryStatus::ExpiringSoon);
        assert_eq!(sample(1, "A", "Tablet", 9, "2024-07-01").expiry_status(t), ExpiryStatus::ExpiringSoon);
        assert_eq!(sample(1, "A", "Tablet", 9, "2024-07-02").expiry_status(t), ExpiryStatus::Ok);
    }

    #[test]
    fn apply_payload_keeps_identity_and_creation_time() {
        let created = Utc::now();
        let mut item = sample(4, "Ibuprofen", "Tablet", 2, "2024-08-20");
        item.created_at = Some(created);

        let later = created + chrono::Duration::minutes(5);
        item.apply_payload(
            MedicinePayload {
                name: "Ibuprofen 400".into(),
                category: "Tablet".into(),
                quantity: 40,
                expiry_date: "2025-08-20".parse().unwrap(),
                description: Some("restocked".into()),
            },
            later,
        );

        assert_eq!(item.id, MedicineId::new(4));
        assert_eq!(item.created_at, Some(created));
        assert_eq!(item.updated_at, Some(later));
        assert_eq!(item.quantity, 40);
        assert!(!item.is_low_stock());
    }

    proptest! {
        /// Property: the low-stock flag is exactly `quantity < 5`.
        #[test]
        fn low_stock_iff_quantity_below_threshold(quantity in 0u32..20_000) {
            let item = sample(1, "Paracetamol", "Tablet", quantity, "2030-01-01");
            prop_assert_eq!(item.is_low_stock(), quantity < 5);
            prop_assert_eq!(item.stock_level() == StockLevel::Low, quantity < 5);
        }

        /// Property: the expired flag is exactly `expiry < today`.
        #[test]
        fn expired_iff_expiry_before_today(offset in -400i64..400) {
            let t = today();
            let mut item = sample(1, "Paracetamol", "Tablet", 10, "2024-06-01");
            item.expiry_date = t + chrono::Duration::days(offset);
            prop_assert_eq!(item.is_expired(t), offset < 0);
            prop_assert_eq!(item.is_expiring_soon(t), (0..=30).contains(&offset));
        }
    }
}
