use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use uks_inventory::MedicineItem;
use uks_patients::VisitRecord;

/// Counters shown on the dashboard cards (`GET /dashboard/stats`).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "totalObat")]
    pub total_medicines: usize,
    #[serde(rename = "pasienHariIni")]
    pub visits_today: usize,
    #[serde(rename = "stokRendah")]
    pub low_stock: usize,
    #[serde(rename = "obatKadaluarsa")]
    pub expired: usize,
}

pub fn compute_stats(medicines: &[MedicineItem], visits: &[VisitRecord], today: NaiveDate) -> DashboardStats {
    DashboardStats {
        total_medicines: medicines.len(),
        visits_today: visits.iter().filter(|v| v.is_on(today)).count(),
        low_stock: medicines.iter().filter(|m| m.is_low_stock()).count(),
        expired: medicines.iter().filter(|m| m.is_expired(today)).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uks_inventory::MedicineId;
    use uks_patients::{VisitId, parse_visit_time};

    fn medicine(id: i64, quantity: u32, expiry: &str) -> MedicineItem {
        MedicineItem {
            id: MedicineId::new(id),
            name: format!("Obat {id}"),
            category: "Tablet".into(),
            quantity,
            expiry_date: expiry.parse().unwrap(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn visit(id: i64, date: &str) -> VisitRecord {
        VisitRecord {
            id: VisitId::new(id),
            name: "Ahmad".into(),
            class_or_role: "Kelas 10A".into(),
            visit_date: date.parse().unwrap(),
            visit_time: parse_visit_time("09:00").unwrap(),
            complaint: "Sakit kepala".into(),
            diagnosis: None,
            medicine_given: None,
            created_at: None,
        }
    }

    #[test]
    fn counts_each_card() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let medicines = vec![
            medicine(1, 50, "2024-12-31"),
            medicine(2, 3, "2024-05-30"),
            medicine(3, 4, "2025-01-01"),
        ];
        let visits = vec![visit(1, "2024-06-01"), visit(2, "2024-05-31")];

        let stats = compute_stats(&medicines, &visits, today);
        assert_eq!(
            stats,
            DashboardStats {
                total_medicines: 3,
                visits_today: 1,
                low_stock: 2,
                expired: 1,
            }
        );
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(DashboardStats::default()).unwrap();
        for key in ["totalObat", "pasienHariIni", "stokRendah", "obatKadaluarsa"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
