//! In-memory `ClinicBackend` with seeded demo data.
//!
//! Used for demos without a running API and by the controller tests. Writes
//! mutate the provider's own vectors, which stay the source of truth for every
//! later read in the session.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use uks_core::Clock;
use uks_dashboard::{DashboardStats, Notification, compute_stats, derive_notifications};
use uks_inventory::{MedicineId, MedicineItem, MedicinePayload};
use uks_patients::query::matches_query;
use uks_patients::{VisitId, VisitPayload, VisitRecord};

use crate::backend::ClinicBackend;
use crate::config::BackendMode;
use crate::envelope::Envelope;
use crate::transport::TransportResult;

pub const MEDICINE_NOT_FOUND: &str = "Medicine not found";
pub const VISIT_NOT_FOUND: &str = "Patient visit not found";
pub const QUERY_REQUIRED: &str = "Search query is required";

/// Simulated round-trip time per kind of operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockLatency {
    pub read: Duration,
    pub stats: Duration,
    pub notifications: Duration,
    pub write: Duration,
}

impl MockLatency {
    pub const ZERO: MockLatency = MockLatency::uniform(Duration::ZERO);

    pub const fn uniform(latency: Duration) -> Self {
        Self {
            read: latency,
            stats: latency,
            notifications: latency,
            write: latency,
        }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            read: Duration::from_millis(500),
            stats: Duration::from_millis(300),
            notifications: Duration::from_millis(200),
            write: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Default)]
struct Store {
    medicines: Vec<MedicineItem>,
    visits: Vec<VisitRecord>,
}

pub struct MockBackend {
    store: RwLock<Store>,
    next_medicine_id: AtomicI64,
    next_visit_id: AtomicI64,
    latency: MockLatency,
    clock: Arc<dyn Clock>,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Seven demo medicines and three visits dated today.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        Self::with_data(seed_medicines(), seed_visits(today), clock)
    }

    pub fn with_data(
        medicines: Vec<MedicineItem>,
        visits: Vec<VisitRecord>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let next_medicine_id = medicines.iter().map(|m| m.id.0.get()).max().unwrap_or(0) + 1;
        let next_visit_id = visits.iter().map(|v| v.id.0.get()).max().unwrap_or(0) + 1;
        Self {
            store: RwLock::new(Store { medicines, visits }),
            next_medicine_id: AtomicI64::new(next_medicine_id),
            next_visit_id: AtomicI64::new(next_visit_id),
            latency: MockLatency::default(),
            clock,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: MockLatency) -> Self {
        self.latency = latency;
        self
    }

    /// Number of backend operations served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn medicines(&self) -> Vec<MedicineItem> {
        self.read().medicines.clone()
    }

    pub fn visits(&self) -> Vec<VisitRecord> {
        self.read().visits.clone()
    }

    async fn simulate(&self, latency: Duration) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ClinicBackend for MockBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Mock
    }

    async fn health(&self) -> bool {
        true
    }

    async fn list_medicines(&self) -> TransportResult<Vec<MedicineItem>> {
        self.simulate(self.latency.read).await;
        Ok(Envelope::ok(self.medicines()))
    }

    async fn get_medicine(&self, id: MedicineId) -> TransportResult<MedicineItem> {
        self.simulate(self.latency.read).await;
        let found = self.read().medicines.iter().find(|m| m.id == id).cloned();
        Ok(found.map_or_else(|| Envelope::failure(MEDICINE_NOT_FOUND), Envelope::ok))
    }

    async fn create_medicine(&self, payload: &MedicinePayload) -> TransportResult<MedicineItem> {
        self.simulate(self.latency.write).await;
        let id = MedicineId::new(self.next_medicine_id.fetch_add(1, Ordering::SeqCst));
        let item = MedicineItem::from_payload(id, payload.clone(), self.clock.now());
        self.write().medicines.push(item.clone());
        tracing::debug!(%id, "mock medicine created");
        Ok(Envelope::ok_with_message(item, "Medicine added"))
    }

    async fn update_medicine(
        &self,
        id: MedicineId,
        payload: &MedicinePayload,
    ) -> TransportResult<MedicineItem> {
        self.simulate(self.latency.write).await;
        let now = self.clock.now();
        let mut store = self.write();
        let Some(item) = store.medicines.iter_mut().find(|m| m.id == id) else {
            return Ok(Envelope::failure(MEDICINE_NOT_FOUND));
        };
        item.apply_payload(payload.clone(), now);
        Ok(Envelope::ok_with_message(item.clone(), "Medicine updated"))
    }

    async fn delete_medicine(&self, id: MedicineId) -> TransportResult<()> {
        self.simulate(self.latency.write).await;
        let mut store = self.write();
        let before = store.medicines.len();
        store.medicines.retain(|m| m.id != id);
        if store.medicines.len() == before {
            return Ok(Envelope::failure(MEDICINE_NOT_FOUND));
        }
        Ok(Envelope::done("Medicine deleted"))
    }

    async fn list_visits(&self) -> TransportResult<Vec<VisitRecord>> {
        self.simulate(self.latency.read).await;
        Ok(Envelope::ok(self.visits()))
    }

    async fn get_visit(&self, id: VisitId) -> TransportResult<VisitRecord> {
        self.simulate(self.latency.read).await;
        let found = self.read().visits.iter().find(|v| v.id == id).cloned();
        Ok(found.map_or_else(|| Envelope::failure(VISIT_NOT_FOUND), Envelope::ok))
    }

    async fn create_visit(&self, payload: &VisitPayload) -> TransportResult<VisitRecord> {
        self.simulate(self.latency.write).await;
        let id = VisitId::new(self.next_visit_id.fetch_add(1, Ordering::SeqCst));
        let visit = VisitRecord::from_payload(id, payload.clone(), self.clock.now());
        self.write().visits.push(visit.clone());
        tracing::debug!(%id, "mock visit created");
        Ok(Envelope::ok_with_message(visit, "Patient visit recorded"))
    }

    async fn search_visits(&self, query: &str) -> TransportResult<Vec<VisitRecord>> {
        self.simulate(self.latency.read).await;
        let query = query.trim();
        if query.is_empty() {
            return Ok(Envelope::failure(QUERY_REQUIRED));
        }
        let found = self
            .read()
            .visits
            .iter()
            .filter(|v| matches_query(v, query))
            .cloned()
            .collect();
        Ok(Envelope::ok(found))
    }

    async fn daily_visits(&self, date: NaiveDate) -> TransportResult<Vec<VisitRecord>> {
        self.simulate(self.latency.read).await;
        let mut day: Vec<VisitRecord> = self
            .read()
            .visits
            .iter()
            .filter(|v| v.is_on(date))
            .cloned()
            .collect();
        day.sort_by(|a, b| a.visit_time.cmp(&b.visit_time).then(a.id.cmp(&b.id)));
        Ok(Envelope::ok(day))
    }

    async fn dashboard_stats(&self) -> TransportResult<DashboardStats> {
        self.simulate(self.latency.stats).await;
        let store = self.read();
        Ok(Envelope::ok(compute_stats(
            &store.medicines,
            &store.visits,
            self.clock.today(),
        )))
    }

    async fn notifications(&self) -> TransportResult<Vec<Notification>> {
        self.simulate(self.latency.notifications).await;
        let store = self.read();
        Ok(Envelope::ok(derive_notifications(
            &store.medicines,
            self.clock.today(),
            self.clock.now(),
        )))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn medicine(id: i64, name: &str, category: &str, quantity: u32, expiry: NaiveDate, description: &str) -> MedicineItem {
    MedicineItem {
        id: MedicineId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        quantity,
        expiry_date: expiry,
        description: Some(description.to_string()),
        created_at: None,
        updated_at: None,
    }
}

pub fn seed_medicines() -> Vec<MedicineItem> {
    vec![
        medicine(1, "Paracetamol", "Tablet", 50, date(2024, 12, 31), "Pereda nyeri dan penurun demam"),
        medicine(2, "Betadine", "Cairan", 3, date(2024, 6, 30), "Antiseptik untuk luka"),
        medicine(3, "Hansaplast", "Plester", 25, date(2025, 3, 15), "Plester luka"),
        medicine(4, "Ibuprofen", "Tablet", 2, date(2024, 8, 20), "Anti-inflamasi dan pereda nyeri"),
        medicine(5, "Alcohol 70%", "Cairan", 8, date(2025, 1, 10), "Antiseptik pembersih"),
        medicine(6, "Salep Luka", "Salep", 12, date(2024, 11, 30), "Salep untuk luka lecet"),
        medicine(7, "Vitamin C", "Tablet", 1, date(2024, 5, 15), "Suplemen vitamin C"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn visit(
    id: i64,
    name: &str,
    class_or_role: &str,
    date: NaiveDate,
    (h, m): (u32, u32),
    complaint: &str,
    diagnosis: &str,
    medicine_given: &str,
) -> VisitRecord {
    VisitRecord {
        id: VisitId::new(id),
        name: name.to_string(),
        class_or_role: class_or_role.to_string(),
        visit_date: date,
        visit_time: NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default(),
        complaint: complaint.to_string(),
        diagnosis: Some(diagnosis.to_string()),
        medicine_given: Some(medicine_given.to_string()),
        created_at: None,
    }
}

/// Two students and one teacher, all visiting on `today`.
pub fn seed_visits(today: NaiveDate) -> Vec<VisitRecord> {
    vec![
        visit(1, "Ahmad Rizki", "Kelas 10A", today, (9, 30), "Sakit kepala", "Tension headache", "Paracetamol 1 tablet"),
        visit(
            2,
            "Siti Nurhaliza",
            "Guru Matematika",
            today,
            (10, 15),
            "Luka lecet di tangan",
            "Abrasio minor",
            "Betadine + Hansaplast",
        ),
        visit(3, "Budi Santoso", "Kelas 11B", today, (11, 45), "Demam dan batuk", "Common cold", "Paracetamol 1 tablet"),
    ]
}
