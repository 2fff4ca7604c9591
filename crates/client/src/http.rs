//! `ClinicBackend` over the REST API.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;

use uks_dashboard::{DashboardStats, Notification};
use uks_inventory::{MedicineId, MedicineItem, MedicinePayload};
use uks_patients::{VisitId, VisitPayload, VisitRecord};

use crate::backend::ClinicBackend;
use crate::config::BackendMode;
use crate::transport::{HttpTransport, TransportResult};

const NO_BODY: Option<&()> = None;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    transport: HttpTransport,
}

impl HttpBackend {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }
}

#[async_trait]
impl ClinicBackend for HttpBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Http
    }

    async fn health(&self) -> bool {
        self.transport.health().await
    }

    async fn list_medicines(&self) -> TransportResult<Vec<MedicineItem>> {
        self.transport.request(Method::GET, "/obat", &[], NO_BODY).await
    }

    async fn get_medicine(&self, id: MedicineId) -> TransportResult<MedicineItem> {
        self.transport
            .request(Method::GET, &format!("/obat/{id}"), &[], NO_BODY)
            .await
    }

    async fn create_medicine(&self, payload: &MedicinePayload) -> TransportResult<MedicineItem> {
        self.transport
            .request(Method::POST, "/obat", &[], Some(payload))
            .await
    }

    async fn update_medicine(
        &self,
        id: MedicineId,
        payload: &MedicinePayload,
    ) -> TransportResult<MedicineItem> {
        self.transport
            .request(Method::PUT, &format!("/obat/{id}"), &[], Some(payload))
            .await
    }

    async fn delete_medicine(&self, id: MedicineId) -> TransportResult<()> {
        self.transport
            .request(Method::DELETE, &format!("/obat/{id}"), &[], NO_BODY)
            .await
    }

    async fn list_visits(&self) -> TransportResult<Vec<VisitRecord>> {
        self.transport.request(Method::GET, "/pasien", &[], NO_BODY).await
    }

    async fn get_visit(&self, id: VisitId) -> TransportResult<VisitRecord> {
        self.transport
            .request(Method::GET, &format!("/pasien/{id}"), &[], NO_BODY)
            .await
    }

    async fn create_visit(&self, payload: &VisitPayload) -> TransportResult<VisitRecord> {
        self.transport
            .request(Method::POST, "/pasien", &[], Some(payload))
            .await
    }

    async fn search_visits(&self, query: &str) -> TransportResult<Vec<VisitRecord>> {
        self.transport
            .request(Method::GET, "/pasien/search", &[("q", query)], NO_BODY)
            .await
    }

    async fn daily_visits(&self, date: NaiveDate) -> TransportResult<Vec<VisitRecord>> {
        let date = date.format("%Y-%m-%d").to_string();
        self.transport
            .request(Method::GET, "/pasien/harian", &[("date", date.as_str())], NO_BODY)
            .await
    }

    async fn dashboard_stats(&self) -> TransportResult<DashboardStats> {
        self.transport
            .request(Method::GET, "/dashboard/stats", &[], NO_BODY)
            .await
    }

    async fn notifications(&self) -> TransportResult<Vec<Notification>> {
        self.transport
            .request(Method::GET, "/dashboard/notifications", &[], NO_BODY)
            .await
    }
}
