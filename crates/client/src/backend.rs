//! Backend capability interface.
//!
//! Controllers only see `Arc<dyn ClinicBackend>`. Whether that is the HTTP
//! API or the in-memory mock is decided once, in [`build_backend`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use uks_core::Clock;
use uks_dashboard::{DashboardStats, Notification};
use uks_inventory::{MedicineId, MedicineItem, MedicinePayload};
use uks_patients::{VisitId, VisitPayload, VisitRecord};

use crate::config::{BackendMode, ClientConfig};
use crate::http::HttpBackend;
use crate::mock::{MockBackend, MockLatency};
use crate::transport::{HttpTransport, TransportError, TransportResult};

/// One method per clinic API operation.
///
/// A `success: false` envelope and an `Err` are both failures; callers
/// normally go through [`Envelope::into_data`](crate::Envelope::into_data)
/// so they handle both the same way.
#[async_trait]
pub trait ClinicBackend: Send + Sync + 'static {
    fn mode(&self) -> BackendMode;

    async fn health(&self) -> bool;

    async fn list_medicines(&self) -> TransportResult<Vec<MedicineItem>>;
    async fn get_medicine(&self, id: MedicineId) -> TransportResult<MedicineItem>;
    async fn create_medicine(&self, payload: &MedicinePayload) -> TransportResult<MedicineItem>;
    async fn update_medicine(
        &self,
        id: MedicineId,
        payload: &MedicinePayload,
    ) -> TransportResult<MedicineItem>;
    async fn delete_medicine(&self, id: MedicineId) -> TransportResult<()>;

    async fn list_visits(&self) -> TransportResult<Vec<VisitRecord>>;
    async fn get_visit(&self, id: VisitId) -> TransportResult<VisitRecord>;
    async fn create_visit(&self, payload: &VisitPayload) -> TransportResult<VisitRecord>;
    async fn search_visits(&self, query: &str) -> TransportResult<Vec<VisitRecord>>;
    async fn daily_visits(&self, date: NaiveDate) -> TransportResult<Vec<VisitRecord>>;

    async fn dashboard_stats(&self) -> TransportResult<DashboardStats>;
    async fn notifications(&self) -> TransportResult<Vec<Notification>>;
}

/// Composition-time selection of the backend implementation.
pub fn build_backend(
    config: &ClientConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn ClinicBackend>, TransportError> {
    match config.mode {
        BackendMode::Http => {
            tracing::info!(base_url = %config.base_url, "using HTTP backend");
            let transport = HttpTransport::new(config.base_url.clone(), config.request_timeout)?;
            Ok(Arc::new(HttpBackend::new(transport)))
        }
        BackendMode::Mock => {
            let latency = config
                .mock_latency
                .map(MockLatency::uniform)
                .unwrap_or_default();
            tracing::info!(?latency, "using mock backend");
            Ok(Arc::new(MockBackend::seeded(clock).with_latency(latency)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uks_core::SystemClock;

    #[test]
    fn selects_implementation_from_mode() {
        let mut config = ClientConfig::default();
        let backend = build_backend(&config, Arc::new(SystemClock)).unwrap();
        assert_eq!(backend.mode(), BackendMode::Http);

        config.mode = BackendMode::Mock;
        config.mock_latency = Some(Duration::ZERO);
        let backend = build_backend(&config, Arc::new(SystemClock)).unwrap();
        assert_eq!(backend.mode(), BackendMode::Mock);
    }
}
