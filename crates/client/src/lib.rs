//! `uks-client`
//!
//! **Responsibility:** client side of the school clinic (UKS) system.
//!
//! This crate provides:
//! - the HTTP transport and the `{success, data, message}` envelope
//! - the `ClinicBackend` capability with an HTTP and an in-memory mock
//!   implementation, selected once from configuration
//! - feature controllers for medicines, patient visits and the dashboard
//!
//! Domain rules (validation, filters, derived flags, reports) live in the
//! `uks-inventory`, `uks-patients` and `uks-dashboard` crates; this crate only
//! wires them to a backend.

pub mod backend;
pub mod config;
pub mod controller;
pub mod envelope;
pub mod http;
pub mod mock;
pub mod refresh;
pub mod sequencer;
pub mod transport;

pub use backend::{ClinicBackend, build_backend};
pub use config::{ApiBaseUrl, BackendMode, ClientConfig, ConfigError};
pub use controller::{
    Confirmation, ControllerError, DashboardController, DashboardView, InventoryController,
    ListFilter, ListState, LoadOutcome, PatientController,
};
pub use envelope::{BackendError, Envelope};
pub use http::HttpBackend;
pub use mock::{MockBackend, MockLatency};
pub use refresh::{RefreshError, RefreshHandle, spawn_refresh};
pub use sequencer::{RequestSequencer, Ticket};
pub use transport::{HttpTransport, TransportError, TransportResult};
