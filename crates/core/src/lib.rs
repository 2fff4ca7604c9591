//! `uks-core`: shared building blocks for the clinic client.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP).

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod timestamp;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, FieldError, Validated, ValidationErrors, ValidationWarning};
pub use id::RecordId;
pub use view::TableView;
