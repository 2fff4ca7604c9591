//! Medicine inventory domain module.
//!
//! This crate contains the rules for medicine stock, implemented purely as
//! deterministic logic (no IO, no HTTP, no storage): derived stock/expiry
//! flags, form validation, list filtering and table rows.

pub mod item;
pub mod query;
pub mod validate;
pub mod view;

pub use item::{
    EXPIRY_WARNING_DAYS, ExpiryStatus, LOW_STOCK_THRESHOLD, MAX_QUANTITY, MedicineId,
    MedicineItem, MedicinePayload, StockLevel,
};
pub use query::{MedicineFilter, StockFilter, sort_by_expiry};
pub use validate::MedicineDraft;
pub use view::{EMPTY_INVENTORY_MESSAGE, MedicineRow, expiry_label, render_table};
