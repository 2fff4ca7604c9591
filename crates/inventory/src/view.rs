//! Table rows for the inventory screen.

use chrono::NaiveDate;
use serde::Serialize;

use uks_core::TableView;

use crate::item::{ExpiryStatus, MedicineId, MedicineItem, StockLevel};
use crate::query::sort_by_expiry;

pub const EMPTY_INVENTORY_MESSAGE: &str = "No medicines found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicineRow {
    pub id: MedicineId,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub stock: StockLevel,
    pub expiry_date: NaiveDate,
    pub expiry: ExpiryStatus,
    pub expiry_label: String,
    /// `-` when the record has no description.
    pub description: String,
    /// Row needs attention (low stock or expired).
    pub highlight: bool,
}

impl MedicineRow {
    pub fn from_item(item: &MedicineItem, today: NaiveDate) -> Self {
        let expiry = item.expiry_status(today);
        Self {
            id: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            stock: item.stock_level(),
            expiry_date: item.expiry_date,
            expiry,
            expiry_label: expiry_label(item.days_until_expiry(today)),
            description: item
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("-")
                .to_string(),
            highlight: item.is_low_stock() || expiry == ExpiryStatus::Expired,
        }
    }
}

/// Human label for the distance to an expiry date.
pub fn expiry_label(days: i64) -> String {
    match days {
        d if d < 0 => format!("Expired {} days ago", d.abs()),
        0 => "Expires today".to_string(),
        1 => "Expires tomorrow".to_string(),
        d if d <= 30 => format!("{d} days left"),
        d if d <= 365 => format!("{} months left", d / 30),
        d => format!("{} years left", d / 365),
    }
}

/// Pure render of the visible list: sorted by expiry, explicit empty state.
pub fn render_table(visible: &[MedicineItem], today: NaiveDate) -> TableView<MedicineRow> {
    let mut sorted = visible.to_vec();
    sort_by_expiry(&mut sorted);
    let rows = sorted
        .iter()
        .map(|item| MedicineRow::from_item(item, today))
        .collect();
    TableView::from_rows(rows, EMPTY_INVENTORY_MESSAGE)
}
