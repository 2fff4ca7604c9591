//! Table rows for the visit screen.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use uks_core::TableView;

use crate::query::sort_newest_first;
use crate::visit::{RoleKind, VisitId, VisitRecord};

pub const EMPTY_VISITS_MESSAGE: &str = "No patient visits found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRow {
    pub id: VisitId,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub is_today: bool,
    pub name: String,
    pub class_or_role: String,
    pub role: RoleKind,
    pub complaint: String,
    pub diagnosis: String,
    pub medicine_given: String,
}

pub(crate) fn dash_if_blank(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

pub(crate) fn hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

impl VisitRow {
    pub fn from_record(visit: &VisitRecord, today: NaiveDate) -> Self {
        Self {
            id: visit.id,
            visit_date: visit.visit_date,
            visit_time: hhmm(visit.visit_time),
            is_today: visit.is_on(today),
            name: visit.name.clone(),
            class_or_role: visit.class_or_role.clone(),
            role: visit.role_kind(),
            complaint: visit.complaint.clone(),
            diagnosis: dash_if_blank(visit.diagnosis.as_deref()),
            medicine_given: dash_if_blank(visit.medicine_given.as_deref()),
        }
    }
}

/// Pure render of the visible list: newest first, explicit empty state.
pub fn render_table(visible: &[VisitRecord], today: NaiveDate) -> TableView<VisitRow> {
    let mut sorted = visible.to_vec();
    sort_newest_first(&mut sorted);
    let rows = sorted
        .iter()
        .map(|v| VisitRow::from_record(v, today))
        .collect();
    TableView::from_rows(rows, EMPTY_VISITS_MESSAGE)
}
