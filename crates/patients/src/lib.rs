//! Patient visit domain module.
//!
//! Deterministic rules for clinic visits: validation, filtering, display order
//! and the printable daily report.

pub mod query;
pub mod report;
pub mod validate;
pub mod view;
pub mod visit;

pub use query::{VisitFilter, sort_newest_first};
pub use report::{DailyReport, ReportEntry, ReportSummary};
pub use validate::VisitDraft;
pub use view::{EMPTY_VISITS_MESSAGE, VisitRow, render_table};
pub use visit::{RoleKind, VisitId, VisitPayload, VisitRecord, parse_visit_time};
