//! Dashboard derivations.
//!
//! Aggregate counts and system notifications, computed from a medicine and
//! visit snapshot. The mock provider answers `/dashboard/*` with these; the
//! real backend computes the same thing server-side.

pub mod notification;
pub mod stats;

pub use notification::{
    ALL_NORMAL_MESSAGE, Notification, Severity, derive_notifications, group_by_severity,
    relative_time_label,
};
pub use stats::{DashboardStats, compute_stats};
