//! In-memory search/filter/sort over the visit list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::visit::VisitRecord;

/// Current search box + filters of the visit screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitFilter {
    /// Case-insensitive substring over name, class/role, complaint, diagnosis.
    pub search: String,
    /// Exact visit date.
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring of the class/role label (e.g. `kelas 10`, `guru`).
    pub class_or_role: Option<String>,
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

impl VisitFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_class_or_role(mut self, label: impl Into<String>) -> Self {
        self.class_or_role = Some(label.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.date.is_none() && self.class_or_role.is_none()
    }

    pub fn matches(&self, visit: &VisitRecord) -> bool {
        let term = self.search.trim().to_lowercase();
        let matches_search = term.is_empty()
            || contains_ci(&visit.name, &term)
            || contains_ci(&visit.class_or_role, &term)
            || contains_ci(&visit.complaint, &term)
            || visit.diagnosis.as_deref().is_some_and(|d| contains_ci(d, &term));

        let matches_date = self.date.is_none_or(|d| visit.visit_date == d);

        let matches_role = self
            .class_or_role
            .as_deref()
            .is_none_or(|label| contains_ci(&visit.class_or_role, &label.trim().to_lowercase()));

        matches_search && matches_date && matches_role
    }

    /// Filter the full list (never a previously filtered subset).
    pub fn apply(&self, visits: &[VisitRecord]) -> Vec<VisitRecord> {
        visits.iter().filter(|v| self.matches(v)).cloned().collect()
    }
}

/// Server-side search semantics (`/pasien/search?q=`): name, class/role or
/// complaint contains the query.
pub fn matches_query(visit: &VisitRecord, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    contains_ci(&visit.name, &q) || contains_ci(&visit.class_or_role, &q) || contains_ci(&visit.complaint, &q)
}

/// Display order: newest visit first (date, then time), ties by id.
pub fn sort_newest_first(visits: &mut [VisitRecord]) {
    visits.sort_by(|a, b| {
        b.visit_date
            .cmp(&a.visit_date)
            .then(b.visit_time.cmp(&a.visit_time))
            .then(b.id.cmp(&a.id))
    });
}
