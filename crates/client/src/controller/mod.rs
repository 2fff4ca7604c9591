//! Feature controllers.
//!
//! Each controller owns its list state behind a `std::sync::Mutex` that is
//! never held across an `.await`, so loads can overlap; the
//! [`RequestSequencer`] decides which response is applied.

pub mod dashboard;
pub mod inventory;
pub mod patients;

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use uks_core::{Entity, ValidationErrors, ValidationWarning};
use uks_inventory::{MedicineFilter, MedicineItem};
use uks_patients::{VisitFilter, VisitRecord};

use crate::envelope::BackendError;
use crate::sequencer::RequestSequencer;
use crate::transport::TransportResult;

pub use dashboard::{DashboardController, DashboardView};
pub use inventory::InventoryController;
pub use patients::PatientController;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{} warning(s) need confirmation", .0.len())]
    NeedsConfirmation(Vec<ValidationWarning>),
    #[error("deleting {entity} {name} needs confirmation")]
    ConfirmDelete { entity: &'static str, name: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ControllerError {
    pub fn user_message(&self) -> String {
        match self {
            ControllerError::Validation(errors) => errors.to_string(),
            ControllerError::NeedsConfirmation(warnings) => {
                let lines: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
                format!("{}. Continue anyway?", lines.join("; "))
            }
            ControllerError::ConfirmDelete { entity, name } => {
                format!("Delete {entity} \"{name}\"? This cannot be undone.")
            }
            ControllerError::NotFound { entity, id } => format!("{entity} {id} was not found"),
            ControllerError::InvalidInput(message) => message.clone(),
            ControllerError::Backend(err) => err.user_message(),
        }
    }

    fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ControllerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<ValidationErrors> for ControllerError {
    fn from(errors: ValidationErrors) -> Self {
        ControllerError::Validation(errors)
    }
}

/// Whether the user has already seen and accepted the form warnings.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Confirmation {
    #[default]
    Pending,
    Confirmed,
}

/// Outcome of a list load.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer load (or a write) happened while this one was in flight.
    Superseded,
}

/// Client-side list filter.
pub trait ListFilter<T>: Clone + Default + Send + 'static {
    fn apply(&self, items: &[T]) -> Vec<T>;
}

impl ListFilter<MedicineItem> for MedicineFilter {
    fn apply(&self, items: &[MedicineItem]) -> Vec<MedicineItem> {
        MedicineFilter::apply(self, items)
    }
}

impl ListFilter<VisitRecord> for VisitFilter {
    fn apply(&self, items: &[VisitRecord]) -> Vec<VisitRecord> {
        VisitFilter::apply(self, items)
    }
}

/// Authoritative cache plus the current filter result.
///
/// `visible` is always recomputed from `all`, never from a previous subset.
#[derive(Debug, Clone)]
pub struct ListState<T, F> {
    all: Vec<T>,
    visible: Vec<T>,
    filter: F,
    loaded: bool,
}

impl<T, F> Default for ListState<T, F>
where
    F: Default,
{
    fn default() -> Self {
        Self {
            all: Vec::new(),
            visible: Vec::new(),
            filter: F::default(),
            loaded: false,
        }
    }
}

impl<T, F> ListState<T, F>
where
    T: Entity + Clone,
    F: ListFilter<T>,
{
    pub fn all(&self) -> &[T] {
        &self.all
    }

    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find(&self, id: T::Id) -> Option<&T> {
        self.all.iter().find(|item| item.id() == id)
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.all = items;
        self.loaded = true;
        self.refilter();
    }

    pub fn set_filter(&mut self, filter: F) {
        self.filter = filter;
        self.refilter();
    }

    /// Insert, or replace the entry with the same id.
    pub fn upsert(&mut self, item: T) {
        match self.all.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.all.push(item),
        }
        self.refilter();
    }

    pub fn remove(&mut self, id: T::Id) -> bool {
        let before = self.all.len();
        self.all.retain(|item| item.id() != id);
        let removed = self.all.len() != before;
        if removed {
            self.refilter();
        }
        removed
    }

    fn refilter(&mut self) {
        self.visible = self.filter.apply(&self.all);
    }
}

/// List state and load fencing shared by the inventory and patient controllers.
#[derive(Debug)]
pub(crate) struct CachedList<T, F> {
    entity: &'static str,
    state: Mutex<ListState<T, F>>,
    loads: RequestSequencer,
}

impl<T, F> CachedList<T, F>
where
    T: Entity + Clone,
    F: ListFilter<T>,
{
    pub(crate) fn new(entity: &'static str) -> Self {
        Self {
            entity,
            state: Mutex::new(ListState::default()),
            loads: RequestSequencer::new(),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ListState<T, F>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `fetch` and apply its result unless a newer load or a write
    /// happened in the meantime. Failures leave the cache untouched.
    pub(crate) async fn load<Fut>(&self, fetch: Fut) -> Result<LoadOutcome, ControllerError>
    where
        Fut: Future<Output = TransportResult<Vec<T>>>,
    {
        let ticket = self.loads.issue();
        let result = fetch.await.map_err(BackendError::from).and_then(|env| env.into_data());

        if !self.loads.is_current(ticket) {
            tracing::debug!(entity = self.entity, ?ticket, "discarding stale load response");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(items) => {
                let count = items.len();
                self.lock().replace_all(items);
                tracing::debug!(entity = self.entity, count, "list loaded");
                Ok(LoadOutcome::Applied { count })
            }
            Err(err) => {
                tracing::warn!(entity = self.entity, error = %err, "list load failed");
                Err(err.into())
            }
        }
    }

    /// Apply a confirmed write and retire loads that started before it.
    pub(crate) fn commit(&self, apply: impl FnOnce(&mut ListState<T, F>)) {
        self.loads.invalidate();
        apply(&mut self.lock());
    }

    pub(crate) fn report<E: core::fmt::Display>(&self, op: &'static str, err: E) -> E {
        tracing::warn!(entity = self.entity, op, error = %err, "operation failed");
        err
    }
}

/// Apply the confirmation policy to validation warnings.
pub(crate) fn require_confirmation(
    warnings: &[ValidationWarning],
    confirmation: Confirmation,
) -> Result<(), ControllerError> {
    if warnings.is_empty() || confirmation == Confirmation::Confirmed {
        Ok(())
    } else {
        Err(ControllerError::NeedsConfirmation(warnings.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uks_inventory::{MedicineId, StockFilter};

    fn item(id: i64, name: &str, quantity: u32) -> MedicineItem {
        MedicineItem {
            id: MedicineId::new(id),
            name: name.into(),
            category: "Tablet".into(),
            quantity,
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn visible_is_always_recomputed_from_all() {
        let mut state: ListState<MedicineItem, MedicineFilter> = ListState::default();
        state.replace_all(vec![item(1, "Paracetamol", 50), item(2, "Betadine", 3)]);
        assert!(state.is_loaded());

        state.set_filter(MedicineFilter::search("beta"));
        assert_eq!(state.visible().len(), 1);

        state.set_filter(MedicineFilter::search("para"));
        assert_eq!(state.visible()[0].name, "Paracetamol");

        state.set_filter(MedicineFilter::default().with_stock(StockFilter::Low));
        assert_eq!(state.visible()[0].name, "Betadine");
    }

    #[test]
    fn upsert_and_remove_refilter() {
        let mut state: ListState<MedicineItem, MedicineFilter> = ListState::default();
        state.replace_all(vec![item(1, "Paracetamol", 50)]);
        state.set_filter(MedicineFilter::default().with_stock(StockFilter::Low));
        assert!(state.visible().is_empty());

        state.upsert(item(1, "Paracetamol", 2));
        assert_eq!(state.all().len(), 1);
        assert_eq!(state.visible().len(), 1);

        assert!(state.remove(MedicineId::new(1)));
        assert!(!state.remove(MedicineId::new(1)));
        assert!(state.visible().is_empty());
    }

    #[test]
    fn confirmation_policy() {
        let warnings = vec![ValidationWarning::new("quantity", "low")];
        assert!(require_confirmation(&[], Confirmation::Pending).is_ok());
        assert!(require_confirmation(&warnings, Confirmation::Confirmed).is_ok());
        assert_eq!(
            require_confirmation(&warnings, Confirmation::Pending),
            Err(ControllerError::NeedsConfirmation(warnings.clone()))
        );
        assert!(
            ControllerError::NeedsConfirmation(warnings)
                .user_message()
                .ends_with("Continue anyway?")
        );
    }
}
