//! Medicine inventory screen.

use std::sync::Arc;

use uks_core::{Clock, TableView};
use uks_inventory::{
    MedicineDraft, MedicineFilter, MedicineId, MedicineItem, MedicineRow, render_table,
};

use super::{CachedList, Confirmation, ControllerError, LoadOutcome, require_confirmation};
use crate::backend::ClinicBackend;
use crate::envelope::BackendError;

const ENTITY: &str = "medicine";

pub struct InventoryController {
    backend: Arc<dyn ClinicBackend>,
    clock: Arc<dyn Clock>,
    list: CachedList<MedicineItem, MedicineFilter>,
}

impl InventoryController {
    pub fn new(backend: Arc<dyn ClinicBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            list: CachedList::new(ENTITY),
        }
    }

    /// Fetch the full medicine list and re-apply the current filter.
    pub async fn load(&self) -> Result<LoadOutcome, ControllerError> {
        self.list.load(self.backend.list_medicines()).await
    }

    pub async fn refresh(&self) -> Result<LoadOutcome, ControllerError> {
        self.load().await
    }

    pub fn set_filter(&self, filter: MedicineFilter) {
        self.list.lock().set_filter(filter);
    }

    pub fn clear_filter(&self) {
        self.set_filter(MedicineFilter::default());
    }

    pub fn filter(&self) -> MedicineFilter {
        self.list.lock().filter().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.list.lock().is_loaded()
    }

    pub fn all_items(&self) -> Vec<MedicineItem> {
        self.list.lock().all().to_vec()
    }

    pub fn visible_items(&self) -> Vec<MedicineItem> {
        self.list.lock().visible().to_vec()
    }

    pub fn get(&self, id: MedicineId) -> Option<MedicineItem> {
        self.list.lock().find(id).cloned()
    }

    /// Table rows for the current filter, soonest expiry first.
    pub fn render(&self) -> TableView<MedicineRow> {
        let visible = self.visible_items();
        render_table(&visible, self.clock.today())
    }

    /// Pre-filled edit form for a cached medicine.
    pub fn edit_draft(&self, id: MedicineId) -> Result<MedicineDraft, ControllerError> {
        self.get(id)
            .map(|item| MedicineDraft::from(&item))
            .ok_or_else(|| ControllerError::not_found(ENTITY, id))
    }

    pub async fn create(
        &self,
        draft: &MedicineDraft,
        confirmation: Confirmation,
    ) -> Result<MedicineItem, ControllerError> {
        let validated = draft.validate(self.clock.today())?;
        require_confirmation(&validated.warnings, confirmation)?;

        let created = self
            .backend
            .create_medicine(&validated.value)
            .await
            .map_err(BackendError::from)
            .and_then(|env| env.into_data())
            .map_err(|err| self.list.report("create", err))?;

        tracing::info!(id = %created.id, name = %created.name, "medicine created");
        self.list.commit(|state| state.upsert(created.clone()));
        Ok(created)
    }

    pub async fn update(
        &self,
        id: MedicineId,
        draft: &MedicineDraft,
        confirmation: Confirmation,
    ) -> Result<MedicineItem, ControllerError> {
        let validated = draft.validate(self.clock.today())?;
        require_confirmation(&validated.warnings, confirmation)?;

        let updated = self
            .backend
            .update_medicine(id, &validated.value)
            .await
            .map_err(BackendError::from)
            .and_then(|env| env.into_data())
            .map_err(|err| self.list.report("update", err))?;

        tracing::info!(%id, "medicine updated");
        self.list.commit(|state| state.upsert(updated.clone()));
        Ok(updated)
    }

    /// Delete a cached medicine once the user has confirmed it. Unknown ids
    /// and unconfirmed deletes never reach the backend.
    pub async fn delete(
        &self,
        id: MedicineId,
        confirmation: Confirmation,
    ) -> Result<(), ControllerError> {
        let item = self
            .get(id)
            .ok_or_else(|| ControllerError::not_found(ENTITY, id))?;
        if confirmation == Confirmation::Pending {
            return Err(ControllerError::ConfirmDelete {
                entity: ENTITY,
                name: item.name,
            });
        }

        self.backend
            .delete_medicine(id)
            .await
            .map_err(BackendError::from)
            .and_then(|env| env.into_outcome())
            .map_err(|err| self.list.report("delete", err))?;

        tracing::info!(%id, "medicine deleted");
        self.list.commit(|state| {
            state.remove(id);
        });
        Ok(())
    }

    /// Re-fetch one medicine and replace its cached copy.
    pub async fn reload_item(&self, id: MedicineId) -> Result<MedicineItem, ControllerError> {
        let item = self
            .backend
            .get_medicine(id)
            .await
            .map_err(BackendError::from)
            .and_then(|env| env.into_data())
            .map_err(|err| self.list.report("get", err))?;
        self.list.commit(|state| state.upsert(item.clone()));
        Ok(item)
    }
}
