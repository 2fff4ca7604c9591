//! Patient visit screen and daily report.

use std::sync::Arc;

use chrono::NaiveDate;

use uks_core::{Clock, TableView};
use uks_patients::{
    DailyReport, VisitDraft, VisitFilter, VisitId, VisitRecord, VisitRow, render_table,
};

use super::{CachedList, Confirmation, ControllerError, LoadOutcome, require_confirmation};
use crate::backend::ClinicBackend;
use crate::envelope::BackendError;

const ENTITY: &str = "patient visit";

pub struct PatientController {
    backend: Arc<dyn ClinicBackend>,
    clock: Arc<dyn Clock>,
    list: CachedList<VisitRecord, VisitFilter>,
}

impl PatientController {
    pub fn new(backend: Arc<dyn ClinicBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            list: CachedList::new(ENTITY),
        }
    }

    pub async fn load(&self) -> Result<LoadOutcome, ControllerError> {
        self.list.load(self.backend.list_visits()).await
    }

    pub async fn refresh(&self) -> Result<LoadOutcome, ControllerError> {
        self.load().await
    }

    pub fn set_filter(&self, filter: VisitFilter) {
        self.list.lock().set_filter(filter);
    }

    pub fn clear_filter(&self) {
        self.set_filter(VisitFilter::default());
    }

    pub fn filter(&self) -> VisitFilter {
        self.list.lock().filter().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.list.lock().is_loaded()
    }

    pub fn all_visits(&self) -> Vec<VisitRecord> {
        self.list.lock().all().to_vec()
    }

    pub fn visible_visits(&self) -> Vec<VisitRecord> {
        self.list.lock().visible().to_vec()
    }

    pub fn get(&self, id: VisitId) -> Option<VisitRecord> {
        self.list.lock().find(id).cloned()
    }

    pub fn render(&self) -> TableView<VisitRow> {
        let visible = self.visible_visits();
        render_table(&visible, self.clock.today())
    }

    /// Empty form stamped with the current date and time.
    pub fn new_draft(&self) -> VisitDraft {
        let now = self.clock.local_now();
        VisitDraft::stamped(now.date(), now.time())
    }

    /// Visits carry no advisory warnings today, but go through the same
    /// confirmation step as medicines.
    pub async fn create(
        &self,
        draft: &VisitDraft,
        confirmation: Confirmation,
    ) -> Result<VisitRecord, ControllerError> {
        let validated = draft.validate(self.clock.today())?;
        require_confirmation(&validated.warnings, confirmation)?;

        let created = self
            .backend
            .create_visit(&validated.value)
            .await
            .map_err(BackendError::from)
            .and_then(|env| env.into_data())
            .map_err(|err| self.list.report("create", err))?;

        tracing::info!(id = %created.id, "patient visit recorded");
        self.list.commit(|state| state.upsert(created.clone()));
        Ok(created)
    }

    /// Server-side search over name, class/role and complaint. The cache is
    /// not touched.
    pub async fn search_remote(&self, query: &str) -> Result<Vec<VisitRecord>, ControllerError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ControllerError::InvalidInput("search query is required".to_string()));
        }

        self.backend
            .search_visits(query)
            .await
            .map_err(BackendError::from)
            .and_then(|env| env.into_data())
            .map_err(|err| self.list.report("search", err).into())
    }

    pub async fn fetch(&self, id: VisitId) -> Result<VisitRecord, ControllerError> {
        self.backend
            .get_visit(id)
            .await
            .map_err(BackendError::from)
            .and_then(|env| env.into_data())
            .map_err(|err| self.list.report("get", err).into())
    }

    /// Report for `date` built from the cached visits.
    pub fn daily_report(&self, date: NaiveDate) -> DailyReport {
        let all = self.all_visits();
        DailyReport::generate(&all, date, self.clock.now())
    }

    /// Report for `date` built from `/pasien/harian`.
    pub async fn fetch_daily_report(&self, date: NaiveDate) -> Result<DailyReport, ControllerError> {
        let visits = self
            .backend
            .daily_visits(date)
            .await
            .map_err(BackendError::from)
            .and_then(|env| env.into_data())
            .map_err(|err| self.list.report("daily", err))?;
        Ok(DailyReport::generate(&visits, date, self.clock.now()))
    }
}
