use tracing::{debug, info, warn};

use crate::client::ResourceClient;
use crate::config::ScreenConfig;
use crate::edit::{upsert_route, validate_required, EditState, UpsertRoute};
use crate::error::{ClientError, ConsoleError, Notice};
use crate::filter::{apply_filters, derive_options, FieldOptions, FilterState};
use crate::pipeline::{Pipeline, Snapshot};
use crate::record::{FieldValue, Record};
use crate::render::{render, RenderedView, ViewMode};
use crate::tenant::{stamp_tenant, TenantContext};

/// One resource screen: the latest snapshot of a collection, the filters the
/// operator picked, the projection those filters leave visible, and the edit
/// form.
///
/// Every mutator recomputes options and projection before it returns, so the
/// projection never lags behind the snapshot or the filter state.
pub struct ResourceScreen<C> {
    config: ScreenConfig,
    client: C,
    pipeline: Pipeline,
    snapshot: Snapshot,
    options: Vec<FieldOptions>,
    filters: FilterState,
    projection: Vec<Record>,
    edit: EditState,
    notices: Vec<Notice>,
}

impl<C: ResourceClient> ResourceScreen<C> {
    pub fn new(config: ScreenConfig, client: C, tenant: TenantContext) -> Self {
        let pipeline = Pipeline::for_screen(&config, tenant);
        let options = derive_options(&[], &config.filters);
        Self {
            config,
            client,
            pipeline,
            snapshot: Snapshot::empty(),
            options,
            filters: FilterState::new(),
            projection: Vec::new(),
            edit: EditState::Closed,
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn tenant(&self) -> TenantContext {
        self.pipeline.tenant()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn projection(&self) -> &[Record] {
        &self.projection
    }

    pub fn filter_options(&self) -> &[FieldOptions] {
        &self.options
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Drives visibility of the reset control.
    pub fn has_active_filters(&self) -> bool {
        self.filters.is_active()
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn find(&self, id: &FieldValue) -> Option<&Record> {
        self.snapshot
            .records()
            .iter()
            .find(|record| record.get(&self.config.identity_field).loosely_equals(id))
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    // --- Snapshot ---

    /// Lists the collection and runs it through the pipeline without touching
    /// the screen. Pair with [`Self::install_snapshot`].
    pub async fn fetch_snapshot(&self) -> Result<Snapshot, ClientError> {
        let raw = self.client.list().await?;
        Ok(self.pipeline.materialize(raw))
    }

    /// Replaces the snapshot wholesale. Whichever snapshot is installed last
    /// wins, regardless of when its fetch started.
    pub fn install_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.options = derive_options(self.snapshot.records(), &self.config.filters);
        let dropped = self.filters.retain_valid(&self.options);
        if !dropped.is_empty() {
            debug!(
                collection = %self.config.collection,
                fields = ?dropped,
                "dropped filter selections missing from new snapshot"
            );
        }
        self.recompute_projection();
        info!(
            collection = %self.config.collection,
            records = self.snapshot.len(),
            visible = self.projection.len(),
            "installed snapshot"
        );
    }

    /// Installs a successful fetch; on failure keeps the previous snapshot and
    /// posts one notice.
    pub fn apply_fetch(&mut self, result: Result<Snapshot, ClientError>) -> Result<(), ConsoleError> {
        match result {
            Ok(snapshot) => {
                self.install_snapshot(snapshot);
                Ok(())
            }
            Err(err) => {
                warn!(collection = %self.config.collection, error = %err, "reload failed");
                self.notify(Notice::error(format!(
                    "Failed to load {}: {}",
                    self.config.collection, err
                )));
                Err(err.into())
            }
        }
    }

    pub async fn reload(&mut self) -> Result<(), ConsoleError> {
        let result = self.fetch_snapshot().await;
        self.apply_fetch(result)
    }

    // --- Filters ---

    pub fn select_filter(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ConsoleError> {
        self.filters.select(field, value.into(), &self.options)?;
        self.recompute_projection();
        Ok(())
    }

    pub fn clear_filter(&mut self, field: &str) {
        self.filters.clear(field);
        self.recompute_projection();
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.recompute_projection();
    }

    fn recompute_projection(&mut self) {
        self.projection = apply_filters(self.snapshot.records(), &self.filters);
    }

    // --- Rendering ---

    pub fn render(&self, mode: ViewMode) -> RenderedView {
        render(&self.projection, &self.config.render_spec(), mode)
    }

    pub fn render_default(&self) -> RenderedView {
        self.render(self.config.view)
    }

    // --- Edit flow ---

    pub fn open_create(&mut self) -> Result<(), ConsoleError> {
        self.edit.open_new()
    }

    /// Opens the form prefilled from the current snapshot.
    pub fn open_edit(&mut self, id: &FieldValue) -> Result<(), ConsoleError> {
        if self.edit.is_open() {
            return Err(ConsoleError::EditInProgress);
        }
        match self.find(id).cloned() {
            Some(record) => self.edit.open_existing(record),
            None => Err(self.unknown_record(id)),
        }
    }

    /// Opens the form prefilled from the server copy of the record.
    pub async fn open_edit_fresh(&mut self, id: &FieldValue) -> Result<(), ConsoleError> {
        if self.edit.is_open() {
            return Err(ConsoleError::EditInProgress);
        }
        let record = match self.client.get(&id.display()).await {
            Ok(record) => record,
            Err(err) => {
                warn!(collection = %self.config.collection, id = %id.display(), error = %err, "fetch for edit failed");
                self.notify(Notice::error(format!("Failed to load record: {err}")));
                return Err(err.into());
            }
        };
        let visible = self.pipeline.materialize(vec![record]);
        match visible.records().first().cloned() {
            Some(record) => self.edit.open_existing(record),
            None => Err(self.unknown_record(id)),
        }
    }

    fn unknown_record(&mut self, id: &FieldValue) -> ConsoleError {
        let id = id.display();
        warn!(collection = %self.config.collection, id = %id, "record not visible to this screen");
        self.notify(Notice::error(format!(
            "{} record not found: {}",
            self.config.collection, id
        )));
        ConsoleError::UnknownRecord(id)
    }

    pub fn set_draft_field(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ConsoleError> {
        let pending = self.edit.pending().ok_or(ConsoleError::NoPendingEdit)?;
        if pending.is_update() && field == self.config.identity_field {
            return Err(ConsoleError::Validation(format!(
                "{field} cannot change once assigned"
            )));
        }
        self.edit.set_field(field, value)
    }

    pub fn cancel_edit(&mut self) {
        self.edit.close();
    }

    /// Creates or updates the draft, then reloads the collection.
    ///
    /// On failure the form stays open with the draft untouched and the
    /// snapshot is not modified.
    pub async fn submit(&mut self) -> Result<Record, ConsoleError> {
        let pending = self.edit.pending().ok_or(ConsoleError::NoPendingEdit)?;
        let mut draft = pending.draft().clone();

        if let Err(err) = validate_required(&draft, &self.config.required_fields) {
            self.notify(Notice::error(err.to_string()));
            return Err(err);
        }
        stamp_tenant(&mut draft, &self.config.tenant_field, self.tenant());

        let route = upsert_route(&draft, &self.config.identity_field);
        debug!(collection = %self.config.collection, route = ?route, "submitting record");
        let result = match &route {
            UpsertRoute::Create => self.client.create(&draft).await,
            UpsertRoute::Update(id) => self.client.update(id, &draft).await,
        };

        match result {
            Ok(saved) => {
                self.edit.close();
                let verb = match route {
                    UpsertRoute::Create => "Created",
                    UpsertRoute::Update(_) => "Updated",
                };
                self.notify(Notice::success(format!(
                    "{} {} record",
                    verb, self.config.collection
                )));
                if let Err(err) = self.reload().await {
                    debug!(collection = %self.config.collection, error = %err, "reload after save failed");
                }
                Ok(saved)
            }
            Err(err) => {
                warn!(collection = %self.config.collection, error = %err, "save failed");
                self.notify(Notice::error(format!("Failed to save: {err}")));
                Err(err.into())
            }
        }
    }

    /// Deletes through the client and reloads instead of removing locally.
    pub async fn delete(&mut self, id: &FieldValue) -> Result<(), ConsoleError> {
        if let Err(err) = self.client.delete(&id.display()).await {
            warn!(collection = %self.config.collection, id = %id.display(), error = %err, "delete failed");
            self.notify(Notice::error(format!("Failed to delete: {err}")));
            return Err(err.into());
        }
        self.notify(Notice::success(format!(
            "Deleted {} record",
            self.config.collection
        )));
        if let Err(err) = self.reload().await {
            debug!(collection = %self.config.collection, error = %err, "reload after delete failed");
        }
        Ok(())
    }
}
