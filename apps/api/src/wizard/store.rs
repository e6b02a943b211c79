//! Document store: the live resume of one wizard session.
//!
//! Created when the wizard opens and dropped when it closes; nothing here is
//! process-global. All edits are synchronous and run to completion under a
//! short lock. Only `load`, `save_now` and `delete` await the gateway, and
//! they never hold the lock while doing so.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::gateway::{GatewayError, ResumeGateway};
use crate::models::resume::{
    EntryPatch, FieldValue, MetaPatch, NewEntry, PersonalPatch, ResumeDocument, Section,
};
use crate::sync::lock;
use crate::wizard::scheduler::SaveScheduler;
use crate::wizard::steps::{self, CompletionReport, StepStatus, WizardStep, STEP_COUNT};

pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Quiet period that coalesces `save()` calls into one request.
    pub save_debounce: Duration,
    /// Request a debounced save after every edit.
    pub autosave: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
            autosave: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing to save.
    Skipped,
    Created(Uuid),
    Updated(Uuid),
    /// The store was reset or reloaded while the request was in flight; the
    /// response was dropped.
    Discarded,
}

/// Read-only copy of the store state for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub document: ResumeDocument,
    pub current_step: usize,
    pub identity: Option<Uuid>,
    pub is_loading: bool,
    pub is_saving: bool,
    pub is_dirty: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    document: ResumeDocument,
    current_step: usize,
    identity: Option<Uuid>,
    is_loading: bool,
    is_saving: bool,
    is_dirty: bool,
    /// Bumped on every edit; a save only clears `is_dirty` if no edit landed
    /// while its request was in flight.
    revision: u64,
    /// Bumped when the document is swapped out (reset, load); responses for
    /// an older epoch are ignored.
    epoch: u64,
}

/// The part of the store the save worker needs.
#[derive(Clone)]
struct Persistence {
    state: Arc<Mutex<StoreState>>,
    gateway: Arc<dyn ResumeGateway>,
    owner: Uuid,
    /// Held for a whole save so a second save sees the identity assigned by
    /// the first and updates instead of creating again.
    in_flight: Arc<AsyncMutex<()>>,
}

impl Persistence {
    async fn save(&self) -> Result<SaveOutcome, GatewayError> {
        let _guard = self.in_flight.lock().await;
        let (document, identity, revision, epoch) = {
            let mut state = lock(&self.state);
            if !state.is_dirty {
                return Ok(SaveOutcome::Skipped);
            }
            state.is_saving = true;
            (
                state.document.clone(),
                state.identity,
                state.revision,
                state.epoch,
            )
        };

        let result = match identity {
            Some(id) => self.gateway.update(id, self.owner, &document).await,
            None => self.gateway.create(self.owner, &document).await,
        };

        let mut state = lock(&self.state);
        state.is_saving = false;
        let stored = match result {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to save resume {identity:?}: {e}");
                return Err(e);
            }
        };

        if state.epoch != epoch {
            debug!(
                "Dropping save response for resume {}: document was replaced",
                stored.id
            );
            return Ok(SaveOutcome::Discarded);
        }
        state.identity = Some(stored.id);
        if state.revision == revision {
            state.is_dirty = false;
        } else {
            debug!("Resume {} edited during save; staying dirty", stored.id);
        }

        info!("Saved resume {} (revision {revision})", stored.id);
        Ok(match identity {
            Some(_) => SaveOutcome::Updated(stored.id),
            None => SaveOutcome::Created(stored.id),
        })
    }
}

pub struct DocumentStore {
    persistence: Persistence,
    scheduler: SaveScheduler,
    autosave: bool,
}

impl DocumentStore {
    /// Opens a session for `owner` with an empty document. Must be called
    /// from within a tokio runtime: the save worker is spawned here.
    pub fn new(gateway: Arc<dyn ResumeGateway>, owner: Uuid, options: StoreOptions) -> Self {
        let persistence = Persistence {
            state: Arc::new(Mutex::new(StoreState::default())),
            gateway,
            owner,
            in_flight: Arc::new(AsyncMutex::new(())),
        };
        let worker = persistence.clone();
        let scheduler = SaveScheduler::spawn(options.save_debounce, move || {
            let worker = worker.clone();
            async move {
                // Failures are logged and leave the document dirty for a retry.
                let _ = worker.save().await;
            }
        });
        Self {
            persistence,
            scheduler,
            autosave: options.autosave,
        }
    }

    pub fn owner(&self) -> Uuid {
        self.persistence.owner
    }

    /// Runs `apply` against the document. When it reports a change the
    /// document becomes dirty and, with autosave on, a save is requested.
    fn edit(&self, apply: impl FnOnce(&mut ResumeDocument) -> bool) -> bool {
        let changed = {
            let mut state = lock(&self.persistence.state);
            let changed = apply(&mut state.document);
            if changed {
                state.is_dirty = true;
                state.revision += 1;
            }
            changed
        };
        if changed && self.autosave {
            self.save();
        }
        changed
    }

    // ────────────────────────────────────────────────────────────────────
    // Reads
    // ────────────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = lock(&self.persistence.state);
        StoreSnapshot {
            document: state.document.clone(),
            current_step: state.current_step,
            identity: state.identity,
            is_loading: state.is_loading,
            is_saving: state.is_saving,
            is_dirty: state.is_dirty,
        }
    }

    pub fn document(&self) -> ResumeDocument {
        lock(&self.persistence.state).document.clone()
    }

    pub fn identity(&self) -> Option<Uuid> {
        lock(&self.persistence.state).identity
    }

    pub fn current_step(&self) -> usize {
        lock(&self.persistence.state).current_step
    }

    pub fn is_dirty(&self) -> bool {
        lock(&self.persistence.state).is_dirty
    }

    pub fn is_saving(&self) -> bool {
        lock(&self.persistence.state).is_saving
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.persistence.state).is_loading
    }

    pub fn step_status(&self, step: WizardStep) -> StepStatus {
        steps::step_status(step, &lock(&self.persistence.state).document)
    }

    pub fn completion_percentage(&self) -> u8 {
        steps::completion_percentage(&lock(&self.persistence.state).document)
    }

    pub fn completion(&self) -> CompletionReport {
        steps::completion_report(&lock(&self.persistence.state).document)
    }

    // ────────────────────────────────────────────────────────────────────
    // Edits
    // ────────────────────────────────────────────────────────────────────

    pub fn replace_field(&self, value: FieldValue) {
        self.edit(|doc| {
            doc.replace_field(value);
            true
        });
    }

    pub fn patch_personal(&self, patch: PersonalPatch) {
        self.edit(|doc| {
            doc.personal.apply(patch);
            true
        });
    }

    pub fn patch_meta(&self, patch: MetaPatch) {
        self.edit(|doc| {
            doc.meta.apply(patch);
            true
        });
    }

    pub fn set_summary(&self, summary: impl Into<String>) {
        self.replace_field(FieldValue::Summary(Some(summary.into())));
    }

    /// Appends `entry` to its section under a fresh identity and returns it.
    pub fn append_entry(&self, entry: impl Into<NewEntry>) -> Uuid {
        let id = Uuid::new_v4();
        let entry = entry.into();
        self.edit(|doc| {
            doc.push_entry(entry, id);
            true
        });
        id
    }

    /// Merges `patch` into the entry at `index` of the patch's section.
    /// Out-of-range indices change nothing and return false.
    pub fn update_entry(&self, index: usize, patch: EntryPatch) -> bool {
        self.edit(|doc| doc.patch_entry(index, patch))
    }

    pub fn remove_entry(&self, section: Section, index: usize) -> bool {
        self.edit(|doc| doc.remove_entry(section, index))
    }

    /// Appends a trimmed skill; blanks and exact duplicates are ignored.
    pub fn append_skill(&self, value: &str) -> bool {
        self.edit(|doc| doc.add_skill(value))
    }

    pub fn remove_skill(&self, index: usize) -> bool {
        self.edit(|doc| doc.remove_skill(index))
    }

    // ────────────────────────────────────────────────────────────────────
    // Wizard navigation
    // ────────────────────────────────────────────────────────────────────

    pub fn set_step(&self, step: usize) -> usize {
        let mut state = lock(&self.persistence.state);
        state.current_step = steps::clamp_step(step);
        state.current_step
    }

    pub fn next_step(&self) -> usize {
        let mut state = lock(&self.persistence.state);
        state.current_step = (state.current_step + 1).min(STEP_COUNT - 1);
        state.current_step
    }

    pub fn prev_step(&self) -> usize {
        let mut state = lock(&self.persistence.state);
        state.current_step = state.current_step.saturating_sub(1);
        state.current_step
    }

    // ────────────────────────────────────────────────────────────────────
    // Persistence
    // ────────────────────────────────────────────────────────────────────

    /// Requests a debounced save. Returns false, doing nothing, when there
    /// are no unsaved changes.
    pub fn save(&self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        debug!("Save requested for owner {}", self.persistence.owner);
        self.scheduler.request()
    }

    /// Saves immediately, bypassing the debounce window. Used for manual
    /// retries after a failed save.
    pub async fn save_now(&self) -> Result<SaveOutcome, GatewayError> {
        self.persistence.save().await
    }

    /// Drops a pending debounced save that has not started yet.
    pub fn cancel_pending_save(&self) {
        self.scheduler.cancel();
    }

    /// Replaces the document with the stored resume `id`. On failure the
    /// current document, identity and dirty flag are kept.
    pub async fn load(&self, id: Uuid) -> Result<(), GatewayError> {
        lock(&self.persistence.state).is_loading = true;

        let result = self
            .persistence
            .gateway
            .get(id, self.persistence.owner)
            .await;

        let mut state = lock(&self.persistence.state);
        state.is_loading = false;
        match result {
            Ok(stored) => {
                state.document = stored.document.normalized();
                state.identity = Some(stored.id);
                state.is_dirty = false;
                state.revision += 1;
                state.epoch += 1;
                info!("Loaded resume {}", stored.id);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load resume {id}: {e}");
                Err(e)
            }
        }
    }

    /// Starts over with an empty, unsaved document. Outstanding requests are
    /// not cancelled; their responses are ignored.
    pub fn reset(&self) {
        let mut state = lock(&self.persistence.state);
        state.document = ResumeDocument::default();
        state.identity = None;
        state.current_step = 0;
        state.is_dirty = false;
        state.revision += 1;
        state.epoch += 1;
    }

    /// Hard-deletes the persisted resume and resets the session. Returns
    /// false when the document was never saved.
    pub async fn delete(&self) -> Result<bool, GatewayError> {
        let Some(id) = self.identity() else {
            return Ok(false);
        };
        self.persistence
            .gateway
            .delete(id, self.persistence.owner)
            .await?;
        info!("Deleted resume {id}");
        self.cancel_pending_save();
        self.reset();
        Ok(true)
    }
}
