//! Resume document store. Holds the authoritative in-memory copy of the resume
//! being edited, kept consistent with the remote record under optimistic
//! editing and background auto-save.
//!
//! Concurrency rules:
//! - All state lives behind one `std::sync::Mutex` that is never held across
//!   an `.await`. Only the persistence calls suspend.
//! - At most one write (update, or create for an unsaved draft) is in flight
//!   per store. A `persist()` issued while one is in flight only sets
//!   `resave_requested`; the drain loop reads the freshest local content
//!   after the in-flight call resolves.
//! - `session` changes whenever the open document changes identity. Results
//!   that belong to an older session are discarded; a late create only adds
//!   the new document to `resumes`.
//! - The auto-save task re-checks its generation under the lock in the same
//!   critical section that starts a save, so no tick can save after
//!   `disable_autosave()` returns.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use resume_model::{ContentPatch, ResumeContent, ResumeDocument, ResumeId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::persistence::{PersistenceApi, PersistenceError};
use crate::state::{SaveStatus, StoreError, StoreSnapshot};

/// Handle to the document store. Clones share the same state.
#[derive(Clone)]
pub struct DocumentStore {
    shared: Arc<Shared>,
}

struct Shared {
    api: Arc<dyn PersistenceApi>,
    config: StoreConfig,
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<StoreSnapshot>,
}

struct AutoSaveTask {
    target: ResumeId,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Inner {
    view: StoreSnapshot,
    session: u64,
    load_seq: u64,
    save_in_flight: bool,
    resave_requested: bool,
    autosave: Option<AutoSaveTask>,
    autosave_generation: u64,
}

enum BeginSave {
    Started,
    Coalesced,
    Nothing,
}

/// The next remote write picked up by the drain loop.
enum NextSave {
    Update {
        id: ResumeId,
        patch: ContentPatch,
        session: u64,
    },
    Create {
        content: ResumeContent,
        session: u64,
    },
}

enum Tick {
    Stop,
    Skip,
    Save,
}

/// Failures after which a queued follow-up save is dropped.
fn ends_save_chain(e: &PersistenceError) -> bool {
    e.is_authorization() || *e == PersistenceError::NotFound
}

impl Inner {
    fn begin_save(&mut self) -> BeginSave {
        if self.view.current.is_none() && self.view.pending.is_none() {
            self.view.error = Some(StoreError::NothingToSave);
            return BeginSave::Nothing;
        }
        if self.save_in_flight {
            self.resave_requested = true;
            return BeginSave::Coalesced;
        }
        self.save_in_flight = true;
        self.view.save_status = SaveStatus::Saving;
        BeginSave::Started
    }

    /// Picks up the next write to send, or ends the drain. An unsaved draft
    /// is created; an open document is updated when `first` or dirty.
    fn next_save(&mut self, first: bool) -> Option<NextSave> {
        let session = self.session;
        let next = match (&self.view.current, &self.view.pending) {
            (Some(doc), Some(pending)) if first || doc.content != *pending => {
                Some(NextSave::Update {
                    id: doc.id,
                    patch: ContentPatch::full(pending),
                    session,
                })
            }
            (None, Some(draft)) => Some(NextSave::Create {
                content: draft.clone(),
                session,
            }),
            _ => None,
        };
        match next {
            Some(next) => {
                self.view.save_status = SaveStatus::Saving;
                Some(next)
            }
            None => {
                self.finish_save();
                None
            }
        }
    }

    /// Applies an update result. Returns true when another write should follow.
    fn complete_save(
        &mut self,
        session: u64,
        result: Result<ResumeDocument, PersistenceError>,
    ) -> bool {
        if self.session != session {
            debug!("Discarding save result for a document that is no longer open");
            return self.follow_up(true);
        }

        let may_continue = match result {
            Ok(doc) => {
                self.view.last_saved_at = Some(doc.updated_at);
                if let Some(entry) = self.view.resumes.iter_mut().find(|d| d.id == doc.id) {
                    *entry = doc.clone();
                }
                debug!(id = %doc.id, "Resume saved");
                self.view.current = Some(doc);
                self.view.save_status = SaveStatus::Idle;
                true
            }
            Err(e) => {
                warn!("Resume save failed: {e}");
                let terminal = ends_save_chain(&e);
                self.view.save_status = SaveStatus::SaveFailed(e);
                !terminal
            }
        };
        self.follow_up(may_continue)
    }

    /// Applies a create result. The new document is always listed, but it
    /// becomes the open one only if the open document has not changed since
    /// the request was sent.
    fn complete_create(
        &mut self,
        session: u64,
        sent: &ResumeContent,
        result: Result<ResumeDocument, PersistenceError>,
    ) -> Option<ResumeId> {
        let doc = match result {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Failed to create resume: {e}");
                if self.session == session {
                    self.view.save_status = SaveStatus::SaveFailed(e.clone());
                    self.view.error = Some(StoreError::Persistence(e));
                }
                return None;
            }
        };

        let id = doc.id;
        info!(%id, "Resume created");
        self.view.resumes.insert(0, doc.clone());
        if self.session != session {
            debug!(%id, "Created document is no longer the open one");
            return Some(id);
        }

        // Edits made to the draft while the create was in flight stay local
        // and dirty.
        let edited_meanwhile = self.view.current.is_none()
            && self.view.pending.as_ref().is_some_and(|p| p != sent);
        let pending = if edited_meanwhile {
            self.view.pending.take()
        } else {
            Some(doc.content.clone())
        };
        self.switch_document();
        self.view.pending = pending;
        self.view.last_saved_at = Some(doc.updated_at);
        self.view.current = Some(doc);
        self.view.save_status = SaveStatus::Idle;
        Some(id)
    }

    /// Consumes a queued follow-up when allowed, otherwise ends the drain.
    fn follow_up(&mut self, may_continue: bool) -> bool {
        if self.resave_requested && may_continue {
            self.resave_requested = false;
            return true;
        }
        self.finish_save();
        false
    }

    fn finish_save(&mut self) {
        self.save_in_flight = false;
        self.resave_requested = false;
        if self.view.save_status.is_saving() {
            self.view.save_status = SaveStatus::Idle;
        }
    }

    fn autosave_tick(&mut self, generation: u64, target: ResumeId) -> Tick {
        if self.autosave_generation != generation {
            return Tick::Stop;
        }
        if self.view.current_id() != Some(target) || self.save_in_flight || !self.view.is_dirty()
        {
            return Tick::Skip;
        }
        match self.begin_save() {
            BeginSave::Started => Tick::Save,
            _ => Tick::Skip,
        }
    }

    fn stop_autosave(&mut self) {
        self.autosave_generation += 1;
        if let Some(task) = self.autosave.take() {
            debug!(id = %task.target, "Auto-save disabled");
            task.handle.abort();
        }
        self.view.autosave_target = None;
    }

    /// Marks a change of the open document: in-flight loads and saves that
    /// belong to the previous one will be ignored when they resolve.
    fn switch_document(&mut self) {
        self.session += 1;
        self.load_seq += 1;
        self.view.is_loading = false;
    }

    fn clear_open_document(&mut self) {
        self.view.current = None;
        self.view.pending = None;
        self.view.save_status = SaveStatus::Idle;
        self.view.last_saved_at = None;
        self.switch_document();
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = inner.autosave.take() {
            task.handle.abort();
        }
    }
}

impl DocumentStore {
    pub fn new(api: Arc<dyn PersistenceApi>, config: StoreConfig) -> Self {
        let (snapshot_tx, _) = watch::channel(StoreSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                api,
                config,
                inner: Mutex::new(Inner::default()),
                snapshot_tx,
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().view.clone()
    }

    /// Receives a new snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().view.is_dirty()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` under the state lock and publishes the resulting snapshot.
    fn update<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.lock();
        let out = f(&mut inner);
        let view = &inner.view;
        self.shared.snapshot_tx.send_if_modified(|snap| {
            if snap == view {
                false
            } else {
                *snap = view.clone();
                true
            }
        });
        out
    }

    /// Bounds a persistence call by the configured request timeout.
    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, PersistenceError>>,
    ) -> Result<T, PersistenceError> {
        let limit = self.shared.config.request_timeout;
        tokio::time::timeout(limit, fut)
            .await
            .unwrap_or(Err(PersistenceError::Timeout(limit)))
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Fetches `id` and makes it the open document. Only the most recently
    /// started load is applied.
    pub async fn load(&self, id: ResumeId) {
        let seq = self.update(|inner| {
            inner.load_seq += 1;
            inner.view.is_loading = true;
            inner.view.error = None;
            inner.load_seq
        });

        let result = self.call(self.shared.api.get(id)).await;

        self.update(|inner| {
            if inner.load_seq != seq {
                debug!(%id, "Discarding stale load response");
                return;
            }
            inner.view.is_loading = false;
            match result {
                Ok(doc) => {
                    info!(%id, "Resume loaded");
                    inner.switch_document();
                    inner.view.pending = Some(doc.content.clone());
                    inner.view.current = Some(doc);
                    inner.view.save_status = SaveStatus::Idle;
                    inner.view.last_saved_at = None;
                }
                Err(e) => {
                    warn!(%id, "Failed to load resume: {e}");
                    inner.view.error = Some(StoreError::from_lookup(id, e));
                }
            }
        });
    }

    /// Opens an unsaved draft. Nothing is sent until `persist()` or `create()`.
    pub fn start_draft(&self, content: ResumeContent) {
        self.update(|inner| {
            inner.stop_autosave();
            inner.clear_open_document();
            inner.view.pending = Some(content);
            inner.view.error = None;
        });
    }

    /// Closes the open document, stopping auto-save first.
    pub fn close(&self) {
        self.update(|inner| {
            inner.stop_autosave();
            inner.clear_open_document();
            inner.view.error = None;
        });
    }

    pub fn clear_error(&self) {
        self.update(|inner| inner.view.error = None);
    }

    /// Fetches the owner's documents, most recently updated first.
    pub async fn refresh_list(&self) {
        self.update(|inner| {
            inner.view.is_loading = true;
            inner.view.error = None;
        });

        let result = self.call(self.shared.api.list()).await;

        self.update(|inner| {
            inner.view.is_loading = false;
            match result {
                Ok(resumes) => inner.view.resumes = resumes,
                Err(e) if e.is_authorization() => inner.view.error = Some(StoreError::Unauthorized),
                Err(e) => inner.view.error = Some(StoreError::Persistence(e)),
            }
        });
    }

    /// Fetches dashboard counters. A failure keeps the previous counters.
    pub async fn refresh_stats(&self) {
        let result = self.call(self.shared.api.stats()).await;

        self.update(|inner| match result {
            Ok(stats) => inner.view.stats = Some(stats),
            Err(e) => {
                warn!("Failed to fetch resume stats: {e}");
                inner.view.error = Some(match e {
                    e if e.is_authorization() => StoreError::Unauthorized,
                    e => StoreError::Persistence(e),
                });
            }
        });
    }

    // ── Editing ──────────────────────────────────────────────────────────

    /// Merges `patch` into the local content immediately. Never touches the
    /// network and never fails; persistence failures show up in `save_status`.
    pub fn apply_field_update(&self, patch: &ContentPatch) {
        self.update(|inner| {
            let merged = match (&inner.view.pending, &inner.view.current) {
                (Some(pending), _) => pending.merged(patch),
                (None, Some(doc)) => doc.content.merged(patch),
                (None, None) => ResumeContent::default().merged(patch),
            };
            inner.view.pending = Some(merged);
        });
    }

    /// Sends local content to the persistence API. Coalesces with a write
    /// that is already in flight; an unsaved draft is created instead.
    pub async fn persist(&self) {
        match self.update(|inner| inner.begin_save()) {
            BeginSave::Started => self.spawn_drain().await,
            BeginSave::Coalesced => debug!("Save already in flight; queued a follow-up"),
            BeginSave::Nothing => {}
        }
    }

    /// Runs the drain loop on its own task so that dropping the caller's
    /// future cannot leave `save_in_flight` stuck.
    async fn spawn_drain(&self) {
        let store = self.clone();
        let handle = tokio::spawn(async move { store.drain_saves().await });
        if let Err(e) = handle.await {
            error!("Save task ended abnormally: {e}");
            self.update(|inner| {
                inner.finish_save();
                inner.view.save_status =
                    SaveStatus::SaveFailed(PersistenceError::Transient(e.to_string()));
            });
        }
    }

    async fn drain_saves(&self) {
        let mut first = true;
        while let Some(next) = self.update(|inner| inner.next_save(first)) {
            first = false;
            let more = match next {
                NextSave::Update { id, patch, session } => {
                    debug!(%id, "Persisting resume");
                    let result = self.call(self.shared.api.update(id, &patch)).await;
                    self.update(|inner| inner.complete_save(session, result))
                }
                NextSave::Create { content, session } => {
                    debug!("Creating resume from draft");
                    let result = self.call(self.shared.api.create(&content)).await;
                    let may_continue = !matches!(&result, Err(e) if ends_save_chain(e));
                    self.update(|inner| {
                        inner.complete_create(session, &content, result);
                        inner.follow_up(may_continue)
                    })
                }
            };
            if !more {
                break;
            }
        }
    }

    // ── Remote lifecycle ─────────────────────────────────────────────────

    /// Persists a brand-new document and makes it the open one, unless the
    /// open document changes while the request is in flight. Returns the new
    /// id either way.
    pub async fn create(&self, content: ResumeContent) -> Option<ResumeId> {
        let session = self.update(|inner| {
            inner.view.save_status = SaveStatus::Saving;
            inner.view.error = None;
            inner.session
        });

        let result = self.call(self.shared.api.create(&content)).await;

        self.update(|inner| inner.complete_create(session, &content, result))
    }

    /// Removes `id` remotely. When it is the open document, auto-save is
    /// disabled before the request and the local copy cleared on success.
    pub async fn delete(&self, id: ResumeId) {
        self.update(|inner| {
            if inner.view.current_id() == Some(id) {
                inner.stop_autosave();
            }
            inner.view.error = None;
        });

        let result = self.call(self.shared.api.delete(id)).await;

        self.update(|inner| match result {
            Ok(()) => {
                info!(%id, "Resume deleted");
                inner.view.resumes.retain(|d| d.id != id);
                if inner.view.current_id() == Some(id) {
                    if inner.autosave.is_some() {
                        inner.stop_autosave();
                    }
                    inner.clear_open_document();
                }
            }
            Err(e) => {
                warn!(%id, "Failed to delete resume: {e}");
                inner.view.error = Some(StoreError::from_lookup(id, e));
            }
        });
    }

    /// Requests a server-side copy. The open document is not affected.
    pub async fn duplicate(&self, id: ResumeId) -> Option<ResumeDocument> {
        self.update(|inner| inner.view.error = None);

        let result = self.call(self.shared.api.duplicate(id)).await;

        self.update(|inner| match result {
            Ok(doc) => {
                info!(source = %id, copy = %doc.id, "Resume duplicated");
                inner.view.resumes.insert(0, doc.clone());
                Some(doc)
            }
            Err(e) => {
                warn!(%id, "Failed to duplicate resume: {e}");
                inner.view.error = Some(StoreError::from_lookup(id, e));
                None
            }
        })
    }

    // ── Auto-save ────────────────────────────────────────────────────────

    /// Starts periodic saving of `id`, replacing any previous auto-save task.
    /// Ticks only save while `id` is the open document and has unsaved edits.
    pub fn enable_autosave(&self, id: ResumeId) {
        let shared = Arc::downgrade(&self.shared);
        let period = self.shared.config.autosave_interval;
        self.update(|inner| {
            inner.stop_autosave();
            let generation = inner.autosave_generation;
            let handle = tokio::spawn(autosave_loop(shared, generation, id, period));
            inner.autosave = Some(AutoSaveTask { target: id, handle });
            inner.view.autosave_target = Some(id);
        });
        info!(%id, ?period, "Auto-save enabled");
    }

    /// Stops auto-save. Idempotent; once this returns no further tick saves.
    pub fn disable_autosave(&self) {
        self.update(|inner| inner.stop_autosave());
    }
}

async fn autosave_loop(shared: Weak<Shared>, generation: u64, target: ResumeId, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let store = DocumentStore { shared };
        match store.update(|inner| inner.autosave_tick(generation, target)) {
            Tick::Stop => return,
            Tick::Skip => {}
            Tick::Save => {
                debug!(id = %target, "Auto-save tick");
                store.spawn_drain().await;
            }
        }
    }
}
