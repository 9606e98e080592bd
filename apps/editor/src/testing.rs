//! Scripted in-memory `PersistenceApi` for store tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use resume_model::{
    ContactInfo, ContentPatch, EducationEntry, ExperienceEntry, ResumeContent, ResumeDocument,
    ResumeId, ResumeStats, DEFAULT_TEMPLATE,
};
use tokio::sync::Semaphore;

use crate::persistence::{PersistenceApi, PersistenceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    Create,
    Update,
    Get,
    List,
    Delete,
    Duplicate,
    Stats,
}

#[derive(Default)]
struct Script {
    docs: HashMap<ResumeId, ResumeDocument>,
    foreign: HashSet<ResumeId>,
    calls: HashMap<Op, usize>,
    sent_updates: Vec<(ResumeId, ContentPatch)>,
    failures: VecDeque<(Op, PersistenceError)>,
    latency: HashMap<Op, Duration>,
    get_delay: HashMap<ResumeId, Duration>,
    clock: i64,
}

impl Script {
    fn now(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(self.clock)
    }

    fn insert(&mut self, content: ResumeContent) -> ResumeDocument {
        let now = self.now();
        let doc = ResumeDocument {
            id: ResumeId::new(),
            content,
            template: DEFAULT_TEMPLATE.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.docs.insert(doc.id, doc.clone());
        doc
    }

    fn owned(&self, id: ResumeId) -> Result<&ResumeDocument, PersistenceError> {
        if self.foreign.contains(&id) {
            return Err(PersistenceError::NotOwner);
        }
        self.docs.get(&id).ok_or(PersistenceError::NotFound)
    }

    fn take_failure(&mut self, op: Op) -> Option<PersistenceError> {
        let pos = self.failures.iter().position(|(o, _)| *o == op)?;
        self.failures.remove(pos).map(|(_, e)| e)
    }
}

pub(crate) struct FakeApi {
    script: Mutex<Script>,
    update_gate: Option<Semaphore>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::build(None))
    }

    /// Every update waits for a permit from `release_updates`.
    pub(crate) fn gated() -> Arc<Self> {
        Arc::new(Self::build(Some(Semaphore::new(0))))
    }

    fn build(update_gate: Option<Semaphore>) -> Self {
        Self {
            script: Mutex::new(Script::default()),
            update_gate,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    pub(crate) fn seed(&self, content: ResumeContent) -> ResumeId {
        self.script().insert(content).id
    }

    /// A document that exists but belongs to someone else.
    pub(crate) fn seed_foreign(&self, content: ResumeContent) -> ResumeId {
        let mut script = self.script();
        let id = script.insert(content).id;
        script.foreign.insert(id);
        id
    }

    pub(crate) fn stored(&self, id: ResumeId) -> Option<ResumeDocument> {
        self.script().docs.get(&id).cloned()
    }

    pub(crate) fn fail_next(&self, op: Op, err: PersistenceError) {
        self.script().failures.push_back((op, err));
    }

    pub(crate) fn set_latency(&self, op: Op, latency: Duration) {
        self.script().latency.insert(op, latency);
    }

    pub(crate) fn set_get_delay(&self, id: ResumeId, delay: Duration) {
        self.script().get_delay.insert(id, delay);
    }

    pub(crate) fn release_updates(&self, n: usize) {
        if let Some(gate) = &self.update_gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn calls(&self, op: Op) -> usize {
        self.script().calls.get(&op).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.script().calls.values().sum()
    }

    pub(crate) fn sent_updates(&self) -> Vec<(ResumeId, ContentPatch)> {
        self.script().sent_updates.clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Records the call and waits out any scripted delay. Returns the scripted
    /// failure for this call, if one was queued.
    async fn enter(&self, op: Op, delay: Option<Duration>) -> (InFlight<'_>, Option<PersistenceError>) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);

        let (failure, latency) = {
            let mut script = self.script();
            *script.calls.entry(op).or_default() += 1;
            let latency = delay.or_else(|| script.latency.get(&op).copied());
            (script.take_failure(op), latency)
        };

        if op == Op::Update {
            if let Some(gate) = &self.update_gate {
                gate.acquire().await.unwrap().forget();
            }
        }
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        (guard, failure)
    }
}

#[async_trait]
impl PersistenceApi for FakeApi {
    async fn create(&self, content: &ResumeContent) -> Result<ResumeDocument, PersistenceError> {
        let (_guard, failure) = self.enter(Op::Create, None).await;
        if let Some(e) = failure {
            return Err(e);
        }
        Ok(self.script().insert(content.clone()))
    }

    async fn update(
        &self,
        id: ResumeId,
        patch: &ContentPatch,
    ) -> Result<ResumeDocument, PersistenceError> {
        let (_guard, failure) = self.enter(Op::Update, None).await;
        let mut script = self.script();
        script.sent_updates.push((id, patch.clone()));
        if let Some(e) = failure {
            return Err(e);
        }
        let content = script.owned(id)?.content.merged(patch);
        let now = script.now();
        let doc = script.docs.get_mut(&id).unwrap();
        doc.content = content;
        doc.updated_at = now;
        Ok(doc.clone())
    }

    async fn get(&self, id: ResumeId) -> Result<ResumeDocument, PersistenceError> {
        let delay = self.script().get_delay.get(&id).copied();
        let (_guard, failure) = self.enter(Op::Get, delay).await;
        if let Some(e) = failure {
            return Err(e);
        }
        self.script().owned(id).cloned()
    }

    async fn list(&self) -> Result<Vec<ResumeDocument>, PersistenceError> {
        let (_guard, failure) = self.enter(Op::List, None).await;
        if let Some(e) = failure {
            return Err(e);
        }
        let script = self.script();
        let mut docs: Vec<_> = script
            .docs
            .values()
            .filter(|d| !script.foreign.contains(&d.id))
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(docs)
    }

    async fn delete(&self, id: ResumeId) -> Result<(), PersistenceError> {
        let (_guard, failure) = self.enter(Op::Delete, None).await;
        if let Some(e) = failure {
            return Err(e);
        }
        let mut script = self.script();
        script.owned(id)?;
        script.docs.remove(&id);
        Ok(())
    }

    async fn duplicate(&self, id: ResumeId) -> Result<ResumeDocument, PersistenceError> {
        let (_guard, failure) = self.enter(Op::Duplicate, None).await;
        if let Some(e) = failure {
            return Err(e);
        }
        let mut script = self.script();
        let content = script.owned(id)?.content.clone();
        Ok(script.insert(content))
    }

    async fn stats(&self) -> Result<ResumeStats, PersistenceError> {
        let (_guard, failure) = self.enter(Op::Stats, None).await;
        if let Some(e) = failure {
            return Err(e);
        }
        let script = self.script();
        let own = script.docs.values().filter(|d| !script.foreign.contains(&d.id));
        Ok(ResumeStats {
            total_resumes: own.clone().count() as u64,
            recent_activity: own.map(|d| d.updated_at).max(),
        })
    }
}

pub(crate) fn sample_content() -> ResumeContent {
    ResumeContent {
        contact_info: ContactInfo {
            name: "Katherine Johnson".to_string(),
            email: "kj@example.org".to_string(),
            phone: "757-555-0142".to_string(),
            location: "Hampton, VA".to_string(),
        },
        summary: "Mathematician who computed orbital trajectories for crewed spaceflight."
            .to_string(),
        experience: vec![ExperienceEntry {
            title: "Research Mathematician".to_string(),
            company: "NASA Langley".to_string(),
            dates: "1953 - 1986".to_string(),
            location: "Hampton, VA".to_string(),
            bullets: vec!["Verified trajectory calculations for Friendship 7".to_string()],
        }],
        education: vec![EducationEntry {
            school: "West Virginia State".to_string(),
            degree: "BS Mathematics".to_string(),
            dates: "1937".to_string(),
        }],
        skills: vec![
            "Orbital mechanics".to_string(),
            "Numerical analysis".to_string(),
            "FORTRAN".to_string(),
        ],
    }
}
