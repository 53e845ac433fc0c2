use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use futures::{StreamExt, channel::oneshot};
use mapmaker::core::{
    BackendError, CreationEvents, CreationTracker, EventHub, MapBackend, PROGRESS_TOPIC,
    ProjectDraft, ProjectEntry, Subscription,
};

/// Backend whose phase labels and outcome are driven by the test.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    hub: EventHub,
    calls: AtomicUsize,
    pending: Mutex<Vec<oneshot::Sender<Result<(), BackendError>>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a phase label; returns how many subscribers received it.
    pub fn emit(&self, label: &str) -> usize {
        self.hub.publish(PROGRESS_TOPIC, label)
    }

    /// Resolve the most recent creation request.
    pub fn resolve(&self, result: Result<(), BackendError>) {
        if let Some(sender) = self.pending.lock().unwrap().pop() {
            let _ = sender.send(result);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }
}

impl MapBackend for ScriptedBackend {
    async fn list_projects(&self) -> Result<BTreeMap<String, ProjectEntry>, BackendError> {
        Ok(BTreeMap::new())
    }

    async fn list_departments(&self) -> Result<BTreeMap<String, String>, BackendError> {
        Ok(BTreeMap::from([("75".to_string(), "Paris".to_string())]))
    }

    fn create_project(
        &self,
        _draft: ProjectDraft,
    ) -> impl Future<Output = Result<(), BackendError>> + Send + 'static {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = oneshot::channel();
        self.pending.lock().unwrap().push(sender);
        async move {
            receiver
                .await
                .unwrap_or_else(|_| Err(BackendError::Rejected("backend went away".into())))
        }
    }

    fn subscribe(&self, topic: &str) -> Subscription {
        self.hub.subscribe(topic)
    }
}

pub fn test_draft() -> ProjectDraft {
    ProjectDraft::new("75", "Paris Nord")
}

/// Pull one event from the stream, apply it and return the resulting step index.
pub async fn step(tracker: &mut CreationTracker, events: &mut CreationEvents) -> Option<usize> {
    let event = events.next().await?;
    tracker.handle(event);
    Some(tracker.state().current_step_index())
}

/// Apply every remaining event, returning the step index after each one.
pub async fn drain(tracker: &mut CreationTracker, events: &mut CreationEvents) -> Vec<usize> {
    let mut indices = Vec::new();
    while let Some(index) = step(tracker, events).await {
        indices.push(index);
    }
    indices
}
