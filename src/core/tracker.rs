use std::sync::Arc;

use futures::{
    FutureExt, StreamExt,
    future::BoxFuture,
    stream::{self, AbortHandle, Abortable, BoxStream},
};
use uuid::Uuid;

use crate::core::{
    backend::{BackendError, MapBackend, PROGRESS_TOPIC, Subscription, SubscriptionGuard},
    navigator::ProjectDraft,
    progress::ProgressState,
};

/// Notification routed back to the tracker that started an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    Phase { attempt: Uuid, label: String },
    Finished { attempt: Uuid, result: Result<(), BackendError> },
}

impl TrackerEvent {
    pub fn attempt(&self) -> Uuid {
        match self {
            TrackerEvent::Phase { attempt, .. } | TrackerEvent::Finished { attempt, .. } => *attempt,
        }
    }
}

/// Events of one creation attempt, in delivery order. Ends after the outcome
/// or as soon as the owning tracker is torn down.
pub type CreationEvents = Abortable<BoxStream<'static, TrackerEvent>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
    TornDown,
}

/// Drives one project creation attempt per mount of the loading screen.
#[derive(Debug)]
pub struct CreationTracker {
    attempt: Uuid,
    draft: ProjectDraft,
    started: bool,
    torn_down: bool,
    state: ProgressState,
    abort: Option<AbortHandle>,
    subscription: Option<Arc<SubscriptionGuard>>,
}

impl CreationTracker {
    pub fn new(draft: ProjectDraft) -> Self {
        Self {
            attempt: Uuid::new_v4(),
            draft,
            started: false,
            torn_down: false,
            state: ProgressState::default(),
            abort: None,
            subscription: None,
        }
    }

    pub fn attempt(&self) -> Uuid {
        self.attempt
    }

    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn status(&self) -> TrackerStatus {
        if self.torn_down {
            TrackerStatus::TornDown
        } else if self.state.error().is_some() {
            TrackerStatus::Failed
        } else if self.state.is_completed() {
            TrackerStatus::Succeeded
        } else if self.started {
            TrackerStatus::Running
        } else {
            TrackerStatus::Idle
        }
    }

    /// Subscribe to progress and issue the creation request.
    ///
    /// Only the first call on a tracker does anything; later calls return
    /// `None`, however often the hosting screen asks.
    pub fn activate<B: MapBackend>(&mut self, backend: &B) -> Option<CreationEvents> {
        if self.started || self.torn_down {
            return None;
        }
        self.started = true;

        let subscription = backend.subscribe(PROGRESS_TOPIC);
        self.subscription = Some(subscription.guard());
        self.state = ProgressState::default();
        tracing::info!(
            attempt = %self.attempt,
            department = %self.draft.department,
            project = %self.draft.project_name,
            "issuing creation request"
        );
        let request = backend.create_project(self.draft.clone()).boxed();

        let (events, handle) = stream::abortable(attempt_events(self.attempt, subscription, request));
        self.abort = Some(handle);
        Some(events)
    }

    /// Apply one event. Returns `true` when the progress state changed.
    pub fn handle(&mut self, event: TrackerEvent) -> bool {
        if self.torn_down {
            tracing::debug!(attempt = %event.attempt(), "dropping event after teardown");
            return false;
        }
        if event.attempt() != self.attempt {
            tracing::warn!(
                expected = %self.attempt,
                got = %event.attempt(),
                "dropping event from another attempt"
            );
            return false;
        }
        match event {
            TrackerEvent::Phase { label, .. } => {
                tracing::debug!(attempt = %self.attempt, %label, "phase update");
                self.state.apply_label(&label)
            }
            TrackerEvent::Finished { result, .. } => {
                self.release_subscription();
                match result {
                    Ok(()) => {
                        tracing::info!(attempt = %self.attempt, "project created");
                        self.state.complete()
                    }
                    Err(err) => {
                        tracing::warn!(attempt = %self.attempt, error = %err, "project creation failed");
                        self.state.fail(err.to_string())
                    }
                }
            }
        }
    }

    /// Cancel the subscription and stop accepting events. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(handle) = self.abort.take() {
            handle.abort();
        }
        self.release_subscription();
        tracing::debug!(attempt = %self.attempt, "tracker torn down");
    }

    fn release_subscription(&mut self) {
        if let Some(guard) = self.subscription.take() {
            guard.release();
        }
    }
}

impl Drop for CreationTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}

type Request = BoxFuture<'static, Result<(), BackendError>>;

enum Pending {
    Running(Subscription, Request),
    Draining(Subscription, Result<(), BackendError>),
}

/// Merge phase notifications and the request outcome into one stream.
///
/// Phase labels already queued when the request resolves are delivered before
/// the outcome. A closed notification channel is not an error: the outcome is
/// still awaited and reported.
fn attempt_events(
    attempt: Uuid,
    subscription: Subscription,
    request: Request,
) -> BoxStream<'static, TrackerEvent> {
    let initial = Some(Pending::Running(subscription, request));
    stream::unfold(initial, move |pending| async move {
        match pending? {
            Pending::Running(mut subscription, mut request) => tokio::select! {
                biased;
                label = subscription.next() => match label {
                    Some(label) => Some((
                        TrackerEvent::Phase { attempt, label },
                        Some(Pending::Running(subscription, request)),
                    )),
                    None => {
                        drop(subscription);
                        let result = request.await;
                        Some((TrackerEvent::Finished { attempt, result }, None))
                    }
                },
                result = &mut request => drain(attempt, subscription, result),
            },
            Pending::Draining(subscription, result) => drain(attempt, subscription, result),
        }
    })
    .boxed()
}

fn drain(
    attempt: Uuid,
    mut subscription: Subscription,
    result: Result<(), BackendError>,
) -> Option<(TrackerEvent, Option<Pending>)> {
    match subscription.next().now_or_never() {
        Some(Some(label)) => Some((
            TrackerEvent::Phase { attempt, label },
            Some(Pending::Draining(subscription, result)),
        )),
        _ => Some((TrackerEvent::Finished { attempt, result }, None)),
    }
}
