use std::{
    collections::HashMap,
    pin::Pin,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicBool, Ordering},
    },
    task::{Context, Poll},
};

use futures::{
    Stream,
    channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded},
};

#[derive(Debug, Default)]
struct HubState {
    next_id: u64,
    topics: HashMap<String, HashMap<u64, UnboundedSender<String>>>,
    released: u64,
}

/// In-process topic pub/sub used to deliver backend notifications.
#[derive(Debug, Clone, Default)]
pub struct EventHub {
    state: Arc<Mutex<HubState>>,
}

fn lock(state: &Mutex<HubState>) -> MutexGuard<'_, HubState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, topic: &str) -> Subscription {
        let (sender, receiver) = unbounded();
        let id = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state
                .topics
                .entry(topic.to_string())
                .or_default()
                .insert(id, sender);
            id
        };
        tracing::debug!(topic, id, "subscribed");
        Subscription {
            receiver,
            guard: Arc::new(SubscriptionGuard {
                id,
                topic: topic.to_string(),
                hub: Arc::downgrade(&self.state),
                released: AtomicBool::new(false),
            }),
        }
    }

    /// Deliver `payload` to every live subscriber of `topic`, returning how many received it.
    pub fn publish(&self, topic: &str, payload: impl Into<String>) -> usize {
        let payload = payload.into();
        let mut state = lock(&self.state);
        let Some(subscribers) = state.topics.get_mut(topic) else {
            return 0;
        };
        subscribers.retain(|_, sender| sender.unbounded_send(payload.clone()).is_ok());
        subscribers.len()
    }

    /// Drop every subscriber of `topic`, ending their streams.
    pub fn close(&self, topic: &str) {
        if let Some(subscribers) = lock(&self.state).topics.get_mut(topic) {
            subscribers.clear();
        }
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        lock(&self.state).topics.get(topic).map_or(0, HashMap::len)
    }

    /// Total number of subscriptions released since the hub was created.
    pub fn released_count(&self) -> u64 {
        lock(&self.state).released
    }
}

/// Releases a subscription on the hub. Idempotent; also runs on drop.
#[derive(Debug)]
pub struct SubscriptionGuard {
    id: u64,
    topic: String,
    hub: Weak<Mutex<HubState>>,
    released: AtomicBool,
}

impl SubscriptionGuard {
    /// Returns `true` only for the call that actually unsubscribed.
    pub fn release(&self) -> bool {
        if self.released.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Some(hub) = self.hub.upgrade() {
            let mut state = lock(&hub);
            if let Some(subscribers) = state.topics.get_mut(&self.topic) {
                subscribers.remove(&self.id);
            }
            state.released += 1;
        }
        tracing::debug!(topic = %self.topic, id = self.id, "unsubscribed");
        true
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Stream of payloads for one topic. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: UnboundedReceiver<String>,
    guard: Arc<SubscriptionGuard>,
}

impl Subscription {
    /// Shared handle that can cancel this subscription from outside the stream.
    pub fn guard(&self) -> Arc<SubscriptionGuard> {
        Arc::clone(&self.guard)
    }

    pub fn topic(&self) -> &str {
        &self.guard.topic
    }
}

impl Stream for Subscription {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}
