pub mod backend;
pub mod departments;
pub mod navigator;
pub mod progress;
pub mod tracker;

pub use backend::{
    BackendError, EventHub, LocalBackend, MapBackend, PROGRESS_TOPIC, ProjectEntry, Subscription,
};
pub use navigator::{NavigationError, Navigator, ProjectDraft, ScreenState};
pub use progress::{ProgressState, ProgressStep, StepMarker};
pub use tracker::{CreationEvents, CreationTracker, TrackerEvent, TrackerStatus};
