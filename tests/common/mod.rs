mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from mapmaker for tests
pub use mapmaker::core::{
    BackendError, CreationEvents, CreationTracker, EventHub, LocalBackend, MapBackend,
    NavigationError, Navigator, PROGRESS_TOPIC, ProgressStep, ProjectDraft, ScreenState,
    StepMarker, TrackerEvent, TrackerStatus,
};
