pub mod config;
pub mod core;

pub use config::AppConfig;
pub use crate::core::{
    BackendError, CreationTracker, LocalBackend, MapBackend, Navigator, ProgressState,
    ProgressStep, ProjectDraft, ScreenState, TrackerEvent,
};

#[cfg(feature = "gui")]
pub mod gui;
