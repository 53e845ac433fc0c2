mod events;
mod local;

use std::{collections::BTreeMap, path::PathBuf};

use thiserror::Error;
use time::OffsetDateTime;

use crate::core::navigator::ProjectDraft;

pub use events::{EventHub, Subscription, SubscriptionGuard};
pub use local::LocalBackend;

/// Topic on which the backend announces the phase it has entered.
pub const PROGRESS_TOPIC: &str = "progress-update";

/// Errors reported by a [`MapBackend`]. The `Display` output is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("unknown department code {0:?}")]
    UnknownDepartment(String),
    #[error("invalid project name {0:?}")]
    InvalidProjectName(String),
    #[error("project {0:?} already exists")]
    ProjectExists(String),
    #[error("{context}: {message}")]
    Io { context: String, message: String },
    #[error("{0}")]
    Rejected(String),
}

impl BackendError {
    pub(crate) fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

/// A previously created project as listed on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub image_path: Option<PathBuf>,
    pub project_path: PathBuf,
    pub modified: Option<OffsetDateTime>,
}

/// The out-of-process collaborator that owns projects and runs creation jobs.
pub trait MapBackend: Send + Sync + 'static {
    fn list_projects(
        &self,
    ) -> impl Future<Output = Result<BTreeMap<String, ProjectEntry>, BackendError>> + Send;

    fn list_departments(
        &self,
    ) -> impl Future<Output = Result<BTreeMap<String, String>, BackendError>> + Send;

    /// Each call is one creation request; the returned future drives the job
    /// and resolves with its outcome.
    fn create_project(
        &self,
        draft: ProjectDraft,
    ) -> impl Future<Output = Result<(), BackendError>> + Send + 'static;

    fn subscribe(&self, topic: &str) -> Subscription;
}
