use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use time::OffsetDateTime;
use tokio::fs as async_fs;

use crate::{
    config::{AppConfig, ConfigError},
    core::{departments, navigator::ProjectDraft, progress::ProgressStep},
};

use super::{BackendError, EventHub, MapBackend, PROGRESS_TOPIC, ProjectEntry, Subscription};

const PROJECTS_DIR: &str = "resources/QGIS";
const TMP_DIR: &str = "tmp";
const PROJECT_EXTENSION: &str = "qgz";
const PREVIEW_EXTENSION: &str = "png";

#[derive(Debug)]
struct LocalState {
    workspace: PathBuf,
    hub: EventHub,
    phase_delay: Duration,
    fail_at: Option<ProgressStep>,
}

/// Backend rooted at a workspace directory on disk.
///
/// It lays out project folders the way the map generator expects and walks
/// through the creation phases, announcing each one on [`PROGRESS_TOPIC`].
/// No map data is generated.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    state: Arc<LocalState>,
}

impl LocalBackend {
    pub fn new<P: AsRef<Path>>(workspace: P) -> Self {
        Self {
            state: Arc::new(LocalState {
                workspace: workspace.as_ref().to_path_buf(),
                hub: EventHub::new(),
                phase_delay: Duration::ZERO,
                fail_at: None,
            }),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            state: Arc::new(LocalState {
                workspace: config.workspace_dir.clone(),
                hub: EventHub::new(),
                phase_delay: config.phase_delay(),
                fail_at: config.fail_step()?,
            }),
        })
    }

    pub fn hub(&self) -> &EventHub {
        &self.state.hub
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.state.workspace.join(PROJECTS_DIR)
    }

    /// Make sure the workspace folders exist before the app starts.
    pub async fn setup_check(&self) -> anyhow::Result<()> {
        for dir in [PROJECTS_DIR, TMP_DIR] {
            let path = self.state.workspace.join(dir);
            async_fs::create_dir_all(&path)
                .await
                .with_context(|| format!("Failed to create directory {:?}", path))?;
        }
        Ok(())
    }
}

impl LocalState {
    async fn run_creation(&self, draft: ProjectDraft) -> Result<(), BackendError> {
        let code = draft.department.trim();
        if !departments::is_known(code) {
            return Err(BackendError::UnknownDepartment(code.to_string()));
        }
        let name = draft.project_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(BackendError::InvalidProjectName(name.to_string()));
        }

        let project_dir = self.workspace.join(PROJECTS_DIR).join(name);
        let project_file = project_dir.join(format!("{name}.{PROJECT_EXTENSION}"));
        // Only a finished project counts; a folder left by an aborted run is reused
        if async_fs::try_exists(&project_file).await.unwrap_or(false) {
            return Err(BackendError::ProjectExists(name.to_string()));
        }

        tracing::info!(department = code, project = name, "creation job started");
        let mut partial = PartialProject::new(project_dir.clone());
        for step in ProgressStep::ALL {
            self.hub.publish(PROGRESS_TOPIC, step.label());
            if self.fail_at == Some(step) {
                tracing::warn!(%step, project = name, "creation job failed");
                return Err(BackendError::Rejected(format!(
                    "{} failed for project {}",
                    step.title(),
                    name
                )));
            }
            match step {
                ProgressStep::Setup => async_fs::create_dir_all(&project_dir)
                    .await
                    .map_err(|e| BackendError::io("Failed to create project folder", e))?,
                ProgressStep::Finalization => {
                    async_fs::write(&project_file, b"")
                        .await
                        .map_err(|e| BackendError::io("Failed to write project file", e))?;
                    partial.keep();
                }
                _ => {}
            }
            tokio::time::sleep(self.phase_delay).await;
        }
        tracing::info!(project = name, "creation job finished");
        Ok(())
    }

    async fn scan_projects(&self) -> Result<BTreeMap<String, ProjectEntry>, BackendError> {
        let root = self.workspace.join(PROJECTS_DIR);
        let mut projects = BTreeMap::new();
        let mut entries = match async_fs::read_dir(&root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(projects),
            Err(e) => return Err(BackendError::io("Failed to list projects", e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| BackendError::io("Failed to list projects", e))?
        {
            let Ok(title) = entry.file_name().into_string() else {
                continue;
            };
            let dir = entry.path();
            let project_path = dir.join(format!("{title}.{PROJECT_EXTENSION}"));
            let Ok(metadata) = async_fs::metadata(&project_path).await else {
                continue;
            };
            let image_path = dir.join(format!("{title}.{PREVIEW_EXTENSION}"));
            let image_path = async_fs::try_exists(&image_path)
                .await
                .unwrap_or(false)
                .then_some(image_path);
            projects.insert(
                title,
                ProjectEntry {
                    image_path,
                    project_path,
                    modified: metadata.modified().ok().map(OffsetDateTime::from),
                },
            );
        }
        Ok(projects)
    }
}

/// Removes a half-built project folder unless the job reached the end.
///
/// Runs on the error path and when the creation future is dropped mid-way.
struct PartialProject {
    dir: Option<PathBuf>,
}

impl PartialProject {
    fn new(dir: PathBuf) -> Self {
        Self { dir: Some(dir) }
    }

    fn keep(&mut self) {
        self.dir = None;
    }
}

impl Drop for PartialProject {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => tracing::debug!(?dir, "removed unfinished project folder"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(?dir, error = %e, "failed to remove unfinished project folder"),
        }
    }
}

impl MapBackend for LocalBackend {
    async fn list_projects(&self) -> Result<BTreeMap<String, ProjectEntry>, BackendError> {
        self.state.scan_projects().await
    }

    async fn list_departments(&self) -> Result<BTreeMap<String, String>, BackendError> {
        Ok(departments::all())
    }

    fn create_project(
        &self,
        draft: ProjectDraft,
    ) -> impl Future<Output = Result<(), BackendError>> + Send + 'static {
        let state = Arc::clone(&self.state);
        async move { state.run_creation(draft).await }
    }

    fn subscribe(&self, topic: &str) -> Subscription {
        self.state.hub.subscribe(topic)
    }
}
