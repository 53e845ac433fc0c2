use thiserror::Error;

use crate::core::tracker::CreationTracker;

/// The screen currently shown. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenState {
    #[default]
    Home,
    NewProject,
    Main,
    Loading,
}

/// Department and name collected by the new project form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub department: String,
    pub project_name: String,
}

impl ProjectDraft {
    pub fn new(department: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            project_name: project_name.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.department.trim().is_empty() && !self.project_name.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("loading can only start from the new project screen, not {0:?}")]
    NotOnNewProject(ScreenState),
    #[error("both a department and a project name are required")]
    IncompleteDraft,
}

/// Finite-state router over the app screens.
///
/// Entering [`ScreenState::Loading`] mounts a fresh [`CreationTracker`] for the
/// submitted draft; any transition out of it drops the tracker, which tears
/// down its subscription.
#[derive(Debug, Default)]
pub struct Navigator {
    screen: ScreenState,
    loading: Option<CreationTracker>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ScreenState {
        self.screen
    }

    /// Draft being created, while the loading screen is up.
    pub fn draft(&self) -> Option<&ProjectDraft> {
        self.loading.as_ref().map(CreationTracker::draft)
    }

    pub fn tracker(&self) -> Option<&CreationTracker> {
        self.loading.as_ref()
    }

    pub fn tracker_mut(&mut self) -> Option<&mut CreationTracker> {
        self.loading.as_mut()
    }

    pub fn go_home(&mut self) {
        self.transition(ScreenState::Home);
    }

    pub fn go_new_project(&mut self) {
        self.transition(ScreenState::NewProject);
    }

    pub fn go_main(&mut self) {
        self.transition(ScreenState::Main);
    }

    pub fn start_loading(
        &mut self,
        department: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Result<&mut CreationTracker, NavigationError> {
        if self.screen != ScreenState::NewProject {
            return Err(NavigationError::NotOnNewProject(self.screen));
        }
        let draft = ProjectDraft::new(department, project_name);
        if !draft.is_complete() {
            return Err(NavigationError::IncompleteDraft);
        }
        tracing::info!(
            department = %draft.department,
            project = %draft.project_name,
            "entering loading screen"
        );
        self.screen = ScreenState::Loading;
        Ok(self.loading.insert(CreationTracker::new(draft)))
    }

    fn transition(&mut self, to: ScreenState) {
        if let Some(mut tracker) = self.loading.take() {
            tracker.teardown();
        }
        tracing::debug!(from = ?self.screen, ?to, "screen transition");
        self.screen = to;
    }
}
