use std::fmt;

/// Phases of the backend project-creation job, in the order they are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProgressStep {
    Setup,
    FileDiscovery,
    DataDownload,
    LayerPreparation,
    Finalization,
}

impl ProgressStep {
    pub const ALL: [ProgressStep; 5] = [
        ProgressStep::Setup,
        ProgressStep::FileDiscovery,
        ProgressStep::DataDownload,
        ProgressStep::LayerPreparation,
        ProgressStep::Finalization,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Label carried on the progress topic for this phase.
    pub fn label(self) -> &'static str {
        use ProgressStep::*;
        match self {
            Setup => "setup",
            FileDiscovery => "discovery",
            DataDownload => "download",
            LayerPreparation => "prepare",
            Finalization => "finalize",
        }
    }

    /// Human readable title used by the loading screen.
    pub fn title(self) -> &'static str {
        use ProgressStep::*;
        match self {
            Setup => "Setting up the project",
            FileDiscovery => "Searching for files",
            DataDownload => "Downloading data",
            LayerPreparation => "Preparing layers",
            Finalization => "Finalizing",
        }
    }

    /// Zero-based position in [`ProgressStep::ALL`].
    pub fn position(self) -> usize {
        self as usize
    }

    /// Unknown labels map to `None` and must be ignored by callers.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.label() == label.trim())
    }
}

// `ALL` must list the variants in declaration order for `position` to hold.
const _: () = {
    let mut i = 0;
    while i < ProgressStep::COUNT {
        assert!(ProgressStep::ALL[i] as usize == i);
        i += 1;
    }
};

impl fmt::Display for ProgressStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// How a single step should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Reached,
    Active,
    Pending,
}

/// Render-ready progress of one creation attempt.
///
/// `current_step_index` counts the steps reached so far, so it lives in
/// `0..=ProgressStep::COUNT`. It only ever grows, and stops moving as soon as
/// the attempt is terminal (completed or failed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    current_step_index: usize,
    error: Option<String>,
    completed: bool,
}

impl ProgressState {
    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_terminal(&self) -> bool {
        self.completed || self.error.is_some()
    }

    /// Reconcile one phase label. Returns `true` when the state changed.
    pub fn apply_label(&mut self, label: &str) -> bool {
        if self.is_terminal() {
            return false;
        }
        let Some(step) = ProgressStep::from_label(label) else {
            tracing::debug!(label, "ignoring unrecognized phase label");
            return false;
        };
        let reached = step.position() + 1;
        if reached <= self.current_step_index {
            tracing::debug!(label, current = self.current_step_index, "stale phase label");
            return false;
        }
        self.current_step_index = reached;
        true
    }

    /// Freeze progress with a user visible error.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.error = Some(message.into());
        true
    }

    pub fn complete(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.completed = true;
        true
    }

    pub fn marker(&self, step: ProgressStep) -> StepMarker {
        if self.completed || step.position() < self.current_step_index {
            StepMarker::Reached
        } else if self.error.is_none() && step.position() == self.current_step_index {
            StepMarker::Active
        } else {
            StepMarker::Pending
        }
    }

    pub fn steps(&self) -> impl Iterator<Item = (ProgressStep, StepMarker)> + '_ {
        ProgressStep::ALL
            .into_iter()
            .map(|step| (step, self.marker(step)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 6] = ["setup", "discovery", "download", "prepare", "finalize", "bogus"];

    #[test]
    fn labels_round_trip_through_lookup() {
        for step in ProgressStep::ALL {
            assert_eq!(ProgressStep::from_label(step.label()), Some(step));
            assert_eq!(ProgressStep::ALL[step.position()], step);
        }
        assert_eq!(ProgressStep::from_label("Finalisation"), None);
    }

    #[test]
    fn in_order_delivery_advances_in_lockstep() {
        let mut state = ProgressState::default();
        for (i, step) in ProgressStep::ALL.into_iter().enumerate() {
            assert!(state.apply_label(step.label()));
            assert_eq!(state.current_step_index(), i + 1);
        }
    }

    #[test]
    fn out_of_order_labels_never_regress() {
        let mut state = ProgressState::default();
        state.apply_label("download");
        assert_eq!(state.current_step_index(), 3);
        assert!(!state.apply_label("setup"));
        assert!(!state.apply_label("discovery"));
        assert_eq!(state.current_step_index(), 3);
    }

    #[test]
    fn index_is_monotonic_for_every_short_sequence() {
        for a in LABELS {
            for b in LABELS {
                for c in LABELS {
                    let mut state = ProgressState::default();
                    let mut last = 0;
                    for label in [a, b, c] {
                        state.apply_label(label);
                        assert!(state.current_step_index() >= last, "{a} {b} {c}");
                        last = state.current_step_index();
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_label_leaves_state_untouched() {
        let mut state = ProgressState::default();
        state.apply_label("discovery");
        let before = state.clone();
        assert!(!state.apply_label("reticulating splines"));
        assert_eq!(state, before);
    }

    #[test]
    fn error_freezes_progress() {
        let mut state = ProgressState::default();
        state.apply_label("setup");
        state.apply_label("discovery");
        assert!(state.fail("network unreachable"));
        assert!(!state.apply_label("finalize"));
        assert!(!state.complete());
        assert_eq!(state.current_step_index(), 2);
        assert_eq!(state.error(), Some("network unreachable"));

        let markers: Vec<_> = state.steps().map(|(_, marker)| marker).collect();
        assert_eq!(
            markers,
            vec![
                StepMarker::Reached,
                StepMarker::Reached,
                StepMarker::Pending,
                StepMarker::Pending,
                StepMarker::Pending,
            ]
        );
    }

    #[test]
    fn completion_marks_every_step_reached() {
        let mut state = ProgressState::default();
        state.apply_label("setup");
        assert!(state.complete());
        assert_eq!(state.current_step_index(), 1);
        assert!(state.steps().all(|(_, marker)| marker == StepMarker::Reached));
        assert!(!state.apply_label("prepare"));
    }
}
