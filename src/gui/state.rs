use crate::core::{LocalBackend, Navigator};

/// State shared by every screen.
#[derive(Debug)]
pub struct AppState {
    pub navigator: Navigator,
    pub backend: LocalBackend,
}

impl AppState {
    pub fn new(backend: LocalBackend) -> Self {
        Self {
            navigator: Navigator::new(),
            backend,
        }
    }
}
