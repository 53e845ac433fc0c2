mod app;
mod message;
mod screens;
mod state;
mod widgets;

use crate::core::LocalBackend;

pub use app::MapmakerApp;
pub use message::Message;
pub use state::AppState;

/// Open the desktop window and block until it is closed.
pub fn run(backend: LocalBackend) -> iced::Result {
    iced::application(
        move || MapmakerApp::new(backend.clone()),
        MapmakerApp::update,
        MapmakerApp::view,
    )
    .title(MapmakerApp::title)
    .theme(MapmakerApp::theme)
    .window_size((1100.0, 720.0))
    .run()
}
