use iced::{Element, Task, Theme};

use super::{AppState, Message};
use crate::{
    core::{LocalBackend, ScreenState},
    gui::screens::{
        Screen, ScreenMessage,
        landing_page::{self, LandingPageMessage, LandingPageScreen},
        loading_page::{self, LoadingPageMessage, LoadingPageScreen},
        main_page::{self, MainPageScreen},
        new_project::{self, NewProjectMessage, NewProjectScreen},
    },
};

/// Renders the screen the navigator points at and routes messages to it.
pub struct MapmakerApp {
    state: AppState,
    landing_page: LandingPageScreen,
    new_project: NewProjectScreen,
    main_page: MainPageScreen,
    loading_page: LoadingPageScreen,
}

impl MapmakerApp {
    pub fn new(backend: LocalBackend) -> (Self, Task<Message>) {
        (
            Self {
                state: AppState::new(backend),
                landing_page: LandingPageScreen::default(),
                new_project: NewProjectScreen::default(),
                main_page: MainPageScreen,
                loading_page: LoadingPageScreen,
            },
            refresh_home(),
        )
    }

    pub fn title(&self) -> String {
        match self.state.navigator.draft() {
            Some(draft) => format!("MapMaker - {}", draft.project_name),
            None => "MapMaker".to_string(),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let state = &mut self.state;
        match (state.navigator.current(), message) {
            (ScreenState::Home, Message::LandingPage(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => {
                    self.landing_page.update(msg, state).map(Message::LandingPage)
                }
                ScreenMessage::ParentMessage(landing_page::ParentMessage::NewProject) => {
                    state.navigator.go_new_project();
                    Task::done(Message::NewProject(ScreenMessage::ScreenMessage(
                        NewProjectMessage::Opened,
                    )))
                }
                ScreenMessage::ParentMessage(landing_page::ParentMessage::OpenMain) => {
                    state.navigator.go_main();
                    Task::none()
                }
            },
            (ScreenState::NewProject, Message::NewProject(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => {
                    self.new_project.update(msg, state).map(Message::NewProject)
                }
                ScreenMessage::ParentMessage(new_project::ParentMessage::Back) => {
                    state.navigator.go_home();
                    refresh_home()
                }
                ScreenMessage::ParentMessage(new_project::ParentMessage::Submit(draft)) => {
                    match state
                        .navigator
                        .start_loading(draft.department, draft.project_name)
                    {
                        Ok(_) => Task::done(Message::LoadingPage(ScreenMessage::ScreenMessage(
                            LoadingPageMessage::Mounted,
                        ))),
                        Err(err) => {
                            tracing::warn!(error = %err, "refusing to start loading");
                            Task::none()
                        }
                    }
                }
            },
            (ScreenState::Main, Message::MainPage(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => {
                    self.main_page.update(msg, state).map(Message::MainPage)
                }
                ScreenMessage::ParentMessage(main_page::ParentMessage::Home) => {
                    state.navigator.go_home();
                    refresh_home()
                }
            },
            (ScreenState::Loading, Message::LoadingPage(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => {
                    self.loading_page.update(msg, state).map(Message::LoadingPage)
                }
                ScreenMessage::ParentMessage(loading_page::ParentMessage::Home) => {
                    state.navigator.go_home();
                    refresh_home()
                }
            },
            (screen, message) => {
                tracing::debug!(?screen, ?message, "dropping message for inactive screen");
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let state = &self.state;
        match state.navigator.current() {
            ScreenState::Home => self.landing_page.view(state).map(Message::LandingPage),
            ScreenState::NewProject => self.new_project.view(state).map(Message::NewProject),
            ScreenState::Main => self.main_page.view(state).map(Message::MainPage),
            ScreenState::Loading => self.loading_page.view(state).map(Message::LoadingPage),
        }
    }
}

fn refresh_home() -> Task<Message> {
    Task::done(Message::LandingPage(ScreenMessage::ScreenMessage(
        LandingPageMessage::Refresh,
    )))
}
