use std::collections::BTreeMap;

use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{button, column, container, image, row, scrollable, text},
};
use time::{OffsetDateTime, UtcOffset, macros::format_description};

use crate::{
    core::{BackendError, MapBackend, ProjectEntry},
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
    },
};

#[derive(Debug, Clone, Default)]
pub struct LandingPageScreen {
    recent: Vec<(String, ProjectEntry)>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum LandingPageMessage {
    Refresh,
    ProjectsLoaded(Result<BTreeMap<String, ProjectEntry>, BackendError>),
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    NewProject,
    OpenMain,
}

impl Screen for LandingPageScreen {
    type Message = LandingPageMessage;
    type ParentMessage = ParentMessage;

    fn view<'a>(&'a self, _state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        let recent: Element<'_, ScreenMessage<Self>> = if let Some(error) = &self.error {
            text(format!("Could not load projects: {error}"))
                .style(text::danger)
                .into()
        } else if self.recent.is_empty() {
            text("No maps yet.").into()
        } else {
            scrollable(column(self.recent.iter().map(|(title, entry)| {
                let mut details = column![
                    text(title.as_str()).size(18),
                    text(entry.project_path.display().to_string()).size(12),
                ]
                .spacing(4);
                if let Some(at) = entry.modified.and_then(format_modified) {
                    details = details.push(text(at).size(12));
                }
                let preview: Element<'_, ScreenMessage<Self>> = match &entry.image_path {
                    Some(path) => image(image::Handle::from_path(path))
                        .width(Length::Fixed(96.0))
                        .into(),
                    None => container(text("No preview").size(12))
                        .center_x(Length::Fixed(96.0))
                        .into(),
                };
                row![preview, details].spacing(12).align_y(Center).into()
            }))
            .spacing(12))
            .height(Length::Fill)
            .into()
        };

        let content = column![
            text("MapMaker").size(32),
            text("Create and browse map projects"),
            row![
                button("Generate New Map").on_press(ScreenMessage::ParentMessage(
                    ParentMessage::NewProject
                )),
                button("Open Workspace").on_press(ScreenMessage::ParentMessage(
                    ParentMessage::OpenMain
                )),
            ]
            .spacing(20),
            text("Recent Maps").size(22),
            recent,
        ]
        .spacing(20)
        .padding(20)
        .align_x(Center);

        container(content)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            LandingPageMessage::Refresh => {
                let backend = state.backend.clone();
                Task::perform(async move { backend.list_projects().await }, |result| {
                    ScreenMessage::ScreenMessage(LandingPageMessage::ProjectsLoaded(result))
                })
            }
            LandingPageMessage::ProjectsLoaded(Ok(projects)) => {
                let mut recent: Vec<_> = projects.into_iter().collect();
                // newest first, untimed entries last
                recent.sort_by(|(_, a), (_, b)| b.modified.cmp(&a.modified));
                self.recent = recent;
                self.error = None;
                Task::none()
            }
            LandingPageMessage::ProjectsLoaded(Err(err)) => {
                tracing::warn!(error = %err, "failed to list projects");
                self.error = Some(err.to_string());
                Task::none()
            }
        }
    }
}

fn format_modified(at: OffsetDateTime) -> Option<String> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    at.to_offset(offset)
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .ok()
}
