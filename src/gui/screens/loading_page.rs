use iced::{
    Element, Length, Task,
    widget::{button, column, container, text},
};

use crate::{
    core::{ProgressStep, TrackerEvent},
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::layout,
    },
};

#[derive(Debug, Clone)]
pub struct LoadingPageScreen;

#[derive(Debug, Clone)]
pub enum LoadingPageMessage {
    /// Sent every time the screen is shown; only the first one starts the job.
    Mounted,
    Progress(TrackerEvent),
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Home,
}

impl Screen for LoadingPageScreen {
    type Message = LoadingPageMessage;
    type ParentMessage = ParentMessage;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        let Some(tracker) = state.navigator.tracker() else {
            return container(text("Loading..."))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        };
        let progress = tracker.state();
        let draft = tracker.draft();

        let status: Element<'_, ScreenMessage<Self>> = if let Some(error) = progress.error() {
            text(error).style(text::danger).into()
        } else if progress.is_completed() {
            text("Your map is ready.").style(text::success).into()
        } else {
            let step = ProgressStep::ALL
                .get(progress.current_step_index())
                .map_or("Waiting for the backend...", |step| step.title());
            text(step).into()
        };

        let main_content = column![
            text("Loading Your Map").size(28),
            text(format!(
                "{} ({})",
                draft.project_name, draft.department
            )),
            text(format!(
                "{} / {} steps",
                progress.current_step_index(),
                ProgressStep::COUNT
            )),
            status,
            button("Back Home").on_press(ScreenMessage::ParentMessage(ParentMessage::Home)),
        ]
        .spacing(20)
        .padding(30);

        layout(text("New project"), main_content, progress)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        let Some(tracker) = state.navigator.tracker_mut() else {
            return Task::none();
        };
        match message {
            LoadingPageMessage::Mounted => match tracker.activate(&state.backend) {
                Some(events) => Task::run(events, |event| {
                    ScreenMessage::ScreenMessage(LoadingPageMessage::Progress(event))
                }),
                None => Task::none(),
            },
            LoadingPageMessage::Progress(event) => {
                tracker.handle(event);
                Task::none()
            }
        }
    }
}
