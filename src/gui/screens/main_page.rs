use std::convert::Infallible;

use iced::{
    Element, Length, Task,
    widget::{button, column, container, text},
};

use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
};

#[derive(Debug, Clone)]
pub struct MainPageScreen;

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Home,
}

impl Screen for MainPageScreen {
    type Message = Infallible;
    type ParentMessage = ParentMessage;

    fn view<'a>(&'a self, _state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        let content = column![
            text("Map Workspace").size(28),
            text("Open a project from the home screen to start editing."),
            button("Home").on_press(ScreenMessage::ParentMessage(ParentMessage::Home)),
        ]
        .spacing(20);

        container(content)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {}
    }
}
