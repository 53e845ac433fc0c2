use iced::{
    Color, Element, Theme, border,
    widget::{
        column, container,
        container::{Style, bordered_box},
        row, text,
    },
};

use crate::core::{ProgressState, StepMarker};

fn step_style(marker: StepMarker) -> impl Fn(&Theme) -> Style {
    move |theme: &Theme| {
        let style = bordered_box(theme).border(border::width(5));
        let palette = theme.palette();
        match marker {
            // reached steps are grayed out
            StepMarker::Reached => {
                let mut color_rgba = palette.background.into_rgba8();
                color_rgba[0] /= 2;
                color_rgba[1] /= 2;
                color_rgba[2] /= 2;
                style.background(Color::from_rgb8(color_rgba[0], color_rgba[1], color_rgba[2]))
            }
            StepMarker::Active => style.background(palette.primary),
            StepMarker::Pending => style.background(palette.background),
        }
    }
}

/// Step list on the left, `main_content` on the right.
pub fn layout<'a, Message>(
    sidebar: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
    progress: &ProgressState,
) -> Element<'a, Message>
where
    Message: 'a,
{
    let steps = column(progress.steps().map(|(step, marker)| {
        container(text(step.title()))
            .style(step_style(marker))
            .padding(10)
            .into()
    }));

    container(row![
        container(column![
            container(steps),
            container(sidebar.into()).height(iced::Length::Fill),
        ])
        .width(iced::Length::FillPortion(1)),
        container(main_content.into()).width(iced::Length::FillPortion(4)),
    ])
    .center_x(iced::Length::Fill)
    .center_y(iced::Length::Fill)
    .into()
}
