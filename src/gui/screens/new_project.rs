use std::{collections::BTreeMap, fmt};

use iced::{
    Element, Length, Task,
    widget::{button, column, container, pick_list, text, text_input},
};

use crate::{
    core::{BackendError, MapBackend, ProjectDraft},
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub code: String,
    pub name: String,
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewProjectScreen {
    project_name: String,
    department: Option<Department>,
    departments: Vec<Department>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum NewProjectMessage {
    Opened,
    DepartmentsLoaded(Result<BTreeMap<String, String>, BackendError>),
    NameChanged(String),
    DepartmentSelected(Department),
    Submit,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Back,
    Submit(ProjectDraft),
}

impl NewProjectScreen {
    /// The draft to submit, once the name is filled and the department is a listed one.
    fn draft(&self) -> Option<ProjectDraft> {
        let department = self.department.as_ref()?;
        if !self.departments.contains(department) {
            return None;
        }
        let draft = ProjectDraft::new(department.code.clone(), self.project_name.trim());
        draft.is_complete().then_some(draft)
    }
}

impl Screen for NewProjectScreen {
    type Message = NewProjectMessage;
    type ParentMessage = ParentMessage;

    fn view<'a>(&'a self, _state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        let submit = self
            .draft()
            .map(|_| ScreenMessage::ScreenMessage(NewProjectMessage::Submit));

        let mut form = column![
            button("Back").on_press(ScreenMessage::ParentMessage(ParentMessage::Back)),
            text("Create New Project").size(28),
            text("Project Name"),
            text_input("Enter project name", &self.project_name).on_input(|name| {
                ScreenMessage::ScreenMessage(NewProjectMessage::NameChanged(name))
            }),
            text("Department"),
            pick_list(
                self.departments.as_slice(),
                self.department.clone(),
                |department| {
                    ScreenMessage::ScreenMessage(NewProjectMessage::DepartmentSelected(department))
                }
            )
            .placeholder("Select a department"),
            button("Create Project").on_press_maybe(submit),
        ]
        .spacing(16)
        .padding(30)
        .max_width(480);

        if let Some(error) = &self.error {
            form = form.push(text(error.as_str()).style(text::danger));
        }

        container(form)
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
            NewProjectMessage::Opened => {
                *self = Self::default();
                let backend = state.backend.clone();
                Task::perform(async move { backend.list_departments().await }, |result| {
                    ScreenMessage::ScreenMessage(NewProjectMessage::DepartmentsLoaded(result))
                })
            }
            NewProjectMessage::DepartmentsLoaded(Ok(departments)) => {
                self.departments = departments
                    .into_iter()
                    .map(|(code, name)| Department { code, name })
                    .collect();
                Task::none()
            }
            NewProjectMessage::DepartmentsLoaded(Err(err)) => {
                tracing::warn!(error = %err, "failed to list departments");
                self.error = Some(err.to_string());
                Task::none()
            }
            NewProjectMessage::NameChanged(name) => {
                self.project_name = name;
                Task::none()
            }
            NewProjectMessage::DepartmentSelected(department) => {
                self.department = Some(department);
                Task::none()
            }
            NewProjectMessage::Submit => match self.draft() {
                Some(draft) => Task::done(ScreenMessage::ParentMessage(ParentMessage::Submit(draft))),
                None => Task::none(),
            },
        }
    }
}
