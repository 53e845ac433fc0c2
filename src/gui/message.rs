use crate::gui::screens::{
    ScreenMessage, landing_page::LandingPageScreen, loading_page::LoadingPageScreen,
    main_page::MainPageScreen, new_project::NewProjectScreen,
};

#[derive(Debug, Clone)]
pub enum Message {
    LandingPage(ScreenMessage<LandingPageScreen>),
    NewProject(ScreenMessage<NewProjectScreen>),
    MainPage(ScreenMessage<MainPageScreen>),
    LoadingPage(ScreenMessage<LoadingPageScreen>),
}
