use devlinks_lib::{DocumentStore, Repository, Session, UserDocument};
use iced::{
    Element,
    Length::Fill,
    Task,
    widget::{column, container, row},
};
use tokio::task::spawn_blocking;

use crate::components::{
    links_form::{self, LinksForm},
    navbar::{self, Section},
    placeholder,
    profile_form::{self, ProfileDetails},
    toast::Toast,
};

#[derive(Debug, Clone)]
pub enum Message {
    DocumentLoaded(Result<UserDocument, String>),
    // Children
    Navbar(navbar::Message),
    Links(links_form::Message),
    Profile(profile_form::Message),
}

pub enum Action {
    None,
    Run(Task<Message>),
    Notify(Toast),
    SectionChanged(Section),
    Preview,
    Logout,
}

/// The signed-in screen: navbar, phone mock-up and the active section's form.
pub struct Editor {
    session: Session,
    section: Section,
    // Children
    links: LinksForm,
    profile: ProfileDetails,
}

impl Editor {
    pub fn new(repo: Repository, session: Session, section: Section) -> (Self, Task<Message>) {
        let task = load_document(repo.clone(), session.clone());

        (
            Self {
                links: LinksForm::new(repo.clone(), session.clone()),
                profile: ProfileDetails::new(repo, session.clone()),
                session,
                section,
            },
            task,
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::DocumentLoaded(Ok(document)) => {
                self.profile.load(&document);
                self.links.load(document.links);
                Action::None
            }
            Message::DocumentLoaded(Err(err)) => Action::Notify(Toast::error(err)),
            Message::Navbar(message) => match message {
                navbar::Message::SectionSelected(section) => {
                    self.section = section;
                    Action::SectionChanged(section)
                }
                navbar::Message::PreviewPressed => Action::Preview,
                navbar::Message::LogoutPressed => Action::Logout,
            },
            Message::Links(message) => match self.links.update(message) {
                links_form::Action::None => Action::None,
                links_form::Action::Run(task) => Action::Run(task.map(Message::Links)),
                links_form::Action::Notify(toast) => Action::Notify(toast),
            },
            Message::Profile(message) => match self.profile.update(message) {
                profile_form::Action::None => Action::None,
                profile_form::Action::Run(task) => Action::Run(task.map(Message::Profile)),
                profile_form::Action::Notify(toast) => Action::Notify(toast),
            },
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let form = match self.section {
            Section::Links => self.links.view().map(Message::Links),
            Section::ProfileDetails => self.profile.view().map(Message::Profile),
        };

        column![
            navbar::view(self.section).map(Message::Navbar),
            row![
                placeholder::view(),
                container(form)
                    .padding(24)
                    .width(Fill)
                    .height(Fill)
                    .style(container::rounded_box),
            ]
            .spacing(24)
            .height(Fill),
        ]
        .spacing(24)
        .padding(24)
        .into()
    }
}

/// Fetch the stored document off the UI thread.
pub fn load_document(repo: Repository, session: Session) -> Task<Message> {
    Task::perform(
        async move {
            spawn_blocking(move || repo.fetch(&session).map_err(|err| err.to_string()))
                .await
                .unwrap_or_else(|err| Err(err.to_string()))
        },
        Message::DocumentLoaded,
    )
}
