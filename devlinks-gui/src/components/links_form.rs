use devlinks_lib::{
    Error, Link, Platform, Repository, Session,
    forms::{DraftChange, DraftId, LinkDraft, LinkForm, links::MAX_LINKS},
};
use iced::{
    Element,
    Length::Fill,
    Task,
    widget::{Column, button, column, container, pick_list, row, scrollable, space, text, text_input},
};
use strum::IntoEnumIterator;
use tokio::task::spawn_blocking;
use tracing::debug;

use crate::components::toast::Toast;

#[derive(Debug, Clone)]
pub enum Message {
    AddPressed,
    RemovePressed(DraftId),
    PlatformSelected(DraftId, Platform),
    UrlInput(DraftId, String),
    SavePressed,
    Saved(Result<Vec<Link>, String>),
}

pub enum Action {
    None,
    Run(Task<Message>),
    Notify(Toast),
}

pub struct LinksForm {
    repo: Repository,
    session: Session,
    form: LinkForm,
    platforms: Vec<Platform>,
    /// Saving is held back until the stored links are known
    loaded: bool,
}

impl LinksForm {
    pub fn new(repo: Repository, session: Session) -> Self {
        Self {
            repo,
            session,
            form: LinkForm::new(),
            platforms: Platform::iter().collect(),
            loaded: false,
        }
    }

    /// Take the saved links loaded from the document store. Drafts started meanwhile are kept.
    pub fn load(&mut self, saved: Vec<Link>) {
        self.form.replace_saved(saved);
        self.loaded = true;
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::AddPressed => match self.form.add_draft() {
                Ok(_) => Action::None,
                Err(Error::CapacityExceeded(limit)) => Action::Notify(Toast::warning(
                    "Link limit reached.",
                    format!("You can only add up to {limit} links."),
                )),
                Err(err) => Action::Notify(Toast::error(err.to_string())),
            },
            Message::RemovePressed(id) => {
                self.form.remove_draft(id);
                Action::None
            }
            Message::PlatformSelected(id, platform) => {
                self.form
                    .update_draft(id, DraftChange::Platform(Some(platform)));
                Action::None
            }
            Message::UrlInput(id, url) => {
                self.form.update_draft(id, DraftChange::Url(url));
                Action::None
            }
            Message::SavePressed if !self.loaded => Action::None,
            Message::SavePressed => match self.form.begin_save() {
                Ok(submission) => {
                    let repo = self.repo.clone();
                    let session = self.session.clone();

                    Action::Run(Task::perform(
                        async move {
                            spawn_blocking(move || {
                                submission
                                    .submit(&session, &repo)
                                    .map(|()| submission.into_links())
                                    .map_err(|err| err.to_string())
                            })
                            .await
                            .unwrap_or_else(|err| Err(err.to_string()))
                        },
                        Message::Saved,
                    ))
                }
                // Drafts now carry their own error messages
                Err(Error::Validation(_) | Error::SaveInProgress) => Action::None,
                Err(err) => Action::Notify(Toast::error(err.to_string())),
            },
            Message::Saved(Ok(links)) => {
                debug!(count = links.len(), "Links saved");
                self.form.finish_save(Some(links));
                Action::Notify(Toast::success(
                    "Links updated.",
                    "Your links have been updated successfully.",
                ))
            }
            Message::Saved(Err(err)) => {
                self.form.finish_save(None);
                Action::Notify(Toast::error(err))
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let saved = Column::with_children(self.form.saved().iter().map(|link| {
            row![
                text(link.platform.to_string()).width(120),
                text(&link.url),
            ]
            .spacing(8)
            .into()
        }))
        .spacing(4);

        let drafts = Column::with_children(
            self.form
                .drafts()
                .iter()
                .enumerate()
                .map(|(n, draft)| self.draft_card(n + 1, draft)),
        )
        .spacing(16);

        column![
            text("Customize your links").size(28),
            text(format!(
                "Add/edit/remove links below and then share all your profiles with the world! \
                 Up to {MAX_LINKS} new links can be added at a time."
            )),
            button("+ Add new link")
                .style(button::secondary)
                .width(Fill)
                .on_press(Message::AddPressed),
            scrollable(column![saved, drafts].spacing(16)).height(Fill),
            row![
                space::horizontal(),
                button("Save")
                    .style(button::primary)
                    .on_press_maybe(
                        (self.loaded && !self.form.is_saving()).then_some(Message::SavePressed)
                    ),
            ],
        ]
        .spacing(16)
        .into()
    }

    fn draft_card<'a>(&'a self, number: usize, draft: &'a LinkDraft) -> Element<'a, Message> {
        let id = draft.id();

        let mut card = column![
            row![
                text(format!("Link #{number}")),
                space::horizontal(),
                button("Remove")
                    .style(button::text)
                    .on_press(Message::RemovePressed(id)),
            ],
            text("Platform"),
            pick_list(self.platforms.as_slice(), draft.platform(), move |platform| {
                Message::PlatformSelected(id, platform)
            })
            .placeholder("Select a platform")
            .width(Fill),
            text("Link"),
            text_input("e.g. https://www.github.com/johnappleseed", draft.url())
                .on_input(move |url| Message::UrlInput(id, url)),
        ]
        .spacing(8);

        if let Some(error) = draft.error() {
            card = card.push(text(error).style(text::danger));
        }

        container(card)
            .padding(16)
            .style(container::rounded_box)
            .into()
    }
}

