use devlinks_lib::{
    Error, Repository, Session, UserDocument,
    forms::{AvatarFile, ProfileField, ProfileForm},
};
use iced::{
    Element,
    Length::Fill,
    Task,
    widget::{button, column, container, row, space, text, text_input},
};
use rfd::AsyncFileDialog;
use tokio::task::spawn_blocking;

use crate::components::toast::Toast;

#[derive(Debug, Clone)]
pub enum Message {
    FieldInput(ProfileField, String),
    PickAvatarPressed,
    AvatarPicked(Option<AvatarFile>),
    SavePressed,
    /// Carries the URL of a newly uploaded avatar
    Saved(Result<Option<String>, String>),
}

pub enum Action {
    None,
    Run(Task<Message>),
    Notify(Toast),
}

pub struct ProfileDetails {
    repo: Repository,
    session: Session,
    form: ProfileForm,
    /// Stored avatar URL, shown until a new image is picked
    profile_image: Option<String>,
    /// Saving is held back until the stored details are known
    loaded: bool,
}

impl ProfileDetails {
    pub fn new(repo: Repository, session: Session) -> Self {
        Self {
            repo,
            session,
            form: ProfileForm::new(),
            profile_image: None,
            loaded: false,
        }
    }

    /// Seed the form from the stored document, unless the user already started editing.
    pub fn load(&mut self, document: &UserDocument) {
        if self.form.is_pristine() {
            self.form = ProfileForm::from_document(document);
        }
        if self.profile_image.is_none() {
            self.profile_image.clone_from(&document.profile_image);
        }
        self.loaded = true;
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::FieldInput(field, value) => {
                self.form.set_field(field, value);
                Action::None
            }
            Message::PickAvatarPressed => Action::Run(Task::perform(
                async {
                    let file = AsyncFileDialog::new()
                        .add_filter("Images", &["png", "jpg", "jpeg", "bmp"])
                        .pick_file()
                        .await?;

                    Some(AvatarFile::new(file.file_name(), file.read().await))
                },
                Message::AvatarPicked,
            )),
            Message::AvatarPicked(avatar) => {
                // Cancelling the dialog keeps the current pick
                if avatar.is_some() {
                    self.form.set_avatar(avatar);
                }
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
                                    .map_err(|err| err.to_string())
                            })
                            .await
                            .unwrap_or_else(|err| Err(err.to_string()))
                        },
                        Message::Saved,
                    ))
                }
                Err(Error::SaveInProgress) => Action::None,
                Err(err) => Action::Notify(Toast::error(err.to_string())),
            },
            Message::Saved(Ok(uploaded)) => {
                self.form.finish_save(true);
                if uploaded.is_some() {
                    self.profile_image = uploaded;
                }
                Action::Notify(Toast::success(
                    "Profile updated.",
                    "Your profile has been updated successfully.",
                ))
            }
            Message::Saved(Err(err)) => {
                self.form.finish_save(false);
                Action::Notify(Toast::error(err))
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let avatar_label = match (self.form.avatar(), &self.profile_image) {
            (Some(avatar), _) => avatar.file_name().to_string(),
            (None, Some(url)) => url.clone(),
            (None, None) => "No image selected".to_string(),
        };

        let field = |field: ProfileField, placeholder: &'static str| {
            row![
                text(field.to_string()).width(160),
                text_input(placeholder, self.form.field(field))
                    .on_input(move |value| Message::FieldInput(field, value)),
            ]
            .spacing(16)
        };

        column![
            text("Profile Details").size(28),
            text("Add your details to create a personal touch to your profile."),
            container(
                row![
                    text("Profile picture").width(160),
                    button("+ Upload Image")
                        .style(button::secondary)
                        .on_press_maybe(
                            (!self.form.is_saving()).then_some(Message::PickAvatarPressed)
                        ),
                    text(avatar_label),
                ]
                .spacing(16),
            )
            .padding(16)
            .style(container::rounded_box),
            container(
                column![
                    field(ProfileField::FirstName, "e.g. John"),
                    field(ProfileField::LastName, "e.g. Appleseed"),
                    field(ProfileField::Email, "e.g. email@example.com"),
                ]
                .spacing(12),
            )
            .padding(16)
            .style(container::rounded_box),
            space::vertical(),
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
        .height(Fill)
        .into()
    }
}
