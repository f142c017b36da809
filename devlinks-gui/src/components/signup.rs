use devlinks_lib::{
    Repository, Session,
    forms::{
        SignupForm,
        credentials::{CredentialField, FieldError, message_for},
    },
};
use iced::{
    Element, Task,
    widget::{button, center, column, container, row, text, text_input},
};
use tokio::task::spawn_blocking;

#[derive(Debug, Clone)]
pub enum Message {
    EmailInput(String),
    PasswordInput(String),
    ConfirmPasswordInput(String),
    CreatePressed,
    LoginPressed,
    SignedUp(Result<Session, String>),
}

pub enum Action {
    None,
    Run(Task<Message>),
    SignedUp(Session),
    GoToLogin,
    Failed(String),
}

pub struct Signup {
    repo: Repository,
    form: SignupForm,
    errors: Vec<FieldError>,
    pending: bool,
}

impl Signup {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            form: SignupForm::default(),
            errors: Vec::new(),
            pending: false,
        }
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::EmailInput(email) => {
                self.form.email = email;
                Action::None
            }
            Message::PasswordInput(password) => {
                self.form.password = password;
                Action::None
            }
            Message::ConfirmPasswordInput(confirm_password) => {
                self.form.confirm_password = confirm_password;
                Action::None
            }
            Message::CreatePressed => {
                self.errors = self.form.errors();
                if !self.errors.is_empty() || self.pending {
                    return Action::None;
                }

                self.pending = true;
                let repo = self.repo.clone();
                let form = self.form.clone();

                Action::Run(Task::perform(
                    async move {
                        spawn_blocking(move || form.submit(&repo).map_err(|err| err.to_string()))
                            .await
                            .unwrap_or_else(|err| Err(err.to_string()))
                    },
                    Message::SignedUp,
                ))
            }
            Message::LoginPressed => Action::GoToLogin,
            Message::SignedUp(result) => {
                self.pending = false;
                match result {
                    Ok(session) => {
                        self.form = SignupForm::default();
                        Action::SignedUp(session)
                    }
                    Err(err) => Action::Failed(err),
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let error = |field| field_error(&self.errors, field);

        center(
            container(
                column![
                    text("Create account").size(32),
                    text("Let's get you started sharing your links!"),
                    text("Email address"),
                    text_input("e.g. alex@email.com", &self.form.email)
                        .on_input(Message::EmailInput),
                    error(CredentialField::Email),
                    text("Create password"),
                    text_input("At least 6 characters", &self.form.password)
                        .secure(true)
                        .on_input(Message::PasswordInput),
                    error(CredentialField::Password),
                    text("Confirm password"),
                    text_input("At least 6 characters", &self.form.confirm_password)
                        .secure(true)
                        .on_input(Message::ConfirmPasswordInput)
                        .on_submit(Message::CreatePressed),
                    error(CredentialField::ConfirmPassword),
                    button("Create new account")
                        .style(button::primary)
                        .on_press_maybe((!self.pending).then_some(Message::CreatePressed)),
                    row![
                        text("Already have an account?"),
                        button("Login")
                            .style(button::text)
                            .on_press(Message::LoginPressed),
                    ]
                    .spacing(4),
                ]
                .spacing(10),
            )
            .padding(40)
            .width(480)
            .style(container::rounded_box),
        )
        .into()
    }
}

fn field_error<'a>(errors: &[FieldError], field: CredentialField) -> Element<'a, Message> {
    text(message_for(errors, field).unwrap_or_default())
        .style(text::danger)
        .into()
}
