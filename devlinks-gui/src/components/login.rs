use devlinks_lib::{
    Repository, Session,
    forms::{
        LoginForm,
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
    LoginPressed,
    SignupPressed,
    LoggedIn(Result<Session, String>),
}

pub enum Action {
    None,
    Run(Task<Message>),
    LoggedIn(Session),
    GoToSignup,
    Failed(String),
}

pub struct Login {
    repo: Repository,
    form: LoginForm,
    errors: Vec<FieldError>,
    pending: bool,
}

impl Login {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            form: LoginForm::default(),
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
            Message::LoginPressed => {
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
                    Message::LoggedIn,
                ))
            }
            Message::SignupPressed => Action::GoToSignup,
            Message::LoggedIn(result) => {
                self.pending = false;
                match result {
                    Ok(session) => {
                        self.form = LoginForm::default();
                        Action::LoggedIn(session)
                    }
                    Err(err) => Action::Failed(err),
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let email_error = message_for(&self.errors, CredentialField::Email);
        let password_error = message_for(&self.errors, CredentialField::Password);

        center(
            container(
                column![
                    text("Login").size(32),
                    text("Add your details below to get back into the app"),
                    text("Email address"),
                    text_input("e.g. alex@email.com", &self.form.email)
                        .on_input(Message::EmailInput)
                        .on_submit(Message::LoginPressed),
                    text(email_error.unwrap_or_default()).style(text::danger),
                    text("Password"),
                    text_input("Enter your password", &self.form.password)
                        .secure(true)
                        .on_input(Message::PasswordInput)
                        .on_submit(Message::LoginPressed),
                    text(password_error.unwrap_or_default()).style(text::danger),
                    button("Login")
                        .style(button::primary)
                        .on_press_maybe((!self.pending).then_some(Message::LoginPressed)),
                    row![
                        text("Don't have an account?"),
                        button("Create account")
                            .style(button::text)
                            .on_press(Message::SignupPressed),
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
