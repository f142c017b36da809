use std::sync::Arc;

use devlinks_lib::{Repository, Session, auth};
use iced::{
    Element, Task, Theme, application,
    widget::{center, stack, text},
};
use parking_lot::RwLock;
use tokio::task::spawn_blocking;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    components::{
        editor::{self, Editor},
        login::{self, Login},
        preview::{self, Preview},
        signup::{self, Signup},
        toast::{self, Toast, Toasts},
    },
    config::{Cfg, GuiConfig},
};

pub mod components;
pub mod config;

fn main() -> iced::Result {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {err}");
    }

    let repo = Repository::new().map_err(|err| err.to_string());

    application(
        move || App::new(repo.clone()),
        App::update,
        App::view,
    )
    .theme(App::theme)
    .title(App::title)
    .run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Login,
    Signup,
    Editor,
    Preview,
}

#[derive(Debug, Clone)]
enum Message {
    LoggedOut,
    // Components
    Login(login::Message),
    Signup(signup::Message),
    Editor(editor::Message),
    Preview(preview::Message),
    Toast(toast::Message),
}

enum Screens {
    /// The repository couldn't be opened, nothing but the reason can be shown
    Unavailable(String),
    Ready {
        repo: Repository,
        login: Login,
        signup: Signup,
        editor: Option<Editor>,
        preview: Option<Preview>,
    },
}

struct App {
    cfg: Cfg,
    theme: Theme,
    route: Route,
    screens: Screens,
    toasts: Toasts,
}

impl App {
    pub fn new(repo: Result<Repository, String>) -> (Self, Task<Message>) {
        let cfg = Arc::new(RwLock::new(GuiConfig::load()));
        let theme = cfg.read().theme();

        let screens = match repo {
            Ok(repo) => Screens::Ready {
                login: Login::new(repo.clone()),
                signup: Signup::new(repo.clone()),
                editor: None,
                preview: None,
                repo,
            },
            Err(err) => {
                error!(%err, "Failed to open the repository");
                Screens::Unavailable(err)
            }
        };

        (
            Self {
                cfg,
                theme,
                route: Route::Login,
                screens,
                toasts: Toasts::default(),
            },
            Task::none(),
        )
    }

    // Update application state based on messages passed by view()
    pub fn update(&mut self, message: Message) -> Task<Message> {
        if let Message::Toast(message) = message {
            self.toasts.update(message);
            return Task::none();
        }

        let Screens::Ready {
            repo,
            login,
            signup,
            editor,
            preview,
        } = &mut self.screens
        else {
            return Task::none();
        };

        match message {
            Message::Login(message) => match login.update(message) {
                login::Action::None => Task::none(),
                login::Action::Run(task) => task.map(Message::Login),
                login::Action::GoToSignup => {
                    self.route = Route::Signup;
                    Task::none()
                }
                login::Action::LoggedIn(session) => {
                    let section = self.cfg.read().section;
                    let (new_editor, task) = Editor::new(repo.clone(), session, section);
                    *editor = Some(new_editor);
                    self.route = Route::Editor;
                    task.map(Message::Editor)
                }
                login::Action::Failed(err) => notify(&mut self.toasts, Toast::error(err)),
            },
            Message::Signup(message) => match signup.update(message) {
                signup::Action::None => Task::none(),
                signup::Action::Run(task) => task.map(Message::Signup),
                signup::Action::GoToLogin => {
                    self.route = Route::Login;
                    Task::none()
                }
                signup::Action::SignedUp(session) => {
                    let (new_editor, task) = Editor::new(repo.clone(), session, self.cfg.read().section);
                    *editor = Some(new_editor);
                    self.route = Route::Editor;
                    task.map(Message::Editor)
                }
                signup::Action::Failed(err) => notify(&mut self.toasts, Toast::error(err)),
            },
            Message::Editor(message) => {
                let Some(current) = editor else {
                    return Task::none();
                };

                match current.update(message) {
                    editor::Action::None => Task::none(),
                    editor::Action::Run(task) => task.map(Message::Editor),
                    editor::Action::Notify(toast) => notify(&mut self.toasts, toast),
                    editor::Action::SectionChanged(section) => {
                        let mut cfg = self.cfg.write();
                        cfg.section = section;
                        cfg.save();
                        Task::none()
                    }
                    editor::Action::Preview => {
                        let (new_preview, task) =
                            Preview::new(repo.clone(), current.session().clone());
                        *preview = Some(new_preview);
                        self.route = Route::Preview;
                        task.map(Message::Preview)
                    }
                    editor::Action::Logout => log_out(repo.clone(), current.session().clone()),
                }
            }
            Message::Preview(message) => {
                let Some(current) = preview else {
                    return Task::none();
                };

                match current.update(message) {
                    preview::Action::None => Task::none(),
                    preview::Action::Back => {
                        *preview = None;
                        self.route = Route::Editor;
                        Task::none()
                    }
                    preview::Action::Failed(err) => notify(&mut self.toasts, Toast::error(err)),
                }
            }
            Message::LoggedOut => {
                info!("Logged out");
                *editor = None;
                *preview = None;
                *login = Login::new(repo.clone());
                self.route = Route::Login;
                Task::none()
            }
            Message::Toast(_) => Task::none(),
        }
    }

    // Render the application and pass along messages from components to update()
    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.screens {
            Screens::Unavailable(err) => {
                center(text(format!("devlinks could not start: {err}")).style(text::danger)).into()
            }
            Screens::Ready {
                login,
                signup,
                editor,
                preview,
                ..
            } => match (self.route, editor, preview) {
                (Route::Signup, _, _) => signup.view().map(Message::Signup),
                (Route::Preview, _, Some(preview)) => preview.view().map(Message::Preview),
                (Route::Editor | Route::Preview, Some(editor), _) => {
                    editor.view().map(Message::Editor)
                }
                _ => login.view().map(Message::Login),
            },
        };

        stack![content, self.toasts.view().map(Message::Toast)].into()
    }

    pub fn title(&self) -> String {
        match self.route {
            Route::Login => "devlinks - Login".into(),
            Route::Signup => "devlinks - Create account".into(),
            Route::Editor => "devlinks".into(),
            Route::Preview => "devlinks - Preview".into(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }
}

fn notify(toasts: &mut Toasts, toast: Toast) -> Task<Message> {
    toasts.push(toast).map(Message::Toast)
}

/// Revoke the session off the UI thread. The local state is dropped either way.
fn log_out(repo: Repository, session: Session) -> Task<Message> {
    Task::perform(
        async move {
            spawn_blocking(move || {
                if let Err(err) = auth::end_session(&repo, &session) {
                    error!(%err, "Failed to revoke session");
                }
            })
            .await
        },
        |_| Message::LoggedOut,
    )
}
