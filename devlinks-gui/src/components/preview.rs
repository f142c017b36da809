use devlinks_lib::{DocumentStore, Repository, Session, UserDocument};
use iced::{
    Center, Element,
    Length::Fill,
    Task,
    widget::{Column, button, center, column, container, row, space, text},
};
use tokio::task::spawn_blocking;

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<UserDocument, String>),
    BackPressed,
}

pub enum Action {
    None,
    Back,
    Failed(String),
}

#[derive(Debug, Clone)]
enum State {
    Loading,
    Loaded(UserDocument),
}

/// Read-only profile card, as visitors would see it.
pub struct Preview {
    state: State,
}

impl Preview {
    pub fn new(repo: Repository, session: Session) -> (Self, Task<Message>) {
        (
            Self {
                state: State::Loading,
            },
            Task::perform(
                async move {
                    spawn_blocking(move || repo.fetch(&session).map_err(|err| err.to_string()))
                        .await
                        .unwrap_or_else(|err| Err(err.to_string()))
                },
                Message::Loaded,
            ),
        )
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::Loaded(Ok(document)) => {
                self.state = State::Loaded(document);
                Action::None
            }
            Message::Loaded(Err(err)) => Action::Failed(err),
            Message::BackPressed => Action::Back,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let card: Element<'_, Message> = match &self.state {
            State::Loading => text("Loading...").into(),
            State::Loaded(document) => card(document),
        };

        column![
            container(row![
                button("Back to Editor")
                    .style(button::secondary)
                    .on_press(Message::BackPressed),
                space::horizontal(),
            ])
            .padding(16)
            .style(container::rounded_box),
            center(
                container(card)
                    .padding(40)
                    .width(360)
                    .style(container::bordered_box)
            ),
        ]
        .padding(24)
        .height(Fill)
        .into()
    }
}

fn card(document: &UserDocument) -> Element<'_, Message> {
    let name = format!("{} {}", document.first_name, document.last_name);

    let links = Column::with_children(document.links.iter().map(|link| {
        container(
            row![
                text(link.platform.to_string()),
                space::horizontal(),
                text(&link.url).size(12),
            ]
            .spacing(8),
        )
        .padding(12)
        .width(Fill)
        .style(container::rounded_box)
        .into()
    }))
    .spacing(16);

    let mut card = column![].spacing(12).align_x(Center);
    if let Some(url) = &document.profile_image {
        card = card.push(text(url).size(12));
    }

    card.push(text(name.trim().to_string()).size(28))
        .push(text(&document.email))
        .push(space::vertical().height(16))
        .push(links)
        .into()
}
