//! Short-lived notifications stacked in the corner of the window.

use std::time::Duration;

use derive_more::Deref;
use iced::{
    Color, Element,
    Length::Fill,
    Task,
    widget::{Column, button, column, container, row, space, text},
};

/// How long a toast stays up unless closed earlier.
pub const TIMEOUT: Duration = Duration::from_secs(5);

const WARNING: Color = Color::from_rgb8(0xd9, 0x77, 0x06);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: Kind,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: Kind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: Kind::Warning,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            kind: Kind::Error,
            title: "Error".into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Dismiss(u64),
}

#[derive(Debug, Default, Deref)]
pub struct Toasts {
    #[deref]
    items: Vec<(u64, Toast)>,
    next_id: u64,
}

impl Toasts {
    /// Show `toast`, returning the task that dismisses it once [`TIMEOUT`] has passed.
    pub fn push(&mut self, toast: Toast) -> Task<Message> {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push((id, toast));

        Task::perform(
            async move {
                tokio::time::sleep(TIMEOUT).await;
                id
            },
            Message::Dismiss,
        )
    }

    pub fn update(&mut self, message: Message) {
        match message {
            // Closing manually first makes the timed dismissal a no-op
            Message::Dismiss(id) => self.items.retain(|(toast_id, _)| *toast_id != id),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let toasts = Column::with_children(self.items.iter().map(|(id, toast)| {
            let title = match toast.kind {
                Kind::Success => text(&toast.title).style(text::success),
                Kind::Warning => text(&toast.title).color(WARNING),
                Kind::Error => text(&toast.title).style(text::danger),
            };

            container(
                row![
                    column![title.size(16), text(&toast.description)].spacing(4),
                    space::horizontal(),
                    button("×").style(button::text).on_press(Message::Dismiss(*id)),
                ]
                .spacing(10),
            )
            .padding(12)
            .width(320)
            .style(container::bordered_box)
            .into()
        }))
        .spacing(8);

        container(toasts)
            .padding(20)
            .align_right(Fill)
            .align_bottom(Fill)
            .into()
    }
}
