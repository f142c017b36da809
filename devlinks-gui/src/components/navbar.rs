use iced::{
    Element,
    widget::{button, container, row, space, text},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// The part of the editor currently shown next to the preview.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
pub enum Section {
    #[default]
    Links,
    #[strum(to_string = "Profile Details")]
    ProfileDetails,
}

#[derive(Debug, Clone)]
pub enum Message {
    SectionSelected(Section),
    PreviewPressed,
    LogoutPressed,
}

pub fn view<'a>(active: Section) -> Element<'a, Message> {
    let sections = row(Section::iter().map(|section| {
        let style = if section == active {
            button::primary
        } else {
            button::text
        };

        button(text(section.to_string()))
            .style(style)
            .on_press(Message::SectionSelected(section))
            .into()
    }))
    .spacing(8);

    container(
        row![
            text("devlinks").size(24),
            space::horizontal(),
            sections,
            space::horizontal(),
            button("Preview")
                .style(button::secondary)
                .on_press(Message::PreviewPressed),
            button("Log out")
                .style(button::danger)
                .on_press(Message::LogoutPressed),
        ]
        .spacing(8),
    )
    .padding(16)
    .style(container::rounded_box)
    .into()
}
