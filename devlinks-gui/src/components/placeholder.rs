use iced::{
    Element,
    Length::Fill,
    widget::{Column, center, column, container, space, text},
};

/// Number of link bars on the mock phone.
const LINK_BARS: usize = 5;

/// Static phone mock-up shown beside the editor. It doesn't reflect the profile being edited.
pub fn view<'a, Message: 'a>() -> Element<'a, Message> {
    let avatar = container(space::vertical())
        .width(96)
        .height(96)
        .style(container::rounded_box);

    let bars = Column::with_children((0..LINK_BARS).map(|_| {
        container(space::horizontal())
            .width(Fill)
            .height(44)
            .style(container::rounded_box)
            .into()
    }))
    .spacing(16);

    container(center(
        column![
            avatar,
            text("Name").size(18),
            text("Email").size(14),
            space::vertical().height(24),
            bars,
        ]
        .spacing(12)
        .align_x(iced::Center)
        .width(240),
    ))
    .width(320)
    .height(Fill)
    .padding(24)
    .style(container::bordered_box)
    .into()
}
