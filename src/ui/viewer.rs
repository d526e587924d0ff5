use iced::widget::{button, column, container, image, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::gallery::GalleryEntry;
use crate::Message;

/// Full-size, aspect-fit view of a single saved image.
///
/// Stateless: the widget decodes the file from its path, and Enter,
/// Escape or the button return to the gallery.
pub fn view(entry: &GalleryEntry) -> Element<'_, Message> {
    let content = column![
        text(&entry.display_name).size(20),
        image(image::Handle::from_path(&entry.file_path))
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill),
        button(text("Back").size(14))
            .on_press(Message::CloseViewer)
            .padding(8),
    ]
    .spacing(12)
    .padding(16)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
