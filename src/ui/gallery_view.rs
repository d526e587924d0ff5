use iced::widget::{button, image, scrollable, text, text_input, Column};
use iced::{Alignment, Element, Length};

use crate::{GalleryItem, Message, NameEdit};

/// Identifier of the inline rename input, used to focus it when an edit
/// starts
pub fn rename_input_id() -> text_input::Id {
    text_input::Id::new("rename-entry")
}

/// The scrollable thumbnail column with renamable name labels.
pub fn gallery<'a>(items: &'a [GalleryItem], editing: Option<&'a NameEdit>) -> Element<'a, Message> {
    let mut column = Column::new()
        .spacing(16)
        .padding(16)
        .align_x(Alignment::Center)
        .width(Length::Fill);

    if items.is_empty() {
        column = column.push(
            text("No screenshots here yet. Press Enter to save the clipboard.").size(14),
        );
    }

    for (index, item) in items.iter().enumerate() {
        column = column.push(
            button(image(item.thumb.clone()))
                .style(button::text)
                .padding(0)
                .on_press(Message::OpenEntry(index)),
        );
        column = column.push(name_row(index, item, editing));
    }

    scrollable(column).height(Length::Fill).into()
}

/// The name under each thumbnail: a clickable label, or the rename input
/// while this entry is being edited.
fn name_row<'a>(
    index: usize,
    item: &'a GalleryItem,
    editing: Option<&'a NameEdit>,
) -> Element<'a, Message> {
    match editing {
        Some(edit) if edit.index == index => text_input("New name", &edit.buffer)
            .id(rename_input_id())
            .on_input(Message::EditInput)
            .on_submit(Message::EditSubmit)
            .size(14)
            .width(320)
            .into(),
        _ => button(text(&item.entry.display_name).size(14))
            .style(button::text)
            .on_press(Message::EditStart(index))
            .into(),
    }
}
