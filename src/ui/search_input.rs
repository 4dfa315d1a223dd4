use iced::widget::{column, row, text, text_input};
use iced::{Alignment, Element, Fill};

use crate::app::Message;
use crate::ui::theme;

/// The search input ID for focus management
pub const SEARCH_INPUT_ID: &str = "scout-search-input";

/// Build the search input, with a loading marker and the Tab completion hint
pub fn view<'a>(query: &'a str, hint: Option<String>, loading: bool) -> Element<'a, Message> {
    let input = text_input("Search topics and replies...", query)
        .on_input(Message::QueryChanged)
        .on_submit(Message::Execute)
        .id(SEARCH_INPUT_ID)
        .padding(16)
        .size(18)
        .width(Fill)
        .style(theme::search_input);

    let mut field = row![input].spacing(8).align_y(Alignment::Center);
    if loading {
        field = field.push(text("Searching…").size(12).color(theme::TEXT_SECONDARY));
    }

    match hint {
        Some(hint) => column![
            field,
            text(format!("Tab ⇥ {hint}"))
                .size(12)
                .color(theme::TEXT_SECONDARY)
        ]
        .spacing(4)
        .into(),
        None => field.into(),
    }
}
