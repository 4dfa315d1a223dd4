use iced::widget::{container, mouse_area, row, text, Row};
use iced::{Alignment, Element, Padding};

use crate::app::Message;
use crate::config::CategoryLink;
use crate::ui::theme;

/// "Topics" label followed by one chip per configured category link
pub fn view(categories: &[CategoryLink]) -> Element<'_, Message> {
    if categories.is_empty() {
        return row![].into();
    }

    let mut chips = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(text("Topics").size(15).color(theme::TEXT_ON_ACCENT));

    for (i, category) in categories.iter().enumerate() {
        let chip = container(text(&category.name).size(14).color(theme::TEXT_ON_ACCENT))
            .padding(Padding::from([8, 14]))
            .style(theme::category_chip);
        chips = chips.push(mouse_area(chip).on_press(Message::OpenCategory(i)));
    }

    chips.into()
}
