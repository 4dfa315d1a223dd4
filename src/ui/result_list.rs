use chrono::{DateTime, NaiveDate};
use iced::widget::{column, container, mouse_area, row, scrollable, text, Column};
use iced::{Element, Fill, Padding};

use crate::app::Message;
use crate::search::SearchRecord;
use crate::ui::theme;

/// Estimated row height in pixels (badge line + title + snippet + footer)
const ROW_HEIGHT_ESTIMATE: f32 = 96.0;
/// Panels with more rows than this scroll instead of growing
const MAX_ROWS_UNSCROLLED: usize = 3;

/// Build the result panel. Each row opens its record when pressed.
pub fn view<'a>(results: &'a [SearchRecord], selected_index: usize) -> Element<'a, Message> {
    if results.is_empty() {
        return column![].into();
    }

    let mut rows = Column::new().spacing(2);
    for (i, record) in results.iter().enumerate() {
        let style = if i == selected_index {
            theme::result_row_selected as fn(&iced::Theme) -> container::Style
        } else {
            theme::result_row
        };

        let row = container(record_view(record))
            .padding(Padding::from([10, 14]))
            .width(Fill)
            .style(style);

        rows = rows.push(mouse_area(row).on_press(Message::Open(i)));
    }

    let height = if results.len() > MAX_ROWS_UNSCROLLED {
        ROW_HEIGHT_ESTIMATE * 4.0
    } else {
        ROW_HEIGHT_ESTIMATE * 2.0
    };

    container(scrollable(rows).height(Fill))
        .height(height)
        .width(Fill)
        .style(theme::result_panel)
        .into()
}

fn record_view(record: &SearchRecord) -> Element<'_, Message> {
    let badge = container(text(record.kind_name()).size(11).color(theme::TEXT_ON_ACCENT))
        .padding(Padding::from([2, 8]))
        .style(theme::badge);
    let header = row![
        badge,
        text(format_date(record.date()))
            .size(11)
            .color(theme::TEXT_SECONDARY)
    ]
    .spacing(12)
    .align_y(iced::Alignment::Center);

    let (title, snippet, footer) = match record {
        SearchRecord::Topic(t) => (
            t.title.clone(),
            t.excerpt.as_deref().filter(|s| !s.is_empty()),
            format!("Topic #{}", t.id),
        ),
        SearchRecord::Reply(r) => (
            format!("Re: {}", r.topic_slug),
            Some(r.content.as_str()).filter(|s| !s.is_empty()),
            format!("Reply to Topic #{}", r.topic_id),
        ),
    };

    let mut body = column![header, text(title).size(16).color(theme::TEXT_PRIMARY)].spacing(4);
    if let Some(snippet) = snippet {
        body = body.push(text(snippet_line(snippet)).size(13).color(theme::TEXT_SECONDARY));
    }
    body.push(text(footer).size(11).color(theme::TEXT_SECONDARY))
        .into()
}

/// Render an ISO-8601 timestamp or date as `YYYY-MM-DD`; anything else is shown as-is.
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// Snippets are clamped to roughly two lines of text
fn snippet_line(s: &str) -> String {
    const MAX_CHARS: usize = 160;
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(MAX_CHARS).collect();
        format!("{}…", cut.trim_end())
    }
}
