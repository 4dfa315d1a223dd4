use iced::widget::{container, text_input};
use iced::{Border, Color, Shadow, Theme};

/// Window background
pub const BACKGROUND: Color = Color {
    r: 0.10,
    g: 0.09,
    b: 0.16,
    a: 0.96,
};

/// Search input and result panel surface
const SURFACE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Forum brand purple, used for badges, chips and the focused input border
pub const ACCENT: Color = Color {
    r: 0.43,
    g: 0.29,
    b: 0.92,
    a: 1.0,
};

/// Text on the light panel
pub const TEXT_PRIMARY: Color = Color {
    r: 0.08,
    g: 0.08,
    b: 0.1,
    a: 1.0,
};

pub const TEXT_SECONDARY: Color = Color {
    r: 0.42,
    g: 0.42,
    b: 0.48,
    a: 1.0,
};

/// Text on dark or accent backgrounds
pub const TEXT_ON_ACCENT: Color = Color::WHITE;

pub fn main_container(theme: &Theme) -> container::Style {
    let _ = theme;
    container::Style {
        background: Some(BACKGROUND.into()),
        border: Border {
            color: Color {
                r: 0.3,
                g: 0.25,
                b: 0.45,
                a: 0.5,
            },
            width: 1.0,
            radius: 12.0.into(),
        },
        shadow: Shadow {
            color: Color::BLACK,
            offset: iced::Vector::new(0.0, 4.0),
            blur_radius: 20.0,
        },
        text_color: Some(TEXT_ON_ACCENT),
        snap: false,
    }
}

pub fn search_input(theme: &Theme, status: text_input::Status) -> text_input::Style {
    let _ = theme;
    let focused = matches!(status, text_input::Status::Focused { .. });
    text_input::Style {
        background: SURFACE.into(),
        border: Border {
            color: ACCENT,
            width: if focused { 5.0 } else { 3.0 },
            radius: 24.0.into(),
        },
        icon: TEXT_SECONDARY,
        placeholder: TEXT_SECONDARY,
        value: TEXT_PRIMARY,
        selection: Color { a: 0.3, ..ACCENT },
    }
}

/// The dropdown holding the result rows
pub fn result_panel(theme: &Theme) -> container::Style {
    let _ = theme;
    container::Style {
        background: Some(SURFACE.into()),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 8.0.into(),
        },
        text_color: Some(TEXT_PRIMARY),
        ..container::Style::default()
    }
}

pub fn result_row(theme: &Theme) -> container::Style {
    let _ = theme;
    container::Style {
        background: None,
        text_color: Some(TEXT_PRIMARY),
        ..container::Style::default()
    }
}

pub fn result_row_selected(theme: &Theme) -> container::Style {
    let _ = theme;
    container::Style {
        background: Some(Color { a: 0.12, ..ACCENT }.into()),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 6.0.into(),
        },
        text_color: Some(TEXT_PRIMARY),
        ..container::Style::default()
    }
}

/// "Topic" / "Reply" label on each row
pub fn badge(theme: &Theme) -> container::Style {
    let _ = theme;
    container::Style {
        background: Some(ACCENT.into()),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 4.0.into(),
        },
        text_color: Some(TEXT_ON_ACCENT),
        ..container::Style::default()
    }
}

/// Category quick link above the input
pub fn category_chip(theme: &Theme) -> container::Style {
    let _ = theme;
    container::Style {
        background: Some(ACCENT.into()),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 8.0.into(),
        },
        text_color: Some(TEXT_ON_ACCENT),
        ..container::Style::default()
    }
}
