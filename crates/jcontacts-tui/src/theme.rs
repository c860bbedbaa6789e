//! Terminal colours for each stored theme.

use jcontacts_core::Theme;
use ratatui::style::Color;

/// Colours used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub error: Color,
}

/// Map a stored theme onto terminal colours.
pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light | Theme::IntelliJ | Theme::MacLight => Palette {
            text: Color::Black,
            muted: Color::Gray,
            accent: Color::Blue,
            border: Color::Gray,
            selection_bg: Color::Rgb(200, 220, 250),
            selection_fg: Color::Black,
            error: Color::Red,
        },
        Theme::JContactsLight => Palette {
            text: Color::Black,
            muted: Color::Gray,
            accent: Color::Rgb(0, 128, 96),
            border: Color::Gray,
            selection_bg: Color::Rgb(190, 235, 220),
            selection_fg: Color::Black,
            error: Color::Red,
        },
        Theme::JContactsDark => Palette {
            text: Color::White,
            muted: Color::DarkGray,
            accent: Color::Rgb(80, 200, 160),
            border: Color::DarkGray,
            selection_bg: Color::Rgb(30, 80, 64),
            selection_fg: Color::White,
            error: Color::LightRed,
        },
        Theme::Darcula => Palette {
            text: Color::Rgb(169, 183, 198),
            muted: Color::DarkGray,
            accent: Color::Rgb(204, 120, 50),
            border: Color::DarkGray,
            selection_bg: Color::Rgb(33, 66, 131),
            selection_fg: Color::White,
            error: Color::LightRed,
        },
        Theme::Dark | Theme::MacDark => Palette {
            text: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            selection_bg: Color::Rgb(60, 60, 80),
            selection_fg: Color::White,
            error: Color::Red,
        },
    }
}
