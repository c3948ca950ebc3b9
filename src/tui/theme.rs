//! Picker theme
//!
//! Colors for the project picker, chosen per terminal color depth.

use ratatui::style::{Color, Modifier, Style};

/// How many colors the terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// The 16 ANSI colors
    Basic,
    /// 256 color palette
    #[default]
    Indexed,
    /// 24-bit RGB
    TrueColor,
}

impl ColorMode {
    /// Color mode of the current terminal
    pub fn detect() -> Self {
        Self::from_env(
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    /// Pick a color mode from `COLORTERM` and `TERM` values
    pub fn from_env(colorterm: Option<&str>, term: Option<&str>) -> Self {
        if matches!(colorterm, Some("truecolor") | Some("24bit")) {
            return Self::TrueColor;
        }

        match term {
            // These terminals support true color even without COLORTERM
            Some(t) if t.contains("kitty") || t.contains("alacritty") => Self::TrueColor,
            Some(t) if t.contains("256color") => Self::Indexed,
            _ => Self::Basic,
        }
    }
}

/// Colors used by the picker
#[derive(Debug, Clone)]
pub struct Theme {
    pub list_border: Color,
    pub preview_border: Color,
    pub cursor_bg: Color,
    pub cursor_fg: Option<Color>,
    pub label: Color,
    pub muted: Color,
    /// Characters matched by the query
    pub hit: Color,
    pub prompt: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ColorMode::detect())
    }
}

impl Theme {
    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Basic => Self::basic(),
            ColorMode::Indexed => Self::indexed(),
            ColorMode::TrueColor => Self::truecolor(),
        }
    }

    /// 16 colors, readable on light and dark backgrounds
    pub fn basic() -> Self {
        Self {
            list_border: Color::Blue,
            preview_border: Color::DarkGray,
            cursor_bg: Color::DarkGray,
            cursor_fg: None,
            label: Color::Reset,
            muted: Color::Gray,
            hit: Color::Magenta,
            prompt: Color::Blue,
        }
    }

    pub fn indexed() -> Self {
        Self {
            list_border: Color::Indexed(67),
            preview_border: Color::Indexed(240),
            cursor_bg: Color::Indexed(237),
            cursor_fg: Some(Color::Indexed(231)),
            label: Color::Reset,
            muted: Color::Indexed(246),
            hit: Color::Indexed(211),
            prompt: Color::Indexed(74),
        }
    }

    pub fn truecolor() -> Self {
        Self {
            list_border: Color::Rgb(94, 129, 172),
            preview_border: Color::Rgb(76, 86, 106),
            cursor_bg: Color::Rgb(59, 66, 82),
            cursor_fg: Some(Color::Rgb(236, 239, 244)),
            label: Color::Rgb(216, 222, 233),
            muted: Color::Rgb(129, 161, 193),
            hit: Color::Rgb(235, 203, 139),
            prompt: Color::Rgb(136, 192, 208),
        }
    }

    /// Highlighted row
    pub fn cursor(&self) -> Style {
        let base = Style::default()
            .bg(self.cursor_bg)
            .add_modifier(Modifier::BOLD);
        self.cursor_fg.map_or(base, |fg| base.fg(fg))
    }

    /// Characters matched by the query
    pub fn matched(&self) -> Style {
        Style::default()
            .fg(self.hit)
            .add_modifier(Modifier::BOLD)
    }

    pub fn prompt(&self) -> Style {
        Style::default().fg(self.prompt).add_modifier(Modifier::BOLD)
    }
}
