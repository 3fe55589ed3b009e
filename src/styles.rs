//! Theme and style system for the frame
//!
//! Provides consistent styling across the screens with support for light,
//! dark and colorless terminals.

use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;
use std::sync::RwLock;

/// Global theme instance (supports runtime updates)
static THEME: RwLock<Theme> = RwLock::new(Theme {
    theme_type: ThemeType::Dark,
    primary: Color::Cyan,
    accent: Color::Green,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
    text: Color::White,
    text_muted: Color::DarkGray,
    border: Color::DarkGray,
    border_focused: Color::Blue,
    background: Color::Black,
});

/// Initialize the global theme (call once at startup, or to update at runtime)
pub fn init_theme(theme_type: ThemeType) {
    if let Ok(mut theme) = THEME.write() {
        *theme = Theme::new(theme_type);
    }
}

/// Get the current theme
pub fn theme() -> Theme {
    THEME
        .read()
        .map(|t| t.clone())
        .unwrap_or_else(|_| Theme::dark())
}

/// Theme type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeType {
    #[default]
    Dark,
    Light,
    /// Disable all UI colors (equivalent to `NO_COLOR=1`)
    NoColor,
}

impl FromStr for ThemeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "light" => ThemeType::Light,
            "nocolor" | "no-color" | "no_color" => ThemeType::NoColor,
            _ => ThemeType::Dark,
        })
    }
}

/// Color palette for the frame
#[derive(Debug, Clone)]
pub struct Theme {
    pub theme_type: ThemeType,

    /// Titles and key UI elements
    pub primary: Color,
    /// The generate button
    pub accent: Color,

    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub text: Color,
    pub text_muted: Color,

    pub border: Color,
    pub border_focused: Color,
    /// Kiosk background; black by default so the picture stands out
    pub background: Color,
}

impl Theme {
    pub fn new(theme_type: ThemeType) -> Self {
        match theme_type {
            ThemeType::Dark => Self::dark(),
            ThemeType::Light => Self::light(),
            ThemeType::NoColor => Self::no_color(),
        }
    }

    /// Dark theme, the kiosk default
    pub fn dark() -> Self {
        Self {
            theme_type: ThemeType::Dark,
            primary: Color::Cyan,
            accent: Color::Green,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            text: Color::White,
            text_muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Blue,
            background: Color::Black,
        }
    }

    /// Light theme - for light terminal backgrounds
    pub fn light() -> Self {
        Self {
            theme_type: ThemeType::Light,
            primary: Color::Blue,
            accent: Color::Green,
            success: Color::Green,
            warning: Color::Rgb(180, 120, 0),
            error: Color::Red,
            text: Color::Black,
            text_muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Blue,
            background: Color::Reset,
        }
    }

    /// No-color theme
    ///
    /// Style helpers below avoid setting fg/bg in this mode.
    pub fn no_color() -> Self {
        Self {
            theme_type: ThemeType::NoColor,
            primary: Color::Reset,
            accent: Color::Reset,
            success: Color::Reset,
            warning: Color::Reset,
            error: Color::Reset,
            text: Color::Reset,
            text_muted: Color::Reset,
            border: Color::Reset,
            border_focused: Color::Reset,
            background: Color::Reset,
        }
    }

    fn is_plain(&self) -> bool {
        self.theme_type == ThemeType::NoColor
    }

    /// Style for primary/title text
    pub fn title_style(&self) -> Style {
        if self.is_plain() {
            return Style::default().add_modifier(Modifier::BOLD);
        }
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for regular text
    pub fn text_style(&self) -> Style {
        if self.is_plain() {
            return Style::default();
        }
        Style::default().fg(self.text)
    }

    /// Style for muted/secondary text
    pub fn muted_style(&self) -> Style {
        if self.is_plain() {
            return Style::default().add_modifier(Modifier::DIM);
        }
        Style::default().fg(self.text_muted)
    }

    /// Style for the primary action button
    pub fn button_style(&self, enabled: bool) -> Style {
        if self.is_plain() {
            return if enabled {
                Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
        }
        let bg = if enabled { self.accent } else { self.text_muted };
        Style::default()
            .fg(Color::White)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for secondary buttons (back)
    pub fn secondary_button_style(&self) -> Style {
        if self.is_plain() {
            return Style::default().add_modifier(Modifier::REVERSED);
        }
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }

    /// Style for success states
    pub fn success_style(&self) -> Style {
        if self.is_plain() {
            return Style::default().add_modifier(Modifier::BOLD);
        }
        Style::default().fg(self.success)
    }

    /// Style for in-progress and informational states
    pub fn warning_style(&self) -> Style {
        if self.is_plain() {
            return Style::default();
        }
        Style::default().fg(self.warning)
    }

    /// Style for error states
    pub fn error_style(&self) -> Style {
        if self.is_plain() {
            return Style::default().add_modifier(Modifier::BOLD);
        }
        Style::default().fg(self.error)
    }

    /// Style for focused borders
    pub fn border_focused_style(&self) -> Style {
        if self.is_plain() {
            return Style::default().add_modifier(Modifier::BOLD);
        }
        Style::default().fg(self.border_focused)
    }

    /// Style for unfocused borders
    pub fn border_style(&self) -> Style {
        if self.is_plain() {
            return Style::default();
        }
        Style::default().fg(self.border)
    }

    /// Background style
    pub fn background_style(&self) -> Style {
        if self.is_plain() {
            return Style::default();
        }
        Style::default().bg(self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_type_from_str() {
        assert_eq!("dark".parse::<ThemeType>().unwrap(), ThemeType::Dark);
        assert_eq!("light".parse::<ThemeType>().unwrap(), ThemeType::Light);
        assert_eq!("nocolor".parse::<ThemeType>().unwrap(), ThemeType::NoColor);
        assert_eq!("no-color".parse::<ThemeType>().unwrap(), ThemeType::NoColor);
        assert_eq!("bogus".parse::<ThemeType>().unwrap(), ThemeType::Dark);
    }

    #[test]
    fn test_no_color_theme_styles_do_not_set_colors() {
        let t = Theme::new(ThemeType::NoColor);
        for s in [t.button_style(true), t.error_style(), t.background_style()] {
            assert!(s.fg.is_none());
            assert!(s.bg.is_none());
        }
    }
}
