use clap::ValueEnum;
use ratatui::style::Color;

/// Closed set of selectable color themes. Cosmetic only: no simulation
/// effect.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum ThemeId {
    Classic,
    Ocean,
    Neon,
}

impl ThemeId {
    /// Next theme in cycle order.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Classic => Self::Ocean,
            Self::Ocean => Self::Neon,
            Self::Neon => Self::Classic,
        }
    }
}

/// Color table applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake_head: Color,
    pub snake_body: Color,
    pub snake_tail: Color,
    pub food: Color,
    pub obstacle: Color,
    pub border_fg: Color,
    pub hud_text: Color,
    pub hud_accent: Color,
    pub hud_timer: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

const THEME_CLASSIC: Theme = Theme {
    name: "Classic",
    snake_head: Color::White,
    snake_body: Color::Green,
    snake_tail: Color::DarkGray,
    food: Color::Red,
    obstacle: Color::Gray,
    border_fg: Color::White,
    hud_text: Color::White,
    hud_accent: Color::Green,
    hud_timer: Color::Yellow,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

const THEME_OCEAN: Theme = Theme {
    name: "Ocean",
    snake_head: Color::White,
    snake_body: Color::Cyan,
    snake_tail: Color::DarkGray,
    food: Color::Yellow,
    obstacle: Color::Blue,
    border_fg: Color::Cyan,
    hud_text: Color::Cyan,
    hud_accent: Color::White,
    hud_timer: Color::Yellow,
    menu_title: Color::Cyan,
    menu_footer: Color::DarkGray,
};

const THEME_NEON: Theme = Theme {
    name: "Neon",
    snake_head: Color::White,
    snake_body: Color::Magenta,
    snake_tail: Color::DarkGray,
    food: Color::Yellow,
    obstacle: Color::LightBlue,
    border_fg: Color::Magenta,
    hud_text: Color::Magenta,
    hud_accent: Color::Yellow,
    hud_timer: Color::Yellow,
    menu_title: Color::Magenta,
    menu_footer: Color::DarkGray,
};

/// Resolves a theme identifier to its color table.
#[must_use]
pub fn palette(id: ThemeId) -> &'static Theme {
    match id {
        ThemeId::Classic => &THEME_CLASSIC,
        ThemeId::Ocean => &THEME_OCEAN,
        ThemeId::Neon => &THEME_NEON,
    }
}

#[cfg(test)]
mod tests {
    use super::{ThemeId, palette};

    #[test]
    fn theme_cycle_returns_to_the_start() {
        assert_eq!(ThemeId::Classic.next().next().next(), ThemeId::Classic);
    }

    #[test]
    fn every_theme_resolves_to_a_named_table() {
        for id in [ThemeId::Classic, ThemeId::Ocean, ThemeId::Neon] {
            assert!(!palette(id).name.is_empty());
        }
    }
}
