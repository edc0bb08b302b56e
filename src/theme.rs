//! Theme system

use crate::color::Hsl;
use ratatui::style::Color;

/// Hue, saturation and lightness range of one partition bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPalette {
    pub hue: f64,
    pub saturation: f64,
    pub min_light: f64,
    pub max_light: f64,
}

impl BarPalette {
    pub const fn new(hue: f64, saturation: f64, min_light: f64, max_light: f64) -> Self {
        Self {
            hue,
            saturation,
            min_light,
            max_light,
        }
    }

    #[inline]
    pub fn color(&self, lightness: f64) -> Color {
        Hsl::new(self.hue, self.saturation, lightness).to_color()
    }
}

/// Root bar and the two child bars of a triple partition chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPalette {
    pub root: BarPalette,
    pub first: BarPalette,
    pub second: BarPalette,
}

/// Complete color palette for TUI rendering
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    // Backgrounds
    pub bg_primary: Color,
    pub bg_tertiary: Color,
    pub bg_highlight: Color,

    // Borders
    pub border_default: Color,
    pub border_focus: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Status
    pub error: Color,

    // Entries
    pub completed: Color,
    pub not_completed: Color,
    pub rating: Color,

    // Charts
    pub publisher_bar: Color,
}

impl ThemeColors {
    /// Default theme
    pub const DEFAULT: Self = Self {
        // Backgrounds
        bg_primary: Color::Rgb(22, 24, 38),
        bg_tertiary: Color::Rgb(32, 35, 52),
        bg_highlight: Color::Rgb(50, 54, 72),

        // Borders
        border_default: Color::Rgb(130, 135, 160),
        border_focus: Color::Rgb(120, 220, 170),

        // Text
        text_primary: Color::Rgb(230, 233, 248),
        text_secondary: Color::Rgb(185, 190, 210),
        text_muted: Color::Rgb(140, 145, 168),

        // Status
        error: Color::Rgb(250, 120, 130),

        // Entries
        completed: Color::Rgb(230, 233, 248),
        not_completed: Color::Rgb(140, 145, 168),
        rating: Color::Rgb(235, 195, 100),

        // Charts
        publisher_bar: Color::Rgb(242, 140, 40),
    };

    /// Heading color by tree depth; deeper levels cycle.
    #[inline]
    pub fn level_color(&self, level: usize) -> Color {
        const COLORS: [Color; 4] = [
            Color::Rgb(245, 175, 100),
            Color::Rgb(120, 170, 250),
            Color::Rgb(110, 210, 120),
            Color::Rgb(210, 150, 235),
        ];
        COLORS[level % COLORS.len()]
    }

    pub const GENRE_CHART: ChartPalette = ChartPalette {
        root: BarPalette::new(30.0, 89.0, 27.5, 55.0),
        first: BarPalette::new(240.0, 89.0, 27.5, 55.0),
        second: BarPalette::new(115.0, 89.0, 10.0, 25.0),
    };

    pub const LANGUAGE_CHART: ChartPalette = ChartPalette {
        root: BarPalette::new(30.0, 100.0, 5.0, 22.5),
        first: BarPalette::new(240.0, 89.0, 27.5, 55.0),
        second: BarPalette::new(115.0, 89.0, 10.0, 25.0),
    };
}

/// Theme container providing access to color palette
#[derive(Debug, Clone, Copy, Default)]
pub struct Theme;

impl Theme {
    #[inline]
    pub const fn colors(&self) -> ThemeColors {
        ThemeColors::DEFAULT
    }
}
