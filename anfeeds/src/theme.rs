//! Color theme system for anfeeds.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! anfeeds renders. Two built-in themes back the persisted light/dark toggle:
//!
//! - `dark`: ANSI 16 colors, so it works on any terminal including SSH sessions
//!   with no truecolor support.
//! - `light`: RGB palette on a pale background; requires truecolor for full fidelity.

use anfeeds_core::ThemePreference;
use ratatui::style::Color;

/// All color values used across anfeeds' UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the focused panel or modal.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Catalog
    /// Genre section headings and the active menu item.
    pub heading: Color,
    /// Regular body text.
    pub text: Color,
    /// Secondary text: years, episode counts, hints.
    pub muted: Color,
    /// Score shown next to each title.
    pub score: Color,

    // Reviews
    /// Filled stars in ratings and the star input.
    pub star: Color,
    /// Heart of a comment the current user liked.
    pub liked: Color,
    /// Comment author names.
    pub author: Color,

    // Notifications
    /// Toast background.
    pub toast_bg: Color,
    /// Toast foreground.
    pub toast_fg: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Mode indicator color when browsing.
    pub status_mode_normal: Color,
    /// Mode indicator color while typing (search, review, login).
    pub status_mode_insert: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Magenta,
            border_inactive: Color::DarkGray,

            heading: Color::Magenta,
            text: Color::Reset,
            muted: Color::DarkGray,
            score: Color::Yellow,

            star: Color::Yellow,
            liked: Color::Red,
            author: Color::Cyan,

            toast_bg: Color::Magenta,
            toast_fg: Color::White,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,

            background: Color::Reset,
        }
    }

    /// Returns the light theme using RGB truecolor values.
    ///
    /// Degrades to the nearest ANSI 256-color approximation on terminals
    /// without truecolor.
    pub fn light() -> Self {
        let violet = Color::Rgb(118, 75, 162);  // #764ba2
        let indigo = Color::Rgb(102, 126, 234); // #667eea
        let ink = Color::Rgb(34, 34, 48);       // #222230
        let slate = Color::Rgb(120, 124, 140);  // #787c8c
        let amber = Color::Rgb(214, 148, 0);    // #d69400
        let rose = Color::Rgb(214, 51, 108);    // #d6336c
        let teal = Color::Rgb(12, 133, 153);    // #0c8599
        let paper = Color::Rgb(246, 246, 250);  // #f6f6fa
        let mist = Color::Rgb(222, 224, 235);   // #dee0eb

        Self {
            border_active: violet,
            border_inactive: slate,

            heading: violet,
            text: ink,
            muted: slate,
            score: amber,

            star: amber,
            liked: rose,
            author: teal,

            toast_bg: indigo,
            toast_fg: paper,

            status_bar_bg: mist,
            status_bar_fg: ink,
            status_mode_normal: violet,
            status_mode_insert: teal,

            background: paper,
        }
    }

    /// Resolves the persisted preference to a built-in theme.
    pub fn from_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Dark => Self::dark(),
            ThemePreference::Light => Self::light(),
        }
    }
}
