//! # Theme System
//!
//! Colors used by the start page, grouped by role.
//!
//! ## Overview
//!
//! The wallpaper supplies most of the picture, so a theme only decides the
//! ink laid on top of it: quote text, the glass panels behind the search bar
//! and dropdowns, and the red seal. [`Theme::backdrop`] fills the screen
//! until the first wallpaper arrives (and for good when running offline).
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default)
//! - **Catppuccin Macchiato**
//! - **Catppuccin Frappe**
//! - **Nord**
//! - **Rose Pine**
//! - **Gruvbox Dark**

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Name used in the config file.
    pub name: &'static str,

    /// Solid fill shown when there is no wallpaper.
    pub backdrop: Color,

    /// Quote glyphs and typed query text.
    pub text: Color,
    /// Author line, placeholder, footer.
    pub text_dim: Color,

    /// Panel fill behind the search bar, suggestions and engine menu.
    pub glass: Color,
    /// Panel borders.
    pub glass_border: Color,
    /// Highlighted suggestion / engine row.
    pub highlight_bg: Color,

    /// Cursor and active engine marker.
    pub accent: Color,
    /// The seal stamped beside a finished quote.
    pub seal: Color,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Return the default theme (Catppuccin Mocha).
    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }

    /// Named theme, or the default with a warning when the name is unknown.
    pub fn resolve(name: &str) -> &'static Theme {
        Self::by_name(name).unwrap_or_else(|| {
            tracing::warn!(theme = name, "unknown theme, using default");
            Self::default_theme()
        })
    }
}

static BUILT_IN_THEMES: [Theme; 6] = [
    Theme {
        name: "Catppuccin Mocha",
        backdrop: Color::Rgb(17, 17, 27),         // crust
        text: Color::Rgb(205, 214, 244),          // text
        text_dim: Color::Rgb(127, 132, 156),      // overlay1
        glass: Color::Rgb(49, 50, 68),            // surface0
        glass_border: Color::Rgb(108, 112, 134),  // overlay0
        highlight_bg: Color::Rgb(69, 71, 90),     // surface1
        accent: Color::Rgb(180, 190, 254),        // lavender
        seal: Color::Rgb(243, 139, 168),          // red
    },
    Theme {
        name: "Catppuccin Macchiato",
        backdrop: Color::Rgb(24, 25, 38),
        text: Color::Rgb(202, 211, 245),
        text_dim: Color::Rgb(128, 135, 162),
        glass: Color::Rgb(54, 58, 79),
        glass_border: Color::Rgb(110, 115, 141),
        highlight_bg: Color::Rgb(73, 77, 100),
        accent: Color::Rgb(183, 189, 248),
        seal: Color::Rgb(237, 135, 150),
    },
    Theme {
        name: "Catppuccin Frappe",
        backdrop: Color::Rgb(35, 38, 52),
        text: Color::Rgb(198, 208, 245),
        text_dim: Color::Rgb(131, 139, 167),
        glass: Color::Rgb(65, 69, 89),
        glass_border: Color::Rgb(115, 121, 148),
        highlight_bg: Color::Rgb(81, 87, 109),
        accent: Color::Rgb(186, 187, 241),
        seal: Color::Rgb(231, 130, 132),
    },
    Theme {
        name: "Nord",
        backdrop: Color::Rgb(46, 52, 64),        // nord0
        text: Color::Rgb(236, 239, 244),         // nord6
        text_dim: Color::Rgb(216, 222, 233),     // nord4
        glass: Color::Rgb(59, 66, 82),           // nord1
        glass_border: Color::Rgb(76, 86, 106),   // nord3
        highlight_bg: Color::Rgb(67, 76, 94),    // nord2
        accent: Color::Rgb(136, 192, 208),       // nord8
        seal: Color::Rgb(191, 97, 106),          // nord11
    },
    Theme {
        name: "Rose Pine",
        backdrop: Color::Rgb(25, 23, 36),        // base
        text: Color::Rgb(224, 222, 244),         // text
        text_dim: Color::Rgb(144, 140, 170),     // subtle
        glass: Color::Rgb(31, 29, 46),           // surface
        glass_border: Color::Rgb(110, 106, 134), // muted
        highlight_bg: Color::Rgb(38, 35, 58),    // overlay
        accent: Color::Rgb(196, 167, 231),       // iris
        seal: Color::Rgb(235, 111, 146),         // love
    },
    Theme {
        name: "Gruvbox Dark",
        backdrop: Color::Rgb(29, 32, 33),
        text: Color::Rgb(235, 219, 178),
        text_dim: Color::Rgb(168, 153, 132),
        glass: Color::Rgb(60, 56, 54),
        glass_border: Color::Rgb(102, 92, 84),
        highlight_bg: Color::Rgb(80, 73, 69),
        accent: Color::Rgb(250, 189, 47),
        seal: Color::Rgb(251, 73, 52),
    },
];
