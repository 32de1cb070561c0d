//! Display mode and theme system for the TUI.
//!
//! `ThemeVariant` is the light/dark display mode. `DisplayModeStore` owns the
//! single process-wide value and keeps it in step with the `theme` query
//! parameter of the navigable location. `ColorPalette` maps semantic roles to
//! ratatui `Style` values and `StyleMap` resolves role names at runtime.

use crate::navigation::{Location, Navigator, QueryHandling, THEME_PARAM};
use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

/// Name of the presentation attribute carrying the mode.
pub const THEME_ATTRIBUTE: &str = "data-theme";

// ============================================================================
// Theme Variant
// ============================================================================

/// Available display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Mode named by a `theme` query value; absent or unrecognized is Light.
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(Self::from_str_name).unwrap_or_default()
    }

    /// Value written to the `theme` query parameter and `data-theme`.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// The other mode.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Display-Mode Store
// ============================================================================

/// Owner of the current display mode.
///
/// Every write goes through one setter, which updates the
/// in-memory value, the `data-theme` attribute and the location's `theme`
/// parameter (merge semantics). Last write wins.
#[derive(Debug, Clone)]
pub struct DisplayModeStore {
    mode: ThemeVariant,
    attribute: &'static str,
    palette: ColorPalette,
    styles: StyleMap,
}

impl DisplayModeStore {
    pub fn new(mode: ThemeVariant) -> Self {
        let palette = mode.palette();
        let styles = StyleMap::from_palette(&palette);
        Self {
            mode,
            attribute: mode.as_query_value(),
            palette,
            styles,
        }
    }

    /// Initial mode read from the location's `theme` parameter.
    pub fn from_location(location: &Location) -> Self {
        Self::new(ThemeVariant::from_query(location.query(THEME_PARAM)))
    }

    pub fn current(&self) -> ThemeVariant {
        self.mode
    }

    pub fn set_light(&mut self, nav: &mut Navigator) {
        self.set(ThemeVariant::Light, nav);
    }

    pub fn set_dark(&mut self, nav: &mut Navigator) {
        self.set(ThemeVariant::Dark, nav);
    }

    /// Switch to the other mode and return it.
    pub fn toggle(&mut self, nav: &mut Navigator) -> ThemeVariant {
        let next = self.mode.next();
        self.set(next, nav);
        next
    }

    fn set(&mut self, mode: ThemeVariant, nav: &mut Navigator) {
        self.apply(mode);
        nav.set_query(
            &[(THEME_PARAM, Some(mode.as_query_value()))],
            QueryHandling::Merge,
        );
    }

    /// Adopt `mode` read from the location, without writing it back.
    /// Returns true when the mode changed.
    pub fn apply(&mut self, mode: ThemeVariant) -> bool {
        self.attribute = mode.as_query_value();
        if mode == self.mode {
            return false;
        }
        tracing::debug!(mode = mode.as_query_value(), "Display mode changed");
        self.mode = mode;
        self.palette = mode.palette();
        self.styles = StyleMap::from_palette(&self.palette);
        true
    }

    /// The presentation attribute as `(name, value)`.
    pub fn attribute(&self) -> (&'static str, &'static str) {
        (THEME_ATTRIBUTE, self.attribute)
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn style(&self, role: &str) -> Style {
        self.styles.resolve(role)
    }
}

impl Default for DisplayModeStore {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Navigation --
    pub nav_category: Style,
    pub nav_item: Style,
    pub nav_selected: Style,
    pub nav_current: Style,

    // -- Listing --
    pub listing_title: Style,
    pub listing_description: Style,
    pub listing_selected: Style,
    pub listing_page: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,
    pub reader_code_block: Style,
    pub reader_inline_code: Style,
    pub reader_emphasis: Style,
    pub reader_strong: Style,
    pub reader_link: Style,
    pub reader_error: Style,

    // -- Help overlay --
    pub help_header: Style,
    pub help_section: Style,
    pub help_key: Style,
    pub help_description: Style,

    // -- Chrome --
    pub not_found: Style,
    pub status_bar: Style,
    pub status_mode: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            nav_category: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            nav_item: Style::default(),
            nav_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            nav_current: Style::default().fg(Color::Cyan),

            listing_title: Style::default().add_modifier(Modifier::BOLD),
            listing_description: Style::default().fg(Color::Gray),
            listing_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            listing_page: Style::default().fg(Color::DarkGray),

            reader_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_code_block: Style::default().fg(Color::Yellow).bg(Color::Black),
            reader_inline_code: Style::default().fg(Color::Yellow),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            reader_error: Style::default().fg(Color::Red),

            help_header: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            help_section: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Yellow),
            help_description: Style::default(),

            not_found: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_mode: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            nav_category: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            nav_item: Style::default().fg(Color::Black),
            nav_selected: Style::default().bg(Color::Blue).fg(Color::White),
            nav_current: Style::default().fg(Color::Blue),

            listing_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            listing_description: Style::default().fg(Color::DarkGray),
            listing_selected: Style::default().bg(Color::Blue).fg(Color::White),
            listing_page: Style::default().fg(Color::DarkGray),

            reader_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_code_block: Style::default().fg(Color::DarkGray).bg(Color::White),
            reader_inline_code: Style::default().fg(Color::DarkGray),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            reader_error: Style::default().fg(Color::Red),

            help_header: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            help_section: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Magenta),
            help_description: Style::default().fg(Color::Black),

            not_found: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_mode: Style::default()
                .bg(Color::White)
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 26] = [
    "nav_category",
    "nav_item",
    "nav_selected",
    "nav_current",
    "listing_title",
    "listing_description",
    "listing_selected",
    "listing_page",
    "reader_heading",
    "reader_body",
    "reader_metadata",
    "reader_code_block",
    "reader_inline_code",
    "reader_emphasis",
    "reader_strong",
    "reader_link",
    "reader_error",
    "help_header",
    "help_section",
    "help_key",
    "help_description",
    "not_found",
    "status_bar",
    "status_mode",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 26] = [
            p.nav_category,
            p.nav_item,
            p.nav_selected,
            p.nav_current,
            p.listing_title,
            p.listing_description,
            p.listing_selected,
            p.listing_page,
            p.reader_heading,
            p.reader_body,
            p.reader_metadata,
            p.reader_code_block,
            p.reader_inline_code,
            p.reader_emphasis,
            p.reader_strong,
            p.reader_link,
            p.reader_error,
            p.help_header,
            p.help_section,
            p.help_key,
            p.help_description,
            p.not_found,
            p.status_bar,
            p.status_mode,
            p.panel_border,
            p.panel_border_focused,
        ];

        let mut map = HashMap::with_capacity(ROLE_NAMES.len());
        for (name, style) in ROLE_NAMES.iter().zip(styles.iter()) {
            map.insert(*name, *style);
        }

        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
