//! Board styling configuration.
//!
//! Provides distinct colors for titles, tags, metadata, selection and errors.

use crate::state::StatusKind;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Explicit setting (tests).
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== BoardStyles =====

/// Styles for every board element.
///
/// Selection and emphasis use modifiers, not colors, so they stay visible
/// when colors are disabled.
#[derive(Debug, Clone, Copy)]
pub struct BoardStyles {
    /// Question titles.
    pub title: Style,
    /// Author, date and counts.
    pub meta: Style,
    /// Tag chips.
    pub tag: Style,
    /// Selected row or current page.
    pub selected: Style,
    /// Border of the focused pane.
    pub focused_border: Style,
    /// Unavailable controls.
    pub disabled: Style,
    /// Error status.
    pub error: Style,
    /// Info status.
    pub info: Style,
}

impl BoardStyles {
    /// Styles for the given color configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let selected = Style::default().add_modifier(Modifier::REVERSED);
        let title = Style::default().add_modifier(Modifier::BOLD);
        if config.colors_enabled() {
            Self {
                title,
                meta: Style::default().fg(Color::Gray),
                tag: Style::default().fg(Color::Cyan),
                selected,
                focused_border: Style::default().fg(Color::Yellow),
                disabled: Style::default().fg(Color::DarkGray),
                error: Style::default().fg(Color::Red),
                info: Style::default().fg(Color::Green),
            }
        } else {
            Self {
                title,
                meta: Style::default(),
                tag: Style::default(),
                selected,
                focused_border: Style::default().add_modifier(Modifier::BOLD),
                disabled: Style::default().add_modifier(Modifier::DIM),
                error: Style::default().add_modifier(Modifier::BOLD),
                info: Style::default(),
            }
        }
    }

    /// Style for a status line message.
    pub fn status(&self, kind: StatusKind) -> Style {
        match kind {
            StatusKind::Info => self.info,
            StatusKind::Error => self.error,
        }
    }
}

impl Default for BoardStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====
