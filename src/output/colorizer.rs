//! Colorizer palettes for reporter output.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use termcolor::{Color, ColorChoice, ColorSpec};

/// The role of a rendered fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Passing examples and the success banner.
    Good,
    /// Failures, errors and the "no tests" banner.
    Bad,
    /// Skipped examples.
    Neutral,
    /// Context headings.
    Emphasis,
}

/// Maps styles to terminal colors, or to nothing at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colorizer {
    Off,
    /// Bright colors for dark terminal backgrounds.
    Dark,
    /// Regular colors for light terminal backgrounds.
    #[default]
    Light,
}

impl Colorizer {
    pub fn spec(self, style: Style) -> Option<ColorSpec> {
        let intense = match self {
            Colorizer::Off => return None,
            Colorizer::Dark => true,
            Colorizer::Light => false,
        };
        let mut spec = ColorSpec::new();
        match style {
            Style::Good => spec.set_fg(Some(Color::Green)),
            Style::Bad => spec.set_fg(Some(Color::Red)).set_bold(true),
            Style::Neutral => spec.set_fg(Some(Color::Yellow)),
            Style::Emphasis => spec.set_bold(true),
        };
        spec.set_intense(intense);
        Some(spec)
    }

    /// Color choice for a stdout stream: colors only when enabled and stdout is a terminal.
    pub fn color_choice(self) -> ColorChoice {
        match self {
            Colorizer::Off => ColorChoice::Never,
            _ if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
            _ => ColorChoice::Never,
        }
    }
}
