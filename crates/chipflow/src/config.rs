//! Configuration types for Chipflow chip groups.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Chip spacing and the reflow pass limit.
//! - [`StyleConfig`] - Colors, fonts and chip padding used by the renderer.
//!
//! # Example
//!
//! ```
//! # use chipflow::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [layout.spacing]
//!     horizontal = 8.0
//!     vertical = 4.0
//!
//!     [style]
//!     background_color = "white"
//!     "#,
//! ).unwrap();
//!
//! assert_eq!(config.layout().spacing().horizontal(), 8.0);
//! assert_eq!(config.layout().max_passes(), 8);
//! assert!(config.style().background_color().unwrap().is_some());
//! ```

use serde::Deserialize;

use chipflow_core::{
    color::Color,
    geometry::{Insets, Spacing},
    text::TextStyle,
};

const DEFAULT_MAX_PASSES: usize = 8;
const DEFAULT_CHIP_COLOR: &str = "#e4e2ec";

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Layout settings of a chip group.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Gaps between chips and between rows.
    #[serde(default)]
    spacing: Spacing,

    /// Maximum number of measure/layout passes before giving up on convergence.
    #[serde(default = "default_max_passes")]
    max_passes: usize,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `spacing` - Gaps between chips and between rows.
    /// * `max_passes` - Reflow pass limit.
    pub fn new(spacing: Spacing, max_passes: usize) -> Self {
        Self {
            spacing,
            max_passes,
        }
    }

    /// Returns the chip spacing.
    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Returns the reflow pass limit.
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(Spacing::default(), DEFAULT_MAX_PASSES)
    }
}

fn default_max_passes() -> usize {
    DEFAULT_MAX_PASSES
}

/// Visual styling configuration for rendered chip groups.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Canvas background color, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Default chip fill color, as a color string.
    #[serde(default)]
    chip_color: Option<String>,

    /// Label color, as a color string.
    #[serde(default)]
    text_color: Option<String>,

    #[serde(default)]
    font_family: Option<String>,

    #[serde(default)]
    font_size: Option<u16>,

    /// CSS font weight of chip labels.
    #[serde(default)]
    font_weight: Option<u16>,

    /// Space between a chip's label and its edge.
    #[serde(default)]
    chip_padding: Option<Insets>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_optional_color(self.background_color.as_deref(), "background color")
    }

    /// Returns the parsed chip fill [`Color`], falling back to the default fill.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn chip_color(&self) -> Result<Color, String> {
        let color = self.chip_color.as_deref().unwrap_or(DEFAULT_CHIP_COLOR);
        Color::new(color).map_err(|err| format!("Invalid chip color in config: {err}"))
    }

    /// Builds the label [`TextStyle`] from the font and color settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured text color cannot be parsed.
    pub fn text_style(&self) -> Result<TextStyle, String> {
        let mut style = TextStyle::new();
        if let Some(family) = &self.font_family {
            style.set_font_family(family);
        }
        if let Some(size) = self.font_size {
            style.set_font_size(size);
        }
        if let Some(weight) = self.font_weight {
            style.set_font_weight(weight);
        }
        style.set_color(parse_optional_color(
            self.text_color.as_deref(),
            "text color",
        )?);
        Ok(style)
    }

    /// Returns the chip padding, `16 × 8` unless configured.
    pub fn chip_padding(&self) -> Insets {
        self.chip_padding
            .unwrap_or_else(|| Insets::symmetric(16.0, 8.0))
    }
}

fn parse_optional_color(color: Option<&str>, what: &str) -> Result<Option<Color>, String> {
    color
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {what} in config: {err}"))
}
