//! Chip group scenes.
//!
//! A scene is the input of the rendering pipeline: the available container
//! width and the chips to lay out, in order. Scenes are written in TOML:
//!
//! ```toml
//! width = 320.0
//!
//! [[chips]]
//! label = "#swiftui"
//!
//! [[chips]]
//! id = "ios"
//! label = "#ios"
//! color = "#ffcc00"
//! ```
//!
//! A chip's `id` defaults to its label and must be unique within the scene.

use std::collections::HashSet;

use log::debug;
use serde::Deserialize;
use toml::Spanned;

use chipflow_core::{color::Color, element::Element};

use crate::error::ChipflowError;

/// Content of a chip: the label text and an optional fill color.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    label: String,
    color: Option<Color>,
}

impl Chip {
    /// Creates a chip with the given label and the default fill.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
        }
    }

    /// Sets the fill color of this chip (builder style).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Returns the label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the fill color override, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

/// A chip group to lay out: container width plus identity-keyed chips.
#[derive(Debug, Clone)]
pub struct Scene {
    width: f32,
    chips: Vec<Element<String, Chip>>,
}

impl Scene {
    /// Creates a scene from already built chips.
    pub fn new(width: f32, chips: Vec<Element<String, Chip>>) -> Self {
        Self { width, chips }
    }

    /// Parses a scene from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`ChipflowError::Scene`] for TOML syntax errors, a negative
    /// width, invalid chip colors and duplicate chip ids.
    pub fn parse(source: &str) -> Result<Self, ChipflowError> {
        let file: SceneFile = toml::from_str(source).map_err(|err| {
            ChipflowError::new_scene_error(err.message(), err.span(), source)
        })?;

        let width = check_width(*file.width.get_ref())
            .map_err(|err| ChipflowError::new_scene_error(err, Some(file.width.span()), source))?;

        let mut seen = HashSet::with_capacity(file.chips.len());
        let mut chips = Vec::with_capacity(file.chips.len());

        for entry in file.chips {
            let (id, id_span) = match entry.id {
                Some(id) => {
                    let span = id.span();
                    (id.into_inner(), span)
                }
                None => (entry.label.get_ref().clone(), entry.label.span()),
            };

            if !seen.insert(id.clone()) {
                return Err(ChipflowError::new_scene_error(
                    format!("duplicate chip id `{id}`"),
                    Some(id_span),
                    source,
                ));
            }

            let mut chip = Chip::new(entry.label.into_inner());
            if let Some(color) = entry.color {
                let span = color.span();
                let parsed = Color::new(color.get_ref())
                    .map_err(|err| ChipflowError::new_scene_error(err, Some(span), source))?;
                chip = chip.with_color(parsed);
            }

            chips.push(Element::new(id, chip));
        }

        debug!(width, chips = chips.len(); "Scene parsed");
        Ok(Self::new(width, chips))
    }

    /// Returns the scene with a different container width (builder style).
    ///
    /// # Errors
    ///
    /// Returns [`ChipflowError::Scene`] if `width` is negative or not finite.
    pub fn with_width(mut self, width: f32) -> Result<Self, ChipflowError> {
        self.width =
            check_width(width).map_err(|err| ChipflowError::new_scene_error(err, None, ""))?;
        Ok(self)
    }

    /// Returns the container width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the chips in layout order.
    pub fn chips(&self) -> &[Element<String, Chip>] {
        &self.chips
    }
}

/// Accepts a container width if it is finite and non-negative.
///
/// # Errors
///
/// Returns a message describing the rejected width.
pub fn check_width(width: f32) -> Result<f32, String> {
    if width.is_finite() && width >= 0.0 {
        Ok(width)
    } else {
        Err(format!(
            "container width must be a finite, non-negative number, got {width}"
        ))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    width: Spanned<f32>,
    #[serde(default)]
    chips: Vec<ChipEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ChipEntry {
    #[serde(default)]
    id: Option<Spanned<String>>,
    label: Spanned<String>,
    #[serde(default)]
    color: Option<Spanned<String>>,
}
