//! Chipflow - A reflowing chip group layout engine.
//!
//! Chips (tags, tokens, pills) are packed into rows that wrap at the container
//! width. Chip sizes are not known up front: a surface draws the chips, measures
//! them and reports the sizes back, and the layout is recomputed until it
//! stops changing.
//!
//! The pieces can be used individually ([`layout`], [`measure`], [`reflow`]) or
//! through [`ChipGroupBuilder`], which runs the whole loop against a
//! text-measuring surface and exports the result as SVG.

pub mod config;
pub mod export;
pub mod layout;
pub mod measure;
pub mod reflow;
pub mod scene;
pub mod surface;

mod error;

pub use chipflow_core::{color, element, geometry, text};

pub use error::ChipflowError;

use std::{cell::Cell, rc::Rc};

use log::{debug, info, trace, warn};

use chipflow_core::geometry::{Point, Size};

use color::Color;
use config::AppConfig;
use export::svg::SvgStyle;
use reflow::ReflowController;
use scene::Scene;
use surface::TextSurface;

/// Builder for laying out and rendering chip groups.
///
/// # Examples
///
/// ```rust,no_run
/// use chipflow::{ChipGroupBuilder, config::AppConfig};
///
/// let source = r##"
/// width = 200.0
///
/// [[chips]]
/// label = "#swift"
///
/// [[chips]]
/// label = "#ios"
/// "##;
///
/// let builder = ChipGroupBuilder::new(AppConfig::default());
///
/// let scene = builder.parse(source).expect("Failed to parse");
/// let layout = builder.layout(&scene).expect("Failed to lay out");
/// assert_eq!(layout.placements().len(), 2);
///
/// let svg = builder.render_svg(&scene).expect("Failed to render");
/// println!("{svg}");
/// ```
#[derive(Default)]
pub struct ChipGroupBuilder {
    config: AppConfig,
}

impl ChipGroupBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse a TOML scene.
    ///
    /// # Errors
    ///
    /// Returns [`ChipflowError::Scene`] if the source is not a valid scene.
    pub fn parse(&self, source: &str) -> Result<Scene, ChipflowError> {
        info!("Parsing scene");
        let scene = Scene::parse(source)?;
        debug!(width = scene.width(), chips = scene.chips().len(); "Scene parsed successfully");
        Ok(scene)
    }

    /// Run the measure/layout loop for a scene until its layout settles.
    ///
    /// A loop that has not settled after the configured pass limit is not an
    /// error; the last published layout is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ChipflowError::Config`] if the configured text style is invalid.
    pub fn layout(&self, scene: &Scene) -> Result<GroupLayout, ChipflowError> {
        let style = self.config.style();
        let text_style = style.text_style().map_err(ChipflowError::Config)?;

        let mut controller = ReflowController::new()
            .with_spacing(self.config.layout().spacing())
            .with_elements(scene.chips().to_vec());
        let merges = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&merges);
        controller.subscribe(move |sizes| {
            counter.set(counter.get() + 1);
            trace!(
                measured = sizes.len(),
                width = sizes.container_width();
                "Measurements merged"
            );
        });

        let mut surface = TextSurface::new(
            controller.reporter(),
            text_style,
            style.chip_padding(),
            scene.width(),
        );

        info!(chips = scene.chips().len(), width = scene.width(); "Running reflow loop");
        let max_passes = self.config.layout().max_passes();
        let settled = controller.settle(&mut surface, max_passes);
        if settled.converged {
            debug!(passes = settled.passes, merges = merges.get(); "Layout converged");
        } else {
            warn!(
                max_passes,
                merges = merges.get();
                "Layout did not converge, using last published layout"
            );
        }

        let sizes = controller.sizes();
        let placements = controller
            .traits()
            .iter()
            .enumerate()
            .map(|(index, placed)| {
                let chip = placed.element().content();
                Placement::new(
                    index,
                    placed.id().clone(),
                    chip.label(),
                    chip.color(),
                    placed.position(),
                    sizes.size_of(placed.id()),
                )
            })
            .collect();

        let layout = GroupLayout::new(
            placements,
            controller.container_width(),
            controller.content_size(),
        );
        trace!(layout:?; "Group layout");
        Ok(layout)
    }

    /// Lay out a scene and render it to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`ChipflowError::Config`] if a configured color or the text
    /// style is invalid.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, ChipflowError> {
        let layout = self.layout(scene)?;

        let style = self.config.style();
        let svg_style = SvgStyle::new(
            style.chip_color().map_err(ChipflowError::Config)?,
            style.text_style().map_err(ChipflowError::Config)?,
        )
        .with_background(style.background_color().map_err(ChipflowError::Config)?);

        let svg = export::svg::render(&layout, &svg_style);
        info!("SVG rendered successfully");
        Ok(svg)
    }
}

/// A chip at its settled position.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    index: usize,
    id: String,
    label: String,
    color: Option<Color>,
    position: Point,
    size: Size,
}

impl Placement {
    /// Creates a placement for the chip at `index` in the group.
    pub fn new(
        index: usize,
        id: impl Into<String>,
        label: impl Into<String>,
        color: Option<Color>,
        position: Point,
        size: Size,
    ) -> Self {
        Self {
            index,
            id: id.into(),
            label: label.into(),
            color,
            position,
            size,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the chip's own fill color, if it overrides the style.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns the top-left corner of the chip.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the measured size of the chip.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// The settled layout of a chip group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLayout {
    placements: Vec<Placement>,
    container_width: f32,
    size: Size,
}

impl GroupLayout {
    /// Creates a group layout from placed chips and their bounding size.
    pub fn new(placements: Vec<Placement>, container_width: f32, size: Size) -> Self {
        Self {
            placements,
            container_width,
            size,
        }
    }

    /// Returns the chips in group order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Returns the container width the chips were wrapped at.
    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    /// Returns the bounding size of the placed chips.
    pub fn size(&self) -> Size {
        self.size
    }
}
