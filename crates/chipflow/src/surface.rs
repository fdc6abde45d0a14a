//! Text-measuring rendering surface.
//!
//! [`TextSurface`] stands in for the host UI: every time it is asked to draw,
//! it measures the chips it has not seen yet (label text plus chip padding)
//! and reports their natural sizes, together with the container width, back to
//! the layout loop.

use std::collections::HashMap;

use log::trace;

use chipflow_core::{
    element::Trait,
    geometry::{Insets, Point, Size},
    text::TextStyle,
};

use crate::{measure::SizeReporter, reflow::RenderSurface, scene::Chip};

/// A [`RenderSurface`] for labelled chips that measures them with real font metrics.
#[derive(Debug)]
pub struct TextSurface {
    reporter: SizeReporter<String>,
    style: TextStyle,
    padding: Insets,
    width: f32,
    /// Label last measured for each chip id
    measured: HashMap<String, String>,
    placements: Vec<(String, Point)>,
    renders: usize,
}

impl TextSurface {
    /// Creates a surface of the given width reporting into `reporter`.
    pub fn new(reporter: SizeReporter<String>, style: TextStyle, padding: Insets, width: f32) -> Self {
        Self {
            reporter,
            style,
            padding,
            width,
            measured: HashMap::new(),
            placements: Vec::new(),
            renders: 0,
        }
    }

    /// Changes the surface width; reported on the next render.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Returns the chip positions from the last render, in order.
    pub fn placements(&self) -> &[(String, Point)] {
        &self.placements
    }

    /// Returns how many times the surface was rendered.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Returns the natural size of a chip: its label plus padding.
    pub fn natural_size(&self, chip: &Chip) -> Size {
        self.style.measure(chip.label()).add_padding(self.padding)
    }
}

impl RenderSurface<String, Chip> for TextSurface {
    fn render(&mut self, traits: &[Trait<'_, String, Chip>]) {
        self.renders += 1;
        self.placements = traits
            .iter()
            .map(|placed| (placed.id().clone(), placed.position()))
            .collect();

        self.reporter.report_container(Size::new(self.width, 0.0));

        for placed in traits {
            let chip = placed.element().content();
            if self.measured.get(placed.id()).map(String::as_str) == Some(chip.label()) {
                continue;
            }

            let size = self.natural_size(chip);
            trace!(
                id = placed.id().as_str(),
                width = size.width(),
                height = size.height();
                "Measured chip"
            );
            self.reporter.report(placed.id().clone(), size);
            self.measured
                .insert(placed.id().clone(), chip.label().to_string());
        }
    }
}
