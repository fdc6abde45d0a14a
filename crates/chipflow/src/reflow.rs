//! The measure → layout → render feedback loop.
//!
//! [`ReflowController`] owns the element sequence and the [`SizeChannel`]
//! that surfaces report into. Each call to [`ReflowController::update`] is one
//! turn of the loop:
//!
//! 1. merge every buffered size report,
//! 2. recompute the layout if the sizes or container width changed,
//! 3. republish the traits to the [`RenderSurface`] if anything visible changed.
//!
//! Element changes recompute immediately with whatever sizes are already
//! known. New elements are laid out as `0 × 0` until the surface measures them,
//! which corrects itself one round trip later.

use std::{collections::HashSet, hash::Hash};

use log::{debug, trace, warn};

use chipflow_core::{
    element::{Element, Trait},
    geometry::{Point, Size, Spacing},
};

use crate::{
    layout::{self, ChipLayout},
    measure::{SizeChannel, SizeMap, SizeReporter},
};

/// Host surface that draws elements at the positions it is given.
///
/// A surface typically renders each element, measures it, and reports the
/// measured size (and its own width) back through a [`SizeReporter`].
pub trait RenderSurface<K, C> {
    /// Draws the elements at the given positions.
    fn render(&mut self, traits: &[Trait<'_, K, C>]);
}

/// Outcome of one [`ReflowController::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reflow {
    /// New traits were handed to the surface.
    Republished,
    /// Nothing visible changed; the surface was not called.
    Unchanged,
}

/// Outcome of [`ReflowController::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    /// Number of update passes run.
    pub passes: usize,
    /// Whether the last pass left the layout unchanged.
    pub converged: bool,
}

/// Owner of the reflow loop for one chip group.
///
/// # Examples
///
/// ```
/// # use chipflow::reflow::{Reflow, ReflowController, RenderSurface};
/// # use chipflow_core::{element::{Element, Trait}, geometry::{Size, Spacing}};
/// struct Log(Vec<f32>);
///
/// impl RenderSurface<&'static str, ()> for Log {
///     fn render(&mut self, traits: &[Trait<'_, &'static str, ()>]) {
///         self.0 = traits.iter().map(|t| t.position().x()).collect();
///     }
/// }
///
/// let mut controller = ReflowController::new()
///     .with_spacing(Spacing::new(5.0, 5.0))
///     .with_elements(vec![Element::new("a", ()), Element::new("b", ())]);
///
/// let reporter = controller.reporter();
/// reporter.report_container(Size::new(100.0, 0.0));
/// reporter.report("a", Size::new(20.0, 10.0));
///
/// let mut surface = Log(Vec::new());
/// assert_eq!(controller.update(&mut surface), Reflow::Republished);
/// assert_eq!(surface.0, vec![0.0, 25.0]);
/// assert_eq!(controller.update(&mut surface), Reflow::Unchanged);
/// ```
pub struct ReflowController<K: Eq + Hash, C> {
    elements: Vec<Element<K, C>>,
    channel: SizeChannel<K>,
    spacing: Spacing,
    positions: Vec<Point>,
    dirty: bool,
}

impl<K: Eq + Hash, C> ReflowController<K, C> {
    /// Creates a controller with no elements and default spacing.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            channel: SizeChannel::new(),
            spacing: Spacing::default(),
            positions: Vec::new(),
            dirty: true,
        }
    }

    /// Sets the spacing between chips (builder style).
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self.recompute();
        self
    }

    /// Sets the initial element sequence (builder style).
    pub fn with_elements(mut self, elements: Vec<Element<K, C>>) -> Self {
        self.set_elements(elements);
        self
    }

    /// Returns a reporter that rendering surfaces use to push measurements.
    pub fn reporter(&self) -> SizeReporter<K> {
        self.channel.reporter()
    }

    /// Returns the last merged measurements.
    pub fn sizes(&self) -> &SizeMap<K> {
        self.channel.sizes()
    }

    /// Returns the last known container width.
    pub fn container_width(&self) -> f32 {
        self.channel.sizes().container_width()
    }

    /// Registers a callback that receives the full measurement map every
    /// time an [`update`](Self::update) merges a change into it.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&SizeMap<K>) + 'static) {
        self.channel.subscribe(subscriber);
    }

    /// Replaces the element sequence and recomputes the layout.
    pub fn set_elements(&mut self, elements: Vec<Element<K, C>>) {
        let unique: HashSet<&K> = elements.iter().map(Element::id).collect();
        if unique.len() != elements.len() {
            warn!(
                elements = elements.len(),
                unique = unique.len();
                "Element identities are not unique"
            );
        }

        self.elements = elements;
        self.dirty = true;
        self.recompute();
    }

    /// Appends an element and recomputes the layout.
    pub fn push(&mut self, element: Element<K, C>) {
        if self.elements.iter().any(|e| e.id() == element.id()) {
            warn!(elements = self.elements.len() + 1; "Pushed element identity is already present");
        }
        self.elements.push(element);
        self.dirty = true;
        self.recompute();
    }

    /// Removes the element with the given identity, if present.
    pub fn remove(&mut self, id: &K) -> Option<Element<K, C>> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        let removed = self.elements.remove(index);
        self.dirty = true;
        self.recompute();
        Some(removed)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.dirty = true;
        self.recompute();
    }

    /// Returns the traits from the latest layout, in element order.
    pub fn traits(&self) -> Vec<Trait<'_, K, C>> {
        self.elements
            .iter()
            .zip(&self.positions)
            .map(|(element, position)| Trait::new(element, *position))
            .collect()
    }

    /// Returns the bounding size of the latest layout.
    pub fn content_size(&self) -> Size {
        layout::layout_size(&self.traits(), self.channel.sizes().element_sizes())
    }

    /// Runs one turn of the reflow loop.
    ///
    /// All buffered measurements are merged before the layout is computed.
    /// The surface is called only when the traits differ from the ones it
    /// last received.
    pub fn update<S>(&mut self, surface: &mut S) -> Reflow
    where
        S: RenderSurface<K, C> + ?Sized,
    {
        if self.channel.flush() {
            self.recompute();
        }

        if !self.dirty {
            trace!("Layout unchanged, skipping render");
            return Reflow::Unchanged;
        }

        self.dirty = false;
        let traits = self.traits();
        debug!(
            elements = traits.len(),
            container_width = self.container_width();
            "Publishing layout"
        );
        surface.render(&traits);

        Reflow::Republished
    }

    /// Runs [`update`](Self::update) until the layout stops changing or
    /// `max_passes` turns have run.
    pub fn settle<S>(&mut self, surface: &mut S, max_passes: usize) -> Settled
    where
        S: RenderSurface<K, C> + ?Sized,
    {
        for pass in 1..=max_passes {
            if self.update(surface) == Reflow::Unchanged {
                return Settled {
                    passes: pass,
                    converged: true,
                };
            }
        }

        Settled {
            passes: max_passes,
            converged: false,
        }
    }

    /// Recomputes positions from the current state, marking the layout dirty
    /// if they changed.
    fn recompute(&mut self) {
        let sizes = self.channel.sizes();
        let positions: Vec<Point> = ChipLayout::new(&self.elements)
            .traits(sizes.element_sizes(), sizes.container_width(), self.spacing)
            .iter()
            .map(Trait::position)
            .collect();

        if positions != self.positions {
            self.positions = positions;
            self.dirty = true;
        }
    }
}

impl<K: Eq + Hash, C> Default for ReflowController<K, C> {
    fn default() -> Self {
        Self::new()
    }
}
