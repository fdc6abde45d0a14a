//! Identity-keyed elements and their computed placement.
//!
//! An [`Element`] pairs a stable identity with an opaque payload. The layout
//! engine only ever looks at the identity; the payload is whatever the
//! rendering surface needs to draw the element (a label, an icon, a widget).
//!
//! A [`Trait`] is the output unit of one layout pass: a borrowed element
//! together with the top-left position it was assigned.

use crate::geometry::Point;

/// An element of a chip group: a stable identity plus opaque content.
///
/// Identities must be unique within one layout pass.
///
/// # Examples
///
/// ```
/// # use chipflow_core::element::Element;
/// let chip = Element::new("id.1", "#swift");
/// assert_eq!(*chip.id(), "id.1");
/// assert_eq!(*chip.content(), "#swift");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<K, C> {
    id: K,
    content: C,
}

impl<K, C> Element<K, C> {
    /// Creates a new element from its identity and content.
    pub fn new(id: K, content: C) -> Self {
        Self { id, content }
    }

    /// Returns the identity of this element
    pub fn id(&self) -> &K {
        &self.id
    }

    /// Returns the opaque content of this element
    pub fn content(&self) -> &C {
        &self.content
    }
}

/// The layout traits of a single element: the element and its position.
///
/// The position anchors the element's top-left corner relative to the
/// top-left corner of its container.
#[derive(Debug)]
pub struct Trait<'a, K, C> {
    element: &'a Element<K, C>,
    position: Point,
}

impl<'a, K, C> Trait<'a, K, C> {
    /// Creates a new trait for an element placed at `position`.
    pub fn new(element: &'a Element<K, C>, position: Point) -> Self {
        Self { element, position }
    }

    /// Returns the identity of the positioned element
    pub fn id(&self) -> &'a K {
        self.element.id()
    }

    /// Returns the positioned element
    pub fn element(&self) -> &'a Element<K, C> {
        self.element
    }

    /// Returns the top-left position assigned to the element
    pub fn position(&self) -> Point {
        self.position
    }
}

impl<K, C> Clone for Trait<'_, K, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, C> Copy for Trait<'_, K, C> {}

impl<K: PartialEq, C> PartialEq for Trait<'_, K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.position == other.position
    }
}
