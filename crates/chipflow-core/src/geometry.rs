//! Geometric primitives for chip group layout.
//!
//! Coordinates follow SVG: the origin is the leading/top corner of the
//! container, `x` grows to the right and `y` grows downward. Positions always
//! anchor the top-left corner of an element.

use serde::Deserialize;

/// A position in container coordinates.
///
/// ```
/// # use chipflow_core::geometry::{Point, Size};
/// let corner = Point::new(10.0, 20.0).add_size(Size::new(30.0, 5.0));
/// assert_eq!(corner, Point::new(40.0, 25.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns this point moved horizontally to `x`.
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Returns the far corner of a box of `size` anchored at this point.
    pub fn add_size(self, size: Size) -> Self {
        Self {
            x: self.x + size.width,
            y: self.y + size.height,
        }
    }
}

/// Width and height of an element.
///
/// `0 × 0` (the default) stands for an element that has not been measured yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Component-wise maximum of two sizes.
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Grows the size by the insets on every side.
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Per-side padding, used for the space between a chip label and its edge.
///
/// Sides missing from a config file default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Insets in CSS order: top, right, bottom, left.
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// `horizontal` on the left and right, `vertical` on the top and bottom.
    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

/// Gaps inserted between neighbouring elements of a chip group.
///
/// `horizontal` separates elements on the same row, `vertical` separates
/// consecutive rows. Both are expected to be non-negative; the default is
/// `5 × 10`.
///
/// ```
/// # use chipflow_core::geometry::Spacing;
/// let spacing = Spacing::default();
/// assert_eq!(spacing.horizontal(), 5.0);
/// assert_eq!(spacing.vertical(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Spacing {
    horizontal: f32,
    vertical: f32,
}

impl Spacing {
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Gap between elements on the same row.
    pub fn horizontal(self) -> f32 {
        self.horizontal
    }

    /// Gap between consecutive rows.
    pub fn vertical(self) -> f32 {
        self.vertical
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self::new(5.0, 10.0)
    }
}
