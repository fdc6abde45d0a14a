//! Text styling and measurement for chip labels.
//!
//! Chip sizes are not known up front: a chip is as large as its rendered
//! label. This module measures labels with real font metrics through
//! cosmic-text, which is what a rendering surface reports back to the layout
//! loop as the chip's natural size.
//!
//! # Quick Start
//!
//! ```
//! # use chipflow_core::text::TextStyle;
//! let mut style = TextStyle::new();
//! style.set_font_family("Helvetica");
//! style.set_font_size(14);
//!
//! assert!(style.measure("").is_zero());
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use log::{info, warn};

use crate::{color::Color, geometry::Size};

/// Font and color settings for chip labels.
///
/// | Property    | Default      |
/// |-------------|--------------|
/// | Font family | `"Arial"`    |
/// | Font size   | `12` (points) |
/// | Font weight | `600` (semibold) |
/// | Text color  | `None` (SVG default, typically black) |
///
/// Renderers must draw with the same family, size, weight and
/// [`line_height`](Self::line_height) that [`measure`](Self::measure) uses,
/// or labels will not fit the sizes reported for them.
#[derive(Debug, Clone)]
pub struct TextStyle {
    font_family: String,
    font_size: u16,
    font_weight: u16,
    color: Option<Color>,
}

impl TextStyle {
    /// Creates a new text style with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size in points.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    /// Sets the font family (e.g. "Arial", "monospace").
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the CSS font weight (`400` regular, `600` semibold, `700` bold).
    pub fn set_font_weight(&mut self, weight: u16) {
        self.font_weight = weight;
    }

    /// Sets the text color. `None` leaves the renderer default.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    /// Returns the CSS font weight.
    pub fn font_weight(&self) -> u16 {
        self.font_weight
    }

    /// Returns the font size in pixels at standard DPI.
    pub fn font_size_px(&self) -> f32 {
        f32::from(self.font_size) * PX_PER_PT
    }

    /// Returns the distance in pixels between consecutive label lines.
    pub fn line_height(&self) -> f32 {
        self.font_size_px() * LINE_SPACING
    }

    /// Returns the font family name.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Returns the text color, if set.
    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    /// Measures the natural size of `content` rendered with this style.
    ///
    /// Empty content measures as zero.
    pub fn measure(&self, content: &str) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(content, self)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 12,
            font_weight: Weight::SEMIBOLD.0,
            color: None,
        }
    }
}

const PX_PER_PT: f32 = 1.33;
const LINE_SPACING: f32 = 1.15;

/// Holds the shared FontSystem, which is expensive to create.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Calculate the size of text in pixels from shaped layout runs.
    ///
    /// Falls back to an average glyph-width estimate when shaping produces no
    /// runs (no usable font on the system).
    fn calculate_text_size(&self, text: &str, style: &TextStyle) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let font_size_px = style.font_size_px();
        let metrics = Metrics::new(font_size_px, style.line_height());

        let mut font_system = match self.font_system.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new()
            .family(Family::Name(style.font_family()))
            .weight(Weight(style.font_weight()));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if !layout_runs.is_empty() {
            for last in layout_runs.iter().map(|run| run.glyphs.last()) {
                if let Some(last) = last {
                    max_width = max_width.max(last.x + last.w);
                }
                total_height += metrics.line_height;
            }
        } else {
            warn!(text; "No layout runs produced, estimating text size");
            for line in text.lines() {
                max_width = max_width.max(line.chars().count() as f32 * (font_size_px * 0.55));
                total_height += metrics.line_height;
            }
        }

        Size::new(max_width, total_height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
