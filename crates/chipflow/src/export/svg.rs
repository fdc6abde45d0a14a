//! SVG export for laid out chip groups.
//!
//! Chips are drawn as capsules (rectangles with fully rounded ends) at their
//! converged positions, with the label centered inside. The canvas is as wide
//! as the container and as tall as the laid out group.

use log::debug;
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use chipflow_core::{color::Color, text::TextStyle};

use crate::{GroupLayout, Placement};

/// Styling inputs of the SVG exporter.
#[derive(Debug, Clone)]
pub struct SvgStyle {
    background: Option<Color>,
    chip_color: Color,
    text: TextStyle,
}

impl SvgStyle {
    /// Creates a style from a default chip fill and label style.
    pub fn new(chip_color: Color, text: TextStyle) -> Self {
        Self {
            background: None,
            chip_color,
            text,
        }
    }

    /// Sets the canvas background (builder style).
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }
}

/// Renders a chip group layout to an SVG document string.
pub fn render(layout: &GroupLayout, style: &SvgStyle) -> String {
    let width = layout.container_width().max(layout.size().width());
    let height = layout.size().height();

    let mut document = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0.0, 0.0, width, height));

    if let Some(background) = &style.background {
        document = document.add(
            svg_element::Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", background.to_string())
                .set("fill-opacity", background.alpha()),
        );
    }

    for placement in layout.placements() {
        let position = placement.position();
        let size = placement.size();
        let fill = placement.color().unwrap_or(style.chip_color);

        let capsule = svg_element::Rectangle::new()
            .set("x", position.x())
            .set("y", position.y())
            .set("width", size.width())
            .set("height", size.height())
            .set("rx", size.height() / 2.0)
            .set("fill", fill.to_string())
            .set("fill-opacity", fill.alpha());

        let group = svg_element::Group::new()
            .set("id", format!("chip-{}", placement.index()))
            .add(capsule)
            .add(label(placement, &style.text));

        document = document.add(group);
    }

    debug!(width, height, chips = layout.placements().len(); "SVG document built");
    document.to_string()
}

/// Builds the label of a chip, one `tspan` per line, centered in the chip.
///
/// Lines advance by the same line height the label was measured with.
fn label(placement: &Placement, text: &TextStyle) -> svg_element::Text {
    let position = placement.position();
    let size = placement.size();
    let center_x = position.x() + size.width() / 2.0;
    let line_height = text.line_height();

    let lines: Vec<&str> = placement.label().lines().collect();
    let block_height = line_height * lines.len() as f32;
    // Baseline "central" puts each line's middle at its y
    let first_y = position.y() + (size.height() - block_height) / 2.0 + line_height / 2.0;

    let mut label = svg_element::Text::new("")
        .set("x", center_x)
        .set("y", first_y)
        .set("text-anchor", "middle")
        .set("dominant-baseline", "central")
        .set("font-family", text.font_family())
        .set("font-size", format!("{}pt", text.font_size()))
        .set("font-weight", u32::from(text.font_weight()));

    if let Some(color) = text.color() {
        label = label
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha());
    }

    for (index, line) in lines.into_iter().enumerate() {
        let tspan = svg_element::TSpan::new("")
            .set("x", center_x)
            .set("y", first_y + line_height * index as f32)
            .add(SvgText::new(line));
        label = label.add(tspan);
    }

    label
}

#[cfg(test)]
mod tests {
    use chipflow_core::geometry::{Point, Size};

    use super::*;

    fn style() -> SvgStyle {
        SvgStyle::new(Color::new("#dddddd").unwrap(), TextStyle::new())
    }

    fn sample_layout() -> GroupLayout {
        GroupLayout::new(
            vec![
                Placement::new(0, "a", "#a", None, Point::new(0.0, 0.0), Size::new(40.0, 20.0)),
                Placement::new(
                    1,
                    "b",
                    "#b",
                    Some(Color::new("orange").unwrap()),
                    Point::new(45.0, 0.0),
                    Size::new(30.0, 20.0),
                ),
            ],
            100.0,
            Size::new(75.0, 20.0),
        )
    }

    #[test]
    fn test_render_contains_every_chip() {
        let svg = render(&sample_layout(), &style());

        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("#a"));
        assert!(svg.contains("#b"));
        assert_eq!(svg.matches("<rect").count(), 2);
    }

    #[test]
    fn test_render_background() {
        let styled = style().with_background(Some(Color::new("white").unwrap()));
        let svg = render(&sample_layout(), &styled);

        assert_eq!(svg.matches("<rect").count(), 3);
    }

    #[test]
    fn test_label_uses_measured_weight() {
        let mut text = TextStyle::new();
        text.set_font_weight(500);
        let svg = render(&sample_layout(), &SvgStyle::new(Color::new("#dddddd").unwrap(), text));

        assert!(svg.contains("font-weight=\"500\""), "{svg}");
        assert!(!svg.contains("bold"));
    }

    #[test]
    fn test_multiline_label_gets_one_tspan_per_line() {
        let text = TextStyle::new();
        let line_height = text.line_height();
        let layout = GroupLayout::new(
            vec![Placement::new(
                0,
                "a",
                "first\nsecond",
                None,
                Point::new(0.0, 0.0),
                Size::new(80.0, 2.0 * line_height),
            )],
            100.0,
            Size::new(80.0, 2.0 * line_height),
        );

        let svg = render(&layout, &SvgStyle::new(Color::new("#dddddd").unwrap(), text));

        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains(">first</tspan>"), "{svg}");
        assert!(svg.contains(">second</tspan>"), "{svg}");
        assert!(svg.contains(&format!("y=\"{}\"", line_height / 2.0)), "{svg}");
        assert!(svg.contains(&format!("y=\"{}\"", line_height / 2.0 + line_height)), "{svg}");
    }

    #[test]
    fn test_render_empty_layout() {
        let svg = render(&GroupLayout::new(Vec::new(), 80.0, Size::default()), &style());

        assert!(svg.contains("<svg"));
        assert!(!svg.contains("<rect"));
    }
}
