//! Row-wrapping layout for chip groups.
//!
//! [`ChipLayout`] places elements left-to-right and starts a new row whenever
//! the next element would overflow the container width. It is a pure
//! computation over measured sizes: it inspects element identities only and
//! never looks at their content, so it can be re-run any number of times while
//! the measurements converge.
//!
//! The algorithm is a single greedy forward scan. An element's row depends
//! only on the elements before it and its own width, so appending elements
//! never moves the ones already placed.

use std::{collections::HashMap, hash::Hash};

use log::trace;

use chipflow_core::{
    element::{Element, Trait},
    geometry::{Point, Size, Spacing},
};

/// Map from element identity to its last measured size
pub type SizeLookup<K> = HashMap<K, Size>;

/// The chip group layout over a borrowed sequence of elements.
///
/// # Examples
///
/// ```
/// # use std::collections::HashMap;
/// # use chipflow::layout::ChipLayout;
/// # use chipflow_core::{element::Element, geometry::{Point, Size, Spacing}};
/// let elements = vec![Element::new("a", ()), Element::new("b", ())];
/// let sizes = HashMap::from([("a", Size::new(30.0, 10.0)), ("b", Size::new(30.0, 10.0))]);
///
/// let traits = ChipLayout::new(&elements).traits(&sizes, 50.0, Spacing::new(5.0, 5.0));
/// assert_eq!(traits[0].position(), Point::new(0.0, 0.0));
/// assert_eq!(traits[1].position(), Point::new(0.0, 15.0));
/// ```
#[derive(Debug)]
pub struct ChipLayout<'a, K, C> {
    elements: &'a [Element<K, C>],
}

impl<'a, K, C> ChipLayout<'a, K, C>
where
    K: Eq + Hash,
{
    /// Creates a layout over the given elements, in packing order.
    pub fn new(elements: &'a [Element<K, C>]) -> Self {
        Self { elements }
    }

    /// Returns the layout traits for the provided measurements.
    ///
    /// Elements missing from `sizes` are laid out as `0 × 0`. The first
    /// element of a row is never wrapped, even when it is wider than the
    /// container.
    ///
    /// # Arguments
    ///
    /// * `sizes` - Measured size of each element, keyed by identity.
    /// * `container_width` - Maximum width of a row.
    /// * `spacing` - Gaps between elements and between rows.
    ///
    /// # Returns
    ///
    /// One [`Trait`] per element, in the same order as the input sequence.
    pub fn traits(
        &self,
        sizes: &SizeLookup<K>,
        container_width: f32,
        spacing: Spacing,
    ) -> Vec<Trait<'a, K, C>> {
        let mut pointer = Point::default();
        let mut line_height: f32 = 0.0;
        let mut traits = Vec::with_capacity(self.elements.len());

        for (index, element) in self.elements.iter().enumerate() {
            let size = sizes.get(element.id()).copied().unwrap_or_default();
            let newline = pointer.x() + size.width() > container_width && pointer.x() > 0.0;

            if newline {
                pointer = Point::new(0.0, pointer.y() + line_height + spacing.vertical());
                line_height = 0.0;
            }

            trace!(index, x = pointer.x(), y = pointer.y(), newline; "Placed element");
            traits.push(Trait::new(element, pointer));

            pointer = pointer.with_x(pointer.x() + size.width() + spacing.horizontal());
            line_height = line_height.max(size.height());
        }

        traits
    }
}

/// Returns the bounding size of a laid out chip group.
///
/// This is the extent from the container origin to the far edge of the
/// right-most and bottom-most elements. An empty group has a zero size.
pub fn layout_size<K, C>(traits: &[Trait<'_, K, C>], sizes: &SizeLookup<K>) -> Size
where
    K: Eq + Hash,
{
    traits.iter().fold(Size::default(), |extent, placed| {
        let size = sizes.get(placed.id()).copied().unwrap_or_default();
        let corner = placed.position().add_size(size);
        extent.max(Size::new(corner.x(), corner.y()))
    })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn chips(count: usize) -> Vec<Element<String, ()>> {
        (1..=count)
            .map(|n| Element::new(format!("id.{n}"), ()))
            .collect()
    }

    fn sizes(entries: &[(&str, f32, f32)]) -> SizeLookup<String> {
        entries
            .iter()
            .map(|(id, w, h)| (id.to_string(), Size::new(*w, *h)))
            .collect()
    }

    fn positions(traits: &[Trait<'_, String, ()>]) -> Vec<(f32, f32)> {
        traits
            .iter()
            .map(|t| (t.position().x(), t.position().y()))
            .collect()
    }

    #[test]
    fn test_traits_for_chip_sizes() {
        let elements = chips(5);
        let sizes = sizes(&[
            ("id.1", 20.0, 10.0),
            ("id.2", 20.0, 15.0),
            ("id.3", 30.0, 10.0),
            ("id.4", 30.0, 10.0),
            ("id.5", 10.0, 10.0),
        ]);

        let traits = ChipLayout::new(&elements).traits(&sizes, 50.0, Spacing::new(5.0, 5.0));

        assert_eq!(
            positions(&traits),
            vec![(0.0, 0.0), (25.0, 0.0), (0.0, 20.0), (0.0, 35.0), (35.0, 35.0)]
        );
        let ids: Vec<_> = traits.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, ["id.1", "id.2", "id.3", "id.4", "id.5"]);
    }

    #[test]
    fn test_traits_empty_elements() {
        let elements = chips(0);
        let sizes = sizes(&[("id.1", 20.0, 10.0)]);

        let traits = ChipLayout::new(&elements).traits(&sizes, 100.0, Spacing::default());
        assert!(traits.is_empty());
    }

    #[test]
    fn test_traits_zero_width_container_one_per_row() {
        let elements = chips(3);
        let sizes = sizes(&[
            ("id.1", 20.0, 10.0),
            ("id.2", 5.0, 12.0),
            ("id.3", 40.0, 8.0),
        ]);

        let traits = ChipLayout::new(&elements).traits(&sizes, 0.0, Spacing::new(5.0, 10.0));

        // Rows advance by the upper row height plus vertical spacing
        assert_eq!(
            positions(&traits),
            vec![(0.0, 0.0), (0.0, 20.0), (0.0, 42.0)]
        );
    }

    #[test]
    fn test_traits_unmeasured_elements_stack() {
        let elements = chips(3);
        let traits =
            ChipLayout::new(&elements).traits(&SizeLookup::new(), 10.0, Spacing::new(0.0, 10.0));

        assert_eq!(
            positions(&traits),
            vec![(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]
        );
    }

    #[test]
    fn test_traits_unmeasured_element_does_not_wrap() {
        let elements = chips(3);
        let sizes = sizes(&[("id.1", 45.0, 10.0), ("id.3", 5.0, 10.0)]);

        let traits = ChipLayout::new(&elements).traits(&sizes, 50.0, Spacing::new(5.0, 5.0));

        // id.2 sits exactly at the row edge with zero width, id.3 then overflows
        assert_eq!(
            positions(&traits),
            vec![(0.0, 0.0), (50.0, 0.0), (0.0, 15.0)]
        );
    }

    #[test]
    fn test_traits_oversized_first_element_stays_on_row() {
        let elements = chips(2);
        let sizes = sizes(&[("id.1", 120.0, 10.0), ("id.2", 120.0, 10.0)]);

        let traits = ChipLayout::new(&elements).traits(&sizes, 50.0, Spacing::new(5.0, 5.0));

        assert_eq!(positions(&traits), vec![(0.0, 0.0), (0.0, 15.0)]);
    }

    #[test]
    fn test_traits_exact_fit_does_not_wrap() {
        let elements = chips(2);
        let sizes = sizes(&[("id.1", 20.0, 10.0), ("id.2", 25.0, 10.0)]);

        let traits = ChipLayout::new(&elements).traits(&sizes, 50.0, Spacing::new(5.0, 5.0));

        assert_eq!(positions(&traits), vec![(0.0, 0.0), (25.0, 0.0)]);
    }

    #[test]
    fn test_traits_ignores_stale_size_entries() {
        let elements = chips(2);
        let mut with_stale = sizes(&[("id.1", 20.0, 10.0), ("id.2", 20.0, 10.0)]);
        let clean = with_stale.clone();
        with_stale.insert("removed".to_string(), Size::new(500.0, 500.0));

        let layout = ChipLayout::new(&elements);
        let spacing = Spacing::default();
        assert_eq!(
            layout.traits(&with_stale, 30.0, spacing),
            layout.traits(&clean, 30.0, spacing)
        );
    }

    #[test]
    fn test_layout_size() {
        let elements = chips(5);
        let sizes = sizes(&[
            ("id.1", 20.0, 10.0),
            ("id.2", 20.0, 15.0),
            ("id.3", 30.0, 10.0),
            ("id.4", 30.0, 10.0),
            ("id.5", 10.0, 10.0),
        ]);

        let traits = ChipLayout::new(&elements).traits(&sizes, 50.0, Spacing::new(5.0, 5.0));
        let size = layout_size(&traits, &sizes);

        assert_approx_eq!(f32, size.width(), 45.0);
        assert_approx_eq!(f32, size.height(), 45.0);
    }

    #[test]
    fn test_layout_size_empty() {
        let elements = chips(0);
        let traits = ChipLayout::new(&elements).traits(&SizeLookup::new(), 50.0, Spacing::default());
        assert!(layout_size(&traits, &SizeLookup::new()).is_zero());
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn sizes_strategy() -> impl Strategy<Value = Vec<Size>> {
        prop::collection::vec(
            // Non-zero heights keep rows at distinct y coordinates
            (0.0f32..120.0, 1.0f32..60.0).prop_map(|(w, h)| Size::new(w, h)),
            0..40,
        )
    }

    fn spacing_strategy() -> impl Strategy<Value = Spacing> {
        (0.0f32..20.0, 0.0f32..20.0).prop_map(|(h, v)| Spacing::new(h, v))
    }

    fn width_strategy() -> impl Strategy<Value = f32> {
        prop_oneof![Just(0.0f32), 0.0f32..400.0]
    }

    fn build(sizes: &[Size]) -> (Vec<Element<usize, ()>>, SizeLookup<usize>) {
        let elements = (0..sizes.len()).map(|i| Element::new(i, ())).collect();
        let lookup = sizes.iter().copied().enumerate().collect();
        (elements, lookup)
    }

    /// Groups trait indices into rows by their y coordinate, in order.
    fn rows(traits: &[Trait<'_, usize, ()>]) -> Vec<Vec<usize>> {
        let mut rows: Vec<Vec<usize>> = Vec::new();
        let mut last_y = None;
        for (i, placed) in traits.iter().enumerate() {
            let y = placed.position().y();
            if last_y == Some(y) {
                if let Some(row) = rows.last_mut() {
                    row.push(i);
                }
            } else {
                rows.push(vec![i]);
                last_y = Some(y);
            }
        }
        rows
    }

    // ===================
    // Property Test Functions
    // ===================

    /// One trait per element, in input order.
    fn check_order_preserved(
        sizes: Vec<Size>,
        width: f32,
        spacing: Spacing,
    ) -> Result<(), TestCaseError> {
        let (elements, lookup) = build(&sizes);
        let traits = ChipLayout::new(&elements).traits(&lookup, width, spacing);

        prop_assert_eq!(traits.len(), elements.len());
        for (i, placed) in traits.iter().enumerate() {
            prop_assert_eq!(*placed.id(), i);
        }
        Ok(())
    }

    /// Elements on the same row are separated by at least the horizontal spacing.
    fn check_no_overlap_within_row(
        sizes: Vec<Size>,
        width: f32,
        spacing: Spacing,
    ) -> Result<(), TestCaseError> {
        let (elements, lookup) = build(&sizes);
        let traits = ChipLayout::new(&elements).traits(&lookup, width, spacing);

        for row in rows(&traits) {
            for pair in row.windows(2) {
                let left_end = traits[pair[0]].position().x() + sizes[pair[0]].width();
                let right_start = traits[pair[1]].position().x();
                prop_assert!(
                    right_start - left_end >= spacing.horizontal() - 1e-3,
                    "gap {} smaller than spacing {}",
                    right_start - left_end,
                    spacing.horizontal()
                );
            }
        }
        Ok(())
    }

    /// Each row starts at x = 0, and only its first element may overflow.
    fn check_rows_start_at_origin_and_fit(
        sizes: Vec<Size>,
        width: f32,
        spacing: Spacing,
    ) -> Result<(), TestCaseError> {
        let (elements, lookup) = build(&sizes);
        let traits = ChipLayout::new(&elements).traits(&lookup, width, spacing);

        for row in rows(&traits) {
            prop_assert!(approx_eq!(f32, traits[row[0]].position().x(), 0.0));
            for &i in &row[1..] {
                let end = traits[i].position().x() + sizes[i].width();
                prop_assert!(end <= width + 1e-3, "element {i} overflows: {end} > {width}");
            }
        }
        Ok(())
    }

    /// Consecutive rows are separated by the upper row's tallest element plus vertical spacing.
    fn check_row_advance(
        sizes: Vec<Size>,
        width: f32,
        spacing: Spacing,
    ) -> Result<(), TestCaseError> {
        let (elements, lookup) = build(&sizes);
        let traits = ChipLayout::new(&elements).traits(&lookup, width, spacing);
        let rows = rows(&traits);

        for pair in rows.windows(2) {
            let upper_height = pair[0]
                .iter()
                .map(|&i| sizes[i].height())
                .fold(0.0f32, f32::max);
            let advance = traits[pair[1][0]].position().y() - traits[pair[0][0]].position().y();
            prop_assert!(
                approx_eq!(f32, advance, upper_height + spacing.vertical(), epsilon = 1e-2),
                "advance {advance} != {} + {}",
                upper_height,
                spacing.vertical()
            );
        }
        Ok(())
    }

    /// Placing a prefix of the elements yields a prefix of the full placement.
    fn check_earlier_elements_unaffected(
        sizes: Vec<Size>,
        width: f32,
        spacing: Spacing,
    ) -> Result<(), TestCaseError> {
        let (elements, lookup) = build(&sizes);
        let full = ChipLayout::new(&elements).traits(&lookup, width, spacing);

        let cut = elements.len() / 2;
        let prefix = ChipLayout::new(&elements[..cut]).traits(&lookup, width, spacing);

        prop_assert_eq!(&full[..cut], &prefix[..]);
        Ok(())
    }

    /// Re-running the layout with identical inputs yields identical traits.
    fn check_deterministic(
        sizes: Vec<Size>,
        width: f32,
        spacing: Spacing,
    ) -> Result<(), TestCaseError> {
        let (elements, lookup) = build(&sizes);
        let layout = ChipLayout::new(&elements);

        prop_assert_eq!(
            layout.traits(&lookup, width, spacing),
            layout.traits(&lookup, width, spacing)
        );
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn order_preserved(sizes in sizes_strategy(), width in width_strategy(), spacing in spacing_strategy()) {
            check_order_preserved(sizes, width, spacing)?;
        }

        #[test]
        fn no_overlap_within_row(sizes in sizes_strategy(), width in width_strategy(), spacing in spacing_strategy()) {
            check_no_overlap_within_row(sizes, width, spacing)?;
        }

        #[test]
        fn rows_start_at_origin_and_fit(sizes in sizes_strategy(), width in width_strategy(), spacing in spacing_strategy()) {
            check_rows_start_at_origin_and_fit(sizes, width, spacing)?;
        }

        #[test]
        fn row_advance(sizes in sizes_strategy(), width in width_strategy(), spacing in spacing_strategy()) {
            check_row_advance(sizes, width, spacing)?;
        }

        #[test]
        fn earlier_elements_unaffected(sizes in sizes_strategy(), width in width_strategy(), spacing in spacing_strategy()) {
            check_earlier_elements_unaffected(sizes, width, spacing)?;
        }

        #[test]
        fn deterministic(sizes in sizes_strategy(), width in width_strategy(), spacing in spacing_strategy()) {
            check_deterministic(sizes, width, spacing)?;
        }
    }
}
