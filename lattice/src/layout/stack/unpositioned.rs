//! Measuring, wrapping, flexing and cross-sizing stack children.
//!
//! Produces lines of sized but unpositioned items. Positions are assigned by
//! [`super::positioned`].

use super::{
    AlignContent, AlignItems, FlexWrap, StackDirection, StackLayoutSpec, VIOLATION_EPSILON,
    map_children,
};
use crate::error::Result;
use crate::layout::computed::Layout;
use crate::layout::context::LayoutContext;
use crate::layout::dimension::{Dimension, ParentSize, SizeConstraints};
use crate::layout::element::LayoutElement;
use crate::layout::size_range::SizeRange;
use crate::layout::style::AlignSelf;

/// A measured child.
pub(super) struct StackItem<'a> {
    pub child: &'a LayoutElement,
    pub layout: Layout,
    pub alignment: AlignItems,
}

impl StackItem<'_> {
    /// Primary extent including the child's own spacing before and after.
    fn outer_primary(&self, direction: StackDirection) -> f64 {
        let style = self.child.style();
        style.spacing_before + direction.primary(self.layout.size()) + style.spacing_after
    }

    /// Distance from the cross-start edge to the baseline this item aligns by.
    pub fn baseline_offset(&self, direction: StackDirection) -> f64 {
        let style = self.child.style();
        match self.alignment {
            AlignItems::BaselineLast => direction.cross(self.layout.size()) - style.descender,
            _ => style.ascender,
        }
    }
}

/// One line of a (possibly wrapped) stack.
pub(super) struct StackLine<'a> {
    pub items: Vec<StackItem<'a>>,
    pub cross_size: f64,
    /// Baseline offset from the line's cross-start edge.
    pub baseline: f64,
}

impl StackLine<'_> {
    /// Primary extent of the line's items plus inter-item spacing.
    pub fn primary_sum(&self, direction: StackDirection, spacing: f64) -> f64 {
        let items: f64 = self.items.iter().map(|item| item.outer_primary(direction)).sum();
        items + spacing * self.items.len().saturating_sub(1) as f64
    }
}

pub(super) struct UnpositionedLayout<'a> {
    pub lines: Vec<StackLine<'a>>,
    /// Largest line primary sum.
    pub stack_dimension_sum: f64,
    /// Sum of line cross sizes plus line spacing.
    pub cross_dimension_sum: f64,
}

/// Shared inputs for measuring children of one stack.
struct Measurer<'a, 'c> {
    direction: StackDirection,
    /// Passed to children; only axes the stack fixes exactly are defined.
    parent: ParentSize,
    cross_min: f64,
    cross_max: f64,
    ctx: &'a LayoutContext<'c>,
}

impl Measurer<'_, '_> {
    fn measure(&self, child: &LayoutElement, primary: (f64, f64), cross_min: f64) -> Result<Layout> {
        let range = self.direction.range(primary, (cross_min, self.cross_max));
        child.layout_that_fits(range, self.parent, self.ctx)
    }

    /// Initial measurement: the flex basis on the primary axis, the stack's
    /// cross maximum on the other.
    fn measure_basis(&self, child: &LayoutElement, alignment: AlignItems) -> Result<Layout> {
        let primary = match child.style().flex_basis {
            Dimension::Auto => (0.0, f64::INFINITY),
            basis => {
                let extent = basis.resolve(self.direction.primary_extent(self.parent), 0.0)?;
                (extent, extent)
            }
        };
        let cross_min = if alignment == AlignItems::Stretch {
            self.cross_min
        } else {
            0.0
        };
        self.measure(child, primary, cross_min)
    }
}

impl StackDirection {
    fn primary_extent(self, parent: ParentSize) -> Option<f64> {
        match self {
            StackDirection::Horizontal => parent.width,
            StackDirection::Vertical => parent.height,
        }
    }

    fn cross_dimension(self, size: &SizeConstraints) -> Dimension {
        match self {
            StackDirection::Horizontal => size.height,
            StackDirection::Vertical => size.width,
        }
    }
}

impl<'a> UnpositionedLayout<'a> {
    pub fn compute(
        spec: &'a StackLayoutSpec,
        range: SizeRange,
        ctx: &LayoutContext<'_>,
    ) -> Result<Self> {
        let options = spec.options();
        let direction = options.direction;
        let measurer = Measurer {
            direction,
            parent: ParentSize::from_exact(&range),
            cross_min: direction.cross(range.min),
            cross_max: direction.cross(range.max),
            ctx,
        };

        let children = spec.child_elements();
        let alignments = resolve_alignments(spec);

        let indexed: Vec<(usize, &LayoutElement)> = children.iter().enumerate().collect();
        let layouts = map_children(options.concurrent, &indexed, |(index, child)| {
            measurer.measure_basis(child, alignments[*index])
        })?;

        let items: Vec<StackItem<'a>> = children
            .iter()
            .zip(layouts)
            .zip(alignments)
            .map(|((child, layout), alignment)| StackItem {
                child,
                layout,
                alignment,
            })
            .collect();

        let mut lines = wrap_lines(items, options.flex_wrap, direction, options.spacing, range);

        let stack_min = direction.primary(range.min);
        let stack_max = direction.primary(range.max);
        for line in &mut lines {
            flex_line(line, options.spacing, stack_min, stack_max, &measurer, options.concurrent)?;
        }

        compute_cross_sizes(&mut lines, direction, range, options.flex_wrap);

        if lines.len() > 1 && options.align_content == AlignContent::Stretch {
            stretch_lines(&mut lines, direction, options.line_spacing, range);
        }

        for line in &mut lines {
            stretch_items(line, &measurer, options.concurrent)?;
        }

        let stack_dimension_sum = lines
            .iter()
            .map(|line| line.primary_sum(direction, options.spacing))
            .fold(0.0, f64::max);
        let cross_dimension_sum = lines_cross_sum(&lines, options.line_spacing);

        Ok(Self {
            lines,
            stack_dimension_sum,
            cross_dimension_sum,
        })
    }
}

pub(super) fn lines_cross_sum(lines: &[StackLine<'_>], line_spacing: f64) -> f64 {
    let crosses: f64 = lines.iter().map(|line| line.cross_size).sum();
    crosses + line_spacing * lines.len().saturating_sub(1) as f64
}

/// Per-child cross alignment: `align_self` if set, else the stack's
/// `align_items`. Baseline alignment only makes sense across a row; in a
/// vertical stack it falls back to start.
fn resolve_alignments(spec: &StackLayoutSpec) -> Vec<AlignItems> {
    let options = spec.options();
    let mut warned = false;
    spec.child_elements()
        .iter()
        .map(|child| {
            let alignment = match child.style().align_self {
                AlignSelf::Auto => options.align_items,
                AlignSelf::Start => AlignItems::Start,
                AlignSelf::End => AlignItems::End,
                AlignSelf::Center => AlignItems::Center,
                AlignSelf::Stretch => AlignItems::Stretch,
                AlignSelf::BaselineFirst => AlignItems::BaselineFirst,
                AlignSelf::BaselineLast => AlignItems::BaselineLast,
            };
            if alignment.is_baseline() && !options.direction.is_horizontal() {
                if !warned {
                    tracing::warn!(
                        child = %child.debug_name(),
                        "baseline alignment in a vertical stack, aligning to start"
                    );
                    warned = true;
                }
                return AlignItems::Start;
            }
            alignment
        })
        .collect()
}

/// Greedy first-fit wrapping. A line always holds at least one item.
fn wrap_lines<'a>(
    items: Vec<StackItem<'a>>,
    wrap: FlexWrap,
    direction: StackDirection,
    spacing: f64,
    range: SizeRange,
) -> Vec<StackLine<'a>> {
    let new_line = |items| StackLine {
        items,
        cross_size: 0.0,
        baseline: 0.0,
    };

    if wrap == FlexWrap::NoWrap {
        return vec![new_line(items)];
    }

    let max = direction.primary(range.max);
    let mut lines = Vec::new();
    let mut current: Vec<StackItem<'a>> = Vec::new();
    let mut line_sum = 0.0;

    for item in items {
        let extent = item.outer_primary(direction);
        let gap = if current.is_empty() { 0.0 } else { spacing };
        if !current.is_empty() && line_sum + gap + extent > max + VIOLATION_EPSILON {
            lines.push(new_line(std::mem::take(&mut current)));
            line_sum = extent;
        } else {
            line_sum += gap + extent;
        }
        current.push(item);
    }
    if !current.is_empty() {
        lines.push(new_line(current));
    }
    lines
}

/// Signed overflow of `sum` against `[min, max]`: positive needs shrink,
/// negative needs grow. Infinite targets never produce a violation.
pub(super) fn compute_violation(sum: f64, min: f64, max: f64) -> f64 {
    let violation = if sum > max && max.is_finite() {
        sum - max
    } else if sum < min && min.is_finite() {
        sum - min
    } else {
        0.0
    };
    if violation.abs() <= VIOLATION_EPSILON {
        0.0
    } else {
        violation
    }
}

/// Flex factor of an item in the direction of `violation`.
fn flex_weight(item: &StackItem<'_>, violation: f64, direction: StackDirection) -> f64 {
    let style = item.child.style();
    if violation > 0.0 {
        style.flex_shrink * direction.primary(item.layout.size())
    } else {
        style.flex_grow
    }
}

/// One proportional flex pass over a line, then re-measurement of every
/// flexed item at its new primary size.
fn flex_line(
    line: &mut StackLine<'_>,
    spacing: f64,
    stack_min: f64,
    stack_max: f64,
    measurer: &Measurer<'_, '_>,
    concurrent: bool,
) -> Result<()> {
    let direction = measurer.direction;
    let sum = line.primary_sum(direction, spacing);
    let violation = compute_violation(sum, stack_min, stack_max);
    if violation == 0.0 {
        return Ok(());
    }

    let weights: Vec<f64> = line
        .items
        .iter()
        .map(|item| flex_weight(item, violation, direction))
        .collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Ok(());
    }

    let mut targets: Vec<Option<f64>> = line
        .items
        .iter()
        .zip(&weights)
        .map(|(item, weight)| {
            (*weight > 0.0).then(|| {
                let current = direction.primary(item.layout.size());
                (current - violation * weight / total).max(0.0)
            })
        })
        .collect();

    // Flooring at zero can leave part of the overflow unabsorbed. Flexible
    // items that still have extent take it, in child order.
    let absorbed: f64 = line
        .items
        .iter()
        .zip(&targets)
        .filter_map(|(item, target)| target.map(|t| direction.primary(item.layout.size()) - t))
        .sum();
    let mut remaining = violation - absorbed;
    for target in targets.iter_mut().flatten() {
        if remaining <= VIOLATION_EPSILON {
            break;
        }
        let taken = remaining.min(*target);
        *target -= taken;
        remaining -= taken;
    }

    tracing::debug!(
        violation,
        flexible = weights.iter().filter(|w| **w > 0.0).count(),
        "flexing stack line"
    );

    let jobs: Vec<(usize, f64)> = targets
        .iter()
        .enumerate()
        .filter_map(|(index, target)| target.map(|t| (index, t)))
        .collect();
    let items = &line.items;
    let layouts = map_children(concurrent, &jobs, |(index, target)| {
        let item = &items[*index];
        let cross_min = if item.alignment == AlignItems::Stretch {
            measurer.cross_min
        } else {
            0.0
        };
        measurer.measure(item.child, (*target, *target), cross_min)
    })?;
    for ((index, _), layout) in jobs.into_iter().zip(layouts) {
        line.items[index].layout = layout;
    }
    Ok(())
}

/// Cross size and baseline of every line.
///
/// A line is as tall as its tallest item, or as tall as the combined extents
/// above and below the baseline of its baseline-aligned items, whichever is
/// larger. A lone line takes the stack's exact cross size if it has one, or
/// its finite cross maximum when it holds a stretchable item, and is otherwise
/// clamped to the stack's cross bounds.
fn compute_cross_sizes(
    lines: &mut [StackLine<'_>],
    direction: StackDirection,
    range: SizeRange,
    wrap: FlexWrap,
) {
    let single_line = wrap == FlexWrap::NoWrap || lines.len() == 1;
    for line in lines.iter_mut() {
        let mut max_cross: f64 = 0.0;
        let mut above: f64 = 0.0;
        let mut below: f64 = 0.0;
        let mut has_stretch = false;
        for item in &line.items {
            has_stretch |= is_stretchable(item, direction);
            let cross = direction.cross(item.layout.size());
            max_cross = max_cross.max(cross);
            if item.alignment.is_baseline() {
                let offset = item.baseline_offset(direction);
                above = above.max(offset);
                below = below.max(cross - offset);
            }
        }
        line.baseline = above;
        line.cross_size = max_cross.max(above + below);

        if single_line {
            let cross_min = direction.cross(range.min);
            let cross_max = direction.cross(range.max);
            let fills = cross_min == cross_max || (has_stretch && cross_max.is_finite());
            line.cross_size = if fills {
                cross_max
            } else {
                line.cross_size.max(cross_min).min(cross_max)
            };
        }
    }
}

/// Grow lines equally until they fill the stack's minimum cross extent.
fn stretch_lines(
    lines: &mut [StackLine<'_>],
    direction: StackDirection,
    line_spacing: f64,
    range: SizeRange,
) {
    let extra = direction.cross(range.min) - lines_cross_sum(lines, line_spacing);
    if extra <= 0.0 {
        return;
    }
    let share = extra / lines.len() as f64;
    for line in lines.iter_mut() {
        line.cross_size += share;
    }
}

/// Stretch-aligned with no explicit cross size.
fn is_stretchable(item: &StackItem<'_>, direction: StackDirection) -> bool {
    item.alignment == AlignItems::Stretch
        && direction.cross_dimension(&item.child.style().size).is_auto()
}

/// Re-measure stretch-aligned items whose cross size falls short of their
/// line. Items with an explicit cross size keep it.
fn stretch_items(
    line: &mut StackLine<'_>,
    measurer: &Measurer<'_, '_>,
    concurrent: bool,
) -> Result<()> {
    let direction = measurer.direction;
    let line_cross = line.cross_size;
    let jobs: Vec<usize> = line
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            is_stretchable(item, direction)
                && line_cross - direction.cross(item.layout.size()) > VIOLATION_EPSILON
        })
        .map(|(index, _)| index)
        .collect();
    if jobs.is_empty() {
        return Ok(());
    }

    let items = &line.items;
    let layouts = map_children(concurrent, &jobs, |index| {
        let item = &items[*index];
        let own = item
            .child
            .style()
            .size
            .resolve(measurer.parent, SizeRange::UNCONSTRAINED)?;
        let cross = line_cross
            .max(direction.cross(own.min))
            .min(direction.cross(own.max));
        let primary = direction.primary(item.layout.size());
        let range = direction.range((primary, primary), (cross, cross));
        item.child.layout_that_fits(range, measurer.parent, measurer.ctx)
    })?;
    for (index, layout) in jobs.into_iter().zip(layouts) {
        line.items[index].layout = layout;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_sign() {
        assert_eq!(compute_violation(320.0, 0.0, 200.0), 120.0);
        assert_eq!(compute_violation(100.0, 300.0, 300.0), -200.0);
        assert_eq!(compute_violation(150.0, 100.0, 200.0), 0.0);
    }

    #[test]
    fn test_violation_ignores_infinite_target_and_jitter() {
        assert_eq!(compute_violation(1e9, 0.0, f64::INFINITY), 0.0);
        assert_eq!(compute_violation(200.005, 0.0, 200.0), 0.0);
    }
}
