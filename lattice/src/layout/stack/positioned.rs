//! Placing measured lines and items.

use super::unpositioned::{StackItem, StackLine, UnpositionedLayout};
use super::{AlignContent, AlignItems, JustifyContent, StackDirection, StackLayoutSpec};
use crate::config::RenderingEnvironment;
use crate::layout::computed::Layout;
use crate::layout::context::LayoutContext;
use crate::layout::size_range::SizeRange;
use crate::primitives::Size;

/// Final stack size and positioned child layouts, in child order.
pub(super) fn position(
    spec: &StackLayoutSpec,
    unpositioned: UnpositionedLayout<'_>,
    range: SizeRange,
    ctx: &LayoutContext<'_>,
) -> (Size, Vec<Layout>) {
    let options = spec.options();
    let direction = options.direction;
    let env = ctx.env();

    let size = range.clamp(direction.size(
        unpositioned.stack_dimension_sum,
        unpositioned.cross_dimension_sum,
    ));
    let stack_extent = direction.primary(size);
    let cross_extent = direction.cross(size);

    let line_count = unpositioned.lines.len();
    let (mut cross_cursor, line_gap) = distribute(
        cross_extent - unpositioned.cross_dimension_sum,
        line_count,
        content_as_justify(options.align_content),
        env,
    );

    let mut sublayouts = Vec::new();
    for line in unpositioned.lines {
        let remaining = stack_extent - line.primary_sum(direction, options.spacing);
        let (mut cursor, gap) =
            distribute(remaining, line.items.len(), options.justify_content, env);

        let StackLine {
            items,
            cross_size,
            baseline,
        } = line;
        for item in items {
            let style = item.child.style();
            cursor += style.spacing_before;
            let offset = cross_offset(&item, cross_size, baseline, direction, env);
            let primary_size = direction.primary(item.layout.size());
            let origin = direction.point(cursor, cross_cursor + offset);
            cursor += primary_size + style.spacing_after + options.spacing + gap;
            sublayouts.push(item.layout.positioned(origin));
        }

        cross_cursor += cross_size + options.line_spacing + line_gap;
    }

    (size, sublayouts)
}

fn content_as_justify(align: AlignContent) -> JustifyContent {
    match align {
        AlignContent::Start | AlignContent::Stretch => JustifyContent::Start,
        AlignContent::Center => JustifyContent::Center,
        AlignContent::End => JustifyContent::End,
        AlignContent::SpaceBetween => JustifyContent::SpaceBetween,
        AlignContent::SpaceAround => JustifyContent::SpaceAround,
    }
}

/// Leading offset and extra gap between `count` entries sharing `remaining`
/// free space.
///
/// The spacing modes fall back to start packing with a single entry or when
/// the content overflows, so gaps are never negative.
fn distribute(
    remaining: f64,
    count: usize,
    justify: JustifyContent,
    env: &RenderingEnvironment,
) -> (f64, f64) {
    let spread = count > 1 && remaining > 0.0;
    match justify {
        JustifyContent::Start => (0.0, 0.0),
        JustifyContent::Center => (env.floor_pixel(remaining / 2.0), 0.0),
        JustifyContent::End => (remaining, 0.0),
        JustifyContent::SpaceBetween if spread => (0.0, remaining / (count - 1) as f64),
        JustifyContent::SpaceAround if spread => {
            let share = remaining / count as f64;
            (share / 2.0, share)
        }
        JustifyContent::SpaceBetween | JustifyContent::SpaceAround => (0.0, 0.0),
    }
}

fn cross_offset(
    item: &StackItem<'_>,
    line_cross: f64,
    line_baseline: f64,
    direction: StackDirection,
    env: &RenderingEnvironment,
) -> f64 {
    let item_cross = direction.cross(item.layout.size());
    match item.alignment {
        AlignItems::Start | AlignItems::Stretch => 0.0,
        AlignItems::End => line_cross - item_cross,
        AlignItems::Center => env.floor_pixel((line_cross - item_cross) / 2.0),
        AlignItems::BaselineFirst | AlignItems::BaselineLast => {
            line_baseline - item.baseline_offset(direction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribute_space_between() {
        let env = RenderingEnvironment::default();
        assert_eq!(distribute(90.0, 4, JustifyContent::SpaceBetween, &env), (0.0, 30.0));
        assert_eq!(distribute(90.0, 1, JustifyContent::SpaceBetween, &env), (0.0, 0.0));
        assert_eq!(distribute(-10.0, 3, JustifyContent::SpaceBetween, &env), (0.0, 0.0));
    }

    #[test]
    fn test_distribute_space_around_halves_ends() {
        let env = RenderingEnvironment::default();
        assert_eq!(distribute(60.0, 3, JustifyContent::SpaceAround, &env), (10.0, 20.0));
        assert_eq!(distribute(60.0, 1, JustifyContent::SpaceAround, &env), (0.0, 0.0));
    }

    #[test]
    fn test_distribute_center_snaps_to_pixels() {
        let env = RenderingEnvironment::new(2.0);
        assert_eq!(distribute(15.3, 2, JustifyContent::Center, &env), (7.5, 0.0));
        assert_eq!(distribute(20.0, 2, JustifyContent::End, &env), (20.0, 0.0));
    }
}
