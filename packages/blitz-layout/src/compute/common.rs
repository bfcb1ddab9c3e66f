//! Helpers shared by the block, flexbox and grid algorithms.

use crate::geometry::{MaybeMath, Point, Rect, Size};
use crate::style::{
    AlignContent, AvailableSpace, BoxSizing, Display, LengthPercentageAuto, MaybeResolve, Overflow,
    Position, ResolveOrZero, Style,
};
use crate::tree::{Layout, LayoutInput, LayoutPartialTree, NodeId, RunMode, SizingMode};

/// The box model of a node, resolved against its containing block.
///
/// Sizes are border-box sizes: `box-sizing: content-box` styles have padding and border added.
/// Negative lengths in sizes, padding and border are clamped to zero. Margins may be negative.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedBox {
    pub size: Size<Option<f32>>,
    pub min_size: Size<Option<f32>>,
    pub max_size: Size<Option<f32>>,
    pub aspect_ratio: Option<f32>,
    /// `None` for `auto` margins
    pub margin: Rect<Option<f32>>,
    pub padding: Rect<f32>,
    pub border: Rect<f32>,
    pub scrollbar_gutter: Size<f32>,
}

impl ResolvedBox {
    pub fn resolve(style: &Style, parent_size: Size<Option<f32>>) -> Self {
        let non_negative = |value: Option<f32>| value.map(|v| v.max(0.0));

        let padding = style.padding.resolve_or_zero(parent_size.width).map(|v| v.max(0.0));
        let border = style.border.resolve_or_zero(parent_size.width).map(|v| v.max(0.0));
        let box_sizing_adjustment = match style.box_sizing {
            BoxSizing::ContentBox => (padding + border).sum_axes(),
            BoxSizing::BorderBox => Size::ZERO,
        };
        let aspect_ratio = style.aspect_ratio.filter(|ratio| *ratio > 0.0 && ratio.is_finite());

        let resolve_size = |size: Size<Option<f32>>| -> Size<Option<f32>> {
            size.map(non_negative).maybe_add(box_sizing_adjustment)
        };

        Self {
            size: resolve_size(style.size.maybe_resolve(parent_size))
                .maybe_apply_aspect_ratio(aspect_ratio),
            min_size: resolve_size(style.min_size.maybe_resolve(parent_size)),
            max_size: resolve_size(style.max_size.maybe_resolve(parent_size)),
            aspect_ratio,
            margin: style.margin.maybe_resolve_edges(parent_size.width),
            padding,
            border,
            scrollbar_gutter: style.scrollbar_gutter(),
        }
    }

    /// Margins with `auto` treated as zero
    pub fn margin_or_zero(&self) -> Rect<f32> {
        self.margin.map(|margin| margin.unwrap_or(0.0))
    }

    pub fn padding_border(&self) -> Rect<f32> {
        self.padding + self.border
    }

    /// Distance between the border box and the content box on each axis
    pub fn content_box_inset(&self) -> Size<f32> {
        self.padding_border().sum_axes() + self.scrollbar_gutter
    }

    /// The style size clamped by min and max sizes
    pub fn clamped_size(&self) -> Size<Option<f32>> {
        self.size.maybe_clamp(self.min_size, self.max_size)
    }

    /// Where min and max agree (`max <= min`), the size is determined by them alone
    pub fn min_max_definite_size(&self) -> Size<Option<f32>> {
        self.min_size.zip_map(self.max_size, |min, max| match (min, max) {
            (Some(min), Some(max)) if max <= min => Some(min),
            _ => None,
        })
    }

    /// The sizes that are known before looking at any children
    pub fn styled_known_dimensions(&self, inputs: &LayoutInput) -> Size<Option<f32>> {
        let style_size = match inputs.sizing_mode {
            SizingMode::InherentSize => self.min_max_definite_size().or(self.clamped_size()),
            SizingMode::ContentSize => Size::NONE,
        };
        inputs
            .known_dimensions
            .or(style_size)
            .maybe_max(self.padding_border().sum_axes().map(Some))
    }
}

/// Resolve the offset a relatively positioned node is shifted by.
///
/// `left` wins over `right` and `top` over `bottom`.
pub(crate) fn resolve_relative_offset(
    inset: Rect<LengthPercentageAuto>,
    parent_size: Size<Option<f32>>,
) -> Point<f32> {
    let resolved = Rect {
        left: inset.left.maybe_resolve(parent_size.width),
        right: inset.right.maybe_resolve(parent_size.width),
        top: inset.top.maybe_resolve(parent_size.height),
        bottom: inset.bottom.maybe_resolve(parent_size.height),
    };
    Point {
        x: resolved.left.or(resolved.right.map(|right| -right)).unwrap_or(0.0),
        y: resolved.top.or(resolved.bottom.map(|bottom| -bottom)).unwrap_or(0.0),
    }
}

/// How far a child extends the scrollable area of its parent
pub(crate) fn compute_content_size_contribution(
    location: Point<f32>,
    size: Size<f32>,
    content_size: Size<f32>,
    overflow: Point<Overflow>,
) -> Size<f32> {
    let contribution = Size {
        width: match overflow.x {
            Overflow::Visible => size.width.max(content_size.width),
            _ => size.width,
        },
        height: match overflow.y {
            Overflow::Visible => size.height.max(content_size.height),
            _ => size.height,
        },
    };
    if contribution.width > 0.0 && contribution.height > 0.0 {
        Size {
            width: location.x + contribution.width,
            height: location.y + contribution.height,
        }
    } else {
        Size::ZERO
    }
}

/// Replace distributed alignments that cannot apply with their fallback.
///
/// With no free space or at most one item there is nothing to distribute.
pub(crate) fn apply_alignment_fallback(
    free_space: f32,
    num_items: usize,
    alignment: AlignContent,
) -> AlignContent {
    if num_items <= 1 || free_space <= 0.0 {
        match alignment {
            AlignContent::Stretch | AlignContent::SpaceBetween => AlignContent::FlexStart,
            AlignContent::SpaceAround | AlignContent::SpaceEvenly => AlignContent::Center,
            other => other,
        }
    } else {
        alignment
    }
}

/// Leading offset of one item (or line, or track) when distributing `free_space`.
///
/// For the first item this is the space before it. For later items it is the space between
/// it and the previous one, including `gap`.
pub(crate) fn compute_alignment_offset(
    free_space: f32,
    num_items: usize,
    gap: f32,
    alignment: AlignContent,
    is_reversed: bool,
    is_first: bool,
) -> f32 {
    if is_first {
        match alignment {
            AlignContent::Start | AlignContent::Stretch | AlignContent::SpaceBetween => 0.0,
            AlignContent::FlexStart => {
                if is_reversed {
                    free_space
                } else {
                    0.0
                }
            }
            AlignContent::End => free_space,
            AlignContent::FlexEnd => {
                if is_reversed {
                    0.0
                } else {
                    free_space
                }
            }
            AlignContent::Center => free_space / 2.0,
            AlignContent::SpaceAround => {
                if free_space >= 0.0 {
                    free_space / num_items as f32 / 2.0
                } else {
                    free_space / 2.0
                }
            }
            AlignContent::SpaceEvenly => {
                if free_space >= 0.0 {
                    free_space / (num_items + 1) as f32
                } else {
                    free_space / 2.0
                }
            }
        }
    } else {
        let free_space = free_space.max(0.0);
        gap + match alignment {
            AlignContent::Start
            | AlignContent::End
            | AlignContent::FlexStart
            | AlignContent::FlexEnd
            | AlignContent::Center
            | AlignContent::Stretch => 0.0,
            AlignContent::SpaceBetween => free_space / (num_items - 1) as f32,
            AlignContent::SpaceAround => free_space / num_items as f32,
            AlignContent::SpaceEvenly => free_space / (num_items + 1) as f32,
        }
    }
}

/// Give a hidden child (and its subtree) an empty layout
pub(crate) fn hide_child(tree: &mut impl LayoutPartialTree, child: NodeId, order: u32) {
    tree.set_unrounded_layout(child, &Layout::with_order(order));
    tree.compute_child_layout(child, LayoutInput::HIDDEN);
}

/// Lay out an absolutely positioned child against the padding box of its container.
///
/// `container_size` is the border-box size of the container, `static_position` is where the
/// child is placed on an axis where neither inset is set. Returns the child's contribution to
/// the container's content size.
pub(crate) fn layout_absolute_child(
    tree: &mut impl LayoutPartialTree,
    child: NodeId,
    order: u32,
    container_size: Size<f32>,
    container_border: Rect<f32>,
    container_gutter: Size<f32>,
    static_position: Point<f32>,
) -> Size<f32> {
    let area_size = Size {
        width: (container_size.width - container_border.horizontal_axis_sum() - container_gutter.width)
            .max(0.0),
        height: (container_size.height - container_border.vertical_axis_sum() - container_gutter.height)
            .max(0.0),
    };
    let area_offset = Point {
        x: container_border.left,
        y: container_border.top,
    };
    let parent_size = area_size.map(Some);

    let style = tree.get_style(child);
    let overflow = style.overflow;
    let resolved = ResolvedBox::resolve(style, parent_size);
    let inset = Rect {
        left: style.inset.left.maybe_resolve(Some(area_size.width)),
        right: style.inset.right.maybe_resolve(Some(area_size.width)),
        top: style.inset.top.maybe_resolve(Some(area_size.height)),
        bottom: style.inset.bottom.maybe_resolve(Some(area_size.height)),
    };
    let margin = resolved.margin_or_zero();

    // Stretch between both insets when the size is auto
    let mut known_dimensions = resolved.clamped_size();
    if known_dimensions.width.is_none() {
        if let (Some(left), Some(right)) = (inset.left, inset.right) {
            known_dimensions.width = Some(
                (area_size.width - left - right - margin.horizontal_axis_sum())
                    .maybe_clamp(resolved.min_size.width, resolved.max_size.width)
                    .max(0.0),
            );
        }
    }
    if known_dimensions.height.is_none() {
        if let (Some(top), Some(bottom)) = (inset.top, inset.bottom) {
            known_dimensions.height = Some(
                (area_size.height - top - bottom - margin.vertical_axis_sum())
                    .maybe_clamp(resolved.min_size.height, resolved.max_size.height)
                    .max(0.0),
            );
        }
    }
    let known_dimensions = known_dimensions.maybe_apply_aspect_ratio(resolved.aspect_ratio);

    let available_space = Size {
        width: AvailableSpace::Definite(
            (area_size.width - inset.left.unwrap_or(0.0) - inset.right.unwrap_or(0.0)
                - margin.horizontal_axis_sum())
            .max(0.0),
        ),
        height: AvailableSpace::Definite(
            (area_size.height - inset.top.unwrap_or(0.0) - inset.bottom.unwrap_or(0.0)
                - margin.vertical_axis_sum())
            .max(0.0),
        ),
    };

    let output = tree.compute_child_layout(
        child,
        LayoutInput {
            run_mode: RunMode::PerformLayout,
            sizing_mode: SizingMode::InherentSize,
            known_dimensions,
            parent_size,
            available_space,
        },
    );
    let size = known_dimensions.unwrap_or(output.size);

    // Auto margins absorb the free space between two set insets
    let resolve_auto_margins = |start: Option<f32>,
                                end: Option<f32>,
                                inset_start: Option<f32>,
                                inset_end: Option<f32>,
                                area: f32,
                                size: f32|
     -> (f32, f32) {
        match (inset_start, inset_end) {
            (Some(inset_start), Some(inset_end)) => {
                let free = area
                    - inset_start
                    - inset_end
                    - size
                    - start.unwrap_or(0.0)
                    - end.unwrap_or(0.0);
                match (start, end) {
                    (None, None) => {
                        let half = free.max(0.0) / 2.0;
                        (half, half)
                    }
                    (None, Some(end)) => (free.max(0.0), end),
                    (Some(start), None) => (start, free.max(0.0)),
                    (Some(start), Some(end)) => (start, end),
                }
            }
            _ => (start.unwrap_or(0.0), end.unwrap_or(0.0)),
        }
    };
    let (margin_left, margin_right) = resolve_auto_margins(
        resolved.margin.left,
        resolved.margin.right,
        inset.left,
        inset.right,
        area_size.width,
        size.width,
    );
    let (margin_top, margin_bottom) = resolve_auto_margins(
        resolved.margin.top,
        resolved.margin.bottom,
        inset.top,
        inset.bottom,
        area_size.height,
        size.height,
    );
    let margin = Rect {
        left: margin_left,
        right: margin_right,
        top: margin_top,
        bottom: margin_bottom,
    };

    let location = Point {
        x: match (inset.left, inset.right) {
            (Some(left), _) => area_offset.x + left + margin.left,
            (None, Some(right)) => {
                area_offset.x + area_size.width - right - margin.right - size.width
            }
            (None, None) => static_position.x + margin.left,
        },
        y: match (inset.top, inset.bottom) {
            (Some(top), _) => area_offset.y + top + margin.top,
            (None, Some(bottom)) => {
                area_offset.y + area_size.height - bottom - margin.bottom - size.height
            }
            (None, None) => static_position.y + margin.top,
        },
    };

    tree.set_unrounded_layout(
        child,
        &Layout {
            order,
            location,
            size,
            content_size: output.content_size,
            scrollbar_size: resolved.scrollbar_gutter,
            border: resolved.border,
            padding: resolved.padding,
            margin,
        },
    );

    compute_content_size_contribution(location, size, output.content_size, overflow)
}

/// Whether a child takes part in its parent's flow, is positioned absolutely or is hidden
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ChildKind {
    InFlow,
    Absolute,
    Hidden,
}

impl ChildKind {
    pub fn of(style: &Style) -> Self {
        if style.display == Display::None {
            ChildKind::Hidden
        } else if style.position == Position::Absolute {
            ChildKind::Absolute
        } else {
            ChildKind::InFlow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Dimension, LengthPercentage};

    #[test]
    fn space_between_spreads_free_space_between_items() {
        let first = compute_alignment_offset(30.0, 4, 0.0, AlignContent::SpaceBetween, false, true);
        let rest = compute_alignment_offset(30.0, 4, 0.0, AlignContent::SpaceBetween, false, false);
        assert_eq!(first, 0.0);
        assert_eq!(rest, 10.0);
    }

    #[test]
    fn space_around_and_evenly() {
        assert_eq!(
            compute_alignment_offset(40.0, 2, 0.0, AlignContent::SpaceAround, false, true),
            10.0
        );
        assert_eq!(
            compute_alignment_offset(40.0, 2, 0.0, AlignContent::SpaceAround, false, false),
            20.0
        );
        assert_eq!(
            compute_alignment_offset(30.0, 2, 0.0, AlignContent::SpaceEvenly, false, true),
            10.0
        );
    }

    #[test]
    fn distributed_alignment_falls_back_without_free_space() {
        assert_eq!(
            apply_alignment_fallback(-5.0, 3, AlignContent::SpaceBetween),
            AlignContent::FlexStart
        );
        assert_eq!(
            apply_alignment_fallback(10.0, 1, AlignContent::SpaceEvenly),
            AlignContent::Center
        );
        assert_eq!(
            apply_alignment_fallback(10.0, 3, AlignContent::SpaceAround),
            AlignContent::SpaceAround
        );
    }

    #[test]
    fn relative_offset_prefers_left_and_top() {
        let inset = Rect {
            left: LengthPercentageAuto::length(5.0),
            right: LengthPercentageAuto::length(100.0),
            top: LengthPercentageAuto::Auto,
            bottom: LengthPercentageAuto::percent(0.5),
        };
        let offset = resolve_relative_offset(inset, Size::new(100.0, 40.0));
        assert_eq!(offset, Point { x: 5.0, y: -20.0 });
    }

    #[test]
    fn empty_boxes_do_not_contribute_to_content_size() {
        let contribution = compute_content_size_contribution(
            Point { x: 10.0, y: 10.0 },
            Size { width: 0.0, height: 20.0 },
            Size::ZERO,
            Point {
                x: Overflow::Visible,
                y: Overflow::Visible,
            },
        );
        assert_eq!(contribution, Size::ZERO);
    }

    #[test]
    fn content_box_sizing_adds_padding_and_border() {
        let style = Style {
            box_sizing: BoxSizing::ContentBox,
            size: Size::<Dimension>::from_lengths(100.0, 50.0),
            padding: Rect::<LengthPercentage>::length(10.0),
            ..Default::default()
        };
        let resolved = ResolvedBox::resolve(&style, Size::NONE);
        assert_eq!(resolved.size, Size::new(120.0, 70.0));
    }

    #[test]
    fn negative_lengths_are_clamped() {
        let style = Style {
            size: Size::<Dimension>::from_lengths(-10.0, 20.0),
            padding: Rect::<LengthPercentage>::length(-4.0),
            ..Default::default()
        };
        let resolved = ResolvedBox::resolve(&style, Size::NONE);
        assert_eq!(resolved.size, Size::new(0.0, 20.0));
        assert_eq!(resolved.padding, Rect::ZERO);
    }
}
