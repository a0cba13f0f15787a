//! Computed layouts.
//!
//! A [`Layout`] is the immutable output of measuring an element: its chosen
//! size, its position inside the parent (none for the root) and the layouts of
//! its children. Layout trees hold no back-pointers and no mutable state, so
//! they can be handed across threads freely.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use super::element::{ElementKind, Measurable};
use super::size_range::SizeRange;
use crate::primitives::{Point, Rect, Size};

/// The positioned result of measuring one element.
#[derive(Clone)]
pub struct Layout {
    kind: ElementKind,
    content: Option<Arc<dyn Measurable>>,
    size: Size,
    position: Option<Point>,
    sublayouts: Vec<Layout>,
}

impl Layout {
    pub(crate) fn new(kind: ElementKind, size: Size, sublayouts: Vec<Layout>) -> Self {
        Self {
            kind,
            content: None,
            size,
            position: None,
            sublayouts,
        }
    }

    pub(crate) fn leaf(content: Arc<dyn Measurable>, size: Size) -> Self {
        Self {
            kind: ElementKind::Leaf,
            content: Some(content),
            size,
            position: None,
            sublayouts: Vec::new(),
        }
    }

    /// The same layout placed at `position` inside its parent.
    pub(crate) fn positioned(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub(crate) fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    /// What produced this layout.
    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Leaf content, for leaf layouts.
    #[inline]
    pub fn content(&self) -> Option<&Arc<dyn Measurable>> {
        self.content.as_ref()
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Position relative to the parent layout; `None` for the root.
    #[inline]
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    #[inline]
    pub fn sublayouts(&self) -> &[Layout] {
        &self.sublayouts
    }

    /// Frame in parent coordinates. The root sits at the origin.
    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.position.unwrap_or(Point::ORIGIN), self.size)
    }

    /// Whether the size lies inside `range`, allowing for float noise.
    pub fn contains_in(&self, range: &SizeRange) -> bool {
        range.contains(self.size, 1e-6)
    }

    /// A two-level copy of this layout whose sublayouts are every leaf in
    /// the tree, positioned relative to this layout's origin.
    ///
    /// This is the shape a presentation layer needs to apply frames to views.
    pub fn flattened(&self) -> Layout {
        let mut leaves = Vec::new();
        if self.kind == ElementKind::Leaf {
            leaves.push(self.clone().positioned(Point::ORIGIN));
        } else {
            collect_leaves(&self.sublayouts, Point::ORIGIN, &mut leaves);
        }
        Layout {
            kind: self.kind,
            content: self.content.clone(),
            size: self.size,
            position: self.position,
            sublayouts: leaves,
        }
    }

    /// Every leaf's content with its frame relative to this layout.
    pub fn leaf_frames(&self) -> Vec<(Arc<dyn Measurable>, Rect)> {
        self.flattened()
            .sublayouts
            .into_iter()
            .filter_map(|leaf| {
                let frame = leaf.frame();
                leaf.content.map(|content| (content, frame))
            })
            .collect()
    }

    /// Indented, one-line-per-layout description of the tree.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(&mut out, 0);
        out
    }

    fn describe_into(&self, out: &mut String, depth: usize) {
        let name = match &self.content {
            Some(content) => content.debug_name().to_string(),
            None => self.kind.to_string(),
        };
        let origin = self.position.unwrap_or(Point::ORIGIN);
        let _ = writeln!(out, "{:indent$}{name} {} @ {}", "", self.size, origin, indent = depth * 2);
        for sublayout in &self.sublayouts {
            sublayout.describe_into(out, depth + 1);
        }
    }
}

fn collect_leaves(layouts: &[Layout], offset: Point, out: &mut Vec<Layout>) {
    for layout in layouts {
        let origin = offset + layout.position.unwrap_or(Point::ORIGIN);
        if layout.kind == ElementKind::Leaf {
            out.push(Layout {
                kind: ElementKind::Leaf,
                content: layout.content.clone(),
                size: layout.size,
                position: Some(origin),
                sublayouts: Vec::new(),
            });
        } else {
            collect_leaves(&layout.sublayouts, origin, out);
        }
    }
}

/// Structural equality; leaf content is compared by identity.
impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        let same_content = match (&self.content, &other.content) {
            (Some(a), Some(b)) => same_content(a, b),
            (None, None) => true,
            _ => false,
        };
        same_content
            && self.kind == other.kind
            && self.size == other.size
            && self.position == other.position
            && self.sublayouts == other.sublayouts
    }
}

/// Identity comparison of two content handles.
pub(crate) fn same_content(a: &Arc<dyn Measurable>, b: &Arc<dyn Measurable>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("kind", &self.kind)
            .field("content", &self.content.as_ref().map(|c| c.debug_name().to_string()))
            .field("size", &self.size)
            .field("position", &self.position)
            .field("sublayouts", &self.sublayouts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::element::IntrinsicContent;

    fn leaf(size: Size) -> Layout {
        Layout::leaf(Arc::new(IntrinsicContent::new(size)), size)
    }

    #[test]
    fn test_flattened_accumulates_offsets() {
        let inner = Layout::new(
            ElementKind::Inset,
            Size::new(50.0, 50.0),
            vec![leaf(Size::new(10.0, 10.0)).positioned(Point::new(5.0, 5.0))],
        );
        let root = Layout::new(
            ElementKind::Stack,
            Size::new(100.0, 50.0),
            vec![
                leaf(Size::new(20.0, 20.0)).positioned(Point::ORIGIN),
                inner.positioned(Point::new(30.0, 0.0)),
            ],
        );

        let flat = root.flattened();
        assert_eq!(flat.sublayouts().len(), 2);
        assert_eq!(flat.sublayouts()[0].position(), Some(Point::ORIGIN));
        assert_eq!(flat.sublayouts()[1].position(), Some(Point::new(35.0, 5.0)));
        assert_eq!(root.leaf_frames()[1].1, Rect::new(35.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_equality_compares_content_identity() {
        let content: Arc<dyn Measurable> = Arc::new(IntrinsicContent::new(Size::new(1.0, 1.0)));
        let a = Layout::leaf(content.clone(), Size::new(1.0, 1.0));
        let b = Layout::leaf(content, Size::new(1.0, 1.0));
        let c = leaf(Size::new(1.0, 1.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_describe_indents_children() {
        let root = Layout::new(
            ElementKind::Wrapper,
            Size::new(10.0, 10.0),
            vec![leaf(Size::new(10.0, 10.0)).positioned(Point::ORIGIN)],
        );
        let text = root.describe();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("WrapperLayoutSpec"));
        assert!(lines[1].starts_with("  "));
    }
}
