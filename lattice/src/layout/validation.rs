//! Structural checks on element trees.
//!
//! Specs own their children, so the only way to alias a node is to share one
//! leaf content handle between two leaves. Layout assumes a tree, so that is
//! reported as an error before measuring.

use std::collections::HashSet;
use std::sync::Arc;

use super::element::LayoutElement;
use crate::error::{LayoutError, Result};

pub(crate) fn validate_tree(root: &LayoutElement) -> Result<()> {
    let mut seen: HashSet<*const ()> = HashSet::new();
    let mut pending = vec![root];

    while let Some(element) = pending.pop() {
        if let LayoutElement::Leaf(leaf) = element {
            let identity = Arc::as_ptr(leaf.content()) as *const ();
            if !seen.insert(identity) {
                return Err(LayoutError::DuplicateElementInTree {
                    name: element.debug_name().into_owned(),
                });
            }
        }
        pending.extend(element.children());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::element::{IntrinsicContent, LeafElement, Measurable};
    use crate::layout::stack::StackLayoutSpec;
    use crate::layout::wrapper::WrapperLayoutSpec;
    use crate::primitives::Size;

    #[test]
    fn test_distinct_leaves_pass() {
        let tree: LayoutElement = StackLayoutSpec::horizontal()
            .child(LeafElement::fixed(1.0, 1.0))
            .child(LeafElement::fixed(1.0, 1.0))
            .into();
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_shared_content_is_rejected() {
        let shared: Arc<dyn Measurable> =
            Arc::new(IntrinsicContent::named(Size::new(1.0, 1.0), "badge"));
        let tree: LayoutElement = StackLayoutSpec::vertical()
            .child(LeafElement::from_shared(shared.clone()))
            .child(WrapperLayoutSpec::new(LeafElement::from_shared(shared)))
            .into();
        assert_eq!(
            tree.validate().unwrap_err(),
            LayoutError::DuplicateElementInTree {
                name: "badge".to_string()
            }
        );
    }
}
