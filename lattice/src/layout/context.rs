//! Layout context carried through a measurement pass.
//!
//! The context is a small `Copy` value: the injected rendering environment and
//! the current depth in the element tree (used for trace output). It holds no
//! mutable state, so children may be measured from several threads at once.

use crate::config::RenderingEnvironment;

/// Read-only state shared by every element in one measurement pass.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    env: &'a RenderingEnvironment,
    depth: u32,
}

impl<'a> LayoutContext<'a> {
    /// Context for the root of a measurement pass.
    pub fn new(env: &'a RenderingEnvironment) -> Self {
        Self { env, depth: 0 }
    }

    /// The rendering environment for this pass.
    #[inline]
    pub fn env(&self) -> &'a RenderingEnvironment {
        self.env
    }

    /// Depth of the element currently being measured (root = 0).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Context for a child one level down.
    #[inline]
    pub fn child(&self) -> Self {
        Self {
            env: self.env,
            depth: self.depth + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_context_increments_depth() {
        let env = RenderingEnvironment::default();
        let root = LayoutContext::new(&env);
        assert_eq!(root.depth(), 0);
        assert_eq!(root.child().child().depth(), 2);
        assert_eq!(root.child().env().scale, 1.0);
    }
}
