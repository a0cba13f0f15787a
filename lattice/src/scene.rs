//! JSON scene descriptions.
//!
//! A scene is a serializable element tree plus the range and environment to
//! measure it in. Leaves are fixed-size placeholders, which is enough to
//! exercise every layout spec without a rendering layer.
//!
//! ```json
//! {
//!   "bounds": { "max_width": 320 },
//!   "root": {
//!     "type": "stack",
//!     "options": { "direction": "horizontal", "spacing": 10 },
//!     "children": [
//!       { "type": "leaf", "name": "icon", "size": { "width": 20, "height": 20 } },
//!       { "type": "leaf", "size": { "width": 80, "height": 16 }, "style": { "flex_grow": 1 } }
//!     ]
//!   }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::RenderingEnvironment;
use crate::error::{LayoutError, Result};
use crate::layout::{
    AbsoluteLayoutSpec, AbsoluteSizing, BackgroundLayoutSpec, CenterLayoutSpec, Centering,
    InsetLayoutSpec, IntrinsicContent, Layout, LayoutElement, LeafElement, MinimumSize,
    OverlayLayoutSpec, RatioLayoutSpec, RelativeLayoutSpec, RelativePosition, SizeRange,
    StackLayoutSpec, StackOptions, Style, Styled, WrapperLayoutSpec,
};
use crate::primitives::{EdgeInsets, Size};

/// The range a scene is measured in. Missing maxima are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneBounds {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
}

impl SceneBounds {
    pub fn to_range(&self) -> Result<SizeRange> {
        SizeRange::new(
            Size::new(self.min_width, self.min_height),
            Size::new(
                self.max_width.unwrap_or(f64::INFINITY),
                self.max_height.unwrap_or(f64::INFINITY),
            ),
        )
    }
}

/// One node of a scene with its style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(flatten)]
    pub node: SceneNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneNode {
    Leaf {
        size: Size,
    },
    Stack {
        #[serde(default)]
        options: StackOptions,
        #[serde(default)]
        children: Vec<SceneElement>,
    },
    Inset {
        insets: EdgeInsets,
        child: Box<SceneElement>,
    },
    Overlay {
        child: Box<SceneElement>,
        overlay: Box<SceneElement>,
    },
    Background {
        child: Box<SceneElement>,
        background: Box<SceneElement>,
    },
    Ratio {
        ratio: f64,
        child: Box<SceneElement>,
    },
    Absolute {
        #[serde(default)]
        sizing: AbsoluteSizing,
        #[serde(default)]
        children: Vec<SceneElement>,
    },
    Center {
        #[serde(default)]
        centering: Centering,
        #[serde(default)]
        minimum_size: MinimumSize,
        child: Box<SceneElement>,
    },
    Relative {
        #[serde(default)]
        horizontal: RelativePosition,
        #[serde(default)]
        vertical: RelativePosition,
        #[serde(default)]
        minimum_size: MinimumSize,
        child: Box<SceneElement>,
    },
    Wrapper {
        #[serde(default)]
        children: Vec<SceneElement>,
    },
}

impl SceneElement {
    /// Build the element tree this node describes.
    pub fn to_element(&self) -> LayoutElement {
        match &self.node {
            SceneNode::Leaf { size } => {
                let content = match &self.name {
                    Some(name) => IntrinsicContent::named(*size, name.clone()),
                    None => IntrinsicContent::new(*size),
                };
                self.finish(LeafElement::new(content))
            }
            SceneNode::Stack { options, children } => {
                self.finish(StackLayoutSpec::with_options(*options).children(elements(children)))
            }
            SceneNode::Inset { insets, child } => {
                self.finish(InsetLayoutSpec::new(*insets, child.to_element()))
            }
            SceneNode::Overlay { child, overlay } => {
                self.finish(OverlayLayoutSpec::new(child.to_element(), overlay.to_element()))
            }
            SceneNode::Background { child, background } => self.finish(
                BackgroundLayoutSpec::new(child.to_element(), background.to_element()),
            ),
            SceneNode::Ratio { ratio, child } => {
                self.finish(RatioLayoutSpec::new(*ratio, child.to_element()))
            }
            SceneNode::Absolute { sizing, children } => self.finish(
                AbsoluteLayoutSpec::new()
                    .sizing(*sizing)
                    .children(elements(children)),
            ),
            SceneNode::Center {
                centering,
                minimum_size,
                child,
            } => self.finish(CenterLayoutSpec::with_options(
                *centering,
                *minimum_size,
                child.to_element(),
            )),
            SceneNode::Relative {
                horizontal,
                vertical,
                minimum_size,
                child,
            } => self.finish(
                RelativeLayoutSpec::new(*horizontal, *vertical, child.to_element())
                    .minimum_size(*minimum_size),
            ),
            SceneNode::Wrapper { children } => {
                self.finish(WrapperLayoutSpec::default().children(elements(children)))
            }
        }
    }

    fn finish<T>(&self, element: T) -> LayoutElement
    where
        T: Styled + Into<LayoutElement>,
    {
        let element = element.style(self.style);
        match &self.name {
            Some(name) => element.debug_name(name.clone()).into(),
            None => element.into(),
        }
    }
}

fn elements(children: &[SceneElement]) -> impl Iterator<Item = LayoutElement> + '_ {
    children.iter().map(SceneElement::to_element)
}

/// A complete measurable scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub environment: RenderingEnvironment,
    #[serde(default)]
    pub bounds: SceneBounds,
    pub root: SceneElement,
}

impl Scene {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LayoutError::InvalidScene(e.to_string()))
    }

    /// Read a scene from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LayoutError::InvalidScene(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn to_element(&self) -> LayoutElement {
        self.root.to_element()
    }

    /// Build and measure the scene.
    pub fn layout(&self) -> Result<Layout> {
        let range = self.bounds.to_range()?;
        self.to_element().measure_in(range, &self.environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point;

    const ROW: &str = r#"{
        "bounds": { "max_width": 1000 },
        "root": {
            "type": "stack",
            "options": { "spacing": 10 },
            "children": [
                { "type": "leaf", "name": "a", "size": { "width": 50, "height": 10 } },
                { "type": "leaf", "name": "b", "size": { "width": 100, "height": 10 } },
                { "type": "leaf", "name": "c", "size": { "width": 150, "height": 10 } }
            ]
        }
    }"#;

    #[test]
    fn test_row_scene_lays_out() {
        let layout = Scene::from_json_str(ROW).unwrap().layout().unwrap();
        assert_eq!(layout.size(), Size::new(320.0, 10.0));
        assert_eq!(layout.sublayouts()[2].position(), Some(Point::new(170.0, 0.0)));
    }

    #[test]
    fn test_names_and_styles_apply() {
        let scene = Scene::from_json_str(
            r#"{ "root": { "type": "leaf", "name": "logo", "size": { "width": 5, "height": 5 },
                 "style": { "size": { "width": "40pt" } } } }"#,
        )
        .unwrap();
        let element = scene.to_element();
        assert_eq!(element.debug_name(), "logo");
        assert_eq!(scene.layout().unwrap().size(), Size::new(40.0, 5.0));
    }

    #[test]
    fn test_unknown_node_type_is_invalid_scene() {
        let err = Scene::from_json_str(r#"{ "root": { "type": "grid" } }"#).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidScene(_)));
    }

    #[test]
    fn test_bounds_default_to_unconstrained() {
        assert_eq!(SceneBounds::default().to_range().unwrap(), SizeRange::UNCONSTRAINED);
    }
}
