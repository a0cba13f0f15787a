use std::io::Write;

use lattice::LayoutError;
use lattice::primitives::{Point, Rect, Size};
use lattice::scene::Scene;
use tempfile::NamedTempFile;

const CARD: &str = r#"{
    "environment": { "scale": 2.0 },
    "bounds": { "max_width": 200 },
    "root": {
        "type": "inset",
        "name": "card",
        "insets": { "top": 8, "left": 8, "bottom": 8, "right": 8 },
        "child": {
            "type": "stack",
            "options": { "direction": "vertical", "spacing": 4, "align_items": "stretch" },
            "children": [
                {
                    "type": "ratio",
                    "ratio": 0.5,
                    "child": { "type": "leaf", "name": "image", "size": { "width": 10, "height": 10 } }
                },
                {
                    "type": "stack",
                    "options": { "spacing": 6 },
                    "children": [
                        { "type": "leaf", "name": "avatar", "size": { "width": 24, "height": 24 } },
                        {
                            "type": "leaf",
                            "name": "title",
                            "size": { "width": 60, "height": 16 },
                            "style": { "flex_grow": 1 }
                        }
                    ]
                }
            ]
        }
    }
}"#;

fn write_scene(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_card_scene_from_file() {
    let file = write_scene(CARD);
    let scene = Scene::from_path(file.path()).unwrap();
    assert_eq!(scene.environment.scale, 2.0);

    let layout = scene.layout().unwrap();
    // 8 + 92 (ratio 0.5 of 184) + 4 + 24 + 8
    assert_eq!(layout.size(), Size::new(200.0, 136.0));

    let frames: Vec<(String, Rect)> = layout
        .leaf_frames()
        .into_iter()
        .map(|(content, frame)| (content.debug_name().to_string(), frame))
        .collect();
    let names: Vec<&str> = frames.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["image", "avatar", "title"]);
    assert_eq!(frames[0].1, Rect::new(8.0, 8.0, 184.0, 92.0));
    assert_eq!(frames[1].1.origin(), Point::new(8.0, 104.0));
    assert_eq!(frames[2].1.origin(), Point::new(38.0, 104.0));
}

#[test]
fn test_ascii_art_names_every_node() {
    let scene = Scene::from_json_str(CARD).unwrap();
    let art = scene.to_element().ascii_art();
    for name in ["card", "image", "avatar", "title"] {
        assert!(art.contains(name), "{name} missing from\n{art}");
    }
}

#[test]
fn test_missing_file_is_invalid_scene() {
    let dir = tempfile::tempdir().unwrap();
    let err = Scene::from_path(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidScene(_)));
}

#[test]
fn test_malformed_dimension_is_rejected() {
    let file = write_scene(
        r#"{ "root": { "type": "leaf", "size": { "width": 1, "height": 1 },
              "style": { "size": { "width": "wide" } } } }"#,
    );
    let err = Scene::from_path(file.path()).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidScene(_)));
}

#[test]
fn test_scene_round_trips_through_json() {
    let scene = Scene::from_json_str(CARD).unwrap();
    let json = serde_json::to_string(&scene).unwrap();
    let reparsed = Scene::from_json_str(&json).unwrap();
    assert_eq!(scene, reparsed);
    assert_eq!(scene.layout().unwrap().describe(), reparsed.layout().unwrap().describe());
}
