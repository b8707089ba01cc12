//! JSON scene interchange.
//!
//! Wire format:
//!
//! ```json
//! { "gaussians": [
//!     { "color": [r, g, b],
//!       "mean": [x, y, z],
//!       "scale": [sx, sy, sz],
//!       "rotation": [qx, qy, qz, qw],
//!       "opacity": o
//!     } ] }
//! ```
//!
//! `color` is required; every other field falls back to the defaults of
//! [`Gaussian::with_color`] when absent or malformed. `"position"` is
//! accepted as a legacy alias for `"mean"`. Saving writes every field of
//! every record, so load(save(S)) reproduces S.

use std::fs;
use std::path::{Path, PathBuf};

use glam::{Quat, Vec3};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::gaussian::Gaussian;
use crate::scene::Scene;

/// Scene codec failure. Recoverable: callers may keep the previous scene or
/// start empty.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene JSON has no top-level 'gaussians' array")]
    MissingGaussians,
    #[error("gaussian #{index} is missing the required 'color' field")]
    MissingColor { index: usize },
    #[error("gaussian #{index} has a malformed '{field}' value")]
    BadField { index: usize, field: &'static str },
}

/// Load a scene from a JSON file.
pub fn load(path: &Path) -> Result<Scene, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scene(&text)
}

/// Parse a scene from JSON text.
pub fn parse_scene(text: &str) -> Result<Scene, LoadError> {
    let doc: Value = serde_json::from_str(text)?;
    let entries = doc
        .get("gaussians")
        .and_then(Value::as_array)
        .ok_or(LoadError::MissingGaussians)?;

    let mut gaussians = Vec::with_capacity(entries.len());
    for (index, item) in entries.iter().enumerate() {
        gaussians.push(parse_entry(index, item)?);
    }
    Ok(Scene::from_gaussians(gaussians))
}

fn parse_entry(index: usize, item: &Value) -> Result<Gaussian, LoadError> {
    let color = item
        .get("color")
        .ok_or(LoadError::MissingColor { index })?;
    let color = vec3_from(color).ok_or(LoadError::BadField {
        index,
        field: "color",
    })?;

    let mut g = Gaussian::with_color(color);
    if let Some(mean) = item
        .get("mean")
        .or_else(|| item.get("position"))
        .and_then(vec3_from)
    {
        g.mean = mean;
    }
    if let Some(scale) = item.get("scale").and_then(vec3_from) {
        g.scale = scale;
    }
    if let Some(rotation) = item.get("rotation").and_then(quat_from) {
        g.rotation = rotation;
    }
    if let Some(opacity) = item.get("opacity").and_then(Value::as_f64) {
        g.opacity = opacity as f32;
    }
    Ok(g)
}

fn vec3_from(value: &Value) -> Option<Vec3> {
    let arr = value.as_array()?;
    if arr.len() < 3 {
        return None;
    }
    Some(Vec3::new(
        arr[0].as_f64()? as f32,
        arr[1].as_f64()? as f32,
        arr[2].as_f64()? as f32,
    ))
}

fn quat_from(value: &Value) -> Option<Quat> {
    let arr = value.as_array()?;
    if arr.len() < 4 {
        return None;
    }
    Some(Quat::from_xyzw(
        arr[0].as_f64()? as f32,
        arr[1].as_f64()? as f32,
        arr[2].as_f64()? as f32,
        arr[3].as_f64()? as f32,
    ))
}

#[derive(Serialize)]
struct SceneDoc {
    gaussians: Vec<RecordDoc>,
}

#[derive(Serialize)]
struct RecordDoc {
    mean: [f32; 3],
    scale: [f32; 3],
    rotation: [f32; 4],
    opacity: f32,
    color: [f32; 3],
}

/// Serialize a scene to pretty-printed JSON text.
pub fn scene_to_json(scene: &Scene) -> Result<String, LoadError> {
    let doc = SceneDoc {
        gaussians: scene
            .iter()
            .map(|g| RecordDoc {
                mean: g.mean.to_array(),
                scale: g.scale.to_array(),
                // Quaternion wire order is [x, y, z, w].
                rotation: g.rotation.to_array(),
                opacity: g.opacity,
                color: g.color.to_array(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Save a scene to a JSON file, writing every field of every record.
pub fn save(path: &Path, scene: &Scene) -> Result<(), LoadError> {
    let json = scene_to_json(scene)?;
    fs::write(path, json).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_only_entry_takes_defaults() {
        let scene = parse_scene(r#"{ "gaussians": [ { "color": [0.1, 0.2, 0.3] } ] }"#).unwrap();
        assert_eq!(scene.len(), 1);
        let g = scene.as_slice()[0];
        assert_eq!(g.mean, Vec3::ZERO);
        assert_eq!(g.scale, Vec3::ONE);
        assert_eq!(g.rotation, Quat::IDENTITY);
        assert_eq!(g.opacity, 1.0);
        assert_eq!(g.color, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn legacy_position_alias_sets_mean() {
        let scene = parse_scene(
            r#"{ "gaussians": [ { "color": [1, 1, 1], "position": [1.5, -2.0, 3.0] } ] }"#,
        )
        .unwrap();
        assert_eq!(scene.as_slice()[0].mean, Vec3::new(1.5, -2.0, 3.0));
    }

    #[test]
    fn mean_wins_over_position_alias() {
        let scene = parse_scene(
            r#"{ "gaussians": [
                { "color": [1, 1, 1], "mean": [1, 2, 3], "position": [9, 9, 9] }
            ] }"#,
        )
        .unwrap();
        assert_eq!(scene.as_slice()[0].mean, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn missing_gaussians_array_is_a_format_error() {
        // Well-formed JSON, wrong shape.
        for text in [r#"{}"#, r#"{ "gaussians": 3 }"#, r#"{ "splats": [] }"#] {
            assert!(matches!(
                parse_scene(text),
                Err(LoadError::MissingGaussians)
            ));
        }
    }

    #[test]
    fn missing_color_is_an_error() {
        let err = parse_scene(r#"{ "gaussians": [ { "mean": [0, 0, 0] } ] }"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingColor { index: 0 }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            parse_scene("{ not json"),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn malformed_optional_field_falls_back_to_default() {
        let scene = parse_scene(
            r#"{ "gaussians": [ { "color": [1, 1, 1], "scale": "big", "opacity": "solid" } ] }"#,
        )
        .unwrap();
        let g = scene.as_slice()[0];
        assert_eq!(g.scale, Vec3::ONE);
        assert_eq!(g.opacity, 1.0);
    }

    #[test]
    fn rotation_round_trips_in_xyzw_order() {
        let scene = parse_scene(
            r#"{ "gaussians": [ { "color": [1, 0, 0], "rotation": [0.1, 0.2, 0.3, 0.927] } ] }"#,
        )
        .unwrap();
        let q = scene.as_slice()[0].rotation;
        assert!((q.x - 0.1).abs() < 1e-6);
        assert!((q.w - 0.927).abs() < 1e-6);

        let json = scene_to_json(&scene).unwrap();
        let doc: Value = serde_json::from_str(&json).unwrap();
        let rot = doc["gaussians"][0]["rotation"].as_array().unwrap();
        assert!((rot[0].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert!((rot[3].as_f64().unwrap() - 0.927).abs() < 1e-6);
    }

    #[test]
    fn empty_scene_round_trips() {
        let json = scene_to_json(&Scene::new()).unwrap();
        let scene = parse_scene(&json).unwrap();
        assert!(scene.is_empty());
    }
}
