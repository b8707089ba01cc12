//! Load→save→load fidelity through real files.

use std::path::PathBuf;

use glam::{Quat, Vec3};
use splat_data::{codec, generate, Gaussian, LoadError, Scene};

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("splat-data-{}-{}", std::process::id(), name));
    path
}

fn assert_scenes_close(a: &Scene, b: &Scene, tol: f32) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x.mean - y.mean).length() < tol);
        assert!((x.scale - y.scale).length() < tol);
        assert!((x.rotation.xyz() - y.rotation.xyz()).length() < tol);
        assert!((x.rotation.w - y.rotation.w).abs() < tol);
        assert!((x.opacity - y.opacity).abs() < tol);
        assert!((x.color - y.color).length() < tol);
    }
}

#[test]
fn round_trip_preserves_every_field() {
    let scene = generate::ribbon(64, 11);
    let path = temp_path("ribbon.json");

    codec::save(&path, &scene).unwrap();
    let loaded = codec::load(&path).unwrap();
    assert_scenes_close(&scene, &loaded, 1e-5);

    // A second trip through the codec is byte-stable content-wise.
    let path2 = temp_path("ribbon2.json");
    codec::save(&path2, &loaded).unwrap();
    let again = codec::load(&path2).unwrap();
    assert_scenes_close(&loaded, &again, 1e-5);

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&path2);
}

#[test]
fn round_trip_of_empty_scene() {
    let path = temp_path("empty.json");
    codec::save(&path, &Scene::new()).unwrap();
    let loaded = codec::load(&path).unwrap();
    assert!(loaded.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn round_trip_of_single_default_record() {
    let mut scene = Scene::new();
    scene.push(Gaussian::with_color(Vec3::new(0.9, 0.1, 0.4)));
    let path = temp_path("single.json");
    codec::save(&path, &scene).unwrap();
    let loaded = codec::load(&path).unwrap();
    let g = loaded.as_slice()[0];
    assert_eq!(g.mean, Vec3::ZERO);
    assert_eq!(g.rotation, Quat::IDENTITY);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_reports_path() {
    let path = temp_path("does-not-exist.json");
    match codec::load(&path) {
        Err(LoadError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}
