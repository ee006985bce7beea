//! Integration tests for scene generation and animation.
//!
//! These exercise the public API the way the viewer does, without a window
//! or a GPU.

use std::time::Duration;

use glam::Vec3;
use nocturne::prelude::*;
use nocturne::{
    generate_smoke, place_columns, ColumnConfig, ConfigError, IntroEvent, IntroSequence, SmokeConfig,
    FADE_DURATION, TRAIL_MAX_POINTS,
};

// ============================================================================
// Column placement
// ============================================================================

fn assert_layout_invariants(config: &ColumnConfig, seed: u64) {
    let mut rng = SpawnContext::from_seed(seed);
    let layout = place_columns(config, &mut rng);

    assert!(layout.len() <= config.num_columns);
    assert_eq!(layout.len() + layout.skipped.len(), config.num_columns);

    let footprints: Vec<_> = layout.footprints().copied().collect();
    for (i, a) in footprints.iter().enumerate() {
        assert!(
            a.distance_from_origin() + a.radius <= config.spread_radius + 1e-4,
            "column {} leaves the disk",
            i
        );
        for b in &footprints[i + 1..] {
            assert!(
                a.distance_to(b) >= config.min_distance - 1e-4,
                "columns closer than {}",
                config.min_distance
            );
        }
    }
}

#[test]
fn test_default_layout_invariants() {
    for seed in 0..20 {
        assert_layout_invariants(&ColumnConfig::default(), seed);
    }
}

#[test]
fn test_crowded_layout_invariants() {
    let config = ColumnConfig {
        num_columns: 150,
        spread_radius: 12.0,
        max_placement_attempts: 30,
        ..ColumnConfig::default()
    };
    for seed in 0..5 {
        assert_layout_invariants(&config, seed);
    }
}

#[test]
fn test_zero_min_distance_places_everything() {
    let config = ColumnConfig {
        num_columns: 100,
        min_distance: 0.0,
        ..ColumnConfig::default()
    };
    let layout = place_columns(&config, &mut SpawnContext::from_seed(77));
    assert_eq!(layout.len(), 100);
    assert!(layout.skipped.is_empty());
}

#[test]
fn test_zero_width_ranges_use_lower_bound() {
    let config = ColumnConfig {
        num_columns: 5,
        height_range: (4.0, 4.0),
        size_range: (2.0, 2.0),
        ..ColumnConfig::default()
    };
    let layout = place_columns(&config, &mut SpawnContext::from_seed(1));
    for column in &layout.columns {
        assert_eq!(column.height, 4.0);
        assert_eq!(column.size, 2.0);
    }
}

#[test]
fn test_same_seed_same_scene() {
    let a = Scene::new(SceneConfig::default().with_seed(1234), 1.0).expect("valid scene");
    let b = Scene::new(SceneConfig::default().with_seed(1234), 1.0).expect("valid scene");

    let fa: Vec<_> = a.columns.footprints().copied().collect();
    let fb: Vec<_> = b.columns.footprints().copied().collect();
    assert_eq!(fa, fb);
    assert_eq!(a.smoke.points, b.smoke.points);
}

#[test]
fn test_different_seeds_differ() {
    let a = Scene::new(SceneConfig::default().with_seed(1), 1.0).expect("valid scene");
    let b = Scene::new(SceneConfig::default().with_seed(2), 1.0).expect("valid scene");
    assert_ne!(a.smoke.points, b.smoke.points);
}

// ============================================================================
// Smoke
// ============================================================================

#[test]
fn test_smoke_box_follows_spread() {
    let config = SmokeConfig {
        num_particles: 500,
        spread: 20.0,
        ..SmokeConfig::default()
    };
    let smoke = generate_smoke(&config, &mut SpawnContext::from_seed(9));
    assert_eq!(smoke.len(), 500);
    assert!(smoke
        .points
        .iter()
        .all(|p| p.x.abs() <= 20.0 && p.z.abs() <= 20.0 && p.y >= 1.0 && p.y < 13.0));
}

// ============================================================================
// Trails and stepping
// ============================================================================

#[test]
fn test_trail_lengths_after_many_frames() {
    let mut scene = Scene::new(SceneConfig::default().with_seed(5), 1.0).expect("valid scene");
    let mut time = Time::fixed(1.0 / 60.0);
    for k in 1..=400u64 {
        let (elapsed, delta) = time.update();
        scene.step(delta, elapsed);
        for trail in &scene.trails {
            assert_eq!(trail.len(), (k as usize).min(TRAIL_MAX_POINTS));
        }
    }
    assert_eq!(scene.frame(), 400);
}

#[test]
fn test_visible_trail_is_fade_window() {
    let mut scene = Scene::new(SceneConfig::default().with_seed(5), 1.0).expect("valid scene");
    let mut time = Time::fixed(0.05);
    for _ in 0..100 {
        let (elapsed, delta) = time.update();
        scene.step(delta, elapsed);
    }
    for trail in &scene.trails {
        let ages: Vec<f32> = trail.ages().collect();
        let expected = ages.iter().take_while(|&&a| a < FADE_DURATION).count();
        assert_eq!(trail.visible_len(), expected);
        // Ages grow towards the tail
        assert!(ages.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_trail_fades_from_head_to_tail_color() {
    let mut scene = Scene::new(SceneConfig::default().with_seed(5), 1.0).expect("valid scene");
    let mut time = Time::fixed(0.1);
    for _ in 0..30 {
        let (elapsed, delta) = time.update();
        scene.step(delta, elapsed);
    }
    for trail in &scene.trails {
        let head = trail.source().head_color();
        let tail = trail.source().tail_color();
        let visible = trail.visible_points();
        assert_eq!(Vec3::from(visible[0].color), head);

        let last = Vec3::from(visible[visible.len() - 1].color);
        assert!(last.distance(tail) < head.distance(tail) + 1e-6);
    }
}

#[test]
fn test_camera_stays_on_path() {
    let mut scene = Scene::new(SceneConfig::default().with_seed(5), 1.0).expect("valid scene");
    let mut time = Time::fixed(0.5);
    for _ in 0..200 {
        let (elapsed, delta) = time.update();
        scene.step(delta, elapsed);
        let p = scene.camera.position();
        assert!((p.y - 60.0).abs() < 1e-5);
        assert!((Vec3::new(p.x, 0.0, p.z).length() - 10.0).abs() < 1e-3);
    }
}

#[test]
fn test_custom_lights() {
    let lights = vec![nocturne::default_light_sources()[2].clone()];
    let scene = Scene::new(SceneConfig::default().with_seed(1).with_lights(lights), 1.0)
        .expect("valid scene");
    assert_eq!(scene.trails.len(), 1);
}

// ============================================================================
// Intro
// ============================================================================

#[test]
fn test_intro_with_frame_clock() {
    let mut intro = IntroSequence::new("Nocturne");
    let mut time = Time::fixed(1.0 / 30.0);
    let mut seen = Vec::new();
    for _ in 0..300 {
        time.update();
        seen.extend(intro.advance(time.elapsed_duration()));
    }
    assert_eq!(seen.len(), 5);
    assert_eq!(seen.first(), Some(&IntroEvent::FadeOutOverlay));
    assert_eq!(seen.last(), Some(&IntroEvent::Finish));
    assert_eq!(intro.overlay_opacity(), 0.0);
}

#[test]
fn test_intro_stalled_frames() {
    let mut intro = IntroSequence::new("Nocturne");
    assert!(intro.advance(Duration::from_millis(200)).is_empty());
    // One huge frame skips straight past the end
    let events = intro.advance(Duration::from_secs(30));
    assert_eq!(events.len(), 5);
    assert!(intro.is_finished());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_round_trip() {
    let config = SceneConfig::default()
        .with_seed(99)
        .with_column_count(42)
        .with_spread_radius(40.0);
    let json = config.to_json().expect("serializes");

    let path = std::env::temp_dir().join(format!("nocturne-config-{}.json", std::process::id()));
    std::fs::write(&path, json).expect("write temp config");
    let loaded = SceneConfig::from_json_file(&path).expect("loads");
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, config);
}

#[test]
fn test_missing_config_file() {
    let err = SceneConfig::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_config_rejects_invalid_values() {
    let err = SceneConfig::from_json_str(r#"{ "columns": { "spread_radius": -3.0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
