//! Static smoke point cloud.

use glam::Vec3;

use crate::config::SmokeConfig;
use crate::spawn::SpawnContext;

/// Smoke particles plus the look they are drawn with. Never updated after
/// generation.
#[derive(Debug, Clone)]
pub struct SmokeField {
    pub points: Vec<Vec3>,
    pub color: Vec3,
    pub size: f32,
    pub opacity: f32,
}

impl SmokeField {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Scatter `config.num_particles` points uniformly in the smoke box.
pub fn generate_smoke(config: &SmokeConfig, rng: &mut SpawnContext) -> SmokeField {
    let points = (0..config.num_particles)
        .map(|_| rng.random_in_box(config.spread, config.height_range.0, config.height_range.1))
        .collect();

    SmokeField {
        points,
        color: config.color,
        size: config.size,
        opacity: config.opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_bounds() {
        let config = SmokeConfig::default();
        let mut rng = SpawnContext::from_seed(12);
        let smoke = generate_smoke(&config, &mut rng);
        assert_eq!(smoke.len(), 250);
        for p in &smoke.points {
            assert!(p.x >= -55.0 && p.x < 55.0);
            assert!(p.z >= -55.0 && p.z < 55.0);
            assert!(p.y >= 1.0 && p.y < 13.0);
        }
    }

    #[test]
    fn test_reproducible_from_seed() {
        let config = SmokeConfig::default();
        let a = generate_smoke(&config, &mut SpawnContext::from_seed(99));
        let b = generate_smoke(&config, &mut SpawnContext::from_seed(99));
        assert_eq!(a.points, b.points);
    }

    #[test]
    fn test_empty_field() {
        let config = SmokeConfig {
            num_particles: 0,
            ..SmokeConfig::default()
        };
        let smoke = generate_smoke(&config, &mut SpawnContext::from_seed(1));
        assert!(smoke.is_empty());
    }
}
