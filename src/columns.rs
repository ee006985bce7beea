//! Procedural column placement.
//!
//! Columns are scattered over a disk by bounded rejection sampling: each
//! column draws a random size and position, and the candidate is discarded
//! when its center lies closer than `min_distance` to an already accepted
//! column. After `max_placement_attempts` failures the column is skipped and
//! the next one is tried, so a crowded disk yields fewer columns instead of
//! an endless loop.
//!
//! The overlap test compares centers against one constant threshold rather
//! than `radius_a + radius_b + clearance`, so two of the widest columns may
//! still come closer than intended at their edges.

use glam::Vec3;
use tracing::{debug, warn};

use crate::config::ColumnConfig;
use crate::mesh::Mesh;
use crate::spawn::SpawnContext;

/// Planar position and base half-width of a placed column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnFootprint {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
}

impl ColumnFootprint {
    #[inline]
    pub fn distance_squared_to(&self, x: f32, z: f32) -> f32 {
        let dx = x - self.x;
        let dz = z - self.z;
        dx * dx + dz * dz
    }

    /// Center-to-center distance.
    #[inline]
    pub fn distance_to(&self, other: &ColumnFootprint) -> f32 {
        self.distance_squared_to(other.x, other.z).sqrt()
    }

    #[inline]
    pub fn distance_from_origin(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }
}

/// An accepted column with its world-space mesh.
#[derive(Debug, Clone)]
pub struct Column {
    pub footprint: ColumnFootprint,
    /// Edge length of the square base.
    pub size: f32,
    pub height: f32,
    /// Attempts it took to place this column, starting at 1.
    pub attempts: u32,
    /// Box mesh with the vertical gradient, already moved into place.
    pub mesh: Mesh,
}

impl Column {
    /// Center of the box: the base rests on the ground plane.
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.footprint.x, self.height / 2.0, self.footprint.z)
    }
}

/// Outcome of one placement run.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    pub columns: Vec<Column>,
    /// Zero-based indices of the columns that could not be placed.
    pub skipped: Vec<usize>,
}

impl ColumnLayout {
    pub fn footprints(&self) -> impl Iterator<Item = &ColumnFootprint> + '_ {
        self.columns.iter().map(|c| &c.footprint)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// All column meshes merged into one buffer-ready mesh.
    pub fn merged_mesh(&self) -> Mesh {
        let mut merged = Mesh::default();
        for column in &self.columns {
            merged.append(&column.mesh);
        }
        merged
    }
}

/// True when `(x, z)` keeps at least `min_distance` from every placed center.
pub fn is_clear(placed: &[ColumnFootprint], x: f32, z: f32, min_distance: f32) -> bool {
    let min_distance_sq = min_distance * min_distance;
    placed
        .iter()
        .all(|p| p.distance_squared_to(x, z) >= min_distance_sq)
}

/// Place up to `config.num_columns` columns.
pub fn place_columns(config: &ColumnConfig, rng: &mut SpawnContext) -> ColumnLayout {
    let mut layout = ColumnLayout::default();
    let mut placed: Vec<ColumnFootprint> = Vec::with_capacity(config.num_columns);

    for index in 0..config.num_columns {
        match try_place(config, &placed, rng) {
            Some(column) => {
                placed.push(column.footprint);
                layout.columns.push(column);
            }
            None => {
                warn!(
                    column = index + 1,
                    attempts = config.max_placement_attempts,
                    "Failed to place column {} after {} attempts. The area may be too densely filled or min_distance too large.",
                    index + 1,
                    config.max_placement_attempts
                );
                layout.skipped.push(index);
            }
        }
    }

    debug!(
        placed = layout.columns.len(),
        skipped = layout.skipped.len(),
        "column placement finished"
    );
    layout
}

fn try_place(
    config: &ColumnConfig,
    placed: &[ColumnFootprint],
    rng: &mut SpawnContext,
) -> Option<Column> {
    for attempt in 1..=config.max_placement_attempts {
        let height = rng.random_range(config.height_range.0, config.height_range.1);
        let size = rng.random_range(config.size_range.0, config.size_range.1);
        let radius = size / 2.0;
        // Keep the outer edge inside the disk
        let (x, z) = rng.random_polar(config.spread_radius - radius);

        if !is_clear(placed, x, z, config.min_distance) {
            continue;
        }

        let footprint = ColumnFootprint { x, z, radius };
        let mesh = Mesh::cuboid(size, height, size, [1.0; 4])
            .with_vertical_gradient(config.bottom_color, config.top_color)
            .translated(Vec3::new(x, height / 2.0, z));

        return Some(Column {
            footprint,
            size,
            height,
            attempts: attempt,
            mesh,
        });
    }
    None
}
