//! Fading light trails.
//!
//! Every light keeps a short history of where it has been, newest first,
//! together with how long ago each point was recorded. Points older than the
//! fade duration are no longer drawn, and the visible ones are colored from
//! the trail's head color (new) towards its tail color (old).
//!
//! Points are always recorded in time order, so ages never decrease along
//! the history. The visible part of a trail is therefore a prefix: the scan
//! stops at the first point that has faded out.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::collections::VecDeque;

use crate::color::lerp;
use crate::config::TrailConfig;
use crate::orbit::LightSource;

/// Maximum number of recorded points per trail.
pub const TRAIL_MAX_POINTS: usize = 150;

/// Seconds after which a recorded point is no longer drawn.
pub const FADE_DURATION: f32 = 1.5;

/// One vertex of a trail polyline, laid out for the line pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TrailVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Trail color for a point of the given age.
///
/// `life_ratio = max(0, 1 - age / fade_duration)`; the color moves from
/// `head` to `tail` as the ratio drops, reaching `tail` exactly at
/// `age = fade_duration`.
#[inline]
pub fn trail_color(head: Vec3, tail: Vec3, age: f32, fade_duration: f32) -> Vec3 {
    let life_ratio = (1.0 - age / fade_duration).max(0.0);
    lerp(head, tail, 1.0 - life_ratio)
}

/// Position history and derived visible polyline of one light.
#[derive(Debug, Clone)]
pub struct LightTrail {
    source: LightSource,
    head: Vec3,
    points: VecDeque<Vec3>,
    ages: VecDeque<f32>,
    visible: Vec<TrailVertex>,
    max_points: usize,
    fade_duration: f32,
    base_height: f32,
}

impl LightTrail {
    /// Empty trail following `source`.
    pub fn new(source: LightSource, config: &TrailConfig) -> Self {
        let max_points = config.max_points.max(1);
        Self {
            head: source.orbit.rest_position(config.base_light_height),
            source,
            points: VecDeque::with_capacity(max_points + 1),
            ages: VecDeque::with_capacity(max_points + 1),
            visible: Vec::with_capacity(max_points),
            max_points,
            fade_duration: config.fade_duration,
            base_height: config.base_light_height,
        }
    }

    /// Advance one frame: move the head along its orbit and record it.
    pub fn update(&mut self, delta: f32, elapsed: f32) {
        let head = self.source.orbit.position_at(elapsed, self.base_height);
        self.record(head, delta);
    }

    /// Record `position` as the new head after `delta` seconds.
    ///
    /// Existing points age by `delta`, the new point starts at age zero, the
    /// history is capped at the configured maximum and the visible polyline
    /// is rebuilt.
    pub fn record(&mut self, position: Vec3, delta: f32) {
        for age in self.ages.iter_mut() {
            *age += delta;
        }

        self.head = position;
        self.points.push_front(position);
        self.ages.push_front(0.0);
        self.points.truncate(self.max_points);
        self.ages.truncate(self.max_points);

        self.rebuild_visible();
    }

    fn rebuild_visible(&mut self) {
        let head_color = self.source.head_color();
        let tail_color = self.source.tail_color();

        self.visible.clear();
        for (point, &age) in self.points.iter().zip(self.ages.iter()) {
            if age >= self.fade_duration {
                break;
            }
            let color = trail_color(head_color, tail_color, age, self.fade_duration);
            self.visible.push(TrailVertex {
                position: point.to_array(),
                color: color.to_array(),
            });
        }
    }

    /// Current head position.
    #[inline]
    pub fn head(&self) -> Vec3 {
        self.head
    }

    pub fn source(&self) -> &LightSource {
        &self.source
    }

    /// Number of recorded points, visible or not.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Recorded points, newest first.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().copied()
    }

    /// Ages matching [`points`](Self::points), newest first.
    pub fn ages(&self) -> impl Iterator<Item = f32> + '_ {
        self.ages.iter().copied()
    }

    /// Points still inside the fade window, newest first, with their colors.
    pub fn visible_points(&self) -> &[TrailVertex] {
        &self.visible
    }

    /// How many points the renderer should draw.
    #[inline]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn fade_duration(&self) -> f32 {
        self.fade_duration
    }
}
