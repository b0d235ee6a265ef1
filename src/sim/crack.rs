//! Crack segments and the growing/branching crack field
//!
//! Each segment is a polyline that grows from its tip one point per tick
//! until its life runs out or the next point would leave the glass. Live
//! segments occasionally fork a weaker child, so branching dies out over a
//! few generations on its own.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::GlassViewport;
use super::rng::RandomSource;
use crate::consts::MAX_CRACK_SEGMENTS;
use crate::{direction, project};

/// One crack polyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackSegment {
    /// Polyline, oldest point first
    pub points: Vec<Vec2>,
    /// Travel direction (radians)
    pub dir: f32,
    /// Base step length (px per tick)
    pub speed: f32,
    /// Remaining growth steps
    pub life: u32,
    /// Stroke width (px)
    pub width: f32,
    /// Per-step probability of forking a child
    pub branch_chance: f32,
    /// Stopped by the glass edge; never grows again
    #[serde(default)]
    pub edge_stopped: bool,
}

impl CrackSegment {
    /// Segment that starts as a single point at `origin`
    pub fn seed(origin: Vec2, dir: f32, speed: f32, life: u32, width: f32, branch_chance: f32) -> Self {
        Self {
            points: vec![origin],
            dir,
            speed,
            life,
            width,
            branch_chance,
            edge_stopped: false,
        }
    }

    /// Segment that already has a first leg of `len` px along `dir`
    pub fn ray(
        origin: Vec2,
        dir: f32,
        len: f32,
        speed: f32,
        life: u32,
        width: f32,
        branch_chance: f32,
    ) -> Self {
        let mut seg = Self::seed(origin, dir, speed, life, width, branch_chance);
        seg.points.push(project(origin, dir, len));
        seg
    }

    /// Still growing
    #[inline]
    pub fn is_live(&self) -> bool {
        self.life > 0 && !self.edge_stopped
    }

    /// Has enough points to draw a line
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Current growth tip
    pub fn tip(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    /// Life-derived opacity factor in `[0.18, 1]` while growing, 0 once frozen
    pub fn fade(&self) -> f32 {
        if self.is_live() {
            (self.life as f32 / 100.0).clamp(0.18, 1.0)
        } else {
            0.0
        }
    }

    /// Width of the dark crack stroke
    pub fn stroke_width(&self) -> f32 {
        if self.is_live() {
            (self.width * (0.55 + 0.45 * self.fade())).max(0.35)
        } else {
            (self.width * 0.4).max(0.33)
        }
    }

    /// Width of the offset highlight stroke
    pub fn highlight_width(&self) -> f32 {
        if self.is_live() {
            (self.width * 0.45 * self.fade()).max(0.25)
        } else {
            (self.width * 0.22).max(0.22)
        }
    }

    /// Advance one tick. Returns a forked child when the segment branches.
    ///
    /// `can_branch` is false once the field is full; the branch roll is
    /// still drawn so variate consumption does not depend on field size.
    fn step(
        &mut self,
        viewport: &GlassViewport,
        stress: f32,
        can_branch: bool,
        rng: &mut impl RandomSource,
    ) -> Option<CrackSegment> {
        if !self.is_live() {
            return None;
        }
        let last = self.tip()?;

        self.dir += rng.signed() * (0.10 + stress * 0.14);
        let step_speed = self.speed * rng.range(0.92, 1.06);
        let next = last + direction(self.dir) * step_speed;

        if !viewport.contains(next) {
            self.life = 0;
            self.edge_stopped = true;
            return None;
        }

        self.points.push(next);
        self.life -= 1;

        if !(rng.chance(self.branch_chance) && can_branch) {
            return None;
        }

        let side = if rng.chance(0.5) { -1.0 } else { 1.0 };
        let child_dir = self.dir + side * rng.range(0.25, 0.61);
        let origin = self.points[self.points.len().saturating_sub(2)];
        let speed = (self.speed * rng.range(0.7, 1.1)).max(0.6);
        let life = ((self.life as f32 * rng.range(0.25, 0.70)).floor() as u32).max(8);
        let width = (self.width * 0.6).max(0.5);
        let branch_chance = self.branch_chance * rng.range(0.6, 1.0);

        Some(CrackSegment::seed(origin, child_dir, speed, life, width, branch_chance))
    }
}

/// All crack segments of the simulation
///
/// Append-only until `clear`: frozen segments stay for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackField {
    segments: Vec<CrackSegment>,
    max_segments: usize,
}

impl Default for CrackField {
    fn default() -> Self {
        Self::new(MAX_CRACK_SEGMENTS)
    }
}

impl CrackField {
    pub fn new(max_segments: usize) -> Self {
        Self {
            segments: Vec::new(),
            max_segments,
        }
    }

    /// Add a segment. Dropped silently once the field is full.
    pub fn spawn(&mut self, segment: CrackSegment) -> bool {
        if self.segments.len() >= self.max_segments {
            return false;
        }
        self.segments.push(segment);
        true
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn max_segments(&self) -> usize {
        self.max_segments
    }

    /// Change the ceiling. Existing segments beyond it are kept; only new
    /// spawns are refused.
    pub fn set_max_segments(&mut self, max_segments: usize) {
        self.max_segments = max_segments;
    }

    pub fn segments(&self) -> &[CrackSegment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [CrackSegment] {
        &mut self.segments
    }

    /// Segments still growing
    pub fn live_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_live()).count()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Grow every live segment by one point and collect forked children
    pub fn step(&mut self, viewport: &GlassViewport, stress: f32, rng: &mut impl RandomSource) {
        let mut children: Vec<CrackSegment> = Vec::new();
        let base = self.segments.len();

        for segment in &mut self.segments {
            let can_branch = base + children.len() < self.max_segments;
            if let Some(child) = segment.step(viewport, stress, can_branch, rng) {
                children.push(child);
            }
        }

        self.segments.extend(children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{SequenceRng, SimRng};

    fn viewport() -> GlassViewport {
        GlassViewport::from_surface(800.0, 420.0)
    }

    #[test]
    fn test_ray_has_two_points() {
        let seg = CrackSegment::ray(Vec2::new(100.0, 100.0), 0.0, 5.0, 1.0, 10, 1.0, 0.0);
        assert_eq!(seg.points.len(), 2);
        assert!((seg.points[1] - Vec2::new(105.0, 100.0)).length() < 1e-4);
        assert!(seg.is_renderable());
    }

    #[test]
    fn test_step_appends_and_decrements() {
        let vp = viewport();
        let mut field = CrackField::default();
        field.spawn(CrackSegment::seed(vp.center, 0.0, 1.0, 3, 1.0, 0.0));

        // 0.5 gives zero turn and 0.99 step speed
        let mut rng = SequenceRng::constant(0.5);
        field.step(&vp, 0.0, &mut rng);

        let seg = &field.segments()[0];
        assert_eq!(seg.points.len(), 2);
        assert_eq!(seg.life, 2);
        assert!((seg.points[1].x - (vp.center.x + 0.99)).abs() < 1e-3);
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_life_runs_out_and_freezes() {
        let vp = viewport();
        let mut field = CrackField::default();
        field.spawn(CrackSegment::seed(vp.center, 0.0, 1.0, 2, 1.0, 0.0));
        let mut rng = SequenceRng::constant(0.5);
        for _ in 0..5 {
            field.step(&vp, 0.0, &mut rng);
        }
        let seg = &field.segments()[0];
        assert_eq!(seg.life, 0);
        assert_eq!(seg.points.len(), 3);
        assert!(!seg.edge_stopped);
        assert_eq!(field.live_count(), 0);
    }

    #[test]
    fn test_edge_stops_segment() {
        let vp = viewport();
        let start = Vec2::new(vp.right() - 0.5, vp.center.y);
        let mut field = CrackField::default();
        field.spawn(CrackSegment::seed(start, 0.0, 5.0, 50, 1.0, 0.0));

        let mut rng = SequenceRng::constant(0.5);
        field.step(&vp, 0.0, &mut rng);
        let seg = &field.segments()[0];
        assert_eq!(seg.life, 0);
        assert!(seg.edge_stopped);
        assert_eq!(seg.points.len(), 1);

        // Even with life restored, an edge-stopped segment never grows again
        field.segments_mut()[0].life = 40;
        field.step(&vp, 0.0, &mut rng);
        assert_eq!(field.segments()[0].points.len(), 1);
    }

    #[test]
    fn test_branch_spawns_weaker_child() {
        let vp = viewport();
        let mut field = CrackField::default();
        field.spawn(CrackSegment::ray(vp.center, 0.0, 2.0, 2.0, 40, 1.0, 1.0));

        let mut rng = SequenceRng::constant(0.5);
        field.step(&vp, 0.0, &mut rng);
        assert_eq!(field.len(), 2);

        let parent = &field.segments()[0];
        let child = &field.segments()[1];
        // Child starts at the parent's previous tip
        assert_eq!(child.points, vec![parent.points[parent.points.len() - 2]]);
        assert!(child.width < parent.width);
        assert!(child.branch_chance < parent.branch_chance);
        assert!(child.branch_chance > 0.0);
        assert!(child.life < parent.life);
        assert!((child.dir - parent.dir).abs() >= 0.25);
    }

    #[test]
    fn test_children_not_stepped_in_same_tick() {
        let vp = viewport();
        let mut field = CrackField::default();
        field.spawn(CrackSegment::ray(vp.center, 0.0, 2.0, 2.0, 40, 1.0, 1.0));
        let mut rng = SequenceRng::constant(0.5);
        field.step(&vp, 0.0, &mut rng);
        assert_eq!(field.segments()[1].points.len(), 1);
    }

    #[test]
    fn test_cap_blocks_spawn_and_branching() {
        let vp = viewport();
        let mut field = CrackField::new(3);
        for _ in 0..3 {
            assert!(field.spawn(CrackSegment::ray(vp.center, 0.0, 1.0, 1.0, 30, 1.0, 1.0)));
        }
        assert!(!field.spawn(CrackSegment::seed(vp.center, 0.0, 1.0, 5, 1.0, 0.0)));

        let mut rng = SimRng::seeded(3);
        for _ in 0..20 {
            field.step(&vp, 0.05, &mut rng);
            assert!(field.len() <= 3);
        }
    }

    #[test]
    fn test_frozen_segments_untouched_by_step() {
        let vp = viewport();
        let mut field = CrackField::default();
        let frozen = CrackSegment::ray(vp.center, 1.0, 3.0, 1.0, 0, 1.0, 1.0);
        field.spawn(frozen.clone());
        let mut rng = SimRng::seeded(11);
        field.step(&vp, 0.05, &mut rng);
        assert_eq!(field.segments()[0], frozen);
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_render_widths() {
        let mut seg = CrackSegment::ray(Vec2::ZERO, 0.0, 1.0, 1.0, 200, 1.0, 0.0);
        assert_eq!(seg.fade(), 1.0);
        assert!((seg.stroke_width() - 1.0).abs() < 1e-6);
        assert!((seg.highlight_width() - 0.45).abs() < 1e-6);

        seg.life = 5;
        assert!((seg.fade() - 0.18).abs() < 1e-6);

        seg.life = 0;
        assert_eq!(seg.fade(), 0.0);
        assert!((seg.stroke_width() - 0.4).abs() < 1e-6);
        assert!((seg.highlight_width() - 0.22).abs() < 1e-6);
    }
}
