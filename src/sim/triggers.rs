//! Environmental stress triggers
//!
//! Road shock, temperature swing and door slam. Each one nudges the
//! windshield on screen; road shock also keeps seeding micro-cracks once the
//! glass has ignited. Turning any of them on ignites the fracture (handled by
//! the scheduler).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::crack::{CrackField, CrackSegment};
use super::geometry::GlassViewport;
use super::rng::RandomSource;
use super::snapshot::AuraView;
use crate::consts::{DOOR_SLAM_AMPLITUDE, DOOR_SLAM_DURATION_MS};

/// On/off flag plus the time it was switched on
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerState {
    pub active: bool,
    /// Activation time (ms)
    pub start: f64,
}

impl TriggerState {
    pub fn activate(&mut self, now: f64) {
        self.active = true;
        self.start = now;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Elapsed time since activation in milliseconds
    #[inline]
    pub fn elapsed_ms(&self, now: f64) -> f64 {
        (now - self.start).max(0.0)
    }

    /// Elapsed time since activation in seconds
    #[inline]
    pub fn elapsed_secs(&self, now: f64) -> f32 {
        (self.elapsed_ms(now) / 1000.0) as f32
    }
}

/// Windshield-local render offset produced by the triggers this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerOffsets {
    /// Camera-shake translation (px)
    pub shake: Vec2,
}

/// The three stressors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvTriggers {
    pub road_shock: TriggerState,
    pub temp_swing: TriggerState,
    pub door_slam: TriggerState,
    /// Last road-shock micro-crack (ms)
    last_road_micro: f64,
}

impl EnvTriggers {
    /// Flip road shock. Returns the new state.
    pub fn toggle_road_shock(&mut self, now: f64) -> bool {
        toggle(&mut self.road_shock, now)
    }

    /// Flip temperature swing. Returns the new state.
    pub fn toggle_temp_swing(&mut self, now: f64) -> bool {
        toggle(&mut self.temp_swing, now)
    }

    /// Start (or restart) the door slam jolt
    pub fn slam_door(&mut self, now: f64) {
        self.door_slam.activate(now);
    }

    pub fn any_active(&self) -> bool {
        self.road_shock.active || self.temp_swing.active || self.door_slam.active
    }

    /// Advance one tick: expire the door slam, seed road-shock micro-cracks
    /// and compute this frame's shake offset.
    pub fn update(
        &mut self,
        now: f64,
        stress: f32,
        ignited: bool,
        viewport: &GlassViewport,
        cracks: &mut CrackField,
        rng: &mut impl RandomSource,
    ) -> TriggerOffsets {
        let mut shake = Vec2::ZERO;

        if self.door_slam.active {
            let elapsed = self.door_slam.elapsed_ms(now);
            if elapsed < DOOR_SLAM_DURATION_MS {
                let progress = (elapsed / DOOR_SLAM_DURATION_MS) as f32;
                let amp = (1.0 - progress) * DOOR_SLAM_AMPLITUDE;
                shake.x += rng.signed() * amp;
                shake.y += rng.signed() * amp;
            } else {
                self.door_slam.deactivate();
                log::debug!("Door slam settled");
            }
        }

        if self.road_shock.active {
            let e = self.road_shock.elapsed_secs(now);
            let freq = 2.2 + stress * 2.0;
            let amp = 4.0 + stress * 8.0;
            shake.y += (e * freq * TAU).sin() * amp;

            let interval = 300.0 + (1.0 - stress as f64) * 800.0;
            if ignited && now - self.last_road_micro > interval {
                let origin = viewport.point_at(rng.next_unit(), rng.next_unit());
                let dir = rng.angle();
                let speed = rng.range(0.4, 1.0);
                let life = 6 + rng.below(8);
                cracks.spawn(CrackSegment::seed(origin, dir, speed, life, 0.4, 0.01 + stress * 0.02));
                self.last_road_micro = now;
            }
        }

        if self.temp_swing.active {
            let e = self.temp_swing.elapsed_secs(now);
            let freq = 0.35 + stress * 0.35;
            shake.x += (e * freq * TAU).sin() * (1.5 + stress * 2.5);
        }

        TriggerOffsets { shake }
    }

    /// Drifting rim aura while the temperature swing is on
    pub fn aura(&self, now: f64, stress: f32, viewport: &GlassViewport) -> Option<AuraView> {
        if !self.temp_swing.active {
            return None;
        }
        let e = self.temp_swing.elapsed_secs(now);
        let wobble = (e * (0.35 + stress * 0.35) * TAU).sin() * (1.0 + stress * 2.0);
        Some(AuraView {
            rotation: e * 0.35,
            wobble: Vec2::new(wobble, wobble * 0.6),
            width: (viewport.height * 0.06).floor().clamp(8.0, 14.0),
        })
    }
}

fn toggle(trigger: &mut TriggerState, now: f64) -> bool {
    if trigger.active {
        trigger.deactivate();
    } else {
        trigger.activate(now);
    }
    trigger.active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{SequenceRng, SimRng};

    fn viewport() -> GlassViewport {
        GlassViewport::from_surface(800.0, 420.0)
    }

    #[test]
    fn test_toggle_flips_and_stamps() {
        let mut t = EnvTriggers::default();
        assert!(t.toggle_road_shock(100.0));
        assert_eq!(t.road_shock.start, 100.0);
        assert!(!t.toggle_road_shock(200.0));
        assert!(t.toggle_temp_swing(300.0));
        assert!(t.any_active());
    }

    #[test]
    fn test_door_slam_expires() {
        let vp = viewport();
        let mut cracks = CrackField::default();
        let mut rng = SimRng::seeded(2);
        let mut t = EnvTriggers::default();
        t.slam_door(1000.0);

        let offsets = t.update(1100.0, 0.0225, false, &vp, &mut cracks, &mut rng);
        assert!(t.door_slam.active);
        assert!(offsets.shake.x.abs() <= DOOR_SLAM_AMPLITUDE / 2.0);

        t.update(1000.0 + DOOR_SLAM_DURATION_MS, 0.0225, false, &vp, &mut cracks, &mut rng);
        assert!(!t.door_slam.active);
    }

    #[test]
    fn test_road_shock_oscillates_vertically() {
        let vp = viewport();
        let mut cracks = CrackField::default();
        let mut rng = SequenceRng::constant(0.5);
        let mut t = EnvTriggers::default();
        t.toggle_road_shock(0.0);

        // Quarter period of 2.2 Hz at zero stress: peak amplitude 4
        let quarter_ms = 1000.0 / 2.2 / 4.0;
        let offsets = t.update(quarter_ms, 0.0, false, &vp, &mut cracks, &mut rng);
        assert!((offsets.shake.y - 4.0).abs() < 1e-3);
        assert_eq!(offsets.shake.x, 0.0);
        assert!(cracks.is_empty());
    }

    #[test]
    fn test_road_shock_seeds_micro_cracks_when_ignited() {
        let vp = viewport();
        let mut cracks = CrackField::default();
        let mut rng = SimRng::seeded(8);
        let mut t = EnvTriggers::default();
        t.toggle_road_shock(0.0);

        t.update(5000.0, 0.0, true, &vp, &mut cracks, &mut rng);
        assert_eq!(cracks.len(), 1);
        let seg = &cracks.segments()[0];
        assert!(vp.contains(seg.points[0]));
        assert_eq!(seg.width, 0.4);

        // Zero stress: next one only after 1100 ms
        t.update(5500.0, 0.0, true, &vp, &mut cracks, &mut rng);
        assert_eq!(cracks.len(), 1);
        t.update(6101.0, 0.0, true, &vp, &mut cracks, &mut rng);
        assert_eq!(cracks.len(), 2);
    }

    #[test]
    fn test_temp_swing_offsets_and_aura() {
        let vp = viewport();
        let mut cracks = CrackField::default();
        let mut rng = SequenceRng::constant(0.5);
        let mut t = EnvTriggers::default();
        assert!(t.aura(0.0, 0.0, &vp).is_none());

        t.toggle_temp_swing(0.0);
        let quarter_ms = 1000.0 / 0.35 / 4.0;
        let offsets = t.update(quarter_ms, 0.0, true, &vp, &mut cracks, &mut rng);
        assert!((offsets.shake.x - 1.5).abs() < 1e-3);
        assert_eq!(offsets.shake.y, 0.0);
        assert!(cracks.is_empty());

        let aura = t.aura(quarter_ms, 0.0, &vp).expect("aura while swinging");
        assert!((aura.wobble.x - 1.0).abs() < 1e-3);
        assert!((aura.wobble.y - 0.6).abs() < 1e-3);
        // floor(0.06 * 151.2) = 9
        assert_eq!(aura.width, 9.0);
    }
}
