//! Read-only per-frame view handed to the renderer
//!
//! The snapshot borrows the simulation state, so the renderer cannot mutate
//! anything and the borrow ends before the next tick.

use glam::Vec2;
use serde::Serialize;

use super::geometry::GlassViewport;
use super::ring::Ring;
use super::state::SimulationState;
use super::triggers::TriggerOffsets;
use crate::consts::{MAX_IMPACTS, RING_MIN_ALPHA};
use crate::settings::Settings;

/// Curve samples per rounded corner of the glass outline
const OUTLINE_CORNER_SAMPLES: usize = 6;

/// One drawable crack polyline
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CrackView<'a> {
    pub points: &'a [Vec2],
    /// Dark stroke width
    pub stroke_width: f32,
    /// Offset highlight stroke width
    pub highlight_width: f32,
    /// Life-derived fade (0 once frozen)
    pub fade: f32,
    pub live: bool,
}

/// Impact flash with its remaining intensity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlashView {
    pub pos: Vec2,
    /// 1 at impact, falling to 0
    pub intensity: f32,
}

/// Rock sprite placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RockView {
    pub pos: Vec2,
    pub rotation: f32,
    pub radius: f32,
}

/// Temperature-swing rim aura
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AuraView {
    /// Gradient rotation (radians)
    pub rotation: f32,
    /// Translation of the rim stroke (px)
    pub wobble: Vec2,
    /// Stroke width (px)
    pub width: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    /// Frame time (ms)
    pub time: f64,
    pub surface: Vec2,
    pub viewport: GlassViewport,
    /// Bent glass outline, closed implicitly
    pub outline: Vec<Vec2>,
    /// Renderable cracks only (two points or more)
    pub cracks: Vec<CrackView<'a>>,
    pub rings: &'a [Ring],
    pub flash: Option<FlashView>,
    pub rock: Option<RockView>,
    pub offsets: TriggerOffsets,
    pub aura: Option<AuraView>,
    /// Repair fade (0 = damage fully visible)
    pub healing: f32,
    pub impacts: u32,
    pub max_impacts: u32,
    pub ignited: bool,
    pub running: bool,
    pub road_shock: bool,
    pub temp_swing: bool,
    pub door_slam: bool,
}

impl<'a> FrameSnapshot<'a> {
    /// Capture the state as of its latest tick
    pub fn capture(state: &'a SimulationState, running: bool, settings: &Settings) -> Self {
        let now = state.now;
        let viewport = state.viewport();

        let cracks = state
            .cracks
            .segments()
            .iter()
            .filter(|c| c.is_renderable())
            .map(|c| CrackView {
                points: &c.points,
                stroke_width: c.stroke_width(),
                highlight_width: c.highlight_width(),
                fade: c.fade(),
                live: c.is_live(),
            })
            .collect();

        let flash = state.flash.and_then(|f| {
            f.remaining(now).map(|intensity| FlashView {
                pos: f.pos,
                intensity,
            })
        });

        let rock = (state.rock.alive && settings.show_rock).then(|| RockView {
            pos: state.rock.pos,
            rotation: state.rock.rotation,
            radius: state.rock.radius,
        });

        let mut aura = state
            .triggers
            .aura(now, state.effective_stress(), &viewport);
        if settings.reduced_motion {
            if let Some(a) = aura.as_mut() {
                a.wobble = Vec2::ZERO;
            }
        }
        let offsets = settings.effective_offsets(state.offsets);

        Self {
            time: now,
            surface: state.surface,
            viewport,
            outline: viewport.outline(OUTLINE_CORNER_SAMPLES),
            cracks,
            rings: state.rings.rings(),
            flash,
            rock,
            offsets,
            aura,
            healing: state.healing,
            impacts: state.impact_count,
            max_impacts: MAX_IMPACTS,
            ignited: state.ignited,
            running,
            road_shock: state.triggers.road_shock.active,
            temp_swing: state.triggers.temp_swing.active,
            door_slam: state.triggers.door_slam.active,
        }
    }

    /// Opacity multiplier for all damage while repairing
    pub fn damage_alpha(&self) -> f32 {
        1.0 - self.healing
    }

    /// Rings still visible after the repair fade
    pub fn visible_rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        let alpha = self.damage_alpha();
        self.rings
            .iter()
            .filter(move |r| r.alpha * alpha > RING_MIN_ALPHA)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::impact::record_impact;
    use crate::sim::rng::SimRng;

    #[test]
    fn test_empty_snapshot() {
        let state = SimulationState::new(Vec2::new(800.0, 420.0), 0.45);
        let snap = FrameSnapshot::capture(&state, true, &Settings::default());
        assert!(snap.cracks.is_empty());
        assert!(snap.rings.is_empty());
        assert!(snap.flash.is_none());
        assert!(snap.rock.is_none());
        assert!(snap.aura.is_none());
        assert_eq!(snap.max_impacts, MAX_IMPACTS);
        assert_eq!(snap.damage_alpha(), 1.0);
    }

    #[test]
    fn test_snapshot_after_impact() {
        let mut state = SimulationState::new(Vec2::new(800.0, 420.0), 0.45);
        let mut rng = SimRng::seeded(12);
        state.now = 40.0;
        record_impact(&mut state, Vec2::new(200.0, 150.0), &mut rng);

        let snap = FrameSnapshot::capture(&state, true, &Settings::default());
        // Micro-scratches have a single point and are not drawn yet
        assert_eq!(snap.cracks.len(), 4);
        assert!(snap.cracks.iter().all(|c| c.live && c.points.len() >= 2));
        assert_eq!(snap.rings.len(), 1);
        assert_eq!(snap.flash.map(|f| f.intensity), Some(1.0));
        assert_eq!(snap.impacts, 1);
    }

    #[test]
    fn test_reduced_motion_drops_offsets() {
        let mut state = SimulationState::new(Vec2::new(800.0, 420.0), 0.45);
        state.offsets.shake = Vec2::new(3.0, -2.0);
        state.triggers.toggle_temp_swing(0.0);
        state.now = 700.0;

        let normal = FrameSnapshot::capture(&state, true, &Settings::default());
        assert_eq!(normal.offsets.shake, Vec2::new(3.0, -2.0));

        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let calm = FrameSnapshot::capture(&state, true, &settings);
        assert_eq!(calm.offsets.shake, Vec2::ZERO);
        assert_eq!(calm.aura.map(|a| a.wobble), Some(Vec2::ZERO));
    }

    #[test]
    fn test_outline_follows_viewport() {
        let state = SimulationState::new(Vec2::new(800.0, 420.0), 0.45);
        let snap = FrameSnapshot::capture(&state, true, &Settings::default());
        assert_eq!(snap.outline, snap.viewport.outline(OUTLINE_CORNER_SAMPLES));
        assert!(!snap.outline.is_empty());
    }

    #[test]
    fn test_visible_rings_fade_with_repair() {
        let mut state = SimulationState::new(Vec2::new(800.0, 420.0), 0.45);
        state.rings.spawn(Ring::new(Vec2::new(300.0, 200.0), 8.0, 0.5));
        state.rings.spawn(Ring::new(Vec2::new(350.0, 200.0), 8.0, 0.015));

        let snap = FrameSnapshot::capture(&state, true, &Settings::default());
        assert_eq!(snap.visible_rings().count(), 2);

        state.healing = 0.5;
        let snap = FrameSnapshot::capture(&state, true, &Settings::default());
        assert_eq!(snap.visible_rings().count(), 1);

        state.healing = 1.0;
        let snap = FrameSnapshot::capture(&state, true, &Settings::default());
        assert_eq!(snap.visible_rings().count(), 0);
        assert_eq!(snap.rings.len(), 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = SimulationState::new(Vec2::new(800.0, 420.0), 0.45);
        let mut rng = SimRng::seeded(13);
        record_impact(&mut state, Vec2::new(300.0, 200.0), &mut rng);
        let json = FrameSnapshot::capture(&state, false, &Settings::default())
            .to_json()
            .expect("snapshot json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["impacts"], 1);
        assert_eq!(value["running"], false);
        assert_eq!(value["cracks"].as_array().map(|a| a.len()), Some(4));
        assert!(value["outline"].as_array().is_some_and(|a| !a.is_empty()));
    }
}
