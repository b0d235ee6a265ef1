//! Simulation state and core damage types
//!
//! Everything the renderer may look at lives in `SimulationState`. The
//! scheduler is its only writer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::crack::CrackField;
use super::geometry::GlassViewport;
use super::repair::RepairController;
use super::ring::RingField;
use super::rock::Rock;
use super::triggers::{EnvTriggers, TriggerOffsets};
use crate::consts::{MAX_CRACK_SEGMENTS, MAX_IMPACTS, STRESS_SCALE};
use crate::effective_stress;

/// Transient highlight at the latest impact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub pos: Vec2,
    /// Impact time (ms)
    pub start: f64,
    /// Lifetime (ms)
    pub duration: f64,
}

impl Flash {
    /// Remaining intensity in `(0, 1]`, or `None` once burnt out
    pub fn remaining(&self, now: f64) -> Option<f32> {
        let elapsed = now - self.start;
        if elapsed > self.duration {
            return None;
        }
        let k = 1.0 - (elapsed.max(0.0) / self.duration) as f32;
        (k > 0.0).then_some(k)
    }
}

/// Complete simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Crack segments (frozen ones included)
    pub cracks: CrackField,
    /// Shockwave rings
    pub rings: RingField,
    /// Latest impact highlight
    pub flash: Option<Flash>,
    /// The projectile (dead when `!rock.alive`)
    pub rock: Rock,
    /// Where impacts landed, for ignition bursts
    pub impact_points: Vec<Vec2>,
    /// Impacts so far (never above `MAX_IMPACTS`)
    pub impact_count: u32,
    /// Chip damage has turned into spreading fracture
    pub ignited: bool,
    /// Environmental stressors
    pub triggers: EnvTriggers,
    /// Render offsets computed on the last tick
    pub offsets: TriggerOffsets,
    /// UI stress in `[0, 1]`
    pub stress: f32,
    /// Maps UI stress onto effective growth stress
    pub stress_scale: f32,
    /// Repair fade in `[0, 1]` (0 = damage fully visible)
    pub healing: f32,
    pub repair: RepairController,
    /// Timestamp of the latest tick (ms)
    pub now: f64,
    /// Surface size (px)
    pub surface: Vec2,
}

impl SimulationState {
    /// Fresh, undamaged glass on a `surface`-sized area
    pub fn new(surface: Vec2, stress: f32) -> Self {
        Self {
            cracks: CrackField::new(MAX_CRACK_SEGMENTS),
            rings: RingField::default(),
            flash: None,
            rock: Rock::default(),
            impact_points: Vec::new(),
            impact_count: 0,
            ignited: false,
            triggers: EnvTriggers::default(),
            offsets: TriggerOffsets::default(),
            stress: stress.clamp(0.0, 1.0),
            stress_scale: STRESS_SCALE,
            healing: 0.0,
            repair: RepairController::default(),
            now: 0.0,
            surface,
        }
    }

    /// Glass for the current surface size
    pub fn viewport(&self) -> GlassViewport {
        GlassViewport::from_surface(self.surface.x, self.surface.y)
    }

    /// Stress fed into growth formulas
    pub fn effective_stress(&self) -> f32 {
        effective_stress(self.stress, self.stress_scale)
    }

    pub fn impacts_capped(&self) -> bool {
        self.impact_count >= MAX_IMPACTS
    }

    pub fn flash_live(&self) -> bool {
        self.flash.is_some_and(|f| f.remaining(self.now).is_some())
    }

    /// Wipe all damage back to the initial values.
    ///
    /// Stress, surface size, segment ceiling and the clock survive.
    pub fn reset(&mut self) {
        self.cracks.clear();
        self.rings.clear();
        self.flash = None;
        self.rock = Rock::default();
        self.impact_points.clear();
        self.impact_count = 0;
        self.ignited = false;
        self.triggers = EnvTriggers::default();
        self.offsets = TriggerOffsets::default();
        self.healing = 0.0;
        self.repair = RepairController::default();
    }

    /// No damage, no effects, nothing in flight
    pub fn is_pristine(&self) -> bool {
        self.cracks.is_empty()
            && self.rings.is_empty()
            && self.flash.is_none()
            && !self.rock.alive
            && self.impact_points.is_empty()
            && self.impact_count == 0
            && !self.ignited
            && !self.triggers.any_active()
            && self.healing == 0.0
            && !self.repair.in_progress()
    }
}
