//! Frame-paced simulation tick
//!
//! `Simulation` owns the state and is its only writer. The host calls `tick`
//! once per display refresh with the frame timestamp; user actions are plain
//! `&mut self` calls that land between ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::GlassViewport;
use super::impact::{ignite, record_impact};
use super::rng::{RandomSource, SimRng};
use super::rock::{RockEvent, spawn_rock};
use super::snapshot::FrameSnapshot;
use super::state::SimulationState;
use crate::settings::{QualityPreset, Settings};

/// Auto-spawn target slots, visited in rotation
const AUTO_TARGET_SLOTS: usize = 3;

/// Host action, as sent by a UI (JSON tagged by `type`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Immediate impact at a point on the glass
    PointerImpactAt { x: f32, y: f32 },
    /// Throw a rock at a point on the glass
    ThrowRockAt { x: f32, y: f32 },
    ToggleRoadShock,
    ToggleTempSwing,
    TriggerDoorSlam,
    Repair,
    Ignite,
    SetRunning { running: bool },
    SetStress { stress: f32 },
    Resize { width: f32, height: f32 },
}

/// The scheduler: state, random source, settings and the run flag
#[derive(Debug, Clone)]
pub struct Simulation<R: RandomSource = SimRng> {
    state: SimulationState,
    rng: R,
    settings: Settings,
    running: bool,
    spawn_index: usize,
}

impl Simulation<SimRng> {
    /// Unseeded simulation for a `width` x `height` surface
    pub fn new(width: f32, height: f32, settings: Settings) -> Self {
        Self::with_rng(width, height, settings, SimRng::from_entropy())
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Simulation driven by the given random source
    pub fn with_rng(width: f32, height: f32, settings: Settings, rng: R) -> Self {
        let mut state = SimulationState::new(surface_size(width, height), settings.clamped_stress());
        state.stress_scale = settings.clamped_stress_scale();
        state.cracks.set_max_segments(settings.max_segments());

        Self {
            state,
            rng,
            running: settings.auto_start,
            settings,
            spawn_index: 0,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn viewport(&self) -> GlassViewport {
        self.state.viewport()
    }

    /// Replace the settings. Stress and segment ceiling follow immediately.
    pub fn set_settings(&mut self, settings: Settings) {
        self.state.stress = settings.clamped_stress();
        self.state.stress_scale = settings.clamped_stress_scale();
        self.state.cracks.set_max_segments(settings.max_segments());
        self.settings = settings;
    }

    /// Switch the quality preset; the new segment ceiling applies to new spawns
    pub fn set_quality(&mut self, preset: QualityPreset) {
        self.settings.apply_preset(preset);
        self.state.cracks.set_max_segments(self.settings.max_segments());
        log::info!("Quality set to {}", preset.as_str());
    }

    /// Surface size changed (px). Existing damage keeps its coordinates.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.surface = surface_size(width, height);
    }

    pub fn set_stress(&mut self, stress: f32) {
        let stress = stress.clamp(0.0, 1.0);
        self.settings.stress = stress;
        self.state.stress = stress;
    }

    /// Pause or resume. Pausing freezes everything but a running repair.
    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            log::info!("Simulation {}", if running { "resumed" } else { "paused" });
        }
        self.running = running;
    }

    /// Impact right now at a point on the glass. Points off the glass are ignored.
    pub fn pointer_impact_at(&mut self, x: f32, y: f32) -> bool {
        let p = Vec2::new(x, y);
        if !self.viewport().contains(p) {
            return false;
        }
        record_impact(&mut self.state, p, &mut self.rng)
    }

    /// Throw a rock at a point on the glass. Points off the glass are ignored.
    pub fn throw_rock_at(&mut self, x: f32, y: f32) -> bool {
        let p = Vec2::new(x, y);
        if !self.viewport().contains(p) {
            return false;
        }
        self.spawn_rock(p)
    }

    /// Launch a rock at `target`. No-op when capped or a rock is in flight.
    pub fn spawn_rock(&mut self, target: Vec2) -> bool {
        spawn_rock(&mut self.state, target, &mut self.rng)
    }

    /// Escalate to full fracture. Idempotent.
    pub fn ignite(&mut self) -> bool {
        ignite(&mut self.state, &mut self.rng)
    }

    /// Flip road shock; switching it on ignites the fracture
    pub fn toggle_road_shock(&mut self) -> bool {
        let on = self.state.triggers.toggle_road_shock(self.state.now);
        log::info!("Road shock {}", if on { "on" } else { "off" });
        if on {
            self.ignite();
        }
        on
    }

    /// Flip temperature swing; switching it on ignites the fracture
    pub fn toggle_temp_swing(&mut self) -> bool {
        let on = self.state.triggers.toggle_temp_swing(self.state.now);
        log::info!("Temperature swing {}", if on { "on" } else { "off" });
        if on {
            self.ignite();
        }
        on
    }

    /// One-shot door slam jolt; ignites the fracture
    pub fn trigger_door_slam(&mut self) {
        self.state.triggers.slam_door(self.state.now);
        log::info!("Door slam");
        self.ignite();
    }

    /// Start healing; the state is wiped once the fade completes
    pub fn repair(&mut self) {
        self.state.repair.begin(self.state.now);
        self.state.healing = 0.0;
        log::info!("Repair started ({} cracks)", self.state.cracks.len());
    }

    /// Dispatch a host action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::PointerImpactAt { x, y } => {
                self.pointer_impact_at(x, y);
            }
            Action::ThrowRockAt { x, y } => {
                self.throw_rock_at(x, y);
            }
            Action::ToggleRoadShock => {
                self.toggle_road_shock();
            }
            Action::ToggleTempSwing => {
                self.toggle_temp_swing();
            }
            Action::TriggerDoorSlam => self.trigger_door_slam(),
            Action::Repair => self.repair(),
            Action::Ignite => {
                self.ignite();
            }
            Action::SetRunning { running } => self.set_running(running),
            Action::SetStress { stress } => self.set_stress(stress),
            Action::Resize { width, height } => self.resize(width, height),
        }
    }

    /// Advance one frame at timestamp `now` (ms)
    pub fn tick(&mut self, now: f64) {
        self.state.now = now;

        let (healing, wipe) = self.state.repair.advance(now);
        if wipe {
            let repair = self.state.repair;
            self.state.reset();
            self.state.repair = repair;
            self.spawn_index = 0;
            log::info!("Repair complete");
        }
        self.state.healing = healing;

        if !self.running {
            return;
        }

        let viewport = self.state.viewport();
        let s = self.state.effective_stress();

        if self.should_auto_spawn(s) {
            let target = self.next_auto_target(&viewport);
            self.spawn_rock(target);
        }

        match self.state.rock.step(&viewport, self.state.surface) {
            Some(RockEvent::Impact(p)) => {
                record_impact(&mut self.state, p, &mut self.rng);
            }
            Some(RockEvent::Miss) => log::debug!("Rock missed the glass"),
            Some(RockEvent::InFlight) | None => {}
        }

        self.state.cracks.step(&viewport, s, &mut self.rng);
        self.state.rings.step(&mut self.rng);

        let ignited = self.state.ignited;
        self.state.offsets = self.state.triggers.update(
            now,
            s,
            ignited,
            &viewport,
            &mut self.state.cracks,
            &mut self.rng,
        );

        if self.state.flash.is_some_and(|f| f.remaining(now).is_none()) {
            self.state.flash = None;
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot::capture(&self.state, self.running, &self.settings)
    }

    fn should_auto_spawn(&mut self, s: f32) -> bool {
        !self.state.impacts_capped()
            && !self.state.rock.alive
            && self.state.cracks.len() < self.settings.auto_spawn_segment_limit()
            && self.rng.chance(0.001 + s * 0.002)
    }

    /// Next rotating target around the glass centre
    fn next_auto_target(&mut self, viewport: &GlassViewport) -> Vec2 {
        let c = viewport.center;
        let (w, h) = (viewport.width, viewport.height);
        let rng = &mut self.rng;

        let target = match self.spawn_index % AUTO_TARGET_SLOTS {
            0 => Vec2::new(c.x + rng.signed() * w * 0.06, c.y + rng.signed() * h * 0.06),
            1 => Vec2::new(
                c.x - w * 0.34 + rng.signed() * w * 0.04,
                c.y + h * 0.26 + rng.next_unit() * h * 0.02,
            ),
            _ => Vec2::new(c.x + w * 0.34 + rng.signed() * w * 0.04, c.y + rng.signed() * h * 0.06),
        };
        self.spawn_index = (self.spawn_index + 1) % AUTO_TARGET_SLOTS;
        target
    }
}

/// Surfaces smaller than 2 px are treated as 2 px
fn surface_size(width: f32, height: f32) -> Vec2 {
    Vec2::new(width.max(2.0), height.max(2.0))
}
