//! Rock projectile physics
//!
//! A single rock drops in from above the surface toward a target on the
//! glass. Gravity bends its path, so it may strike the glass short of the
//! target; both count as an impact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::GlassViewport;
use super::rng::RandomSource;
use super::state::SimulationState;
use crate::consts::ROCK_GRAVITY;

/// Outcome of one rock step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RockEvent {
    /// Still travelling
    InFlight,
    /// Struck the glass at this point
    Impact(Vec2),
    /// Left the surface without touching the glass
    Miss,
}

/// The in-flight projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rock {
    pub alive: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Sprite rotation (radians)
    pub rotation: f32,
    /// Spin per tick (radians)
    pub angular_vel: f32,
    pub target: Vec2,
}

impl Default for Rock {
    fn default() -> Self {
        Self {
            alive: false,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: 6.0,
            rotation: 0.0,
            angular_vel: 0.12,
            target: Vec2::ZERO,
        }
    }
}

impl Rock {
    /// Throw the rock at `target` from just above a `surface`-sized area
    pub fn launch(&mut self, target: Vec2, surface: Vec2, rng: &mut impl RandomSource) {
        let start_x = (target.x + rng.signed() * 40.0).clamp(12.0, (surface.x - 12.0).max(12.0));
        let start_y = -48.0 - rng.next_unit() * 24.0;
        let start = Vec2::new(start_x, start_y);

        let delta = target - start;
        let dist = match delta.length() {
            d if d > 0.0 => d,
            _ => 1.0,
        };
        let travel_speed = rng.range(5.0, 8.5);
        let wobble = Vec2::new(rng.signed() * 0.4, rng.signed() * 0.25);

        self.alive = true;
        self.pos = start;
        self.vel = delta / dist * travel_speed + wobble;
        self.radius = rng.range(5.0, 12.0);
        self.rotation = rng.angle();
        self.angular_vel = rng.range(0.06, 0.24);
        self.target = target;
    }

    /// Integrate one tick. `None` when no rock is in flight.
    pub fn step(&mut self, viewport: &GlassViewport, surface: Vec2) -> Option<RockEvent> {
        if !self.alive {
            return None;
        }

        self.pos += self.vel;
        self.vel.y += ROCK_GRAVITY;
        self.rotation += self.angular_vel;

        let threshold = (self.radius * 0.9).max(6.0);
        if self.pos.distance(self.target) < threshold {
            self.alive = false;
            return Some(RockEvent::Impact(self.target));
        }

        // Missed the exact target but came down on the glass anyway
        let top_margin = viewport.top() + self.radius.max(viewport.height * 0.08);
        if self.pos.y > top_margin && viewport.contains(self.pos) {
            self.alive = false;
            return Some(RockEvent::Impact(self.pos));
        }

        if self.pos.x < -120.0 || self.pos.x > surface.x + 120.0 || self.pos.y > surface.y + 200.0 {
            self.alive = false;
            return Some(RockEvent::Miss);
        }

        Some(RockEvent::InFlight)
    }
}

/// Launch a rock at `target` unless damage is capped or a rock is already in flight
pub fn spawn_rock(state: &mut SimulationState, target: Vec2, rng: &mut impl RandomSource) -> bool {
    if state.impacts_capped() || state.rock.alive {
        return false;
    }
    let surface = state.surface;
    state.rock.launch(target, surface, rng);
    log::debug!(
        "Rock launched at ({:.1}, {:.1}) from ({:.1}, {:.1})",
        target.x,
        target.y,
        state.rock.pos.x,
        state.rock.pos.y
    );
    true
}
