//! Impacts and fracture ignition
//!
//! An impact only leaves a chip: a few short rays, some micro-scratches, a
//! ring and a flash. Ignition is what turns chips into spreading fracture.
//! It boosts every existing segment and fires a large burst from each
//! recorded impact point.

use glam::Vec2;
use std::f32::consts::TAU;

use super::crack::CrackSegment;
use super::ring::Ring;
use super::rng::RandomSource;
use super::state::{Flash, SimulationState};
use crate::consts::{FLASH_DURATION_MS, MAX_IMPACTS};

/// Record an impact at `pos`. No-op once the impact cap is reached.
///
/// Returns whether the impact was recorded.
pub fn record_impact(state: &mut SimulationState, pos: Vec2, rng: &mut impl RandomSource) -> bool {
    if state.impacts_capped() {
        return false;
    }

    let s = state.effective_stress();
    state.impact_points.push(pos);

    let power = 0.4 + s * 0.4;
    let rays = 4u32.saturating_add((s * 3.0).floor() as u32);
    let seed_len = rng.range(1.5, 3.5);
    let branch_chance = 0.005 + s * 0.01;

    state.rings.spawn(Ring::new(pos, rng.range(5.0, 8.0), 0.5));

    for i in 0..rays {
        let jitter = rng.signed() * 0.3;
        let angle = i as f32 / rays as f32 * TAU + jitter;
        let width = rng.range(0.7, 1.1);
        state.cracks.spawn(CrackSegment::ray(
            pos,
            angle,
            seed_len,
            0.6 + power,
            8u32.saturating_add((power * 10.0).floor() as u32),
            width,
            branch_chance,
        ));
    }

    let micro = 2u32.saturating_add((s * 3.0).floor() as u32);
    for _ in 0..micro {
        let angle = rng.angle();
        let speed = rng.range(0.45, 1.05);
        let life = 6 + rng.below(8);
        state
            .cracks
            .spawn(CrackSegment::seed(pos, angle, speed, life, 0.5, branch_chance));
    }

    state.flash = Some(Flash {
        pos,
        start: state.now,
        duration: FLASH_DURATION_MS,
    });
    state.impact_count = (state.impact_count + 1).min(MAX_IMPACTS);

    log::info!(
        "Impact {}/{} at ({:.1}, {:.1}), {} cracks on the glass",
        state.impact_count,
        MAX_IMPACTS,
        pos.x,
        pos.y,
        state.cracks.len()
    );
    true
}

/// Turn chip damage into full fracture. Idempotent.
///
/// Returns whether this call did the ignition.
pub fn ignite(state: &mut SimulationState, rng: &mut impl RandomSource) -> bool {
    if state.ignited {
        return false;
    }
    state.ignited = true;

    let s = state.effective_stress();

    let life_boost = 80u32.saturating_add((s * 120.0).floor() as u32);
    let min_branch = 0.08 + s * 0.12;
    let speed_boost = 1.08 + s * 0.42;
    for segment in state.cracks.segments_mut() {
        segment.life = segment.life.saturating_add(life_boost);
        segment.branch_chance = segment.branch_chance.max(min_branch);
        segment.speed *= speed_boost;
        segment.width = segment.width.max(0.9);
    }

    let impact_points = state.impact_points.clone();
    for p in impact_points {
        burst(state, p, s, rng);
    }

    log::info!(
        "Fracture ignited from {} impact(s), {} cracks now spreading",
        state.impact_points.len(),
        state.cracks.live_count()
    );
    true
}

/// Large radial burst plus shockwave ring at `p`
fn burst(state: &mut SimulationState, p: Vec2, s: f32, rng: &mut impl RandomSource) {
    let power = 0.9 + s * 1.1;
    let rays = 20u32.saturating_add((s * 30.0).floor() as u32);
    let base_len = rng.range(6.0, 12.0);

    state.rings.spawn(Ring::new(p, rng.range(10.0, 16.0), 0.55));

    for i in 0..rays {
        let jitter = rng.signed() * 0.25;
        let angle = i as f32 / rays as f32 * TAU + jitter;
        let width = rng.range(1.0, 1.6);
        state.cracks.spawn(CrackSegment::ray(
            p,
            angle,
            base_len,
            1.2 + power * 2.2,
            120u32.saturating_add((power * 180.0).floor() as u32),
            width,
            0.1 + s * 0.2,
        ));
    }
}
