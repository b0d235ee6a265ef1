//! Windshield Crack - procedural windshield fracture simulation
//!
//! Core modules:
//! - `sim`: Frame-stepped fracture simulation (cracks, rings, rock, triggers, repair)
//! - `settings`: User-tunable stress and quality preferences
//! - `web`: wasm-bindgen host that drives the simulation from `requestAnimationFrame`

pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{QualityPreset, Settings};
pub use sim::{Action, FrameSnapshot, SimRng, Simulation};

use glam::Vec2;

/// Simulation tuning constants
pub mod consts {
    /// Maximum recorded impacts before new damage is refused
    pub const MAX_IMPACTS: u32 = 2;
    /// Default crack segment ceiling (Medium quality)
    pub const MAX_CRACK_SEGMENTS: usize = 3000;

    /// UI stress 0-100% maps onto 0-5% of the raw visual intensity
    pub const STRESS_SCALE: f32 = 0.05;
    /// Stress a fresh simulation starts with
    pub const DEFAULT_STRESS: f32 = 0.45;

    /// Impact flash lifetime (ms)
    pub const FLASH_DURATION_MS: f64 = 130.0;
    /// Door slam jolt lifetime (ms)
    pub const DOOR_SLAM_DURATION_MS: f64 = 400.0;
    /// Repair fade-out duration (ms)
    pub const REPAIR_DURATION_MS: f64 = 900.0;
    /// Fully healed frame held after the wipe (ms)
    pub const REPAIR_HOLD_MS: f64 = 120.0;
    /// Peak door slam jolt amplitude (px)
    pub const DOOR_SLAM_AMPLITUDE: f32 = 10.0;

    /// Rock gravity (px per frame²)
    pub const ROCK_GRAVITY: f32 = 0.14;

    /// Rings below this alpha are dropped
    pub const RING_MIN_ALPHA: f32 = 0.01;
}

/// Unit direction vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Offset `origin` by `len` along `angle`
#[inline]
pub fn project(origin: Vec2, angle: f32, len: f32) -> Vec2 {
    origin + direction(angle) * len
}

/// Effective stress used by every growth formula
///
/// Both factors are clamped to `[0, 1]`.
#[inline]
pub fn effective_stress(stress: f32, scale: f32) -> f32 {
    stress.clamp(0.0, 1.0) * scale.clamp(0.0, 1.0)
}
