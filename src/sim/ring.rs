//! Shockwave rings spawned on impact
//!
//! Purely cosmetic: rings grow and fade, then get compacted away.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::consts::RING_MIN_ALPHA;

/// An expanding, fading ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

impl Ring {
    pub fn new(center: Vec2, radius: f32, alpha: f32) -> Self {
        Self {
            center,
            radius,
            alpha,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.alpha > RING_MIN_ALPHA
    }
}

/// All live rings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RingField {
    rings: Vec<Ring>,
}

impl RingField {
    pub fn spawn(&mut self, ring: Ring) {
        self.rings.push(ring);
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn clear(&mut self) {
        self.rings.clear();
    }

    /// Grow and fade every ring, dropping the ones that faded out
    pub fn step(&mut self, rng: &mut impl RandomSource) {
        for ring in &mut self.rings {
            ring.radius += rng.range(0.28, 0.56);
            ring.alpha -= rng.range(0.006, 0.012);
        }
        self.rings.retain(Ring::is_visible);
    }
}
