//! Windshield glass geometry
//!
//! The glass is a rounded rectangle centred slightly above the middle of the
//! surface. Its outline is bent by a parabolic vertical offset to suggest
//! windshield curvature, but containment uses the flat bounding box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Samples along each straight top/bottom edge of the outline
const EDGE_SAMPLES: usize = 16;

/// Glass region derived from the surface size each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlassViewport {
    /// Centre of the glass
    pub center: Vec2,
    /// Full width (px)
    pub width: f32,
    /// Full height (px)
    pub height: f32,
    /// Corner radius (px, clamped to 12..=28)
    pub corner_radius: f32,
    /// Curvature factor for the bent outline
    pub bend: f32,
}

impl GlassViewport {
    /// Compute the glass for a `w` x `h` surface
    pub fn from_surface(w: f32, h: f32) -> Self {
        Self {
            center: Vec2::new(w * 0.5, h * 0.48),
            width: w * 0.82,
            height: h * 0.36,
            corner_radius: (h * 0.06).round().clamp(12.0, 28.0),
            bend: 0.12,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.height / 2.0
    }

    /// Is the point on the glass?
    ///
    /// Tests the un-bent box with inclusive edges. Cracks die on this
    /// boundary, so the curvature must not leak in here.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Vertical render offset of the bent outline at `x_local` (relative to centre)
    pub fn bend_offset(&self, x_local: f32) -> f32 {
        let half = self.width / 2.0;
        if half <= 0.0 {
            return 0.0;
        }
        -((x_local / half).powi(2)) * (self.height * self.bend)
    }

    /// Uniform point on the glass from two unit variates
    pub fn point_at(&self, u: f32, v: f32) -> Vec2 {
        Vec2::new(self.left() + u * self.width, self.top() + v * self.height)
    }

    /// Closed outline of the bent rounded rectangle (surface coordinates)
    ///
    /// The last point connects back to the first; it is not repeated.
    pub fn outline(&self, samples_per_corner: usize) -> Vec<Vec2> {
        let n = samples_per_corner.max(1);
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let r = self.corner_radius.min(hw).min(hh);

        let mut local = Vec::with_capacity(4 * n + 2 * EDGE_SAMPLES + 2);

        // Clockwise in screen space (y down), starting at the top-left tangent point
        push_line(&mut local, Vec2::new(-hw + r, -hh), Vec2::new(hw - r, -hh), EDGE_SAMPLES);
        push_quad(&mut local, Vec2::new(hw - r, -hh), Vec2::new(hw, -hh), Vec2::new(hw, -hh + r), n);
        push_line(&mut local, Vec2::new(hw, -hh + r), Vec2::new(hw, hh - r), 1);
        push_quad(&mut local, Vec2::new(hw, hh - r), Vec2::new(hw, hh), Vec2::new(hw - r, hh), n);
        push_line(&mut local, Vec2::new(hw - r, hh), Vec2::new(-hw + r, hh), EDGE_SAMPLES);
        push_quad(&mut local, Vec2::new(-hw + r, hh), Vec2::new(-hw, hh), Vec2::new(-hw, hh - r), n);
        push_line(&mut local, Vec2::new(-hw, hh - r), Vec2::new(-hw, -hh + r), 1);
        push_quad(&mut local, Vec2::new(-hw, -hh + r), Vec2::new(-hw, -hh), Vec2::new(-hw + r, -hh), n);

        local
            .into_iter()
            .map(|p| self.center + Vec2::new(p.x, p.y + self.bend_offset(p.x)))
            .collect()
    }
}

/// Points from `a` toward `b`, excluding `b`
fn push_line(out: &mut Vec<Vec2>, a: Vec2, b: Vec2, samples: usize) {
    for i in 0..samples {
        out.push(a.lerp(b, i as f32 / samples as f32));
    }
}

/// Quadratic Bézier points from `a` toward `b` around control `c`, excluding `b`
fn push_quad(out: &mut Vec<Vec2>, a: Vec2, c: Vec2, b: Vec2, samples: usize) {
    for i in 0..samples {
        let t = i as f32 / samples as f32;
        let u = 1.0 - t;
        out.push(a * (u * u) + c * (2.0 * u * t) + b * (t * t));
    }
}
