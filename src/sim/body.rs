//! Positioned, boundary-bearing bodies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use crate::Rgb;

/// Default body colour (dark grey walls)
pub const DEFAULT_COLOR: Rgb = 0x151515;

/// Body outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { size: Vec2 },
}

/// Anything with a position and an axis-aligned extent
pub trait Spatial {
    /// Anchor point used for spatial bucketing (the shape center)
    fn position(&self) -> Vec2;
    /// Bounds of the shape at its current position
    fn boundary(&self) -> Boundary;
}

/// A positioned shape
///
/// Walls, doors, lights and the player are all bodies. A body with zero
/// opacity is hidden and never collides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub shape: Shape,
    pub opacity: f32,
    pub color: Rgb,
    /// Whether the body blocks light
    pub casts_shadows: bool,
}

impl Body {
    pub fn circle(pos: Vec2, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "negative radius");
        Self {
            pos,
            shape: Shape::Circle { radius },
            opacity: 1.0,
            color: DEFAULT_COLOR,
            casts_shadows: true,
        }
    }

    pub fn rect(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            shape: Shape::Rect { size },
            opacity: 1.0,
            color: DEFAULT_COLOR,
            casts_shadows: true,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Width and height of the shape
    pub fn size(&self) -> Vec2 {
        match self.shape {
            Shape::Circle { radius } => Vec2::splat(radius * 2.0),
            Shape::Rect { size } => size,
        }
    }

    /// Radius for circles, None for rectangles
    pub fn radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Circle { radius } => Some(radius),
            Shape::Rect { .. } => None,
        }
    }

    /// Resize a circle (no-op for rectangles)
    pub fn set_radius(&mut self, radius: f32) {
        debug_assert!(radius >= 0.0, "negative radius");
        if let Shape::Circle { radius: r } = &mut self.shape {
            *r = radius;
        }
    }

    /// Visible and collidable
    #[inline]
    pub fn is_active(&self) -> bool {
        self.opacity > 0.0
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.opacity = if enabled { 1.0 } else { 0.0 };
    }
}

impl Spatial for Body {
    #[inline]
    fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    fn boundary(&self) -> Boundary {
        Boundary::from_center(self.pos, self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_boundary() {
        let body = Body::circle(Vec2::new(10.0, -5.0), 4.0);
        assert_eq!(body.boundary(), Boundary::new(6.0, 14.0, -9.0, -1.0));
        assert_eq!(body.radius(), Some(4.0));
    }

    #[test]
    fn test_rect_boundary_follows_position() {
        let mut body = Body::rect(Vec2::ZERO, Vec2::new(30.0, 120.0));
        assert_eq!(body.boundary(), Boundary::new(-15.0, 15.0, -60.0, 60.0));
        body.pos = Vec2::new(100.0, 0.0);
        assert_eq!(body.boundary().center(), Vec2::new(100.0, 0.0));
        assert_eq!(body.radius(), None);
    }

    #[test]
    fn test_enable_toggles_opacity() {
        let mut body = Body::rect(Vec2::ZERO, Vec2::ONE);
        assert!(body.is_active());
        body.set_enabled(false);
        assert!(!body.is_active());
    }
}
