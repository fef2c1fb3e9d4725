//! Shared collision helpers for box and circle colliders
//!
//! Box colliders (obstacles, goals) decide which edge the ball hit by picking
//! the smallest of the four edge penetrations; circle colliders (bumpers,
//! spinners) compare center distance against combined radii.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Which edge of a static box the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl ImpactSide {
    /// Left/right impacts reverse `dx`, top/bottom reverse `dy`
    pub fn is_horizontal(self) -> bool {
        matches!(self, ImpactSide::Left | ImpactSide::Right)
    }
}

/// Edge of `target` that `ball` most plausibly entered through.
///
/// Distances compared: `|ball.right - left|`, `|ball.left - right|`,
/// `|ball.bottom - top|`, `|ball.top - bottom|`. Ties resolve in that order.
pub fn impact_side(ball: &Rect, target: &Rect) -> ImpactSide {
    let candidates = [
        ((ball.right() - target.left()).abs(), ImpactSide::Left),
        ((ball.left() - target.right()).abs(), ImpactSide::Right),
        ((ball.bottom() - target.top()).abs(), ImpactSide::Top),
        ((ball.top() - target.bottom()).abs(), ImpactSide::Bottom),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }
    best.1
}

/// Move `ball` so it sits flush against `side` of `target`, outside it
pub fn place_flush(ball: &mut Rect, target: &Rect, side: ImpactSide) {
    match side {
        ImpactSide::Left => ball.set_right(target.left()),
        ImpactSide::Right => ball.set_left(target.right()),
        ImpactSide::Top => ball.set_bottom(target.top()),
        ImpactSide::Bottom => ball.set_top(target.bottom()),
    }
}

/// Circle overlap test on centers and radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Rotate a vector counter-clockwise (in math orientation) by `radians`
#[inline]
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    Vec2::from_angle(radians).rotate(v)
}

/// 2D cross product (z component of the 3D cross)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_side_from_left() {
        let wall = Rect::new(100.0, 100.0, 50.0, 200.0);
        let ball = Rect::new(88.0, 180.0, 16.0, 16.0);
        assert_eq!(impact_side(&ball, &wall), ImpactSide::Left);
    }

    #[test]
    fn test_impact_side_from_top() {
        let wall = Rect::new(100.0, 100.0, 200.0, 50.0);
        let ball = Rect::new(180.0, 87.0, 16.0, 16.0);
        assert_eq!(impact_side(&ball, &wall), ImpactSide::Top);
    }

    #[test]
    fn test_place_flush() {
        let wall = Rect::new(100.0, 100.0, 50.0, 50.0);
        let mut ball = Rect::new(140.0, 120.0, 16.0, 16.0);
        place_flush(&mut ball, &wall, ImpactSide::Right);
        assert_eq!(ball.left(), 150.0);
        place_flush(&mut ball, &wall, ImpactSide::Top);
        assert_eq!(ball.bottom(), 100.0);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 30.0, Vec2::new(35.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 30.0, Vec2::new(41.0, 0.0), 10.0));
    }

    #[test]
    fn test_rotate_and_cross() {
        let v = rotate(Vec2::X, std::f32::consts::FRAC_PI_2);
        assert!((v - Vec2::Y).length() < 1e-6);
        assert!(cross(Vec2::X, Vec2::Y) > 0.0);
        assert!(cross(Vec2::Y, Vec2::X) < 0.0);
    }
}
