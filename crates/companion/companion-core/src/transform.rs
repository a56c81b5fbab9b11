//! 2D vector and node transform used by the surface and every animation.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2::new(
            crate::easing::lerp(self.x, to.x, t),
            crate::easing::lerp(self.y, to.y, t),
        )
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Horizontal facing, encoded as the sign of the sprite's x scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Right,
    Left,
}

impl Facing {
    /// Right when the target is at or past `from` on the x axis.
    pub fn toward(from: f32, to: f32) -> Self {
        if to >= from {
            Facing::Right
        } else {
            Facing::Left
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

/// Position, rotation (radians) and scale of a node in its parent's space.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Clear rotation and scale, keeping the position.
    pub fn reset_pose(&mut self) {
        self.rotation = 0.0;
        self.scale = Vec2::ONE;
    }

    /// Identity pose with the horizontal scale sign set from `facing`.
    pub fn face(&mut self, facing: Facing) {
        self.rotation = 0.0;
        self.scale = Vec2::new(facing.sign(), 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_ties_go_right() {
        assert_eq!(Facing::toward(10.0, 10.0), Facing::Right);
        assert_eq!(Facing::toward(10.0, 9.0), Facing::Left);
    }

    #[test]
    fn face_sets_sign_and_clears_rotation() {
        let mut t = Transform2D {
            position: Vec2::new(3.0, 4.0),
            rotation: 0.4,
            scale: Vec2::new(1.2, 0.8),
        };
        t.face(Facing::Left);
        assert_eq!(t.scale, Vec2::new(-1.0, 1.0));
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.position, Vec2::new(3.0, 4.0));
    }
}
