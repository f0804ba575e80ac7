use serde::{Deserialize, Serialize};

/// 2D vector with f32 coordinates, used for sizes and canvas bounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a zero vector
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Whether a box of this size fits inside `bounds`
    pub fn fits_in(self, bounds: Self) -> bool {
        self.x <= bounds.x && self.y <= bounds.y
    }
}

/// 2D point with f32 coordinates, the top-left corner of a placed node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
