//! Axis-aligned bounding box tests for catches and misses
//!
//! Field coordinates: origin top-left, y grows downward.

use glam::Vec2;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Horizontal ranges overlap (touching edges count)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.max.x >= other.min.x && self.min.x <= other.max.x
    }
}

/// Whether a falling fruit lands in the basket
///
/// The fruit's bottom must be at or past the basket's top and the horizontal
/// ranges must overlap. There is no lower bound: a fruit that has already
/// dropped below the basket's top still counts if the basket slides under it
/// before it leaves the field.
#[inline]
pub fn is_caught(fruit: &Rect, basket: &Rect) -> bool {
    fruit.max.y >= basket.min.y && fruit.overlaps_x(basket)
}

/// Whether a fruit's top edge has left the bottom of the field
#[inline]
pub fn is_missed(fruit: &Rect, field_height: f32) -> bool {
    fruit.min.y > field_height
}
