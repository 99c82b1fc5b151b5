/// A closed scalar range `[min, max]`.
///
/// Used to clip ray parameters against a maximum distance and to clip
/// axial projections against the finite extent of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Interval of valid ray parameters: strictly in front of the origin,
    /// no farther than `max_distance`.
    pub fn ahead(max_distance: f32) -> Self {
        Self::new(0.0, max_distance)
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Returns true if x is within (min, max]: the lower bound excluded.
    pub fn contains_above_min(&self, x: f32) -> bool {
        self.min < x && x <= self.max
    }
}
