use crate::Vec3;

/// A ray in 3D space with an origin and a unit-length direction.
///
/// The direction is normalized on construction, so the ray parameter `t`
/// of any point along it is also that point's distance from the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Create a new ray. `direction` must be non-zero.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(direction.length_squared() > 0.0, "ray direction must be non-zero");
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create a secondary ray whose origin is pushed off a surface.
    ///
    /// The origin is moved by `delta` along `normal`, towards the side the
    /// ray is heading to, so the ray cannot re-hit the surface it starts on.
    #[inline]
    pub fn offset(head: Vec3, direction: Vec3, normal: Vec3, delta: f32) -> Self {
        let nv = normal.dot(direction);
        let shift = if nv > 0.0 { normal * delta } else { normal * -delta };
        Self::new(head + shift, direction)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the (unit) direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Pick the item whose point is closest to the ray origin.
    pub fn closest_by<T>(&self, items: impl IntoIterator<Item = T>, point: impl Fn(&T) -> Vec3) -> Option<T> {
        items.into_iter().min_by(|a, b| {
            let da = point(a).distance_squared(self.origin);
            let db = point(b).distance_squared(self.origin);
            da.total_cmp(&db)
        })
    }

    /// Pick the point closest to the ray origin.
    pub fn closest_point(&self, points: &[Vec3]) -> Option<Vec3> {
        self.closest_by(points.iter().copied(), |p| *p)
    }
}
