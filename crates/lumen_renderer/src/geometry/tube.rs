//! Infinite tube and finite cylinder primitives.

use lumen_math::{is_zero, Interval, Ray, Vec3};

use super::{points_along, solve_quadratic, Surface};
use crate::scene::{positive, SceneError};

/// An infinite circular tube around an axis ray.
#[derive(Debug, Clone, Copy)]
pub struct Tube {
    axis: Ray,
    radius: f32,
}

impl Tube {
    pub fn new(axis: Ray, radius: f32) -> Result<Self, SceneError> {
        Ok(Self {
            axis,
            radius: positive(radius, "tube radius")?,
        })
    }

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Signed distance of `point`'s projection along the axis from the
    /// axis origin.
    #[inline]
    fn projection(&self, point: Vec3) -> f32 {
        (point - self.axis.origin()).dot(self.axis.direction())
    }

    /// Ray parameters where the ray meets the infinite surface.
    fn roots(&self, ray: &Ray) -> Option<(f32, f32)> {
        let va = self.axis.direction();
        let perp = |v: Vec3| v - va * v.dot(va);

        let d = perp(ray.direction());
        let w = perp(ray.origin() - self.axis.origin());

        solve_quadratic(
            d.length_squared(),
            2.0 * d.dot(w),
            w.length_squared() - self.radius * self.radius,
            self.radius,
        )
    }
}

impl Surface for Tube {
    fn normal_at(&self, point: Vec3) -> Vec3 {
        let on_axis = self.axis.at(self.projection(point));
        (point - on_axis).normalize_or_zero()
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        match self.roots(ray) {
            Some((t1, t2)) => points_along(ray, [t1, t2], max_distance),
            None => Vec::new(),
        }
    }
}

/// A tube cut to `[0, height]` along its axis, starting at the axis origin.
///
/// Only the side surface is intersected; the caps are open.
#[derive(Debug, Clone, Copy)]
pub struct Cylinder {
    tube: Tube,
    height: f32,
}

impl Cylinder {
    pub fn new(axis: Ray, radius: f32, height: f32) -> Result<Self, SceneError> {
        Ok(Self {
            tube: Tube::new(axis, radius)?,
            height: positive(height, "cylinder height")?,
        })
    }

    pub fn tube(&self) -> &Tube {
        &self.tube
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

impl Surface for Cylinder {
    fn normal_at(&self, point: Vec3) -> Vec3 {
        let s = self.tube.projection(point);
        let va = self.tube.axis.direction();
        if is_zero(s) {
            -va
        } else if is_zero(s - self.height) {
            va
        } else {
            self.tube.normal_at(point)
        }
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        let span = Interval::new(0.0, self.height);
        self.tube
            .intersect_points(ray, max_distance)
            .into_iter()
            .filter(|p| span.contains(self.tube.projection(*p)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tube() -> Tube {
        Tube::new(Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Y), 2.0).unwrap()
    }

    fn cylinder() -> Cylinder {
        Cylinder::new(Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Y), 2.0, 10.0).unwrap()
    }

    fn assert_points(actual: &[Vec3], expected: &[Vec3]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((*a - *e).length() < 1e-4, "{a} != {e}");
        }
    }

    #[test]
    fn test_constructor_validation() {
        let axis = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(Tube::new(axis, 0.0).is_err());
        assert!(Cylinder::new(axis, 1.0, 0.0).is_err());
        assert!(Cylinder::new(axis, -1.0, 1.0).is_err());
    }

    #[test]
    fn test_tube_normal() {
        let n = tube().normal_at(Vec3::new(2.0, 7.0, 5.0));
        assert!((n - Vec3::X).length() < 1e-6);

        // Below the axis origin still points away from the axis
        let n = tube().normal_at(Vec3::new(0.0, -3.0, 3.0));
        assert!((n - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_ray_crossing_cylinder() {
        let ray = Ray::new(Vec3::new(-10.0, 5.0, 5.0), Vec3::X);
        assert_points(
            &cylinder().intersect_points(&ray, f32::INFINITY),
            &[Vec3::new(-2.0, 5.0, 5.0), Vec3::new(2.0, 5.0, 5.0)],
        );
    }

    #[test]
    fn test_ray_from_inside_hits_once() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::X);
        assert_points(
            &cylinder().intersect_points(&ray, f32::INFINITY),
            &[Vec3::new(2.0, 5.0, 5.0)],
        );
    }

    #[test]
    fn test_ray_beyond_height_misses_cylinder_but_hits_tube() {
        let ray = Ray::new(Vec3::new(-10.0, 12.0, 5.0), Vec3::X);
        assert!(cylinder().intersect_points(&ray, f32::INFINITY).is_empty());
        assert_eq!(tube().intersect_points(&ray, f32::INFINITY).len(), 2);
    }

    #[test]
    fn test_ray_parallel_to_axis_misses() {
        let inside = Ray::new(Vec3::new(0.5, 0.0, 5.0), Vec3::Y);
        assert!(tube().intersect_points(&inside, f32::INFINITY).is_empty());
        assert!(cylinder().intersect_points(&inside, f32::INFINITY).is_empty());
    }

    #[test]
    fn test_tangent_ray_misses() {
        let ray = Ray::new(Vec3::new(-10.0, 5.0, 7.0), Vec3::X);
        assert!(tube().intersect_points(&ray, f32::INFINITY).is_empty());
    }

    #[test]
    fn test_oblique_ray_through_cylinder() {
        // Enters the side at y = 2 and leaves at y = 4
        let ray = Ray::new(Vec3::new(-4.0, 1.0, 5.0), Vec3::new(2.0, 1.0, 0.0));
        let hits = cylinder().intersect_points(&ray, f32::INFINITY);
        assert_points(&hits, &[Vec3::new(-2.0, 2.0, 5.0), Vec3::new(2.0, 4.0, 5.0)]);
    }

    #[test]
    fn test_cylinder_cap_normals() {
        let c = cylinder();
        assert!((c.normal_at(Vec3::new(0.5, 0.0, 5.0)) - Vec3::NEG_Y).length() < 1e-6);
        assert!((c.normal_at(Vec3::new(0.5, 10.0, 5.0)) - Vec3::Y).length() < 1e-6);
        assert!((c.normal_at(Vec3::new(0.0, 4.0, 3.0)) - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_thin_tube_is_hit() {
        let thin = Tube::new(Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::X), 0.001).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_points(
            &thin.intersect_points(&ray, f32::INFINITY),
            &[Vec3::new(0.0, 0.0, -0.999), Vec3::new(0.0, 0.0, -1.001)],
        );

        let wire = Cylinder::new(Ray::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::X), 0.001, 2.0).unwrap();
        assert_eq!(wire.intersect_points(&ray, f32::INFINITY).len(), 2);

        let beside = Ray::new(Vec3::new(0.0, 0.002, 0.0), Vec3::NEG_Z);
        assert!(thin.intersect_points(&beside, f32::INFINITY).is_empty());
    }

    #[test]
    fn test_max_distance() {
        let ray = Ray::new(Vec3::new(-10.0, 5.0, 5.0), Vec3::X);
        assert!(cylinder().intersect_points(&ray, 7.0).is_empty());
        assert_eq!(cylinder().intersect_points(&ray, 9.0).len(), 1);
    }
}
