//! Sphere primitive.

use lumen_math::{is_zero, Ray, Vec3};

use super::{points_along, Surface};
use crate::scene::{positive, SceneError};

/// A sphere given by its center and radius.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive.
    pub fn new(center: Vec3, radius: f32) -> Result<Self, SceneError> {
        Ok(Self {
            center,
            radius: positive(radius, "sphere radius")?,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Surface for Sphere {
    fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize_or_zero()
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        let r2 = self.radius * self.radius;
        let u = self.center - ray.origin();

        // Starting at the center: exactly one exit point
        if is_zero(u.length_squared() / r2) {
            return points_along(ray, [self.radius], max_distance);
        }

        // Closest approach of the ray to the center
        let tm = ray.direction().dot(u);
        let d2 = u.cross(ray.direction()).length_squared();

        // Miss when the line passes outside; a tangent graze counts as a
        // miss too, judged relative to the radius
        let th2 = r2 - d2;
        if th2 <= 0.0 || is_zero(th2 / r2) {
            return Vec::new();
        }

        let th = th2.sqrt();
        points_along(ray, [tm - th, tm + th], max_distance)
    }
}
