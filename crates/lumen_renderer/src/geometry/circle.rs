//! Flat disk and annulus primitive.

use lumen_math::{Interval, Ray, Vec3};

use super::{Plane, Surface};
use crate::scene::{positive, SceneError};

/// A disk (or a ring when the inner radius is positive) lying in a plane.
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    plane: Plane,
    radius: f32,
    inner: f32,
}

impl Circle {
    /// A filled disk.
    pub fn new(center: Vec3, normal: Vec3, radius: f32) -> Result<Self, SceneError> {
        Self::annulus(center, normal, radius, 0.0)
    }

    /// A ring between `inner` and `radius` from the center.
    pub fn annulus(center: Vec3, normal: Vec3, radius: f32, inner: f32) -> Result<Self, SceneError> {
        let radius = positive(radius, "circle radius")?;
        if !(0.0..=radius).contains(&inner) {
            return Err(SceneError::InnerRadiusOutOfRange { inner, radius });
        }
        Ok(Self {
            plane: Plane::new(center, normal)?,
            radius,
            inner,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.plane.q0()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner
    }
}

impl Surface for Circle {
    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.plane.normal()
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        let ring = Interval::new(self.inner * self.inner, self.radius * self.radius);
        self.plane
            .hit_point(ray, max_distance)
            .filter(|p| ring.contains(p.distance_squared(self.center())))
            .into_iter()
            .collect()
    }
}
