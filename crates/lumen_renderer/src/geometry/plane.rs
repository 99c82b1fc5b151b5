//! Infinite plane primitive.

use lumen_math::{align_zero, is_zero, Interval, Ray, Vec3};

use super::Surface;
use crate::scene::{unit, SceneError};

/// An infinite plane through a reference point.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    q0: Vec3,
    normal: Vec3,
}

impl Plane {
    /// Create a plane from a reference point and a (non-zero) normal.
    pub fn new(q0: Vec3, normal: Vec3) -> Result<Self, SceneError> {
        Ok(Self {
            q0,
            normal: unit(normal, "plane normal")?,
        })
    }

    /// Create the plane through three points.
    ///
    /// The points must be distinct and not colinear. The normal follows
    /// the winding `(p2 - p1) x (p3 - p1)`.
    pub fn from_points(p1: Vec3, p2: Vec3, p3: Vec3) -> Result<Self, SceneError> {
        let normal = (p2 - p1)
            .cross(p3 - p1)
            .try_normalize()
            .ok_or(SceneError::DegenerateVertices)?;
        Ok(Self { q0: p1, normal })
    }

    pub fn q0(&self) -> Vec3 {
        self.q0
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Ray parameter of the hit, if the ray crosses the plane in front of
    /// its origin.
    ///
    /// Rays parallel to the plane and rays starting exactly at the
    /// reference point are treated as misses.
    pub(crate) fn hit_distance(&self, ray: &Ray) -> Option<f32> {
        let to_q0 = self.q0 - ray.origin();
        if is_zero(to_q0.length_squared()) {
            return None;
        }

        let denominator = align_zero(self.normal.dot(ray.direction()));
        if denominator == 0.0 {
            return None;
        }

        let t = align_zero(self.normal.dot(to_q0) / denominator);
        (t > 0.0).then_some(t)
    }

    /// Hit point within `max_distance`, if any.
    pub(crate) fn hit_point(&self, ray: &Ray, max_distance: f32) -> Option<Vec3> {
        self.hit_distance(ray)
            .filter(|t| Interval::ahead(max_distance).contains_above_min(*t))
            .map(|t| ray.at(t))
    }
}

impl Surface for Plane {
    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        self.hit_point(ray, max_distance).into_iter().collect()
    }
}
