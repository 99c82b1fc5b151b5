//! Finite right circular cone primitive.

use lumen_math::{is_zero, Interval, Ray, Vec3};

use super::{points_along, solve_quadratic, Surface};
use crate::scene::{positive, SceneError};

/// A cone whose base is centred on the axis origin and whose apex lies
/// `height` along the axis direction.
#[derive(Debug, Clone, Copy)]
pub struct Cone {
    axis: Ray,
    radius: f32,
    height: f32,
    /// `(radius / height)²`, the slope of the cross-section squared.
    k: f32,
}

impl Cone {
    pub fn new(axis: Ray, radius: f32, height: f32) -> Result<Self, SceneError> {
        let radius = positive(radius, "cone radius")?;
        let height = positive(height, "cone height")?;
        let slope = radius / height;
        Ok(Self {
            axis,
            radius,
            height,
            k: slope * slope,
        })
    }

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn apex(&self) -> Vec3 {
        self.axis.at(self.height)
    }

    #[inline]
    fn projection(&self, point: Vec3) -> f32 {
        (point - self.axis.origin()).dot(self.axis.direction())
    }
}

impl Surface for Cone {
    fn normal_at(&self, point: Vec3) -> Vec3 {
        let va = self.axis.direction();
        let s = self.projection(point);
        let perp = point - self.axis.at(s);
        if is_zero(perp.length_squared()) {
            return va;
        }
        (perp + va * (self.k * (self.height - s))).normalize_or_zero()
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        let va = self.axis.direction();
        let w = ray.origin() - self.axis.origin();
        let dv = ray.direction().dot(va);
        let dp = ray.direction() - va * dv;
        let wp = w - va * w.dot(va);
        let to_apex = self.height - w.dot(va);

        let Some((t1, t2)) = solve_quadratic(
            dp.length_squared() - self.k * dv * dv,
            2.0 * (wp.dot(dp) + self.k * to_apex * dv),
            wp.length_squared() - self.k * to_apex * to_apex,
            self.radius,
        ) else {
            return Vec::new();
        };

        let span = Interval::new(0.0, self.height);
        points_along(ray, [t1, t2], max_distance)
            .into_iter()
            .filter(|p| span.surrounds(self.projection(*p)))
            .collect()
    }
}
