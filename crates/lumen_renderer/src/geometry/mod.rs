//! Geometric bodies and their closed-form ray intersection solvers.
//!
//! Every shape implements the flat [`Surface`] capability (normal + hit
//! points). [`Shape`] groups the variants for static dispatch, and
//! [`Geometry`] attaches the emission colour and material that shading
//! needs.

mod circle;
mod cone;
mod plane;
mod polygon;
mod sphere;
mod tube;

pub use circle::Circle;
pub use cone::Cone;
pub use plane::Plane;
pub use polygon::{Polygon, Square, Triangle};
pub use sphere::Sphere;
pub use tube::{Cylinder, Tube};

use lumen_math::{align_zero, is_zero, Interval, Ray, Vec3, EPSILON};

use crate::{Color, GeoPoint, Intersectable, Material};

/// Capability shared by all shape variants.
pub trait Surface {
    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, point: Vec3) -> Vec3;

    /// Intersection points of `ray` within `(0, max_distance]`.
    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3>;
}

/// Map ray parameters to points, keeping those ahead of the origin and
/// within `max_distance`.
pub(crate) fn points_along(
    ray: &Ray,
    ts: impl IntoIterator<Item = f32>,
    max_distance: f32,
) -> Vec<Vec3> {
    let range = Interval::ahead(max_distance);
    ts.into_iter()
        .map(align_zero)
        .filter(|t| range.contains_above_min(*t))
        .map(|t| ray.at(t))
        .collect()
}

/// Real roots of `a t² + b t + c`, smaller first.
///
/// `scale` is the radius of the body being solved for. A tangent ray is
/// detected when `b² − 4ac` is negligible next to `4|a|·scale²`, so small
/// bodies are not lost to the absolute tolerance. A vanishing leading term
/// or a non-positive discriminant yields `None`.
pub(crate) fn solve_quadratic(a: f32, b: f32, c: f32, scale: f32) -> Option<(f32, f32)> {
    if is_zero(a) {
        return None;
    }
    let (a, b, c) = (f64::from(a), f64::from(b), f64::from(c));
    let discriminant = b * b - 4.0 * a * c;
    let spread = 4.0 * a.abs() * f64::from(scale) * f64::from(scale);
    if discriminant <= 0.0 || discriminant < f64::from(EPSILON) * spread {
        return None;
    }
    let sqrtd = discriminant.sqrt();
    let (t1, t2) = ((-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a));
    Some((t1.min(t2) as f32, t1.max(t2) as f32))
}

/// All supported shape variants.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Polygon(Polygon),
    Square(Square),
    Circle(Circle),
    Tube(Tube),
    Cylinder(Cylinder),
    Cone(Cone),
}

impl Surface for Shape {
    fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Plane(s) => s.normal_at(point),
            Shape::Triangle(s) => s.normal_at(point),
            Shape::Polygon(s) => s.normal_at(point),
            Shape::Square(s) => s.normal_at(point),
            Shape::Circle(s) => s.normal_at(point),
            Shape::Tube(s) => s.normal_at(point),
            Shape::Cylinder(s) => s.normal_at(point),
            Shape::Cone(s) => s.normal_at(point),
        }
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        match self {
            Shape::Sphere(s) => s.intersect_points(ray, max_distance),
            Shape::Plane(s) => s.intersect_points(ray, max_distance),
            Shape::Triangle(s) => s.intersect_points(ray, max_distance),
            Shape::Polygon(s) => s.intersect_points(ray, max_distance),
            Shape::Square(s) => s.intersect_points(ray, max_distance),
            Shape::Circle(s) => s.intersect_points(ray, max_distance),
            Shape::Tube(s) => s.intersect_points(ray, max_distance),
            Shape::Cylinder(s) => s.intersect_points(ray, max_distance),
            Shape::Cone(s) => s.intersect_points(ray, max_distance),
        }
    }
}

macro_rules! shape_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Shape {
                fn from(shape: $variant) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

shape_from!(Sphere, Plane, Triangle, Polygon, Square, Circle, Tube, Cylinder, Cone);

/// A shape with the emission colour and material used to shade it.
#[derive(Debug, Clone)]
pub struct Geometry {
    shape: Shape,
    emission: Color,
    material: Material,
}

impl Geometry {
    /// Wrap a shape with no emission and a black-body material.
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            emission: Color::ZERO,
            material: Material::default(),
        }
    }

    /// Set the colour emitted by the surface.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Outward unit normal at `point`.
    #[inline]
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        self.shape.normal_at(point)
    }
}

impl Intersectable for Geometry {
    fn intersect<'a>(&'a self, ray: &Ray, max_distance: f32) -> Vec<GeoPoint<'a>> {
        self.shape
            .intersect_points(ray, max_distance)
            .into_iter()
            .map(|point| GeoPoint {
                geometry: self,
                point,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_quadratic() {
        // (t - 1)(t - 3) = t² - 4t + 3
        let (t1, t2) = solve_quadratic(1.0, -4.0, 3.0, 1.0).unwrap();
        assert!((t1 - 1.0).abs() < 1e-6);
        assert!((t2 - 3.0).abs() < 1e-6);

        // Negative leading term still returns smaller root first
        let (t1, t2) = solve_quadratic(-1.0, 4.0, -3.0, 1.0).unwrap();
        assert!(t1 < t2);
    }

    #[test]
    fn test_solve_quadratic_degenerate() {
        // Double root: tangent, treated as a miss
        assert!(solve_quadratic(1.0, -2.0, 1.0, 1.0).is_none());
        // No real roots
        assert!(solve_quadratic(1.0, 0.0, 1.0, 1.0).is_none());
        // Not a quadratic
        assert!(solve_quadratic(0.0, 1.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn test_solve_quadratic_small_scale() {
        // (t - 0.999)(t - 1.001): a body of radius 0.001 one unit away
        let (t1, t2) = solve_quadratic(1.0, -2.0, 0.999999, 0.001).unwrap();
        assert!((t1 - 0.999).abs() < 1e-4);
        assert!((t2 - 1.001).abs() < 1e-4);

        // Same discriminant is a graze for a unit-sized body
        assert!(solve_quadratic(1.0, -2.0, 0.999999, 1.0).is_none());
    }

    #[test]
    fn test_points_along_filters_range() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let points = points_along(&ray, [-1.0, 0.0, 1e-7, 2.0, 5.0], 4.0);
        assert_eq!(points, vec![Vec3::new(2.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_geometry_carries_material() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0).unwrap();
        let material = Material::new().with_kd(0.5).with_shininess(20);
        let geometry = Geometry::new(sphere)
            .with_emission(Color::new(0.2, 0.0, 0.0))
            .with_material(material);

        assert_eq!(geometry.emission(), Color::new(0.2, 0.0, 0.0));
        assert_eq!(geometry.material().shininess, 20);
        assert!(matches!(geometry.shape(), Shape::Sphere(_)));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hits = geometry.find_intersections(&ray);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|gp| std::ptr::eq(gp.geometry, &geometry)));
    }

    #[test]
    fn test_bounded_and_unbounded_agree_for_every_shape() {
        let axis = Ray::new(Vec3::new(0.0, -2.0, -5.0), Vec3::Y);
        let shapes: Vec<Shape> = vec![
            Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap().into(),
            Plane::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z).unwrap().into(),
            Triangle::new(
                Vec3::new(-1.0, -1.0, -5.0),
                Vec3::new(1.0, -1.0, -5.0),
                Vec3::new(0.0, 1.0, -5.0),
            )
            .unwrap()
            .into(),
            Square::new(&[
                Vec3::new(-1.0, -1.0, -5.0),
                Vec3::new(1.0, -1.0, -5.0),
                Vec3::new(1.0, 1.0, -5.0),
                Vec3::new(-1.0, 1.0, -5.0),
            ])
            .unwrap()
            .into(),
            Circle::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 1.0).unwrap().into(),
            Tube::new(axis, 1.0).unwrap().into(),
            Cylinder::new(axis, 1.0, 4.0).unwrap().into(),
            Cone::new(axis, 1.0, 4.0).unwrap().into(),
        ];

        let rays = [
            Ray::new(Vec3::new(0.1, 0.2, 0.0), Vec3::NEG_Z),
            Ray::new(Vec3::new(0.3, -0.1, 0.0), Vec3::new(0.05, 0.02, -1.0)),
            Ray::new(Vec3::new(5.0, 0.0, -5.0), Vec3::NEG_X),
        ];

        for shape in &shapes {
            for ray in &rays {
                assert_eq!(
                    shape.intersect_points(ray, f32::INFINITY),
                    Geometry::new(shape.clone())
                        .find_intersections(ray)
                        .iter()
                        .map(|gp| gp.point)
                        .collect::<Vec<_>>(),
                    "{shape:?}"
                );
            }
        }
    }
}
