//! Intersectable trait, GeoPoint and the Geometries composite.

use lumen_math::{Ray, Vec3};

use crate::Geometry;

/// A ray hit: the intersection point together with the body that produced it.
///
/// Shading needs the body's material and normal, not just the point.
#[derive(Debug, Clone, Copy)]
pub struct GeoPoint<'a> {
    /// Body the ray hit
    pub geometry: &'a Geometry,
    /// Point of intersection
    pub point: Vec3,
}

impl<'a> GeoPoint<'a> {
    /// Outward surface normal at the hit point.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.geometry.normal_at(self.point)
    }
}

/// Trait for anything a ray can be intersected with.
pub trait Intersectable: Send + Sync {
    /// All intersections of `ray` lying ahead of its origin and no farther
    /// than `max_distance` from it.
    ///
    /// Misses, grazing hits and numerically degenerate cases all produce an
    /// empty list; this never fails.
    fn intersect<'a>(&'a self, ray: &Ray, max_distance: f32) -> Vec<GeoPoint<'a>>;

    /// All intersections of `ray`, unbounded in distance.
    fn find_intersections<'a>(&'a self, ray: &Ray) -> Vec<GeoPoint<'a>> {
        self.intersect(ray, f32::INFINITY)
    }

    /// The intersection closest to the ray origin, if any.
    fn find_closest<'a>(&'a self, ray: &Ray) -> Option<GeoPoint<'a>> {
        ray.closest_by(self.find_intersections(ray), |gp| gp.point)
    }
}

/// An ordered collection of bodies and nested collections.
pub struct Geometries {
    objects: Vec<Box<dyn Intersectable>>,
}

impl Geometries {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add a body or a nested collection.
    pub fn add(&mut self, object: Box<dyn Intersectable>) {
        self.objects.push(object);
    }

    /// Builder-style [`Geometries::add`].
    pub fn with(mut self, object: impl Intersectable + 'static) -> Self {
        self.add(Box::new(object));
        self
    }

    /// Get the number of direct children.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for Geometries {
    fn default() -> Self {
        Self::new()
    }
}

impl Intersectable for Geometries {
    fn intersect<'a>(&'a self, ray: &Ray, max_distance: f32) -> Vec<GeoPoint<'a>> {
        self.objects
            .iter()
            .flat_map(|object| object.intersect(ray, max_distance))
            .collect()
    }
}
