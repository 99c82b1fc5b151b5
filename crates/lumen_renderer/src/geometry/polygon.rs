//! Convex polygon primitives: triangles, squares and general polygons.

use lumen_math::{align_zero, is_zero, Ray, Vec3};

use super::{Plane, Surface};
use crate::scene::SceneError;

/// A planar convex polygon.
///
/// Vertices are ordered along the edge path; the supporting plane is taken
/// from the first three.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Vec3>,
    plane: Plane,
}

impl Polygon {
    /// Create a polygon from its vertices.
    ///
    /// Fails when there are fewer than 3 vertices, when consecutive vertices
    /// coincide or three consecutive ones are colinear, when the vertices do
    /// not share one plane, or when the edge path is not convex.
    pub fn new(vertices: &[Vec3]) -> Result<Self, SceneError> {
        if vertices.len() < 3 {
            return Err(SceneError::TooFewVertices(vertices.len()));
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        if vertices.len() > 3 {
            Self::check_convex(vertices, plane.normal())?;
        }
        log::debug!(
            "Polygon with {} vertices, normal {}",
            vertices.len(),
            plane.normal()
        );

        Ok(Self {
            vertices: vertices.to_vec(),
            plane,
        })
    }

    /// Every turn between consecutive edges must bend the same way around
    /// the normal, and every vertex must lie in the plane.
    fn check_convex(vertices: &[Vec3], normal: Vec3) -> Result<(), SceneError> {
        let n = vertices.len();
        let turn = |a: Vec3, b: Vec3| -> Result<f32, SceneError> {
            if is_zero(a.length_squared()) || is_zero(b.length_squared()) {
                return Err(SceneError::DegenerateVertices);
            }
            let side = align_zero(a.cross(b).dot(normal));
            if side == 0.0 {
                return Err(SceneError::DegenerateVertices);
            }
            Ok(side)
        };

        let mut edge1 = vertices[n - 1] - vertices[n - 2];
        let mut edge2 = vertices[0] - vertices[n - 1];
        let positive = turn(edge1, edge2)? > 0.0;

        for i in 1..n {
            if !is_zero((vertices[i] - vertices[0]).dot(normal)) {
                return Err(SceneError::NonPlanar);
            }
            edge1 = edge2;
            edge2 = vertices[i] - vertices[i - 1];
            if positive != (turn(edge1, edge2)? > 0.0) {
                return Err(SceneError::NonConvex);
            }
        }
        Ok(())
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Inside test for a point already known to lie in the plane.
    ///
    /// For each edge, `(edge x to_point) . normal` must have the same
    /// non-zero sign; a zero means the point is on an edge line.
    fn contains(&self, point: Vec3) -> bool {
        let normal = self.plane.normal();
        let mut sign = 0.0_f32;

        for (i, &a) in self.vertices.iter().enumerate() {
            let b = self.vertices[(i + 1) % self.vertices.len()];
            let side = align_zero((b - a).cross(point - a).dot(normal));
            if side == 0.0 {
                return false;
            }
            if sign == 0.0 {
                sign = side.signum();
            } else if sign != side.signum() {
                return false;
            }
        }
        true
    }
}

impl Surface for Polygon {
    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.plane.normal()
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        self.plane
            .hit_point(ray, max_distance)
            .filter(|p| self.contains(*p))
            .into_iter()
            .collect()
    }
}

/// A triangle: a polygon with exactly three vertices.
#[derive(Debug, Clone)]
pub struct Triangle(Polygon);

impl Triangle {
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3) -> Result<Self, SceneError> {
        Polygon::new(&[p1, p2, p3]).map(Self)
    }

    pub fn polygon(&self) -> &Polygon {
        &self.0
    }
}

impl Surface for Triangle {
    fn normal_at(&self, point: Vec3) -> Vec3 {
        self.0.normal_at(point)
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        self.0.intersect_points(ray, max_distance)
    }
}

/// A convex quadrilateral with four ordered vertices.
#[derive(Debug, Clone)]
pub struct Square(Polygon);

impl Square {
    pub fn new(vertices: &[Vec3]) -> Result<Self, SceneError> {
        if vertices.len() != 4 {
            return Err(SceneError::WrongVertexCount {
                expected: 4,
                found: vertices.len(),
            });
        }
        Polygon::new(vertices).map(Self)
    }

    pub fn polygon(&self) -> &Polygon {
        &self.0
    }
}

impl Surface for Square {
    fn normal_at(&self, point: Vec3) -> Vec3 {
        self.0.normal_at(point)
    }

    fn intersect_points(&self, ray: &Ray, max_distance: f32) -> Vec<Vec3> {
        self.0.intersect_points(ray, max_distance)
    }
}
