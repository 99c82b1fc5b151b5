//! Scene description consumed by the ray tracer.
//!
//! A scene is assembled once before rendering and is only read while
//! pixels are being computed, so it can be shared between worker threads
//! by plain reference.

use lumen_math::Vec3;
use thiserror::Error;

use crate::{AmbientLight, Color, Geometries, Intersectable, LightSource};

/// Errors raised while building scene contents (shapes and lights).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("Zero-length vector for {0}")]
    ZeroVector(&'static str),

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f32 },

    #[error("A polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("Expected {expected} vertices, got {found}")]
    WrongVertexCount { expected: usize, found: usize },

    #[error("Vertices coincide or are colinear")]
    DegenerateVertices,

    #[error("All vertices of a polygon must lie in the same plane")]
    NonPlanar,

    #[error("Vertices must be ordered along the edge path of a convex polygon")]
    NonConvex,

    #[error("Inner radius {inner} must lie within [0, {radius}]")]
    InnerRadiusOutOfRange { inner: f32, radius: f32 },
}

/// Normalize `v`, rejecting zero-length input.
pub(crate) fn unit(v: Vec3, what: &'static str) -> Result<Vec3, SceneError> {
    v.try_normalize().ok_or(SceneError::ZeroVector(what))
}

/// Reject zero, negative and NaN values.
pub(crate) fn positive(value: f32, what: &'static str) -> Result<f32, SceneError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::NonPositive { what, value })
    }
}

/// Everything the tracer needs to shade a ray: geometry, lights and the
/// colours used where nothing is hit.
pub struct Scene {
    /// Scene name, for logging
    pub name: String,
    /// Colour returned by rays that hit nothing
    pub background: Color,
    /// Environmental light added once per primary hit
    pub ambient_light: AmbientLight,
    /// Root of the geometry tree
    pub geometries: Geometries,
    /// Light sources, in the order they are evaluated
    pub lights: Vec<Box<dyn LightSource>>,
}

impl Scene {
    /// Create an empty scene with a black background and no ambient light.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Color::ZERO,
            ambient_light: AmbientLight::NONE,
            geometries: Geometries::new(),
            lights: Vec::new(),
        }
    }

    /// Set background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_ambient_light(mut self, ambient_light: AmbientLight) -> Self {
        self.ambient_light = ambient_light;
        self
    }

    /// Replace the geometry tree.
    pub fn with_geometries(mut self, geometries: Geometries) -> Self {
        self.geometries = geometries;
        self
    }

    /// Append a body to the geometry tree.
    pub fn with_geometry(mut self, geometry: impl Intersectable + 'static) -> Self {
        self.geometries.add(Box::new(geometry));
        self
    }

    /// Append a light source.
    pub fn with_light(mut self, light: impl LightSource + 'static) -> Self {
        self.lights.push(Box::new(light));
        self
    }
}
