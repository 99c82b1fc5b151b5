//! Lumen Renderer - CPU Whitted Ray Tracing
//!
//! A recursive ray tracer with Phong shading, shadows, reflection and
//! refraction, several per-pixel sampling strategies and a multi-threaded
//! pixel scheduler.

mod buffer;
mod camera;
mod geometry;
mod intersectable;
mod light;
mod material;
mod random;
mod render;
mod scene;
mod tracer;

pub use buffer::{color_to_rgba, draw_grid, ImageBuffer, ImageSink};
pub use camera::{
    Camera, CameraError, SamplingMode, DEFAULT_ADAPTIVE_DEPTH, DEFAULT_ADAPTIVE_THRESHOLD,
    MAX_ADAPTIVE_DEPTH,
};
pub use geometry::{
    Circle, Cone, Cylinder, Geometry, Plane, Polygon, Shape, Sphere, Square, Surface, Triangle,
    Tube,
};
pub use intersectable::{GeoPoint, Geometries, Intersectable};
pub use light::{AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight};
pub use material::{Color, Material};
pub use random::{gen_f32, pixel_rng};
pub use render::{
    render, CancelToken, RenderConfig, RenderContext, RenderError, RenderStats, MAX_THREADS,
};
pub use scene::{Scene, SceneError};
pub use tracer::{reflect, RayTracer, SceneTracer, TraceConfig};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Ray, Vec3};
