//! Pinhole camera with several per-pixel sampling strategies.

use lumen_math::{is_zero, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::random::jitter;
use crate::{Color, RayTracer};

/// Errors raised while building or validating a camera.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CameraError {
    #[error("Zero-length {0} vector")]
    ZeroVector(&'static str),

    #[error("Forward and up vectors are not orthogonal")]
    NotOrthogonal,

    #[error("View plane size and distance must be set and positive")]
    ViewPlaneNotSet,

    #[error("Sampling mode {mode:?} needs at least one sample")]
    InvalidSampleCount { mode: SamplingMode },

    #[error("Aperture must be non-negative and focal length positive")]
    InvalidAperture,

    #[error("Adaptive depth {depth} exceeds the maximum of {max}")]
    AdaptiveTooDeep { depth: u32, max: u32 },
}

/// How many rays are cast per pixel and where they go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// One ray through the pixel center
    #[default]
    Single,
    /// Random targets jittered inside the pixel
    AntiAliasing,
    /// Random origins around the lens, all aimed at the focal point
    DepthOfField,
    /// Corner samples refined recursively where they disagree
    Adaptive,
}

/// Default recursion depth for adaptive supersampling.
pub const DEFAULT_ADAPTIVE_DEPTH: u32 = 5;

/// Deepest adaptive refinement a camera accepts.
pub const MAX_ADAPTIVE_DEPTH: u32 = 8;

/// Default per-channel colour difference that triggers refinement.
pub const DEFAULT_ADAPTIVE_THRESHOLD: f32 = 10.0 / 255.0;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    right: Vec3,

    // View plane
    width: f32,
    height: f32,
    distance: f32,

    // Sampling
    sampling: SamplingMode,
    samples: u32,
    aperture: f32,
    focal_length: f32,
    adaptive_depth: u32,
    adaptive_threshold: f32,
}

impl Camera {
    /// Create a camera at `position` looking along `forward`.
    ///
    /// `forward` and `up` must be non-zero and orthogonal; they are
    /// normalized and `right = forward x up` completes the basis.
    pub fn new(position: Vec3, forward: Vec3, up: Vec3) -> Result<Self, CameraError> {
        let forward = forward
            .try_normalize()
            .ok_or(CameraError::ZeroVector("forward"))?;
        let up = up.try_normalize().ok_or(CameraError::ZeroVector("up"))?;
        if !is_zero(forward.dot(up)) {
            return Err(CameraError::NotOrthogonal);
        }
        let right = forward.cross(up).normalize();

        log::debug!("Camera at {position} looking {forward}, up {up}");

        Ok(Self {
            position,
            forward,
            up,
            right,
            width: 0.0,
            height: 0.0,
            distance: 0.0,
            sampling: SamplingMode::Single,
            samples: 1,
            aperture: 0.0,
            focal_length: 1.0,
            adaptive_depth: DEFAULT_ADAPTIVE_DEPTH,
            adaptive_threshold: DEFAULT_ADAPTIVE_THRESHOLD,
        })
    }

    /// Set view plane size.
    pub fn with_view_plane(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set distance from the camera to the view plane.
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Set sampling mode and the number of rays per pixel.
    pub fn with_sampling(mut self, mode: SamplingMode, samples: u32) -> Self {
        self.sampling = mode;
        self.samples = samples;
        self
    }

    /// Set lens settings used by depth of field.
    pub fn with_lens(mut self, aperture: f32, focal_length: f32) -> Self {
        self.aperture = aperture;
        self.focal_length = focal_length;
        self
    }

    /// Set refinement depth and colour threshold for adaptive sampling.
    pub fn with_adaptive(mut self, depth: u32, threshold: f32) -> Self {
        self.adaptive_depth = depth;
        self.adaptive_threshold = threshold;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn sampling(&self) -> SamplingMode {
        self.sampling
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Check that the camera is ready to render.
    pub fn validate(&self) -> Result<(), CameraError> {
        if !(self.width > 0.0 && self.height > 0.0 && self.distance > 0.0) {
            return Err(CameraError::ViewPlaneNotSet);
        }
        match self.sampling {
            SamplingMode::AntiAliasing | SamplingMode::DepthOfField if self.samples == 0 => {
                return Err(CameraError::InvalidSampleCount {
                    mode: self.sampling,
                });
            }
            SamplingMode::DepthOfField
                if !(self.aperture >= 0.0 && self.focal_length > 0.0) =>
            {
                return Err(CameraError::InvalidAperture);
            }
            SamplingMode::Adaptive if self.adaptive_depth > MAX_ADAPTIVE_DEPTH => {
                return Err(CameraError::AdaptiveTooDeep {
                    depth: self.adaptive_depth,
                    max: MAX_ADAPTIVE_DEPTH,
                });
            }
            _ => {}
        }
        Ok(())
    }

    /// View plane center of pixel `(j, i)` on an `nx` x `ny` grid, and
    /// the pixel's width and height.
    fn pixel_center(&self, nx: u32, ny: u32, j: u32, i: u32) -> (Vec3, f32, f32) {
        let rx = self.width / nx as f32;
        let ry = self.height / ny as f32;

        let xj = (j as f32 - (nx as f32 - 1.0) / 2.0) * rx;
        let yi = -(i as f32 - (ny as f32 - 1.0) / 2.0) * ry;

        let pc = self.position + self.forward * self.distance;
        (pc + self.right * xj + self.up * yi, rx, ry)
    }

    #[inline]
    fn ray_through(&self, target: Vec3) -> Ray {
        Ray::new(self.position, target - self.position)
    }

    /// Ray from the camera through the center of pixel `(j, i)`.
    ///
    /// `j` counts columns left to right, `i` rows top to bottom.
    pub fn construct_ray(&self, nx: u32, ny: u32, j: u32, i: u32) -> Ray {
        let (center, _, _) = self.pixel_center(nx, ny, j, i);
        self.ray_through(center)
    }

    /// Rays through random points inside pixel `(j, i)`.
    pub fn anti_aliasing_rays(
        &self,
        nx: u32,
        ny: u32,
        j: u32,
        i: u32,
        rng: &mut dyn RngCore,
    ) -> Vec<Ray> {
        let (center, rx, ry) = self.pixel_center(nx, ny, j, i);
        (0..self.samples)
            .map(|_| {
                let target = center + self.right * jitter(rng, rx) + self.up * jitter(rng, ry);
                self.ray_through(target)
            })
            .collect()
    }

    /// Point where `ray` crosses the focal distance.
    pub fn focal_point(&self, ray: &Ray) -> Vec3 {
        ray.at(self.focal_length)
    }

    /// Rays from random origins in a cube of side `aperture` around the
    /// origin of `primary`, all converging on its focal point.
    pub fn depth_of_field_rays(&self, primary: &Ray, rng: &mut dyn RngCore) -> Vec<Ray> {
        let focal = self.focal_point(primary);
        (0..self.samples)
            .map(|_| {
                let shift = Vec3::new(
                    jitter(rng, self.aperture),
                    jitter(rng, self.aperture),
                    jitter(rng, self.aperture),
                );
                let origin = primary.origin() + shift;
                Ray::new(origin, focal - origin)
            })
            .collect()
    }

    /// Colour of pixel `(j, i)` using the configured sampling mode.
    pub fn pixel_color(
        &self,
        tracer: &dyn RayTracer,
        nx: u32,
        ny: u32,
        j: u32,
        i: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        match self.sampling {
            SamplingMode::AntiAliasing if self.samples > 1 => {
                average(tracer, &self.anti_aliasing_rays(nx, ny, j, i, rng))
            }
            SamplingMode::DepthOfField if self.samples > 1 => {
                let primary = self.construct_ray(nx, ny, j, i);
                average(tracer, &self.depth_of_field_rays(&primary, rng))
            }
            SamplingMode::Adaptive => {
                let (center, rx, ry) = self.pixel_center(nx, ny, j, i);
                self.adaptive(tracer, center, rx, ry, self.adaptive_depth)
            }
            _ => tracer.trace_ray(&self.construct_ray(nx, ny, j, i)),
        }
    }

    /// Sample the four corners of the (sub)pixel centred on `pc`; corners
    /// that stray from the average are replaced by a refined sample of
    /// their quarter.
    fn adaptive(&self, tracer: &dyn RayTracer, pc: Vec3, rx: f32, ry: f32, depth: u32) -> Color {
        const CORNERS: [(f32, f32); 4] = [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)];
        let corner = |(sx, sy): (f32, f32), scale: f32| {
            pc + self.right * (sx * rx * scale) + self.up * (sy * ry * scale)
        };

        let mut colors = CORNERS.map(|c| tracer.trace_ray(&self.ray_through(corner(c, 0.5))));
        let avg = mean(&colors);
        if depth == 0 {
            return avg;
        }

        for (color, c) in colors.iter_mut().zip(CORNERS) {
            if (*color - avg).abs().max_element() > self.adaptive_threshold {
                *color = self.adaptive(tracer, corner(c, 0.25), rx / 2.0, ry / 2.0, depth - 1);
            }
        }
        mean(&colors)
    }
}

fn mean(colors: &[Color]) -> Color {
    colors.iter().copied().sum::<Color>() / colors.len() as f32
}

fn average(tracer: &dyn RayTracer, rays: &[Ray]) -> Color {
    let colors: Vec<Color> = rays.iter().map(|ray| tracer.trace_ray(ray)).collect();
    mean(&colors)
}
