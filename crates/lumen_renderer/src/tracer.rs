//! Recursive Whitted-style ray tracer.
//!
//! Local Phong lighting with shadow rays, plus reflection and refraction
//! recursion bounded by depth and by accumulated attenuation.

use lumen_math::{align_zero, Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::{Color, GeoPoint, Intersectable, LightSource, Scene};

/// Anything that turns a ray into a colour.
pub trait RayTracer: Send + Sync {
    /// Colour seen along `ray`.
    fn trace_ray(&self, ray: &Ray) -> Color;
}

/// Recursion and bias settings for [`SceneTracer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Maximum recursion level; 1 means local lighting only
    pub max_level: u32,
    /// Attenuation below which no further rays are cast
    pub min_k: f32,
    /// Offset applied along the normal to secondary ray origins
    pub shadow_delta: f32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_level: 10,
            min_k: 0.001,
            shadow_delta: 0.1,
        }
    }
}

/// Mirror `v` about the surface with normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Ray tracer over a read-only [`Scene`].
pub struct SceneTracer<'a> {
    scene: &'a Scene,
    config: TraceConfig,
}

impl<'a> SceneTracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self::with_config(scene, TraceConfig::default())
    }

    pub fn with_config(scene: &'a Scene, config: TraceConfig) -> Self {
        Self { scene, config }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// At least one channel of `k` reaches the attenuation cut-off.
    #[inline]
    fn exceeds(&self, k: Vec3) -> bool {
        k.max_element() >= self.config.min_k
    }

    fn calc_color(&self, gp: &GeoPoint<'_>, ray: &Ray, level: u32, k: Vec3) -> Color {
        let color = gp.geometry.emission() + self.local_effects(gp, ray, k);
        if level <= 1 {
            color
        } else {
            color + self.global_effects(gp, ray, level, k)
        }
    }

    fn local_effects(&self, gp: &GeoPoint<'_>, ray: &Ray, k: Vec3) -> Color {
        let v = ray.direction();
        let n = gp.normal();
        let nv = align_zero(n.dot(v));
        if nv == 0.0 {
            return Color::ZERO;
        }

        let material = gp.geometry.material();
        let mut color = Color::ZERO;

        for light in &self.scene.lights {
            let l = light.direction_at(gp.point);
            let nl = align_zero(n.dot(l));
            // Light and viewer must be on the same side of the surface
            if nl * nv <= 0.0 {
                continue;
            }

            let ktr = self.transparency(light.as_ref(), l, n, gp);
            if !self.exceeds(ktr * k) {
                continue;
            }

            let il = light.intensity_at(gp.point) * ktr;
            let diffuse = material.kd * nl.abs();
            let r = l - 2.0 * nl * n;
            let specular = material.ks * (-v.dot(r)).max(0.0).powi(material.shininess);
            color += il * (diffuse + specular);
        }

        color
    }

    fn global_effects(&self, gp: &GeoPoint<'_>, ray: &Ray, level: u32, k: Vec3) -> Color {
        let v = ray.direction();
        let n = gp.normal();
        let material = gp.geometry.material();
        let delta = self.config.shadow_delta;
        let mut color = Color::ZERO;

        let kkr = k * material.kr;
        if self.exceeds(kkr) {
            let reflected = Ray::offset(gp.point, reflect(v, n), n, delta);
            color += self.calc_global_effect(&reflected, level, material.kr, kkr);
        }

        let kkt = k * material.kt;
        if self.exceeds(kkt) {
            let refracted = Ray::offset(gp.point, v, n, delta);
            color += self.calc_global_effect(&refracted, level, material.kt, kkt);
        }

        color
    }

    fn calc_global_effect(&self, ray: &Ray, level: u32, kx: Vec3, kkx: Vec3) -> Color {
        match self.scene.geometries.find_closest(ray) {
            Some(gp) => kx * self.calc_color(&gp, ray, level - 1, kkx),
            None => kx * self.scene.background,
        }
    }

    /// Fraction of the light that reaches the point through the bodies
    /// lying between it and the light.
    fn transparency(&self, light: &dyn LightSource, l: Vec3, n: Vec3, gp: &GeoPoint<'_>) -> Vec3 {
        let shadow_ray = Ray::offset(gp.point, -l, n, self.config.shadow_delta);
        let blockers = self
            .scene
            .geometries
            .intersect(&shadow_ray, light.distance(gp.point));

        let mut ktr = Vec3::ONE;
        for blocker in blockers {
            ktr *= blocker.geometry.material().kt;
            if !self.exceeds(ktr) {
                return Vec3::ZERO;
            }
        }
        ktr
    }
}

impl RayTracer for SceneTracer<'_> {
    fn trace_ray(&self, ray: &Ray) -> Color {
        match self.scene.geometries.find_closest(ray) {
            Some(gp) => {
                self.calc_color(&gp, ray, self.config.max_level, Vec3::ONE)
                    + self.scene.ambient_light.intensity()
            }
            None => self.scene.background,
        }
    }
}
