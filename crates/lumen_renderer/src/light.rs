//! Light sources for local (Phong) illumination.

use lumen_math::{Vec3, EPSILON};

use crate::scene::{unit, SceneError};
use crate::Color;

/// A light that illuminates individual surface points.
pub trait LightSource: Send + Sync {
    /// Intensity of the light arriving at `p`.
    fn intensity_at(&self, p: Vec3) -> Color;

    /// Unit vector pointing from the light toward `p`.
    fn direction_at(&self, p: Vec3) -> Vec3;

    /// Distance from the light to `p` (infinite for lights at infinity).
    fn distance(&self, p: Vec3) -> f32;
}

/// Environmental light, applied uniformly to every visible point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// No ambient light at all.
    pub const NONE: AmbientLight = AmbientLight {
        intensity: Color::ZERO,
    };

    /// Ambient light of intensity `ia` attenuated by the factor `ka`.
    pub fn new(ia: Color, ka: Vec3) -> Self {
        Self { intensity: ia * ka }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::NONE
    }
}

/// A light infinitely far away, shining along one direction (like the sun).
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    intensity: Color,
    direction: Vec3,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: Vec3) -> Result<Self, SceneError> {
        Ok(Self {
            intensity,
            direction: unit(direction, "directional light direction")?,
        })
    }
}

impl LightSource for DirectionalLight {
    fn intensity_at(&self, _p: Vec3) -> Color {
        self.intensity
    }

    fn direction_at(&self, _p: Vec3) -> Vec3 {
        self.direction
    }

    fn distance(&self, _p: Vec3) -> f32 {
        f32::INFINITY
    }
}

/// An omnidirectional light (like a bulb) fading with distance.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    intensity: Color,
    position: Vec3,
    kc: f32,
    kl: f32,
    kq: f32,
}

impl PointLight {
    /// Create a point light with no distance attenuation (kc = 1).
    pub fn new(intensity: Color, position: Vec3) -> Self {
        Self {
            intensity,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }

    /// Constant attenuation factor, kept at or above [`EPSILON`] so the
    /// attenuation never reaches zero.
    pub fn with_kc(mut self, kc: f32) -> Self {
        self.kc = kc.max(EPSILON);
        self
    }

    /// Linear attenuation factor; negative values clamp to zero.
    pub fn with_kl(mut self, kl: f32) -> Self {
        self.kl = kl.max(0.0);
        self
    }

    /// Quadratic attenuation factor; negative values clamp to zero.
    pub fn with_kq(mut self, kq: f32) -> Self {
        self.kq = kq.max(0.0);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

impl LightSource for PointLight {
    fn intensity_at(&self, p: Vec3) -> Color {
        let d = self.position.distance(p);
        self.intensity / (self.kc + self.kl * d + self.kq * d * d)
    }

    fn direction_at(&self, p: Vec3) -> Vec3 {
        (p - self.position).normalize_or_zero()
    }

    fn distance(&self, p: Vec3) -> f32 {
        self.position.distance(p)
    }
}

/// A point light restricted to a cone around its direction.
#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    point: PointLight,
    direction: Vec3,
    narrow_beam: i32,
}

impl SpotLight {
    pub fn new(intensity: Color, position: Vec3, direction: Vec3) -> Result<Self, SceneError> {
        Ok(Self {
            point: PointLight::new(intensity, position),
            direction: unit(direction, "spot light direction")?,
            narrow_beam: 1,
        })
    }

    pub fn with_kc(mut self, kc: f32) -> Self {
        self.point = self.point.with_kc(kc);
        self
    }

    pub fn with_kl(mut self, kl: f32) -> Self {
        self.point = self.point.with_kl(kl);
        self
    }

    pub fn with_kq(mut self, kq: f32) -> Self {
        self.point = self.point.with_kq(kq);
        self
    }

    /// Sharpen the beam: the cosine falloff is raised to this power.
    pub fn with_narrow_beam(mut self, narrow_beam: i32) -> Self {
        self.narrow_beam = narrow_beam.max(1);
        self
    }
}

impl LightSource for SpotLight {
    fn intensity_at(&self, p: Vec3) -> Color {
        let cos = self.direction.dot(self.point.direction_at(p)).max(0.0);
        self.point.intensity_at(p) * cos.powi(self.narrow_beam)
    }

    fn direction_at(&self, p: Vec3) -> Vec3 {
        self.point.direction_at(p)
    }

    fn distance(&self, p: Vec3) -> f32 {
        self.point.distance(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_scales_by_ka() {
        let ambient = AmbientLight::new(Color::new(1.0, 0.5, 0.2), Vec3::new(0.1, 0.2, 0.5));
        assert!((ambient.intensity() - Color::new(0.1, 0.1, 0.1)).length() < 1e-6);
        assert_eq!(AmbientLight::default(), AmbientLight::NONE);
    }

    #[test]
    fn test_directional_is_constant() {
        let light = DirectionalLight::new(Color::ONE, Vec3::new(0.0, -2.0, 0.0)).unwrap();
        assert_eq!(light.direction_at(Vec3::new(5.0, 5.0, 5.0)), Vec3::NEG_Y);
        assert_eq!(light.intensity_at(Vec3::ZERO), Color::ONE);
        assert_eq!(light.distance(Vec3::ZERO), f32::INFINITY);
    }

    #[test]
    fn test_directional_rejects_zero_direction() {
        assert!(DirectionalLight::new(Color::ONE, Vec3::ZERO).is_err());
        assert!(SpotLight::new(Color::ONE, Vec3::ZERO, Vec3::ZERO).is_err());
    }

    #[test]
    fn test_point_light_attenuation() {
        let light = PointLight::new(Color::splat(12.0), Vec3::ZERO)
            .with_kc(1.0)
            .with_kl(1.0)
            .with_kq(1.0);
        let p = Vec3::new(2.0, 0.0, 0.0);

        // 12 / (1 + 2 + 4)
        let expected = 12.0 / 7.0;
        assert!((light.intensity_at(p).x - expected).abs() < 1e-5);
        assert_eq!(light.direction_at(p), Vec3::X);
        assert!((light.distance(p) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_attenuation_stays_finite() {
        let point = PointLight::new(Color::ONE, Vec3::ZERO)
            .with_kc(0.0)
            .with_kl(0.0)
            .with_kq(0.0);
        let lit = point.intensity_at(Vec3::new(0.0, 3.0, 0.0));
        assert!(lit.is_finite() && lit.x > 0.0, "{lit}");

        let spot = SpotLight::new(Color::ONE, Vec3::ZERO, Vec3::X)
            .unwrap()
            .with_kc(-1.0)
            .with_kl(-2.0)
            .with_kq(0.0);
        let lit = spot.intensity_at(Vec3::new(2.0, 0.0, 0.0));
        assert!(lit.is_finite() && lit.x > 0.0, "{lit}");

        // At the light itself with only distance terms
        let at_source = PointLight::new(Color::ONE, Vec3::ZERO)
            .with_kc(0.0)
            .with_kq(1.0)
            .intensity_at(Vec3::ZERO);
        assert!(at_source.is_finite());
    }

    #[test]
    fn test_spot_light_cosine_falloff() {
        let spot = SpotLight::new(Color::ONE, Vec3::ZERO, Vec3::X).unwrap();

        // On axis: full intensity
        assert!((spot.intensity_at(Vec3::new(3.0, 0.0, 0.0)).x - 1.0).abs() < 1e-6);

        // 60 degrees off axis: cos = 0.5
        let off = Vec3::new(0.5, 3f32.sqrt() / 2.0, 0.0);
        assert!((spot.intensity_at(off).x - 0.5).abs() < 1e-5);

        // Behind the spot: dark
        assert_eq!(spot.intensity_at(Vec3::new(-1.0, 0.0, 0.0)), Color::ZERO);
    }

    #[test]
    fn test_spot_light_narrow_beam() {
        let spot = SpotLight::new(Color::ONE, Vec3::ZERO, Vec3::X)
            .unwrap()
            .with_narrow_beam(2);
        let off = Vec3::new(0.5, 3f32.sqrt() / 2.0, 0.0);
        assert!((spot.intensity_at(off).x - 0.25).abs() < 1e-5);
    }
}
