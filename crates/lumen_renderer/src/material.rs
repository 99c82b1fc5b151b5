//! Phong material coefficients.

use lumen_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Attenuation coefficients describing how a surface responds to light.
///
/// Each coefficient is stored per channel so tinted reflections and
/// coloured glass are possible; the scalar setters fill all three.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Material {
    /// Diffuse factor
    pub kd: Vec3,
    /// Specular factor
    pub ks: Vec3,
    /// Transparency (transmission) factor
    pub kt: Vec3,
    /// Reflection factor
    pub kr: Vec3,
    /// Phong shininess exponent
    pub shininess: i32,
}

impl Material {
    /// A material that neither reflects, transmits nor scatters light.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kd(mut self, kd: f32) -> Self {
        self.kd = Vec3::splat(kd);
        self
    }

    pub fn with_kd_rgb(mut self, kd: Vec3) -> Self {
        self.kd = kd;
        self
    }

    pub fn with_ks(mut self, ks: f32) -> Self {
        self.ks = Vec3::splat(ks);
        self
    }

    pub fn with_ks_rgb(mut self, ks: Vec3) -> Self {
        self.ks = ks;
        self
    }

    pub fn with_kt(mut self, kt: f32) -> Self {
        self.kt = Vec3::splat(kt);
        self
    }

    pub fn with_kr(mut self, kr: f32) -> Self {
        self.kr = Vec3::splat(kr);
        self
    }

    pub fn with_shininess(mut self, shininess: i32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Check if light passes through this material at all.
    pub fn is_transparent(&self) -> bool {
        self.kt.max_element() > 0.0
    }
}
