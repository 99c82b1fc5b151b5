//! Seedable randomness for sampling jitter.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform float in `[-0.5, 0.5)`, scaled by `extent`.
#[inline]
pub fn jitter(rng: &mut dyn RngCore, extent: f32) -> f32 {
    (gen_f32(rng) - 0.5) * extent
}

/// Generator dedicated to one pixel.
///
/// Mixing the render seed with the pixel coordinate keeps a render
/// reproducible whatever order the workers visit pixels in.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> StdRng {
    let coord = ((y as u64) << 32) | x as u64;
    StdRng::seed_from_u64(seed ^ coord.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
