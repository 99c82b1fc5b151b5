//! Floating-point tolerance helpers.
//!
//! Every intersection solver funnels its denominators, discriminants and
//! ray parameters through these so that near-zero values are treated the
//! same way everywhere.

/// Absolute tolerance under which a value counts as zero.
pub const EPSILON: f32 = 1e-5;

/// Returns true if `x` is within [`EPSILON`] of zero.
#[inline]
pub fn is_zero(x: f32) -> bool {
    x.abs() < EPSILON
}

/// Snap `x` to exactly zero when it is within [`EPSILON`] of zero.
#[inline]
pub fn align_zero(x: f32) -> f32 {
    if is_zero(x) {
        0.0
    } else {
        x
    }
}
