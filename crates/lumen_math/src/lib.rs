// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod ray;
mod scalar;

pub use interval::Interval;
pub use ray::Ray;
pub use scalar::{align_zero, is_zero, EPSILON};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let v = Vec3::new(1.0, 2.0, 3.0).normalize();
        assert!((v.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = Vec3::new(-4.0, 0.5, 9.0).normalize();
        let twice = once.normalize();
        assert!((once - twice).length() < EPSILON);
    }

    #[test]
    fn test_cross_is_right_handed() {
        // forward x up must give right for a camera looking down -Z
        let right = Vec3::NEG_Z.cross(Vec3::Y);
        assert_eq!(right, Vec3::X);
    }
}
