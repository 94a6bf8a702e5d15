//! Math utilities and types
//!
//! Glyph quads are planar, so only 2D and 3D vectors are needed.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Smallest power of two greater than or equal to `n`
///
/// Returns 0 for 0 so an empty request never forces an allocation.
pub fn ceil_power_of_two(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        n.next_power_of_two()
    }
}
