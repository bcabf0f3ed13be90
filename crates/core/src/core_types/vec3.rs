//! Vector type alias for world positions.

use nalgebra::Vector3;

/// 3D vector type for fire positions, actor positions and spray origins.
///
/// Alias for `nalgebra::Vector3<f32>` so hosts can pass engine coordinates
/// straight through.
pub type Vec3 = Vector3<f32>;
