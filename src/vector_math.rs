//! Basic vector math helper functions.
//! Planar rotations and signed angles about the world up axis, in degrees.
use glam::{Quat, Vec3};

/// World up axis shared by every yaw rotation.
pub const UP: Vec3 = Vec3::Y;
/// Reference forward axis that a zero yaw faces.
pub const FORWARD: Vec3 = Vec3::Z;

/// Returns the rotation of `degrees` about the world up axis.
///
/// # Examples
/// ```
/// use beamline::vector_math::yaw_rotation;
/// use glam::Vec3;
/// let turned = yaw_rotation(90.0) * Vec3::Z;
/// assert!((turned - Vec3::X).length() < 1e-6);
/// ```
#[must_use]
pub fn yaw_rotation(degrees: f32) -> Quat {
    Quat::from_axis_angle(UP, degrees.to_radians())
}

/// Rotates `vector` by `degrees` about the world up axis.
#[must_use]
pub fn rotate_around_up(degrees: f32, vector: Vec3) -> Vec3 {
    yaw_rotation(degrees) * vector
}

/// Returns the unit vector in the direction of `vector`.
///
/// The function checks that all components are finite and the vector is
/// non-zero before normalising. If the input is invalid or the zero vector,
/// it returns [`Vec3::ZERO`].
///
/// # Examples
///
/// ```
/// use beamline::vec_normalize;
/// use glam::Vec3;
/// let unit = vec_normalize(Vec3::new(3.0, 0.0, 4.0));
/// assert!((unit.x - 0.6).abs() < 1e-6);
/// assert!((unit.z - 0.8).abs() < 1e-6);
/// assert_eq!(vec_normalize(Vec3::ZERO), Vec3::ZERO);
/// ```
#[must_use]
pub fn vec_normalize(vector: Vec3) -> Vec3 {
    if !vector.is_finite() {
        return Vec3::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Signed angle in degrees from `from` to `to`, measured about `axis`.
///
/// The magnitude is the unsigned angle between the vectors and the sign
/// follows the handedness of `from × to` relative to `axis`. A zero-length
/// operand yields `0.0`, and a cross product perpendicular to `axis` counts as
/// positive.
///
/// # Examples
/// ```
/// use beamline::vector_math::{signed_angle, FORWARD, UP};
/// use glam::Vec3;
/// assert!((signed_angle(FORWARD, Vec3::X, UP) - 90.0).abs() < 1e-4);
/// assert!((signed_angle(FORWARD, Vec3::NEG_X, UP) + 90.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let denominator = (from.length_squared() * to.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }
    let cosine = (from.dot(to) / denominator).clamp(-1.0, 1.0);
    let unsigned = cosine.acos().to_degrees();
    let handedness = axis.dot(from.cross(to));
    if handedness < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
#[must_use]
pub fn wrap_degrees(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}
