//! Pose interpolation primitives.
//!
//! Pure functions shared by the clip sampler and the layer blender. The
//! hemisphere alignment rule matters everywhere two independently-obtained
//! quaternions meet: `q` and `-q` encode the same rotation, and interpolating
//! across a sign flip takes the long arc.

use glam::{Quat, Vec3, Vec4};

/// Linear interpolation between two vectors: `a + (b - a) * t`.
#[inline]
#[must_use]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t)
}

/// Spherical linear interpolation, renormalized.
#[inline]
#[must_use]
pub fn slerp_quat(a: Quat, b: Quat, t: f32) -> Quat {
    a.slerp(b, t).normalize()
}

/// Flips `target` onto the same hemisphere as `reference`.
///
/// Apply before any slerp or weighted accumulation that compares two
/// quaternions which were not produced by the same keyframe track.
#[inline]
#[must_use]
pub fn align_hemisphere(target: Quat, reference: Quat) -> Quat {
    if target.dot(reference) < 0.0 { -target } else { target }
}

/// Hemisphere alignment against a raw 4-component accumulator.
///
/// Layer blending sums quaternions component-wise into a [`Vec4`]; each new
/// sample must be sign-corrected against the running sum, not against the
/// previous sample, so that the converged sign is independent of layer order.
#[inline]
#[must_use]
pub fn align_hemisphere_vec4(target: Vec4, reference: Vec4) -> Vec4 {
    if target.dot(reference) < 0.0 { -target } else { target }
}
