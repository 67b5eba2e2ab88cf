//! Clip sampling and layer blending.
//!
//! [`AnimationPoseEvaluator`] binds to one [`Skeleton`] for its lifetime and
//! turns clip time into an [`AnimationPose`]: either a single clip
//! ([`evaluate_clip`](AnimationPoseEvaluator::evaluate_clip)) or a weighted
//! blend of independently-timed layers
//! ([`evaluate_layers`](AnimationPoseEvaluator::evaluate_layers)).
//!
//! Sampling rules:
//! - Playback seconds convert to clip ticks through `ticks_per_second`
//!   (a rate of 0 means tick values are already seconds).
//! - Time wraps into `[0, duration)` with a floored modulo, so negative
//!   playheads wrap forward instead of truncating toward zero. A clip with
//!   `duration <= 0` collapses to tick 0.
//! - Each track interpolates between its bracketing key pair; past the final
//!   key the last value is held, never extrapolated. A wrapped time landing
//!   before the first key sits in the final (wrap-around) segment and holds
//!   the last key as well.

use std::sync::Arc;

use glam::{Quat, Vec3, Vec4};

use crate::clip::{AnimationClip, Keyframe};
use crate::math::{align_hemisphere, align_hemisphere_vec4, lerp_vec3, slerp_quat};
use crate::pose::{AnimationPose, BoneTransform};
use crate::skeleton::Skeleton;

/// One clip's contribution to a blended pose: `{clip, playhead, weight}`.
#[derive(Clone, Copy)]
pub struct ClipLayer<'a> {
    pub clip: &'a AnimationClip,
    pub time_seconds: f32,
    pub weight: f32,
}

/// Samples clips and blends layers into an [`AnimationPose`].
pub struct AnimationPoseEvaluator {
    skeleton: Arc<Skeleton>,
}

impl AnimationPoseEvaluator {
    #[must_use]
    pub fn new(skeleton: Arc<Skeleton>) -> Self {
        Self { skeleton }
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    /// Samples one bone's local transform from `clip` at `time_seconds`.
    ///
    /// Returns `None` when no channel targets `bone_index`; the caller applies
    /// identity. Empty tracks within a channel fall back to their type default
    /// (zero translation, identity rotation, unit scale).
    #[must_use]
    pub fn sample_bone(
        &self,
        clip: &AnimationClip,
        bone_index: usize,
        time_seconds: f32,
    ) -> Option<BoneTransform> {
        let channel = clip.find_channel(bone_index)?;
        let ticks = wrap_clip_time(clip, time_seconds);

        Some(BoneTransform {
            translation: sample_track(&channel.translation, ticks, Vec3::ZERO, lerp_vec3),
            rotation: sample_track(&channel.rotation, ticks, Quat::IDENTITY, |a, b, t| {
                slerp_quat(a, align_hemisphere(b, a), t)
            }),
            scale: sample_track(&channel.scale, ticks, Vec3::ONE, lerp_vec3),
        })
    }

    /// Evaluates a single clip into `pose`.
    ///
    /// Bones without a channel get identity. Local matrices are rebuilt before
    /// returning.
    pub fn evaluate_clip(&self, clip: &AnimationClip, time_seconds: f32, pose: &mut AnimationPose) {
        let bone_count = self.skeleton.bone_count();
        pose.resize(bone_count);

        let transforms = pose.transforms_mut();
        for (bone_index, transform) in transforms.iter_mut().enumerate() {
            *transform = self
                .sample_bone(clip, bone_index, time_seconds)
                .unwrap_or(BoneTransform::IDENTITY);
        }
        pose.build_local_matrices();
    }

    /// Blends N independently-weighted, independently-timed layers into `pose`.
    ///
    /// Layers with `weight <= 0` are skipped. Rotation samples accumulate into
    /// a 4-component sum, each hemisphere-aligned against the running
    /// accumulator rather than the previous sample: the converged sign is then
    /// independent of layer order even with more than two contributors. Bones
    /// that no layer animates resolve to identity.
    pub fn evaluate_layers(&self, layers: &[ClipLayer<'_>], pose: &mut AnimationPose) {
        let bone_count = self.skeleton.bone_count();
        pose.resize(bone_count);

        let transforms = pose.transforms_mut();
        for (bone_index, transform) in transforms.iter_mut().enumerate() {
            let mut sum_translation = Vec3::ZERO;
            let mut sum_rotation = Vec4::ZERO;
            let mut sum_scale = Vec3::ZERO;
            let mut sum_weight = 0.0_f32;

            for layer in layers {
                if layer.weight <= 0.0 {
                    continue;
                }
                let Some(sample) = self.sample_bone(layer.clip, bone_index, layer.time_seconds)
                else {
                    continue;
                };

                sum_translation += sample.translation * layer.weight;
                sum_rotation += align_hemisphere_vec4(Vec4::from(sample.rotation), sum_rotation)
                    * layer.weight;
                sum_scale += sample.scale * layer.weight;
                sum_weight += layer.weight;
            }

            *transform = if sum_weight <= 0.0 {
                BoneTransform::IDENTITY
            } else {
                BoneTransform {
                    translation: sum_translation / sum_weight,
                    rotation: normalize_accumulated(sum_rotation / sum_weight),
                    scale: sum_scale / sum_weight,
                }
            };
        }
        pose.build_local_matrices();
    }
}

/// Converts playback seconds to wrapped clip ticks in `[0, duration)`.
fn wrap_clip_time(clip: &AnimationClip, time_seconds: f32) -> f32 {
    let ticks = if clip.ticks_per_second > 0.0 {
        time_seconds * clip.ticks_per_second
    } else {
        time_seconds
    };
    if clip.duration <= 0.0 {
        0.0
    } else {
        ticks.rem_euclid(clip.duration)
    }
}

/// Finds the bracketing key pair for `ticks` and interpolates.
fn sample_track<T: Copy>(
    keys: &[Keyframe<T>],
    ticks: f32,
    default: T,
    interpolate: impl Fn(T, T, f32) -> T,
) -> T {
    let Some(first) = keys.first() else {
        return default;
    };
    let last = &keys[keys.len() - 1];

    // Wrapped time before the first key lies in the final wrap-around segment.
    if ticks < first.time {
        return last.value;
    }

    // First key strictly after `ticks`; its predecessor anchors the interval.
    let next = keys.partition_point(|k| k.time <= ticks);
    if next >= keys.len() {
        return last.value;
    }

    let k0 = &keys[next - 1];
    let k1 = &keys[next];
    let span = k1.time - k0.time;
    let t = if span > 0.0 { (ticks - k0.time) / span } else { 0.0 };
    interpolate(k0.value, k1.value, t)
}

/// Renormalizes a weight-averaged quaternion accumulator.
fn normalize_accumulated(accumulated: Vec4) -> Quat {
    let length = accumulated.length();
    if length > f32::EPSILON {
        Quat::from_vec4(accumulated / length)
    } else {
        // Opposing rotations cancelled out exactly.
        Quat::IDENTITY
    }
}
