//! Per-entity animation state.
//!
//! An [`AnimatorComponent`] owns a set of named layers (slots), each holding a
//! clip reference, a blend weight and an independent playhead. Once per frame
//! the owning entity calls [`update`](AnimatorComponent::update); the renderer
//! then pulls the result through
//! [`get_skinning_palette`](AnimatorComponent::get_skinning_palette).
//!
//! Slot lifecycle: a slot is created the first time a clip is assigned to its
//! name and lives until the component is dropped. A freshly created slot is
//! stopped, full weight, looping, playhead at zero. Play/stop/weight calls on
//! a name that was never assigned a clip are no-ops.
//!
//! A component instance is private mutable state: one thread per instance per
//! frame, no internal synchronization. The `Arc`-shared skeleton and clips are
//! immutable and safe to share across concurrently-updating instances.

use std::sync::Arc;

use glam::Mat4;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::clip::AnimationClip;
use crate::evaluator::{AnimationPoseEvaluator, ClipLayer};
use crate::pose::AnimationPose;
use crate::skeleton::Skeleton;

/// Hard cap on the skinning palette, matching the GPU-side uniform array.
///
/// Skeletons above this bone count are truncated with a logged warning;
/// truncated bones render with visual corruption but never crash.
pub const MAX_PALETTE_SIZE: usize = 128;

/// One named clip assignment: weight, loop flag and independent playhead.
#[derive(Debug, Clone)]
pub struct AnimationLayer {
    pub clip: Arc<AnimationClip>,
    /// Asset identifier, carried for persistence.
    pub clip_guid: String,
    pub weight: f32,
    pub playing: bool,
    pub looping: bool,
    pub time_seconds: f32,
}

/// Drives layered clip playback for one entity and builds its skinning palette.
#[derive(Default)]
pub struct AnimatorComponent {
    skeleton: Option<Arc<Skeleton>>,
    skeleton_guid: String,
    evaluator: Option<AnimationPoseEvaluator>,
    layers: FxHashMap<String, AnimationLayer>,
    pose: AnimationPose,
    // Scratch for the hierarchy walk; kept full-length even when the palette
    // itself is truncated, since late bones still need their parents' globals.
    global_matrices: Vec<Mat4>,
    palette: Vec<Mat4>,
    palette_dirty: bool,
}

impl AnimatorComponent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the bone hierarchy and rebinds the internal evaluator.
    pub fn set_skeleton(&mut self, skeleton: Arc<Skeleton>, guid: &str) {
        self.evaluator = Some(AnimationPoseEvaluator::new(Arc::clone(&skeleton)));
        self.pose.resize(skeleton.bone_count());
        self.skeleton = Some(skeleton);
        self.skeleton_guid = guid.to_string();
        self.palette_dirty = true;
    }

    /// Assigns `clip` to the named slot, creating the slot on first use.
    ///
    /// Replacing the clip on an existing slot preserves its play state, weight
    /// and playhead.
    pub fn set_clip(&mut self, slot: &str, clip: Arc<AnimationClip>, guid: &str) {
        if let Some(layer) = self.layers.get_mut(slot) {
            layer.clip = clip;
            layer.clip_guid = guid.to_string();
        } else {
            self.layers.insert(
                slot.to_string(),
                AnimationLayer {
                    clip,
                    clip_guid: guid.to_string(),
                    weight: 1.0,
                    playing: false,
                    looping: true,
                    time_seconds: 0.0,
                },
            );
        }
        self.palette_dirty = true;
    }

    /// Starts the named slot from its current playhead.
    pub fn play(&mut self, slot: &str, looping: bool) {
        if let Some(layer) = self.layers.get_mut(slot) {
            layer.playing = true;
            layer.looping = looping;
            self.palette_dirty = true;
        }
    }

    /// Stops the named slot; takes effect on the next evaluation.
    pub fn stop(&mut self, slot: &str) {
        if let Some(layer) = self.layers.get_mut(slot) {
            layer.playing = false;
            self.palette_dirty = true;
        }
    }

    pub fn set_weight(&mut self, slot: &str, weight: f32) {
        if let Some(layer) = self.layers.get_mut(slot) {
            layer.weight = weight;
            self.palette_dirty = true;
        }
    }

    /// Advances all playing layers by `dt` seconds and re-blends the pose.
    ///
    /// A non-looping layer reaching the end of its clip clamps its playhead
    /// and stops itself; it no longer contributes to this frame's blend.
    /// Looping layers wrap through the evaluator's modulo and never stop.
    pub fn update(&mut self, dt: f32) {
        for layer in self.layers.values_mut() {
            if !layer.playing {
                continue;
            }
            layer.time_seconds += dt;
            if !layer.looping {
                let end = layer.clip.duration_seconds();
                if layer.time_seconds >= end {
                    layer.time_seconds = end;
                    layer.playing = false;
                }
            }
        }
        self.palette_dirty = true;

        let Some(evaluator) = &self.evaluator else {
            return;
        };
        let active: SmallVec<[ClipLayer<'_>; 4]> = self
            .layers
            .values()
            .filter(|layer| layer.playing && layer.weight > 0.0)
            .map(|layer| ClipLayer {
                clip: layer.clip.as_ref(),
                time_seconds: layer.time_seconds,
                weight: layer.weight,
            })
            .collect();
        evaluator.evaluate_layers(&active, &mut self.pose);
    }

    /// Copies the per-bone skinning matrices (`global * inverse_bind`) into
    /// `out`.
    ///
    /// Returns `false` when no skeleton is bound or it has no bones. Lazily
    /// rebuilds the cached palette when a layer mutation or update has
    /// invalidated it. Palettes above [`MAX_PALETTE_SIZE`] are truncated.
    pub fn get_skinning_palette(&mut self, out: &mut Vec<Mat4>) -> bool {
        let Some(skeleton) = self.skeleton.clone() else {
            return false;
        };
        if skeleton.bone_count() == 0 {
            return false;
        }

        if self.palette_dirty {
            self.walk_hierarchy(&skeleton);

            let palette_len = skeleton.bone_count().min(MAX_PALETTE_SIZE);
            if skeleton.bone_count() > MAX_PALETTE_SIZE {
                log::warn!(
                    "Skeleton '{}' has {} bones; skinning palette truncated to {}",
                    skeleton.name,
                    skeleton.bone_count(),
                    MAX_PALETTE_SIZE
                );
            }
            self.palette.clear();
            self.palette.extend(
                self.global_matrices[..palette_len]
                    .iter()
                    .zip(&skeleton.bones)
                    .map(|(global, bone)| *global * bone.inverse_bind_matrix),
            );
            self.palette_dirty = false;
        }

        out.clear();
        out.extend_from_slice(&self.palette);
        true
    }

    /// Copies the world-space bone matrices (no inverse-bind multiply) into
    /// `out`; debug visualization path, never truncated.
    pub fn get_bone_model_matrices(&mut self, out: &mut Vec<Mat4>) -> bool {
        let Some(skeleton) = self.skeleton.clone() else {
            return false;
        };
        if skeleton.bone_count() == 0 {
            return false;
        }

        self.walk_hierarchy(&skeleton);
        out.clear();
        out.extend_from_slice(&self.global_matrices);
        true
    }

    /// Single forward pass over the topologically-ordered bone array:
    /// `global[i] = global[parent] * local[i]`, identity parent at a root.
    fn walk_hierarchy(&mut self, skeleton: &Skeleton) {
        let bone_count = skeleton.bone_count();
        if self.pose.bone_count() != bone_count {
            self.pose.resize(bone_count);
        }
        if !self.pose.matrices_valid() {
            self.pose.build_local_matrices();
        }

        self.global_matrices.clear();
        self.global_matrices.reserve(bone_count);
        let locals = self.pose.local_matrices();
        for (bone, local) in skeleton.bones.iter().zip(locals) {
            let parent = if bone.parent < 0 {
                Mat4::IDENTITY
            } else {
                self.global_matrices[bone.parent as usize]
            };
            self.global_matrices.push(parent * *local);
        }
    }

    // ========================================================================
    // Read-only inspection
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&Arc<Skeleton>> {
        self.skeleton.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn skeleton_guid(&self) -> &str {
        &self.skeleton_guid
    }

    #[must_use]
    pub fn layer(&self, slot: &str) -> Option<&AnimationLayer> {
        self.layers.get(slot)
    }

    /// All slots, in arbitrary order.
    pub fn layers(&self) -> impl Iterator<Item = (&str, &AnimationLayer)> {
        self.layers.iter().map(|(name, layer)| (name.as_str(), layer))
    }

    #[must_use]
    pub fn is_playing(&self, slot: &str) -> bool {
        self.layers.get(slot).is_some_and(|l| l.playing)
    }

    #[must_use]
    pub fn layer_time(&self, slot: &str) -> Option<f32> {
        self.layers.get(slot).map(|l| l.time_seconds)
    }
}
