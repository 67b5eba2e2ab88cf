//! Skeletal animation core for the Gem engine.
//!
//! Samples time-keyed animation clips against a bone hierarchy, blends any
//! number of simultaneously-playing layers per entity, and produces the
//! per-bone matrix palette consumed by the GPU skinning shader.
//!
//! Typical frame:
//!
//! ```rust
//! use std::sync::Arc;
//! use gem_animation::{AnimationClip, AnimatorComponent, Skeleton};
//!
//! # fn demo(skeleton: Arc<Skeleton>, idle: Arc<AnimationClip>) {
//! let mut animator = AnimatorComponent::new();
//! animator.set_skeleton(skeleton, "a2f1");
//! animator.set_clip("idle", idle, "77be");
//! animator.play("idle", true);
//!
//! animator.update(1.0 / 60.0);
//! let mut palette = Vec::new();
//! if animator.get_skinning_palette(&mut palette) {
//!     // upload `palette` to the skinning uniform buffer
//! }
//! # }
//! ```

pub mod animator;
pub mod clip;
pub mod errors;
pub mod evaluator;
pub mod math;
pub mod pose;
pub mod skeleton;
pub mod skinned_mesh;

pub use animator::{AnimationLayer, AnimatorComponent, MAX_PALETTE_SIZE};
pub use clip::{AnimationClip, Channel, Keyframe};
pub use errors::{AnimationError, Result};
pub use evaluator::{AnimationPoseEvaluator, ClipLayer};
pub use pose::{AnimationPose, BoneTransform};
pub use skeleton::{Bone, Skeleton};
pub use skinned_mesh::{MeshSection, SkinnedMeshAsset, SkinnedVertex};
