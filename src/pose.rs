//! Evaluated pose buffer.
//!
//! An [`AnimationPose`] holds the per-bone local transform state for one
//! instant in time, plus a lazily-rebuilt cache of the corresponding local
//! matrices. The buffer is owned and reused by whichever evaluator produced
//! it; it is resized on demand to the skeleton's bone count.

use glam::{Mat4, Quat, Vec3};

/// Local translation / rotation / scale of a single bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BoneTransform {
    /// Zero translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Composes `translate(T) * rotate(R) * scale(S)`.
    #[inline]
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-bone local transforms plus a derived local matrix cache.
#[derive(Debug, Clone, Default)]
pub struct AnimationPose {
    transforms: Vec<BoneTransform>,
    local_matrices: Vec<Mat4>,
    matrices_valid: bool,
}

impl AnimationPose {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.transforms.len()
    }

    /// Grows or shrinks the pose; new entries default to identity.
    pub fn resize(&mut self, bone_count: usize) {
        self.transforms.resize(bone_count, BoneTransform::IDENTITY);
        self.local_matrices.resize(bone_count, Mat4::IDENTITY);
        self.matrices_valid = false;
    }

    #[inline]
    #[must_use]
    pub fn transforms(&self) -> &[BoneTransform] {
        &self.transforms
    }

    /// Mutable transform access; invalidates the matrix cache.
    #[inline]
    pub fn transforms_mut(&mut self) -> &mut [BoneTransform] {
        self.matrices_valid = false;
        &mut self.transforms
    }

    /// Rebuilds the local matrix cache from the current transforms.
    ///
    /// Must run after any transform mutation and before the matrices are read
    /// by hierarchy composition.
    pub fn build_local_matrices(&mut self) {
        for (matrix, transform) in self.local_matrices.iter_mut().zip(&self.transforms) {
            *matrix = transform.to_matrix();
        }
        self.matrices_valid = true;
    }

    /// Cached local matrices; stale until [`Self::build_local_matrices`] runs.
    #[inline]
    #[must_use]
    pub fn local_matrices(&self) -> &[Mat4] {
        &self.local_matrices
    }

    #[inline]
    #[must_use]
    pub fn matrices_valid(&self) -> bool {
        self.matrices_valid
    }
}
