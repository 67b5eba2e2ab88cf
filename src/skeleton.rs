//! Bone hierarchy.
//!
//! A [`Skeleton`] is an ordered, topologically-sorted bone array: every bone's
//! parent index refers to an earlier entry (or is `-1` for a root). The
//! importer guarantees the ordering at export time; the runtime relies on it
//! for single-pass hierarchy composition and does not revalidate it.
//!
//! Skeletons are loaded once from a `.gmskel` asset and shared read-only
//! (behind `Arc`) by any number of animator components.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::errors::{AnimationError, Result};

/// A named node in the bone hierarchy.
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone, `-1` for a root.
    pub parent: i32,
    /// Transforms a vertex from mesh space into this bone's local space.
    pub inverse_bind_matrix: Mat4,
}

/// Ordered, topologically-sorted collection of bones.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    pub name: String,
    pub bones: Vec<Bone>,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str, bones: Vec<Bone>) -> Self {
        Self {
            name: name.to_string(),
            bones,
        }
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Linear scan by bone name.
    #[must_use]
    pub fn find_bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Linear scan by bone name.
    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.name == name)
    }

    /// Parses a `.gmskel` JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: SkeletonData = serde_json::from_str(json)?;
        let mut bones = Vec::with_capacity(data.bones.len());
        for bone in data.bones {
            bones.push(Bone {
                inverse_bind_matrix: matrix_from_slice(&bone.inverse_bind_matrix, &bone.name)?,
                name: bone.name,
                parent: bone.parent,
            });
        }
        Ok(Self {
            name: data.name,
            bones,
        })
    }

    /// Reads and parses a `.gmskel` file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes back to the `.gmskel` JSON schema.
    pub fn to_json(&self) -> Result<String> {
        let data = SkeletonData {
            name: self.name.clone(),
            bones: self
                .bones
                .iter()
                .map(|b| BoneData {
                    name: b.name.clone(),
                    parent: b.parent,
                    inverse_bind_matrix: b.inverse_bind_matrix.to_cols_array().to_vec(),
                })
                .collect(),
        };
        Ok(serde_json::to_string(&data)?)
    }
}

fn matrix_from_slice(values: &[f32], bone_name: &str) -> Result<Mat4> {
    let array: [f32; 16] = values.try_into().map_err(|_| {
        AnimationError::Format(format!(
            "Bone '{bone_name}': inverseBindMatrix has {} entries, expected 16",
            values.len()
        ))
    })?;
    // Column-major, matching glam's storage order.
    Ok(Mat4::from_cols_array(&array))
}

// ============================================================================
// On-disk schema (`.gmskel`)
// ============================================================================

#[derive(Serialize, Deserialize)]
struct SkeletonData {
    name: String,
    bones: Vec<BoneData>,
}

#[derive(Serialize, Deserialize)]
struct BoneData {
    name: String,
    parent: i32,
    #[serde(rename = "inverseBindMatrix")]
    inverse_bind_matrix: Vec<f32>,
}
