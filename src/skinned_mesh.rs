//! Skinned mesh asset (`.gmskin`).
//!
//! Pure data, produced by the offline importer alongside the skeleton and
//! clips and consumed by the rendering backend: skinned vertices with four
//! bone influences each, material sections over the index buffer, and the
//! bone name list in skeleton-index order. The animation core never evaluates
//! this; it is defined here so the whole asset family shares one schema home.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One vertex with four weighted bone influences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub uv0: [f32; 2],
    #[serde(rename = "boneIndices")]
    pub bone_indices: [u16; 4],
    #[serde(rename = "boneWeights")]
    pub bone_weights: [f32; 4],
}

/// Maps an index-buffer range to a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshSection {
    #[serde(rename = "firstIndex")]
    pub first_index: u32,
    #[serde(rename = "indexCount")]
    pub index_count: u32,
    pub material: String,
}

/// On-disk skinned mesh: geometry plus the bone binding order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkinnedMeshAsset {
    pub name: String,
    pub vertices: Vec<SkinnedVertex>,
    pub indices: Vec<u32>,
    pub sections: Vec<MeshSection>,
    /// Bone names in skeleton-index order; resolves vertex bone indices
    /// against a [`crate::Skeleton`].
    #[serde(rename = "boneNames")]
    pub bone_names: Vec<String>,
}

impl SkinnedMeshAsset {
    /// Parses a `.gmskin` JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a `.gmskin` file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes back to the `.gmskin` JSON schema.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
