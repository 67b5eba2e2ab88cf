//! Animation clip data.
//!
//! An [`AnimationClip`] is an immutable keyframe asset: one [`Channel`] per
//! animated bone, each channel holding three independently-keyed tracks
//! (translation, rotation, scale) sorted by ascending time. Clip time is
//! measured in "ticks"; `ticks_per_second` converts playback seconds to ticks
//! (a rate of 0 means ticks already are seconds).
//!
//! Clips are loaded once from a `.gmanim` asset and shared read-only (behind
//! `Arc`) by every entity playing them. The importer guarantees at most one
//! channel per bone index.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::errors::{AnimationError, Result};

/// A single time-stamped key on one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    /// Key time in clip ticks.
    pub time: f32,
    pub value: T,
}

/// Keyframe tracks for one bone.
#[derive(Debug, Clone, Default)]
pub struct Channel {
    pub bone_name: String,
    pub bone_index: usize,
    pub translation: Vec<Keyframe<Vec3>>,
    pub rotation: Vec<Keyframe<Quat>>,
    pub scale: Vec<Keyframe<Vec3>>,
}

/// A named, time-keyed animation resource.
#[derive(Debug, Clone, Default)]
pub struct AnimationClip {
    pub name: String,
    /// Clip length in ticks.
    pub duration: f32,
    /// Playback rate; `0.0` means tick values are already seconds.
    pub ticks_per_second: f32,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    /// True if any channel targets `bone_index`.
    #[must_use]
    pub fn has_bone(&self, bone_index: usize) -> bool {
        self.channels.iter().any(|c| c.bone_index == bone_index)
    }

    /// Linear scan for the channel targeting `bone_index`.
    #[must_use]
    pub fn find_channel(&self, bone_index: usize) -> Option<&Channel> {
        self.channels.iter().find(|c| c.bone_index == bone_index)
    }

    /// Clip length in playback seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        if self.ticks_per_second > 0.0 {
            self.duration / self.ticks_per_second
        } else {
            self.duration
        }
    }

    /// Parses a `.gmanim` JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: ClipData = serde_json::from_str(json)?;
        let mut channels = Vec::with_capacity(data.channels.len());
        for channel in data.channels {
            if channel.bone_index < 0 {
                return Err(AnimationError::Format(format!(
                    "Channel '{}': negative bone index {}",
                    channel.bone_name, channel.bone_index
                )));
            }
            channels.push(Channel {
                bone_name: channel.bone_name,
                bone_index: channel.bone_index as usize,
                translation: channel
                    .translation
                    .into_iter()
                    .map(|k| Keyframe {
                        time: k.time,
                        value: Vec3::from_array(k.value),
                    })
                    .collect(),
                rotation: channel
                    .rotation
                    .into_iter()
                    .map(|k| Keyframe {
                        time: k.time,
                        // On disk as [w, x, y, z].
                        value: Quat::from_xyzw(k.value[1], k.value[2], k.value[3], k.value[0]),
                    })
                    .collect(),
                scale: channel
                    .scale
                    .into_iter()
                    .map(|k| Keyframe {
                        time: k.time,
                        value: Vec3::from_array(k.value),
                    })
                    .collect(),
            });
        }
        Ok(Self {
            name: data.name,
            duration: data.duration,
            ticks_per_second: data.ticks_per_second,
            channels,
        })
    }

    /// Reads and parses a `.gmanim` file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes back to the `.gmanim` JSON schema.
    pub fn to_json(&self) -> Result<String> {
        let data = ClipData {
            name: self.name.clone(),
            duration: self.duration,
            ticks_per_second: self.ticks_per_second,
            channels: self
                .channels
                .iter()
                .map(|c| ChannelData {
                    bone_name: c.bone_name.clone(),
                    bone_index: c.bone_index as i64,
                    translation: c
                        .translation
                        .iter()
                        .map(|k| Key3Data {
                            time: k.time,
                            value: k.value.to_array(),
                        })
                        .collect(),
                    rotation: c
                        .rotation
                        .iter()
                        .map(|k| Key4Data {
                            time: k.time,
                            value: [k.value.w, k.value.x, k.value.y, k.value.z],
                        })
                        .collect(),
                    scale: c
                        .scale
                        .iter()
                        .map(|k| Key3Data {
                            time: k.time,
                            value: k.value.to_array(),
                        })
                        .collect(),
                })
                .collect(),
        };
        Ok(serde_json::to_string(&data)?)
    }
}

// ============================================================================
// On-disk schema (`.gmanim`)
// ============================================================================

#[derive(Serialize, Deserialize)]
struct ClipData {
    name: String,
    duration: f32,
    #[serde(rename = "ticksPerSecond")]
    ticks_per_second: f32,
    channels: Vec<ChannelData>,
}

#[derive(Serialize, Deserialize)]
struct ChannelData {
    #[serde(rename = "boneName")]
    bone_name: String,
    #[serde(rename = "boneIndex")]
    bone_index: i64,
    #[serde(default)]
    translation: Vec<Key3Data>,
    #[serde(default)]
    rotation: Vec<Key4Data>,
    #[serde(default)]
    scale: Vec<Key3Data>,
}

#[derive(Serialize, Deserialize)]
struct Key3Data {
    time: f32,
    value: [f32; 3],
}

#[derive(Serialize, Deserialize)]
struct Key4Data {
    time: f32,
    value: [f32; 4],
}
