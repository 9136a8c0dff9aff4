//! Volume records embedded in other resources

use super::de::{null_as_default, string_or_bool};
use serde::{Deserialize, Serialize};

/// A block storage volume, as embedded in a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub volume_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub availability_zone: String,
    /// Sent as either a string or a bool; bools are kept as `"true"`/`"false"`
    #[serde(deserialize_with = "string_or_bool")]
    pub bootable: String,
    #[serde(deserialize_with = "null_as_default")]
    pub encrypted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub snapshot_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<VolumeAttachment>,
}

/// Where a volume is attached
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeAttachment {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub server_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub attachment_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub volume_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub device: String,
}
