//! Volume snapshots

use super::de::null_as_default;
use super::kind::{ResourceKind, ResourceSpec, Shape};
use super::volume::Volume;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payload for snapshotting a volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCreateRequest {
    pub name: String,
    pub volume_id: String,
    /// Snapshot even when the volume is attached
    pub force: bool,
}

/// A volume snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub volume_type_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub volume_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(
        rename = "os-extended-snapshot-attributes:progress",
        deserialize_with = "null_as_default"
    )]
    pub progress: String,
    #[serde(
        rename = "os-extended-snapshot-attributes:project_id",
        deserialize_with = "null_as_default"
    )]
    pub tenant_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_using_autoscale: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(rename = "volume", deserialize_with = "null_as_default")]
    pub from_volume: Volume,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
}

/// Marker for the snapshot collection
#[derive(Debug, Clone, Copy)]
pub struct Snapshots;

impl ResourceKind for Snapshots {
    const NAME: &'static str = "snapshot";
    const SPEC: ResourceSpec = ResourceSpec {
        base_path: "/iaas-cloud/api/snapshots",
        service: None,
        create_shape: Shape::Bare,
        list_shape: Shape::Bare,
    };

    type CreateRequest = SnapshotCreateRequest;
    type Entity = Snapshot;
    type Summary = Snapshot;
}
