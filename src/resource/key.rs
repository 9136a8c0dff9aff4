//! Simple storage access keys

use super::de::null_as_default;
use super::kind::{ResourceKind, ResourceSpec, Shape};
use serde::{Deserialize, Serialize};

/// Service name the key endpoints are served from
pub const SIMPLE_STORAGE_SERVICE: &str = "simple_storage";

/// Payload for creating an access key pair for a subuser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCreateRequest {
    pub subuser_id: String,
    pub access_key: String,
    pub secret_key: String,
}

/// A key pair including its secret. The secret is only sent on create and get.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyHaveSecret {
    #[serde(deserialize_with = "null_as_default")]
    pub access_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub secret_key: String,
}

/// Key summary as returned by list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyInList {
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(deserialize_with = "null_as_default")]
    pub access_key: String,
}

/// Marker for the `/key` collection
#[derive(Debug, Clone, Copy)]
pub struct StorageKeys;

impl ResourceKind for StorageKeys {
    const NAME: &'static str = "storage key";
    const SPEC: ResourceSpec = ResourceSpec {
        base_path: "/key",
        service: Some(SIMPLE_STORAGE_SERVICE),
        create_shape: Shape::Field("Key"),
        list_shape: Shape::Field("keys"),
    };

    type CreateRequest = KeyCreateRequest;
    type Entity = KeyHaveSecret;
    type Summary = KeyInList;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_wire_names() {
        let request = KeyCreateRequest {
            subuser_id: "sub-1".into(),
            access_key: "AK".into(),
            secret_key: "SK".into(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"subuser_id": "sub-1", "access_key": "AK", "secret_key": "SK"})
        );
    }

    #[test]
    fn test_list_envelope() {
        let keys: Vec<KeyInList> = StorageKeys::SPEC
            .list_shape
            .decode(br#"{"keys":[{"user":"u1","access_key":"ak1"}]}"#)
            .unwrap();
        assert_eq!(
            keys,
            vec![KeyInList {
                user: "u1".into(),
                access_key: "ak1".into()
            }]
        );
    }

    #[test]
    fn test_create_envelope() {
        let key: KeyHaveSecret = StorageKeys::SPEC
            .create_shape
            .decode(br#"{"message":"Create key successfully","Key":{"access_key":"AK","secret_key":"SK"}}"#)
            .unwrap();
        assert_eq!(key.access_key, "AK");
        assert_eq!(key.secret_key, "SK");
    }

    #[test]
    fn test_null_key_fields_decode_as_empty() {
        let key: KeyHaveSecret = StorageKeys::SPEC
            .create_shape
            .decode(br#"{"Key":{"access_key":"AK","secret_key":null}}"#)
            .unwrap();
        assert_eq!(key.access_key, "AK");
        assert!(key.secret_key.is_empty());

        let keys: Vec<KeyInList> = StorageKeys::SPEC
            .list_shape
            .decode(br#"{"keys":[{"user":null,"access_key":null},{"user":"u2","access_key":"ak2"}]}"#)
            .unwrap();
        assert_eq!(keys[0], KeyInList::default());
        assert_eq!(keys[1].access_key, "ak2");
    }

    #[test]
    fn test_item_paths() {
        assert_eq!(StorageKeys::SPEC.item_path("AK123"), "/key/AK123");
        assert_eq!(StorageKeys::SPEC.item_path(""), "/key");
    }
}
