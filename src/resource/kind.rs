//! Resource Kinds
//!
//! Each remote collection is described by a [`ResourceSpec`]: where it
//! lives and how its create and list responses are shaped. That value is
//! attached to a marker type through [`ResourceKind`].

use crate::error::{DecodeError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// How a response body carries its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The body is the payload
    Bare,
    /// The body is an object holding the payload under this field
    Field(&'static str),
}

impl Shape {
    /// Decode `body` into `T` according to this shape
    pub fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        match *self {
            Shape::Bare => Ok(serde_json::from_slice(body)?),
            Shape::Field(field) => {
                let Value::Object(mut envelope) = serde_json::from_slice::<Value>(body)? else {
                    return Err(DecodeError::NotAnObject(field).into());
                };

                if let Some(message) = envelope.get("message").and_then(|v| v.as_str()) {
                    tracing::debug!("API message: {}", message);
                }

                let payload = envelope
                    .remove(field)
                    .ok_or(DecodeError::MissingField(field))?;
                Ok(serde_json::from_value(payload)?)
            }
        }
    }
}

/// Location and response shapes of one resource collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    pub base_path: &'static str,
    /// Named service endpoint the collection lives on, `None` for the default
    pub service: Option<&'static str>,
    pub create_shape: Shape,
    pub list_shape: Shape,
}

impl ResourceSpec {
    pub fn collection_path(&self) -> &'static str {
        self.base_path
    }

    /// Path of a single item.
    ///
    /// An empty `id` resolves to the collection path itself, so `get("")`
    /// fetches whatever the collection endpoint returns. Some singleton-style
    /// endpoints rely on this, so it is kept as is.
    ///
    /// The id is joined without escaping. Characters such as `/`, `?` and `#`
    /// or a `..` id change the URL the request goes to, so callers taking ids
    /// from users should reject them first.
    pub fn item_path(&self, id: &str) -> String {
        if id.is_empty() {
            return self.base_path.to_string();
        }
        [self.base_path, id].join("/")
    }
}

/// A remote resource collection with its request and response types
pub trait ResourceKind: Send + Sync + 'static {
    /// Name used in log lines
    const NAME: &'static str;
    const SPEC: ResourceSpec;

    /// Body of a create call
    type CreateRequest: Serialize + Send + Sync;
    /// Entity returned by create and get
    type Entity: DeserializeOwned + Send;
    /// Element of a list response
    type Summary: DeserializeOwned + Send;
}
