//! Transport contract
//!
//! The resource adapters never talk to reqwest directly. They hand an
//! [`ApiRequest`] to a [`Transport`] and get back an [`ApiResponse`] whose
//! body is a byte stream that must be consumed before it is dropped.

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// An outbound API call, relative to the service base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Named service endpoint, `None` for the default API URL
    pub service: Option<&'static str>,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            service: None,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_service(mut self, service: Option<&'static str>) -> Self {
        self.service = service;
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body encoded from `body`
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(Error::Encode)?);
        Ok(self)
    }
}

/// Response body as a stream of chunks
///
/// Either [`read_all`](Self::read_all) or [`drain`](Self::drain) it; both
/// consume the body so the underlying connection can go back to the pool.
pub struct ResponseBody {
    chunks: BoxStream<'static, Result<Bytes>>,
}

impl ResponseBody {
    pub fn new(chunks: BoxStream<'static, Result<Bytes>>) -> Self {
        Self { chunks }
    }

    /// A body that yields `bytes` in a single chunk
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::new(stream::once(async move { Ok::<_, Error>(bytes) }).boxed())
    }

    /// A body with no chunks, as sent with 204 No Content
    pub fn empty() -> Self {
        Self::new(stream::empty().boxed())
    }

    /// Read the whole body into memory
    pub async fn read_all(mut self) -> Result<Bytes> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.chunks.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(buf))
    }

    /// Read and discard the rest of the body, returning the byte count.
    /// Read errors end the drain early and are not reported.
    pub async fn drain(mut self) -> usize {
        let mut drained = 0;
        while let Some(chunk) = self.chunks.next().await {
            match chunk {
                Ok(bytes) => drained += bytes.len(),
                Err(err) => {
                    tracing::debug!("Stopped draining response body: {}", err);
                    break;
                }
            }
        }
        drained
    }
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseBody").finish_non_exhaustive()
    }
}

/// A successful response
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: ResponseBody) -> Self {
        Self { status, body }
    }

    pub fn into_body(self) -> ResponseBody {
        self.body
    }
}

/// Performs API calls with auth and endpoint resolution applied
///
/// Implementations return `Ok` only for success statuses. Non-success
/// responses must have their body consumed before the error is returned,
/// with 404 reported as [`Error::NotFound`] and everything else as
/// [`Error::HttpStatus`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}
