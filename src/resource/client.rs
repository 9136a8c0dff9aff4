//! Resource Client
//!
//! One generic adapter implements create, get, delete and list for every
//! [`ResourceKind`]. Each call is a single round trip through the shared
//! [`Transport`]; nothing is cached between calls.

use super::kind::{ResourceKind, Shape};
use super::options::ListOptions;
use crate::api::transport::{ApiRequest, Transport};
use crate::error::Result;
use reqwest::Method;
use std::marker::PhantomData;
use std::sync::Arc;

/// Adapter for one resource collection
pub struct ResourceClient<K: ResourceKind> {
    transport: Arc<dyn Transport>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Clone for ResourceClient<K> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _kind: PhantomData,
        }
    }
}

impl<K: ResourceKind> ResourceClient<K> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _kind: PhantomData,
        }
    }

    fn request(method: Method, path: String) -> ApiRequest {
        ApiRequest::new(method, path).with_service(K::SPEC.service)
    }

    /// Path of a single item, see [`ResourceSpec::item_path`](super::ResourceSpec::item_path)
    pub fn item_path(&self, id: &str) -> String {
        K::SPEC.item_path(id)
    }

    /// Create a resource and return the entity the server sends back
    pub async fn create(&self, request: &K::CreateRequest) -> Result<K::Entity> {
        tracing::debug!("create {}", K::NAME);
        let request = Self::request(Method::POST, K::SPEC.collection_path().to_string())
            .with_json(request)?;

        let body = self.transport.send(request).await?.into_body().read_all().await?;
        K::SPEC.create_shape.decode(&body)
    }

    /// Fetch a single resource by id
    pub async fn get(&self, id: &str) -> Result<K::Entity> {
        tracing::debug!("get {} {:?}", K::NAME, id);
        let request = Self::request(Method::GET, self.item_path(id));

        let body = self.transport.send(request).await?.into_body().read_all().await?;
        Shape::Bare.decode(&body)
    }

    /// Delete a resource by id. The response body is drained and discarded.
    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::debug!("delete {} {:?}", K::NAME, id);
        let request = Self::request(Method::DELETE, self.item_path(id));

        let response = self.transport.send(request).await?;
        let drained = response.into_body().drain().await;
        tracing::debug!("Deleted {} {:?} ({} body bytes discarded)", K::NAME, id, drained);
        Ok(())
    }

    /// List resources in server order
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<K::Summary>> {
        tracing::debug!("list {} {:?}", K::NAME, options);
        let request = Self::request(Method::GET, K::SPEC.collection_path().to_string())
            .with_query(options.to_query());

        let body = self.transport.send(request).await?.into_body().read_all().await?;
        let items: Vec<K::Summary> = K::SPEC.list_shape.decode(&body)?;
        tracing::debug!("Listed {} {}", items.len(), K::NAME);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::{ApiResponse, ResponseBody};
    use crate::error::Error;
    use crate::resource::ResourceSpec;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde::{Deserialize, Serialize};
    use std::sync::Mutex;

    /// Replies with a fixed body and records every request
    struct FakeTransport {
        status: StatusCode,
        body: &'static str,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl FakeTransport {
        fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            let path = request.path.clone();
            self.seen.lock().unwrap().push(request);
            if !self.status.is_success() {
                return Err(Error::from_status(self.status, &path, self.body.to_string()));
            }
            let body = if self.body.is_empty() {
                ResponseBody::empty()
            } else {
                ResponseBody::from_bytes(self.body)
            };
            Ok(ApiResponse::new(self.status, body))
        }
    }

    #[derive(Debug, Serialize)]
    struct NewGadget {
        name: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Gadget {
        id: String,
        name: String,
    }

    struct Gadgets;

    impl ResourceKind for Gadgets {
        const NAME: &'static str = "gadget";
        const SPEC: ResourceSpec = ResourceSpec {
            base_path: "/gadgets",
            service: Some("gadget_service"),
            create_shape: Shape::Field("Gadget"),
            list_shape: Shape::Field("gadgets"),
        };
        type CreateRequest = NewGadget;
        type Entity = Gadget;
        type Summary = Gadget;
    }

    fn client(transport: &Arc<FakeTransport>) -> ResourceClient<Gadgets> {
        ResourceClient::new(transport.clone())
    }

    #[test]
    fn test_create_posts_json_and_unwraps() {
        let transport = FakeTransport::new(
            StatusCode::CREATED,
            r#"{"message":"ok","Gadget":{"id":"g1","name":"first"}}"#,
        );
        let request = NewGadget {
            name: "first".into(),
        };

        let gadget = tokio_test::block_on(client(&transport).create(&request)).unwrap();
        assert_eq!(gadget.id, "g1");

        let seen = transport.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(seen[0].path, "/gadgets");
        assert_eq!(seen[0].service, Some("gadget_service"));
        assert_eq!(seen[0].body.as_ref().unwrap()["name"], "first");
    }

    #[test]
    fn test_get_and_delete_share_item_path() {
        let transport = FakeTransport::new(StatusCode::OK, r#"{"id":"g1","name":"first"}"#);
        let gadgets = client(&transport);

        tokio_test::block_on(gadgets.get("g1")).unwrap();
        tokio_test::block_on(gadgets.delete("g1")).unwrap();
        tokio_test::block_on(gadgets.get("")).unwrap();
        tokio_test::block_on(gadgets.delete("")).unwrap();

        let seen = transport.requests();
        let paths: Vec<&str> = seen.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/gadgets/g1", "/gadgets/g1", "/gadgets", "/gadgets"]);
        assert_eq!(seen[1].method, Method::DELETE);
        assert!(seen[1].body.is_none());
    }

    #[test]
    fn test_delete_no_content() {
        let transport = FakeTransport::new(StatusCode::NO_CONTENT, "");
        tokio_test::block_on(client(&transport).delete("g1")).unwrap();

        // An empty body is not a gadget
        let err = tokio_test::block_on(client(&transport).get("g1")).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_get_decodes_without_envelope() {
        // get never unwraps, even when create does
        let transport = FakeTransport::new(
            StatusCode::OK,
            r#"{"Gadget":{"id":"g1","name":"first"}}"#,
        );
        let err = tokio_test::block_on(client(&transport).get("g1")).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_list_forwards_query_and_keeps_order() {
        let transport = FakeTransport::new(
            StatusCode::OK,
            r#"{"gadgets":[{"id":"b","name":"2"},{"id":"a","name":"1"}]}"#,
        );
        let options = ListOptions::new().page(3);

        let gadgets = tokio_test::block_on(client(&transport).list(&options)).unwrap();
        let ids: Vec<&str> = gadgets.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let seen = transport.requests();
        assert_eq!(seen[0].method, Method::GET);
        assert_eq!(seen[0].path, "/gadgets");
        assert_eq!(seen[0].query, vec![("page".to_string(), "3".to_string())]);
    }

    #[test]
    fn test_status_errors_pass_through() {
        let transport = FakeTransport::new(StatusCode::NOT_FOUND, "");
        let err = tokio_test::block_on(client(&transport).get("missing")).unwrap_err();
        assert!(matches!(err, Error::NotFound { ref path } if path == "/gadgets/missing"));

        let transport = FakeTransport::new(StatusCode::BAD_GATEWAY, "upstream");
        let err = tokio_test::block_on(client(&transport).delete("g1")).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }
}
