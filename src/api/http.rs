//! HTTP transport for BizFly REST API calls

use super::transport::{ApiRequest, ApiResponse, ResponseBody, Transport};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Default public API endpoint
pub const DEFAULT_API_URL: &str = "https://manage.bizflycloud.vn";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = match body.char_indices().nth(MAX_LOG_BODY_LENGTH) {
        Some((cut, _)) => format!(
            "{}... [truncated, {} bytes total]",
            &body[..cut],
            body.len()
        ),
        None => body.to_string(),
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Settings the transport applies to every request
#[derive(Clone)]
pub struct TransportConfig {
    pub api_url: Url,
    /// Per-service base URLs, keyed by service name
    pub endpoints: HashMap<String, Url>,
    pub auth_token: Option<String>,
    pub project_id: Option<String>,
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Self {
            api_url: Url::parse(api_url)?,
            endpoints: HashMap::new(),
            auth_token: None,
            project_id: None,
            timeout: None,
        })
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_endpoint(mut self, service: &str, url: &str) -> Result<Self> {
        self.endpoints.insert(service.to_string(), Url::parse(url)?);
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Base URL for a service, falling back to the default API URL
    pub fn base_url(&self, service: Option<&str>) -> &Url {
        service
            .and_then(|name| self.endpoints.get(name))
            .unwrap_or(&self.api_url)
    }

    /// Full URL for a request path under the service base URL.
    /// The base URL's own path is kept as a prefix.
    ///
    /// `path` is appended verbatim and the result parsed as a URL, so a `?`
    /// or `#` in it starts a query or fragment and `..` segments are
    /// resolved against the path before them.
    pub fn url_for(&self, service: Option<&str>, path: &str) -> Result<Url> {
        let base = self.base_url(service).as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }
}

impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("api_url", &self.api_url.as_str())
            .field("endpoints", &self.endpoints)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[redacted]"))
            .field("project_id", &self.project_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// reqwest-backed [`Transport`]
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("bizfly/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.config.url_for(request.service, &request.path)?;
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!("{} {} [request_id={}]", request.method, url, request_id);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header("X-Request-Id", &request_id);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &self.config.auth_token {
            builder = builder.header("X-Auth-Token", token);
        }
        if let Some(project_id) = &self.config.project_id {
            builder = builder.header("X-Project-Id", project_id);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("{} {} -> {}", request.method, request.path, status);

        if !status.is_success() {
            // Reading the body to the end releases the connection; a failed
            // read only costs us the error message.
            let body = response.text().await.unwrap_or_default();
            let message = sanitize_for_log(&body);
            tracing::error!("API error: {} - {}", status, message);
            return Err(Error::from_status(status, &request.path, message));
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(Error::from))
            .boxed();

        Ok(ApiResponse::new(status, ResponseBody::new(chunks)))
    }
}

/// Format an API error for display
/// Security: Avoids echoing raw server responses back to the user
pub fn format_api_error(error: &Error) -> String {
    match error {
        Error::NotFound { path } => format!("Resource not found: {}", path),
        Error::HttpStatus { status, .. } => match status.as_u16() {
            401 => "Authentication failed. Check your auth token.".to_string(),
            403 => "Permission denied for this project.".to_string(),
            409 => "Resource conflict. The resource may already exist or be in use.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            400 | 422 => "Invalid request. Check your parameters.".to_string(),
            500..=599 => "Service temporarily unavailable. Please try again.".to_string(),
            code => format!("Request failed with status {}.", code),
        },
        Error::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        Error::Decode(_) => "Unexpected response from the API.".to_string(),
        Error::Encode(_) => "Could not encode the request.".to_string(),
        Error::InvalidUrl(err) => format!("Invalid API URL: {}", err),
    }
}
