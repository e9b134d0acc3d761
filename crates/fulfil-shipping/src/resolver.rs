//! # HTTP Region Resolver
//!
//! [`RegionResolver`] backed by the region classification service.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_region(country)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GET {endpoint}?country=United%20Kingdom                               │
//! │       │                                                                 │
//! │       ├── send fails / times out ──────────► LookupError::Transport    │
//! │       ├── status not 2xx ──────────────────► LookupError::Transport    │
//! │       ▼                                                                 │
//! │  body: {"region": "UK"}                                                 │
//! │       │                                                                 │
//! │       ├── not JSON ────────────────────────► MalformedResponse         │
//! │       ├── region missing / not UK|EU|OTHER ► InvalidRegion             │
//! │       ▼                                                                 │
//! │  Region::Uk                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! One request per call. No caching, no retries.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use fulfil_core::{Country, LookupError, Region, RegionResolver};

use crate::config::RegionServiceConfig;
use crate::error::ShippingResult;

/// Region resolver that queries the region service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRegionResolver {
    client: Client,
    endpoint: Url,
}

impl HttpRegionResolver {
    /// Builds a resolver from validated settings.
    ///
    /// ## Errors
    /// `InvalidEndpoint` for an unparseable endpoint, `ClientSetup` if the
    /// HTTP client cannot be constructed.
    pub fn new(config: &RegionServiceConfig) -> ShippingResult<Self> {
        let endpoint = config.endpoint_url()?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        debug!(endpoint = %endpoint, timeout_secs = config.timeout_secs, "Region resolver ready");
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Endpoint with the `country` query parameter appended.
    fn request_url(&self, country: &Country) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("country", country.name());
        url
    }
}

#[async_trait]
impl RegionResolver for HttpRegionResolver {
    async fn resolve_region(&self, country: &Country) -> Result<Region, LookupError> {
        let url = self.request_url(country);
        debug!(%url, "Requesting region");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Transport(format!(
                "region service returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let region = parse_region_body(&body)?;
        debug!(country = %country, region = %region, "Region resolved");
        Ok(region)
    }
}

/// Parses a region service response body.
///
/// ```rust
/// use fulfil_core::Region;
/// use fulfil_shipping::parse_region_body;
///
/// assert_eq!(parse_region_body(r#"{"region":"EU"}"#), Ok(Region::Eu));
/// ```
pub fn parse_region_body(body: &str) -> Result<Region, LookupError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

    match value.get("region") {
        Some(Value::String(region)) => region.parse(),
        Some(other) => Err(LookupError::InvalidRegion(other.to_string())),
        None => Err(LookupError::InvalidRegion("response has no region".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response and returns the base URL plus a handle
    /// yielding the raw request that was received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });

        (format!("http://{}/", addr), handle)
    }

    fn resolver_for(endpoint: String) -> HttpRegionResolver {
        HttpRegionResolver::new(&RegionServiceConfig {
            endpoint,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_parse_valid_regions() {
        assert_eq!(parse_region_body(r#"{"region":"UK"}"#), Ok(Region::Uk));
        assert_eq!(parse_region_body(r#"{"region":"EU"}"#), Ok(Region::Eu));
        assert_eq!(parse_region_body(r#"{"region":"OTHER"}"#), Ok(Region::Other));
    }

    #[test]
    fn test_parse_unknown_region() {
        assert_eq!(
            parse_region_body(r#"{"region":"MARS"}"#),
            Err(LookupError::InvalidRegion("MARS".to_string()))
        );
        assert!(matches!(
            parse_region_body(r#"{"region":"uk"}"#),
            Err(LookupError::InvalidRegion(_))
        ));
        assert!(matches!(
            parse_region_body(r#"{"region":7}"#),
            Err(LookupError::InvalidRegion(_))
        ));
        assert!(matches!(
            parse_region_body(r#"{"zone":"UK"}"#),
            Err(LookupError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_parse_garbage_body() {
        assert!(matches!(
            parse_region_body("<html>Bad Gateway</html>"),
            Err(LookupError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_region_body(""),
            Err(LookupError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_url_encodes_country() {
        let resolver = resolver_for("https://regions.example.com/lookup".to_string());
        let url = resolver.request_url(&Country::united_kingdom());
        assert_eq!(
            url.as_str(),
            "https://regions.example.com/lookup?country=United+Kingdom"
        );
    }

    #[tokio::test]
    async fn test_resolve_over_http() {
        let (endpoint, request) = serve_once("200 OK", r#"{"region":"EU"}"#).await;
        let resolver = resolver_for(endpoint);

        let region = resolver.resolve_region(&Country::france()).await;

        assert_eq!(region, Ok(Region::Eu));
        let raw = request.await.unwrap();
        assert!(raw.starts_with("GET /?country=France "));
    }

    #[tokio::test]
    async fn test_error_status_is_transport_failure() {
        let (endpoint, _request) = serve_once("503 Service Unavailable", "{}").await;
        let resolver = resolver_for(endpoint);

        let result = resolver.resolve_region(&Country::albania()).await;

        assert!(matches!(result, Err(LookupError::Transport(msg)) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_invalid_region_over_http() {
        let (endpoint, _request) = serve_once("200 OK", r#"{"region":"ATLANTIS"}"#).await;
        let resolver = resolver_for(endpoint);

        let result = resolver.resolve_region(&Country::new("Atlantis")).await;

        assert_eq!(
            result,
            Err(LookupError::InvalidRegion("ATLANTIS".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let resolver = resolver_for(format!("http://{}/", addr));
        let result = resolver.resolve_region(&Country::france()).await;

        assert!(matches!(result, Err(LookupError::Transport(_))));
    }
}
