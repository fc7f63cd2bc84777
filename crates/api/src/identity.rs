//! Best-effort client-identity lookup from request headers.

use async_trait::async_trait;
use axum::http::HeaderMap;

use civica_core::submit::ClientIdentity;

/// Resolves the submitter's network address from `x-forwarded-for`.
///
/// Resolution is best-effort: a missing or malformed header simply yields
/// `None` and the orchestrator records the `"unknown"` sentinel. Failure
/// here never blocks a submission.
pub struct HeaderIdentity {
    address: Option<String>,
}

impl HeaderIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let address = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Self { address }
    }
}

#[async_trait]
impl ClientIdentity for HeaderIdentity {
    async fn lookup_client_address(&self) -> Option<String> {
        self.address.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn takes_the_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        let identity = HeaderIdentity::from_headers(&headers);
        assert_eq!(
            identity.lookup_client_address().await.as_deref(),
            Some("203.0.113.9")
        );
    }

    #[tokio::test]
    async fn missing_header_resolves_to_none() {
        let identity = HeaderIdentity::from_headers(&HeaderMap::new());
        assert_eq!(identity.lookup_client_address().await, None);
    }

    #[tokio::test]
    async fn blank_header_resolves_to_none() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("  "));
        let identity = HeaderIdentity::from_headers(&headers);
        assert_eq!(identity.lookup_client_address().await, None);
    }
}
