use crate::error::TransportError;
use crate::v1::SignedRequest;

/// Raw HTTP response handed back by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        TransportResponse {
            status,
            reason: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a signed request and returns the raw response.
///
/// Parameters go in the query string for `GET`/`DELETE`/`HEAD` and in a
/// form-encoded body otherwise. Implementations use standard form encoding
/// here; the stricter OAuth encoding is only for the signature base string.
/// Any status code is a successful send; only failures to exchange a
/// response are errors.
pub trait Transport {
    fn send(&self, request: &SignedRequest) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &SignedRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request)
    }
}

pub(crate) fn params_in_query(method: &str) -> bool {
    matches!(method, "GET" | "DELETE" | "HEAD")
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use reqwest::blocking::{Client, RequestBuilder};
    use reqwest::Method;

    use super::{params_in_query, Transport, TransportResponse};
    use crate::error::TransportError;
    use crate::v1::SignedRequest;

    /// Blocking transport over `reqwest`.
    ///
    /// No timeout is set by default; configure one on the client passed to
    /// [`with_client`](Self::with_client).
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        inner: Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(client: Client) -> Self {
            ReqwestTransport { inner: client }
        }

        /// The HTTP request `send` would issue, with the signed params attached.
        pub(crate) fn prepare(
            &self,
            request: &SignedRequest,
        ) -> Result<RequestBuilder, TransportError> {
            let method = Method::from_bytes(request.method().as_bytes())
                .map_err(|e| TransportError::Request(e.to_string()))?;
            let builder = self.inner.request(method, request.url());
            Ok(if params_in_query(request.method()) {
                builder.query(&request.pairs())
            } else {
                builder.form(&request.pairs())
            })
        }
    }

    impl Transport for ReqwestTransport {
        fn send(&self, request: &SignedRequest) -> Result<TransportResponse, TransportError> {
            let response = self.prepare(request)?.send()?;
            let status = response.status();
            Ok(TransportResponse {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
                body: response.text()?,
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(TransportResponse::new(200, "{}").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(302, "").is_success());
        assert!(!TransportResponse::new(500, "").is_success());
    }

    #[test]
    fn test_params_in_query() {
        assert!(params_in_query("GET"));
        assert!(params_in_query("DELETE"));
        assert!(!params_in_query("POST"));
        assert!(!params_in_query("PUT"));
    }

    #[cfg(feature = "reqwest")]
    mod wire {
        use std::collections::BTreeMap;

        use super::super::ReqwestTransport;
        use crate::client::PLATFORM_URL;
        use crate::v1::{OAuthRequestBuilder, SignedRequest};

        fn signed(method: &str, params: &[(&str, &str)]) -> SignedRequest {
            let params: BTreeMap<String, String> = params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            OAuthRequestBuilder::new("ck")
                .oauth_nonce("abc123")
                .oauth_timestamp(1_700_000_000)
                .build(method, PLATFORM_URL, params, "cs", Some("tsec"))
                .unwrap()
        }

        fn profile_get(method: &str) -> SignedRequest {
            signed(
                method,
                &[
                    ("method", "profile.get"),
                    ("format", "json"),
                    ("oauth_token", "tok"),
                ],
            )
        }

        fn profile_get_form(encoded_signature: &str) -> String {
            format!(
                "format=json&method=profile.get\
                 &oauth_consumer_key=ck&oauth_nonce=abc123\
                 &oauth_signature={}\
                 &oauth_signature_method=HMAC-SHA1&oauth_timestamp=1700000000\
                 &oauth_token=tok&oauth_version=1.0",
                encoded_signature
            )
        }

        #[test]
        fn test_get_sends_params_in_query() {
            let request = ReqwestTransport::new()
                .prepare(&profile_get("GET"))
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(request.method().as_str(), "GET");
            assert_eq!(request.url().path(), "/rest/server.api");
            let form = profile_get_form("Z7PWx5rQGk73hp%2BfUPNksHHo8Oc%3D");
            assert_eq!(request.url().query(), Some(form.as_str()));
            assert!(request.body().is_none());
        }

        #[test]
        fn test_post_sends_params_in_form_body() {
            let request = ReqwestTransport::new()
                .prepare(&profile_get("POST"))
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(request.method().as_str(), "POST");
            assert_eq!(request.url().query(), None);
            assert_eq!(
                request.headers()["content-type"],
                "application/x-www-form-urlencoded"
            );
            let body = request.body().and_then(|b| b.as_bytes()).unwrap();
            // the method is part of the base string, so POST signs differently
            let form = profile_get_form("x4mEHLOxYFvy6vtvJMT50MFYxfY%3D");
            assert_eq!(body, form.as_bytes());
        }

        #[test]
        fn test_values_are_form_encoded() {
            let signed = signed(
                "GET",
                &[("method", "foods.search"), ("search_expression", "a+b c*")],
            );
            let request = ReqwestTransport::new()
                .prepare(&signed)
                .unwrap()
                .build()
                .unwrap();
            let query = request.url().query().unwrap();
            assert!(query.contains("&search_expression=a%2Bb+c*"), "{}", query);
            assert!(!query.contains("a+b+c"), "{}", query);
        }
    }
}
