use chrono::Utc;
use std::borrow::Cow;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::SignResult;
use crate::v1::signer;
use crate::v1::values::*;

/// A request whose parameter set carries a computed `oauth_signature`.
///
/// Built fresh for every call; the signature covers exactly `params`
/// minus `oauth_signature`, so the set is not exposed mutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: String,
    url: String,
    params: BTreeMap<String, String>,
}

impl SignedRequest {
    /// HTTP method, upper-cased.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn signature(&self) -> Option<&str> {
        self.get(OAUTH_PARAM_KEY_SIGNATURE)
    }

    pub fn nonce(&self) -> Option<&str> {
        self.get(OAUTH_PARAM_KEY_NONCE)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.get(OAUTH_PARAM_KEY_TIMESTAMP)
    }

    /// Parameters as key-value pairs, ready for a query string or form body.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Generate a fresh nonce: 128 random bits as 32 lowercase hex digits.
pub fn generate_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Seconds since the Unix epoch.
pub fn generate_timestamp() -> String {
    Utc::now().timestamp().to_string()
}

/// OAuth request builder.
///
/// Nonce and timestamp are generated per [`build`](Self::build) call unless
/// pinned with [`oauth_nonce`](Self::oauth_nonce) or
/// [`oauth_timestamp`](Self::oauth_timestamp).
#[derive(Debug, Clone)]
pub struct OAuthRequestBuilder<'a> {
    oauth_consumer_key: Cow<'a, str>,
    oauth_nonce: Option<Cow<'a, str>>,
    oauth_signature_method: SignatureMethod,
    oauth_timestamp: Option<i64>,
}

impl<'a> OAuthRequestBuilder<'a> {
    /// Constructor of OAuthRequestBuilder with OAuth consumer_key.
    pub fn new<K: Into<Cow<'a, str>>>(consumer_key: K) -> Self {
        OAuthRequestBuilder {
            oauth_consumer_key: consumer_key.into(),
            oauth_nonce: None,
            oauth_signature_method: SignatureMethod::default(),
            oauth_timestamp: None,
        }
    }

    pub fn oauth_nonce(&mut self, nonce: impl Into<Cow<'a, str>>) -> &mut Self {
        self.oauth_nonce = Some(nonce.into());
        self
    }

    pub fn oauth_timestamp(&mut self, timestamp: i64) -> &mut Self {
        self.oauth_timestamp = Some(timestamp);
        self
    }

    /// Add the OAuth control parameters to `params` and sign them.
    ///
    /// # Parameters
    /// - http_method: HTTP method, ex)"GET", "POST", ...
    /// - url: access endpoint, without query string.
    /// - params: platform parameters (not encoded), `oauth_token` included.
    /// - consumer_secret: consumer secret key.
    /// - token_secret: per-user token secret.
    ///
    /// # Errors
    /// Fails when `params` already holds an `oauth_signature`.
    pub fn build(
        &self,
        http_method: &str,
        url: &str,
        mut params: BTreeMap<String, String>,
        consumer_secret: &str,
        token_secret: Option<&str>,
    ) -> SignResult<SignedRequest> {
        let timestamp = self
            .oauth_timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(generate_timestamp);
        let nonce = self
            .oauth_nonce
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(generate_nonce);
        let signature_method: &'static str = self.oauth_signature_method.into();

        let basic_params = vec![
            (OAUTH_PARAM_KEY_CONSUMER_KEY, self.oauth_consumer_key.to_string()),
            (OAUTH_PARAM_KEY_SIGNATURE_METHOD, signature_method.to_string()),
            (OAUTH_PARAM_KEY_TIMESTAMP, timestamp),
            (OAUTH_PARAM_KEY_NONCE, nonce),
            (OAUTH_PARAM_KEY_VERSION, OAUTH_VALUE_VERSION.to_string()),
        ];
        for (k, v) in basic_params {
            params.insert(k.to_string(), v);
        }

        // signature goes in last, over everything else
        let signature = signer::sign(http_method, url, &params, consumer_secret, token_secret)?;
        params.insert(OAUTH_PARAM_KEY_SIGNATURE.to_string(), signature);

        Ok(SignedRequest {
            method: http_method.to_ascii_uppercase(),
            url: url.to_string(),
            params,
        })
    }
}

/// Sign `params` for one request with a fresh nonce and timestamp.
pub fn build_request(
    http_method: &str,
    url: &str,
    params: BTreeMap<String, String>,
    consumer_key: &str,
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> SignResult<SignedRequest> {
    OAuthRequestBuilder::new(consumer_key).build(
        http_method,
        url,
        params,
        consumer_secret,
        token_secret,
    )
}
