use std::borrow::Cow;
use std::collections::BTreeMap;

use log::{debug, error};
use serde_json::{Map, Value};

use crate::context::{ConsumerCredentials, UserToken};
use crate::error::{Error, Result, TransportError};
use crate::profile::UserProfile;
use crate::transport::{Transport, TransportResponse};
use crate::v1::values::OAUTH_PARAM_KEY_TOKEN;
use crate::v1::OAuthRequestBuilder;

/// FatSecret REST endpoint; every platform method goes through it.
pub const PLATFORM_URL: &str = "https://platform.fatsecret.com/rest/server.api";

const PARAM_KEY_METHOD: &str = "method";
const PARAM_KEY_FORMAT: &str = "format";
const FORMAT_JSON: &str = "json";
const ERROR_KEY: &str = "error";
const PROFILE_KEY: &str = "profile";

/// Client for the FatSecret platform, signing each call for one user token.
///
/// Holds no state between calls; a failed call is reported once and never
/// retried here.
#[derive(Debug)]
pub struct PlatformClient<'a, T> {
    credentials: &'a ConsumerCredentials,
    transport: T,
    endpoint: Cow<'a, str>,
}

impl<'a, T: Transport> PlatformClient<'a, T> {
    pub fn new(credentials: &'a ConsumerCredentials, transport: T) -> Self {
        PlatformClient {
            credentials,
            transport,
            endpoint: Cow::Borrowed(PLATFORM_URL),
        }
    }

    /// Send requests somewhere other than [`PLATFORM_URL`].
    pub fn with_endpoint(self, endpoint: impl Into<Cow<'a, str>>) -> Self {
        PlatformClient {
            endpoint: endpoint.into(),
            ..self
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Bind a user token, for callers that make several calls for one user.
    pub fn session<'s>(&'s self, token: &'s UserToken) -> UserSession<'s, 'a, T> {
        UserSession {
            client: self,
            token,
        }
    }

    /// Call a platform method on behalf of `token`'s owner.
    ///
    /// `extra_params` override the base `method`/`format`/`oauth_token`
    /// parameters on key collision.
    ///
    /// # Errors
    /// - [`Error::RemoteApi`] when the body is an `{"error": {...}}` envelope.
    /// - [`Error::Transport`] when no response arrives, the status is not 2xx
    ///   without an error envelope, or the body is not a JSON object.
    /// - [`Error::Signing`] when `extra_params` carry `oauth_signature`.
    pub fn call_method<I, K, V>(
        &self,
        token: &UserToken,
        http_method: &str,
        platform_method: &str,
        extra_params: I,
    ) -> Result<Map<String, Value>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = BTreeMap::new();
        params.insert(PARAM_KEY_METHOD.to_string(), platform_method.to_string());
        params.insert(PARAM_KEY_FORMAT.to_string(), FORMAT_JSON.to_string());
        params.insert(OAUTH_PARAM_KEY_TOKEN.to_string(), token.token().to_string());
        params.extend(extra_params.into_iter().map(|(k, v)| (k.into(), v.into())));

        let request = OAuthRequestBuilder::new(self.credentials.consumer_key()).build(
            http_method,
            &self.endpoint,
            params,
            self.credentials.consumer_secret(),
            token.secret(),
        )?;

        debug!(
            "calling {} {} ({})",
            request.method(),
            platform_method,
            self.endpoint
        );
        let response = self.transport.send(&request)?;
        read_response(platform_method, response)
    }

    /// Fetch the `profile` object of `token`'s owner (`profile.get`).
    pub fn fetch_user_status(&self, token: &UserToken) -> Result<UserProfile> {
        let mut body = self.call_method(
            token,
            "GET",
            "profile.get",
            std::iter::empty::<(String, String)>(),
        )?;
        match body.remove(PROFILE_KEY) {
            Some(Value::Object(fields)) => Ok(UserProfile::new(fields)),
            _ => Err(TransportError::InvalidBody(format!(
                "profile.get response has no {:?} object",
                PROFILE_KEY
            ))
            .into()),
        }
    }
}

/// A [`PlatformClient`] bound to one user's token.
#[derive(Debug)]
pub struct UserSession<'s, 'a, T> {
    client: &'s PlatformClient<'a, T>,
    token: &'s UserToken,
}

impl<'s, 'a, T: Transport> UserSession<'s, 'a, T> {
    pub fn token(&self) -> &UserToken {
        self.token
    }

    pub fn call_method<I, K, V>(
        &self,
        http_method: &str,
        platform_method: &str,
        extra_params: I,
    ) -> Result<Map<String, Value>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.client
            .call_method(self.token, http_method, platform_method, extra_params)
    }

    pub fn fetch_user_status(&self) -> Result<UserProfile> {
        self.client.fetch_user_status(self.token)
    }
}

fn read_response(
    platform_method: &str,
    response: TransportResponse,
) -> Result<Map<String, Value>> {
    let parsed = serde_json::from_str::<Value>(&response.body);

    if !response.is_success() {
        if let Ok(Value::Object(body)) = &parsed {
            if let Some(err) = remote_error(body) {
                error!(
                    "platform returned status {} with error for {}: {:?}",
                    response.status,
                    platform_method,
                    body.get(ERROR_KEY)
                );
                return Err(err);
            }
        }
        error!(
            "platform server error for {}. status: {}, reason: {:?}",
            platform_method, response.status, response.reason
        );
        return Err(TransportError::Status {
            status: response.status,
            reason: response.reason,
        }
        .into());
    }

    let body = match parsed {
        Ok(Value::Object(body)) => body,
        Ok(other) => {
            let reason = format!("expected an object, got {}", other);
            return Err(TransportError::InvalidBody(reason).into());
        }
        Err(e) => return Err(TransportError::InvalidBody(e.to_string()).into()),
    };
    if body.contains_key(ERROR_KEY) {
        error!(
            "platform returned error for {}: {:?}",
            platform_method,
            body.get(ERROR_KEY)
        );
        return Err(remote_error(&body).unwrap_or_else(|| {
            TransportError::InvalidBody("error envelope without an integer code".into()).into()
        }));
    }
    Ok(body)
}

/// Extract `error.code` (integer, integral float or integer-valued string) and
/// `error.message`.
fn remote_error(body: &Map<String, Value>) -> Option<Error> {
    let err = body.get(ERROR_KEY)?.as_object()?;
    let code = match err.get("code")? {
        Value::Number(n) => match n.as_i64() {
            Some(code) => code,
            None => {
                let code = n.as_f64()?;
                if code.fract() != 0.0 || code.abs() >= i64::MAX as f64 {
                    return None;
                }
                code as i64
            }
        },
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    let message = err.get("message").and_then(Value::as_str).map(str::to_string);
    Some(Error::RemoteApi { code, message })
}
