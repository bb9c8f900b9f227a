use std::fmt;

use crate::error::ConfigError;

pub const CONSUMER_KEY_VAR: &str = "CONSUMER_KEY";
pub const CONSUMER_SECRET_VAR: &str = "CONSUMER_SECRET";

/// Application-wide consumer key and secret, loaded once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerCredentials {
    consumer_key: String,
    consumer_secret: String,
}

impl ConsumerCredentials {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        ConsumerCredentials {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Read `CONSUMER_KEY` and `CONSUMER_SECRET` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), with a custom variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let read = |name: &'static str| match lookup(name) {
            None => Err(ConfigError::MissingVariable(name)),
            Some(v) if v.is_empty() => Err(ConfigError::EmptyVariable(name)),
            Some(v) => Ok(v),
        };
        Ok(ConsumerCredentials {
            consumer_key: read(CONSUMER_KEY_VAR)?,
            consumer_secret: read(CONSUMER_SECRET_VAR)?,
        })
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }
}

impl fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

/// Access token and secret issued to one user.
#[derive(Clone, PartialEq, Eq)]
pub struct UserToken {
    token: String,
    secret: Option<String>,
}

impl UserToken {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        UserToken {
            token: token.into(),
            secret: Some(secret.into()),
        }
    }

    /// A token stored without its secret; requests are signed with `consumer_secret&`.
    pub fn without_secret(token: impl Into<String>) -> Self {
        UserToken {
            token: token.into(),
            secret: None,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }
}

impl fmt::Debug for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserToken")
            .field("token", &self.token)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
