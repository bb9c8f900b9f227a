use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("transport failed : {0}")]
    Transport(#[from] TransportError),
    #[error("platform returned error with code {code}")]
    RemoteApi { code: i64, message: Option<String> },
    #[error("OAuth sign failed : {0}")]
    Signing(#[from] SignError),
}

impl Error {
    /// Remote error code, when the platform answered with an error envelope.
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            Error::RemoteApi { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("server responded with status {status}{}", fmt_reason(.reason))]
    Status { status: u16, reason: Option<String> },
    #[error("request could not be completed : {0}")]
    Request(String),
    #[error("response body is not a JSON object : {0}")]
    InvalidBody(String),
}

fn fmt_reason(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(" ({})", r))
        .unwrap_or_default()
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Request(e.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("oauth_signature must not take part in its own signature")]
    SignatureParameterPresent,
    #[error("signing key rejected : {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),
    #[error("environment variable {0} is empty")]
    EmptyVariable(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    #[error("invalid timezone offset, expected +HH:MM or -HH:MM, but got {0:?}")]
    InvalidTimezoneOffset(String),
    #[error("notification window is empty : {0} is not before {1}")]
    EmptyWindow(chrono::NaiveTime, chrono::NaiveTime),
}
