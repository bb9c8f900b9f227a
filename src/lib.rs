/*!
fatsecret-oauth: OAuth 1.0a signing and a typed client for the FatSecret platform API.

# Overview

The [`v1`] module signs requests with HMAC-SHA1 the way RFC 5849 describes,
using already-issued per-user tokens. [`PlatformClient`] builds on it: it
signs a platform method call, sends it through a [`Transport`] and turns the
JSON envelope into data or an [`Error`].

# How to use

```no_run
use fatsecret_oauth::{ConsumerCredentials, PlatformClient, ReqwestTransport, UserToken};

let credentials = ConsumerCredentials::from_env()?;
let client = PlatformClient::new(&credentials, ReqwestTransport::new());

let token = UserToken::new("[ACCESS_TOKEN]", "[TOKEN_SECRET]");
let profile = client.fetch_user_status(&token)?;
println!("last weigh-in: {:?}", profile.last_weight_date());
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/
pub mod client;
pub mod context;
pub mod encoder;
pub mod error;
pub mod profile;
pub mod reminder;
pub mod transport;
pub mod v1;

// exposed to external program
pub use client::{PlatformClient, UserSession, PLATFORM_URL};
pub use context::{ConsumerCredentials, UserToken};
pub use error::{
    ConfigError, Error, ReminderError, Result, SignError, SignResult, TransportError,
};
pub use profile::UserProfile;
pub use reminder::{NotificationWindow, ReminderMessage};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::{Transport, TransportResponse};
pub use v1::{build_request, OAuthRequestBuilder, SignedRequest};
