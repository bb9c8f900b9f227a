//! OAuth 1.0a primitives: parameter values, HMAC-SHA1 signing and request assembly.

pub mod builder;
pub mod signer;
pub mod values;

pub use builder::{
    build_request, generate_nonce, generate_timestamp, OAuthRequestBuilder, SignedRequest,
};
pub use values::SignatureMethod;
