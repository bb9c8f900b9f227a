use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::encoder::percent_encode_str;
use crate::error::{SignError, SignResult};
use crate::v1::values::OAUTH_PARAM_KEY_SIGNATURE;

type HmacSha1 = Hmac<Sha1>;

/// Build the normalized parameter string.
///
/// Every pair becomes `key=encoded(value)`; the pairs are then sorted
/// byte-wise and joined with `&`. Keys are used as given.
pub fn normalize_parameters<I, K, V>(params: I) -> SignResult<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs = params
        .into_iter()
        .map(|(k, v)| {
            let k = k.as_ref();
            if k == OAUTH_PARAM_KEY_SIGNATURE {
                return Err(SignError::SignatureParameterPresent);
            }
            Ok(format!("{}={}", k, percent_encode_str(v.as_ref())))
        })
        .collect::<SignResult<Vec<String>>>()?;
    pairs.sort_unstable();
    Ok(pairs.join("&"))
}

/// Build the signature base string: `METHOD&encoded(url)&encoded(params)`.
pub fn signature_base_string(http_method: &str, url: &str, normalized_params: &str) -> String {
    format!(
        "{}&{}&{}",
        http_method.to_ascii_uppercase(),
        percent_encode_str(url),
        percent_encode_str(normalized_params)
    )
}

/// Build the HMAC key `consumer_secret&token_secret`.
///
/// A missing token secret leaves the key as `consumer_secret&`.
pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!("{}&{}", consumer_secret, token_secret.unwrap_or(""))
}

/// Compute the HMAC-SHA1 signature of a request (base64, no trailing newline).
///
/// # Parameters
/// - http_method: HTTP method, ex)"GET", "POST", ... (case-insensitive)
/// - url: endpoint without query string.
/// - params: every parameter that takes part in the signature, not encoded.
///   Must not contain `oauth_signature`.
/// - consumer_secret: consumer secret key.
/// - token_secret: per-user token secret, if any.
pub fn sign<I, K, V>(
    http_method: &str,
    url: &str,
    params: I,
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> SignResult<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let normalized = normalize_parameters(params)?;
    let base_str = signature_base_string(http_method, url, &normalized);
    let sign_key = signing_key(consumer_secret, token_secret);

    let mut mac = HmacSha1::new_from_slice(sign_key.as_bytes())
        .map_err(|e| SignError::InvalidKey(e.to_string()))?;
    mac.update(base_str.as_bytes());
    let hash = mac.finalize().into_bytes();
    Ok(BASE64.encode(hash).trim_end_matches('\n').to_string())
}
