use percent_encoding::{percent_encode, utf8_percent_encode, AsciiSet};

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
const TARGETS_FOR_PARAMS: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode the UTF-8 bytes of `input` with the OAuth unreserved set.
pub fn percent_encode_str(input: &str) -> String {
    utf8_percent_encode(input, TARGETS_FOR_PARAMS).to_string()
}

/// Same as [`percent_encode_str`], for raw bytes that are not known to be UTF-8.
pub fn percent_encode_bytes(input: &[u8]) -> String {
    percent_encode(input, TARGETS_FOR_PARAMS).to_string()
}
