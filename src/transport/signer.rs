use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::encoding::percent_encode;
use crate::domain::AccessSecret;

type HmacSha1 = Hmac<Sha1>;

/// Every Dysms call is a GET against the service root.
pub const HTTP_METHOD: &str = "GET";
const ROOT_PATH: &str = "/";

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),
}

/// `GET&%2F&<canonical query escaped again>`.
///
/// The canonical query is already escaped once; escaping it a second time here is what the
/// service verifies against.
pub fn string_to_sign(canonical_query: &str) -> String {
    format!(
        "{HTTP_METHOD}&{}&{}",
        percent_encode(ROOT_PATH),
        percent_encode(canonical_query)
    )
}

/// Base64 HMAC-SHA1 of the string-to-sign keyed with `secret&`, escaped for use as a query value.
pub fn sign(secret: &AccessSecret, canonical_query: &str) -> Result<String, SigningError> {
    let key = format!("{}&", secret.as_str());
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|err| SigningError::InvalidKey(err.to_string()))?;
    mac.update(string_to_sign(canonical_query).as_bytes());
    let digest = STANDARD.encode(mac.finalize().into_bytes());
    Ok(percent_encode(&digest))
}

/// `Signature` goes first and is not part of the sorted set.
pub fn assemble_url(endpoint: &str, signature: &str, canonical_query: &str) -> String {
    format!("{endpoint}?Signature={signature}&{canonical_query}")
}
