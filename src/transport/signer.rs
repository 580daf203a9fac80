//! HMAC-SHA1 request signing.
//!
//! The server recomputes `base64(HMAC-SHA1(secret, api_key + date + query + body))` and
//! compares it with the `Authorization` header, so every input must be byte-identical to
//! what is transmitted.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::domain::{ApiKey, SecretKey};

type HmacSha1 = Hmac<Sha1>;

/// Scheme prefix of the `Authorization` header.
pub const AUTH_SCHEME: &str = "IM";

#[derive(Clone)]
/// API key + shared secret. Immutable for the lifetime of a client.
pub struct Credentials {
    api_key: ApiKey,
    secret: SecretKey,
}

impl Credentials {
    pub fn new(api_key: ApiKey, secret: SecretKey) -> Self {
        Self { api_key, secret }
    }

    /// Public key, safe to log.
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// `IM <api_key>:<signature>` for the given date, query and body.
    pub fn authorization(&self, date: &str, query: &str, body: &str) -> String {
        let canonical = canonical_string(self.api_key.as_str(), date, query, body);
        let signature = sign(self.secret.expose(), &canonical);
        format!("{AUTH_SCHEME} {}:{signature}", self.api_key.as_str())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_str())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// RFC 1123 date in GMT, e.g. `Mon, 19 Oct 2026 10:00:00 GMT`.
pub fn http_date(at: OffsetDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    at.to_offset(time::UtcOffset::UTC)
        .format(format)
        .unwrap_or_default()
}

/// Concatenation of the signed components, no delimiters.
pub fn canonical_string(api_key: &str, date: &str, query: &str, body: &str) -> String {
    let mut canonical =
        String::with_capacity(api_key.len() + date.len() + query.len() + body.len());
    canonical.push_str(api_key);
    canonical.push_str(date);
    canonical.push_str(query);
    canonical.push_str(body);
    canonical
}

/// Base64 HMAC-SHA1 of `message` keyed with `secret`.
pub fn sign(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}
