use std::fmt;

use phonenumber::country;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::domain::validation::ValidationError;

fn non_blank(value: impl Into<String>, field: &'static str) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Public API key, sent in the `Authorization` header and prefixed to every canonical string.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Configuration field name (`api_key`).
    pub const FIELD: &'static str = "api_key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_blank(value, Self::FIELD)?))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone)]
/// Shared secret used as the HMAC key. Never printed.
///
/// Invariant: not blank. Surrounding whitespace is preserved because it is part of the key.
pub struct SecretKey(SecretString);

impl SecretKey {
    /// Configuration field name (`secret_key`).
    pub const FIELD: &'static str = "secret_key";

    /// Create a validated [`SecretKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(SecretString::from(value)))
    }

    /// Expose the secret for signing only.
    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Base URL of the REST API, e.g. `https://api.example.com/api/`.
///
/// Invariant: absolute URL with a scheme and a host.
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Configuration field name (`api_url`).
    pub const FIELD: &'static str = "api_url";

    /// Parse and validate a base URL.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let input = non_blank(value, Self::FIELD)?;
        let url = match Url::parse(&input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                return Err(ValidationError::RelativeUrl { input });
            }
            Err(_) => return Err(ValidationError::InvalidUrl { input }),
        };
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ValidationError::RelativeUrl { input });
        }
        Ok(Self(url))
    }

    /// Borrow the parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Resolve an endpoint path below the base path.
    ///
    /// `https://host/api/` + `/messages` and `https://host/api` + `messages` both give
    /// `https://host/api/messages`.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.0.clone();
        let joined = format!(
            "{}/{}",
            self.0.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Subscriber number in international format without the leading `+` (`msisdn`).
///
/// Invariant: non-empty after trimming. This type does not normalize; parse into
/// [`PhoneNumber`] and convert it when normalization is wanted.
pub struct Msisdn(String);

impl Msisdn {
    /// Wire field name (`msisdn`).
    pub const FIELD: &'static str = "msisdn";

    /// Create a validated (non-empty) msisdn.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_blank(value, Self::FIELD)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for Msisdn {
    /// E.164 form without the `+` prefix.
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164.trim_start_matches('+').to_owned())
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let raw = non_blank(input, Msisdn::FIELD)?;

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;
        if !phonenumber::is_valid(&parsed) {
            return Err(ValidationError::InvalidPhoneNumber { input: raw });
        }

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`message`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Wire field name (`message`).
    pub const FIELD: &'static str = "message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Group short name used to address a contact group (`short_name`).
pub struct GroupShortName(String);

impl GroupShortName {
    pub const FIELD: &'static str = "short_name";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_blank(value, Self::FIELD)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Caller-chosen message id echoed back by the API (`id`).
pub struct ClientMessageId(String);

impl ClientMessageId {
    pub const FIELD: &'static str = "id";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_blank(value, Self::FIELD)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Shortlink identifier (`id`).
pub struct ShortlinkId(String);

impl ShortlinkId {
    pub const FIELD: &'static str = "id";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self(non_blank(value, Self::FIELD)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Destination URL of a shortlink (`long_url`).
///
/// Invariant: absolute URL.
pub struct LongUrl(String);

impl LongUrl {
    pub const FIELD: &'static str = "long_url";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let input = non_blank(value, Self::FIELD)?;
        Url::parse(&input).map_err(|_| ValidationError::InvalidUrl {
            input: input.clone(),
        })?;
        Ok(Self(input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
