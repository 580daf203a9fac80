use std::time::Duration;

use reqwest::Method;
use time::OffsetDateTime;
use url::Url;

use crate::domain::{ApiRequest, ApiUrl};
use crate::transport::encode::{canonical_query, encode_body};
use crate::transport::signer::{Credentials, http_date};

/// Client-identification header sent with every request.
pub const ORIGIN_HEADER: &str = "X-IM-ORIGIN";
pub const ORIGIN_VALUE: &str = "IM_SDK_RUST";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, PartialEq)]
/// Fully signed request, ready to transmit. Changing any part invalidates the signature.
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// First header value with a case-insensitive name match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub fn build_signed_request(
    credentials: &Credentials,
    base: &ApiUrl,
    request: &ApiRequest,
    timeout: Duration,
) -> HttpRequest {
    build_signed_request_at(credentials, base, request, timeout, OffsetDateTime::now_utc())
}

/// Same as [`build_signed_request`] with an explicit signing time.
///
/// The date is formatted once and reused for both the signature and the `Date` header.
pub fn build_signed_request_at(
    credentials: &Credentials,
    base: &ApiUrl,
    request: &ApiRequest,
    timeout: Duration,
    now: OffsetDateTime,
) -> HttpRequest {
    let body = request.body().map(encode_body);
    let query = canonical_query(request.query());

    let mut url = base.endpoint(request.path());
    if request.appends_query() && !query.is_empty() {
        url.set_query(Some(&query));
    }

    let date = http_date(now);
    let authorization =
        credentials.authorization(&date, &query, body.as_deref().unwrap_or_default());

    let mut headers = vec![
        ("Authorization".to_owned(), authorization),
        ("Date".to_owned(), date),
        (ORIGIN_HEADER.to_owned(), ORIGIN_VALUE.to_owned()),
    ];
    if body.is_some() {
        headers.push(("Content-Type".to_owned(), JSON_CONTENT_TYPE.to_owned()));
    }

    HttpRequest {
        method: request.method().clone(),
        url,
        headers,
        body,
        timeout,
    }
}
