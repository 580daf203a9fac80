//! Transport layer: signing, wire encoding and response decoding (no network).

mod encode;
mod interpret;
pub(crate) mod messages;
mod request;
pub(crate) mod shortlinks;
mod signer;

pub use encode::{canonical_query, encode_body};
pub use interpret::{
    HttpResponse, LOGICAL_FAILURE_DESCRIPTION, PARSE_FAILURE_DESCRIPTION, interpret_response,
};
pub use request::{
    HttpRequest, JSON_CONTENT_TYPE, ORIGIN_HEADER, ORIGIN_VALUE, build_signed_request,
    build_signed_request_at,
};
pub use signer::{AUTH_SCHEME, Credentials, canonical_string, http_date, sign};
