//! Typed Rust client for the Contacto SMS REST API.
//!
//! Requests are described by a domain layer of strong types, signed with HMAC-SHA1 by the
//! transport layer, and sent by a small client layer that turns every HTTP exchange into a
//! uniform [`ApiResponse`].
//!
//! ```rust,no_run
//! use contactosms::{
//!     ApiKey, ApiUrl, CancellationToken, ContactoSmsClient, Credentials, MessageText, Msisdn,
//!     SecretKey, SendToContact,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), contactosms::ContactoSmsError> {
//!     let credentials = Credentials::new(ApiKey::new("...")?, SecretKey::new("...")?);
//!     let client =
//!         ContactoSmsClient::builder(credentials, ApiUrl::parse("https://host/api/")?).build()?;
//!
//!     let request = SendToContact::new(Msisdn::new("50212345678")?, MessageText::new("hola")?);
//!     let response = client
//!         .messages()
//!         .send_to_contact(&request, &CancellationToken::new())
//!         .await?;
//!     if !response.is_ok() {
//!         eprintln!("{}: {}", response.error_code, response.error_description);
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod transport;

pub use client::{
    ClientOptions, ContactoSmsClient, ContactoSmsClientBuilder, ContactoSmsError, HttpTransport,
    Messages, ProxyOptions, ReqwestTransport, RetryOptions, RetryPolicy, RetryingClient,
    Shortlinks, TransportError, block_on,
};
pub use domain::{
    ActionMessageResponse, AddSchedule, ApiFailure, ApiKey, ApiRequest, ApiResponse, ApiUrl,
    CallClass, ClientMessageId, CreateShortlink, GroupShortName, InboxFilter,
    InboxMessageResponse, LongUrl, MessageDirection, MessageListFilter, MessageResponse,
    MessageStatus, MessageText, Msisdn, PhoneNumber, RepeatInterval, SERVER_ERROR_CODE,
    SUCCESS_CODE, ScheduleMessageResponse, SecretKey, SendToContact, SendToGroups, ShortlinkId,
    ShortlinkListFilter, ShortlinkResponse, ShortlinkStatus, TRANSPORT_FAILURE_CODE,
    ValidationError,
};
pub use reqwest::Method;
pub use tokio_util::sync::CancellationToken;
pub use transport::Credentials;
