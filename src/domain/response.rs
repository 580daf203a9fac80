use serde::{Deserialize, Serialize};

/// Error code meaning "no error".
pub const SUCCESS_CODE: i32 = 0;
/// Error code for logical failures inside a 2xx response and for unparseable payloads.
pub const SERVER_ERROR_CODE: i32 = 500;
/// Error code for requests that never produced an HTTP response (DNS, connect, timeout).
pub const TRANSPORT_FAILURE_CODE: i32 = -1;

#[derive(Debug, Clone, PartialEq)]
/// Uniform outcome of one API call, for both success and failure.
///
/// Expected API-level failures are values of this type, never `Err`. Branch on
/// [`ApiResponse::is_ok`], then read `error_code` / `error_description`.
pub struct ApiResponse<T> {
    /// Raw response body as received (empty for transport failures).
    pub response: String,
    /// Typed payload, when the response carried one.
    pub data: Option<T>,
    pub http_code: u16,
    pub http_description: String,
    /// [`SUCCESS_CODE`] on success.
    pub error_code: i32,
    pub error_description: String,
}

impl<T> ApiResponse<T> {
    /// Successful outcome carrying `data`.
    pub fn success(data: T, raw: impl Into<String>) -> Self {
        Self {
            response: raw.into(),
            data: Some(data),
            http_code: 200,
            http_description: "OK".to_owned(),
            error_code: SUCCESS_CODE,
            error_description: String::new(),
        }
    }

    /// Failed outcome without a body.
    pub fn error(error_code: i32, error_description: impl Into<String>, http_code: u16) -> Self {
        Self {
            response: String::new(),
            data: None,
            http_code,
            http_description: reason_phrase(http_code),
            error_code,
            error_description: error_description.into(),
        }
    }

    /// `true` iff the HTTP status is 2xx and no error code was set.
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.http_code) && self.error_code == SUCCESS_CODE
    }

    /// Convert into a `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<Option<T>, ApiFailure> {
        if self.is_ok() {
            return Ok(self.data);
        }
        Err(ApiFailure {
            http_code: self.http_code,
            error_code: self.error_code,
            description: self.error_description,
            body: self.response,
        })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            response: self.response,
            data: self.data.map(f),
            http_code: self.http_code,
            http_description: self.http_description,
            error_code: self.error_code,
            error_description: self.error_description,
        }
    }
}

fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or_default()
        .to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API error {error_code}: {description} (HTTP {http_code})")]
/// A failed [`ApiResponse`] turned into an error value.
pub struct ApiFailure {
    pub http_code: u16,
    pub error_code: i32,
    pub description: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageDirection {
    /// Mobile originated (inbound).
    Mo,
    /// Mobile terminated (outbound).
    #[default]
    Mt,
}

impl MessageDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mo => "MO",
            Self::Mt => "MT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageStatus {
    #[default]
    Pending,
    Processing,
    Ready,
    Sent,
    Unread,
    Read,
    Replied,
    Forwarded,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageSentFrom {
    Web,
    ApiHttp,
    #[default]
    ApiRest,
    Sms,
    System,
    Scheduler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RepeatInterval {
    Monthly,
    Weekly,
    Daily,
    Hourly,
    #[default]
    Once,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShortlinkStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageResponse {
    pub message_id: i64,
    pub short_code: String,
    #[serde(rename = "type")]
    pub message_type_id: i32,
    pub direction: MessageDirection,
    pub status: MessageStatus,
    pub sent_from: MessageSentFrom,
    /// Caller-chosen id sent with the message.
    pub id: String,
    pub message: String,
    pub sent_count: i32,
    pub error_count: i32,
    pub total_recipients: i32,
    pub msisdn: String,
    pub country: String,
    pub is_billable: bool,
    pub is_scheduled: bool,
    pub created_on: String,
    pub created_by: String,
    pub total_monitors: i32,
    pub groups: Vec<String>,
    pub recipients: Vec<RecipientResponse>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipientResponse {
    pub msisdn: String,
    pub country: String,
    pub status: MessageStatus,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleMessageResponse {
    pub id: i64,
    pub name: String,
    pub frequency: String,
    pub message: String,
    pub date_expires: String,
    pub groups: Vec<MessageGroup>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageGroup {
    pub short_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxMessageResponse {
    pub status: String,
    pub msisdn: String,
    pub datetime: String,
    pub message: String,
    pub message_id: String,
    pub short_number: String,
    pub created_on: String,
    pub is_deleted: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionMessageResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortlinkResponse {
    pub id: String,
    /// Some endpoints only fill `id`; the client copies it here when blank.
    pub url_id: String,
    pub short_url: String,
    pub long_url: String,
    pub name: String,
    pub status: ShortlinkStatus,
    pub created_on: String,
}

impl ShortlinkResponse {
    pub(crate) fn fill_url_id(&mut self) {
        if self.url_id.trim().is_empty() {
            self.url_id = self.id.clone();
        }
    }
}
