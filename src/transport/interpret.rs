use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{ApiResponse, SERVER_ERROR_CODE, SUCCESS_CODE};

/// Description used when a 2xx body cannot be decoded into the expected type.
pub const PARSE_FAILURE_DESCRIPTION: &str = "Failed to parse response JSON";
/// Description used when a 2xx envelope carries `"success": false`.
pub const LOGICAL_FAILURE_DESCRIPTION: &str = "API reported an unsuccessful operation";
const UNKNOWN_ERROR_DESCRIPTION: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw transport output: status line and UTF-8 body.
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i32,
    error: String,
}

struct Payload<T> {
    data: Option<T>,
    logical_failure: bool,
}

/// Classify a raw response and decode its payload. Never fails: every outcome is an
/// [`ApiResponse`].
pub fn interpret_response<T: DeserializeOwned>(response: HttpResponse) -> ApiResponse<T> {
    let mut result = ApiResponse {
        response: response.body,
        data: None,
        http_code: response.status,
        http_description: response.reason,
        error_code: SUCCESS_CODE,
        error_description: String::new(),
    };

    if (200..=299).contains(&result.http_code) {
        interpret_success(&mut result);
    } else {
        interpret_error(&mut result);
    }

    result
}

fn interpret_success<T: DeserializeOwned>(result: &mut ApiResponse<T>) {
    if result.response.trim().is_empty() {
        return;
    }

    match decode_payload::<T>(&result.response) {
        Ok(payload) => {
            result.data = payload.data;
            if payload.logical_failure && result.error_code == SUCCESS_CODE {
                result.error_code = SERVER_ERROR_CODE;
                result.error_description = LOGICAL_FAILURE_DESCRIPTION.to_owned();
            }
        }
        Err(_) => {
            result.error_code = SERVER_ERROR_CODE;
            result.error_description = PARSE_FAILURE_DESCRIPTION.to_owned();
        }
    }
}

/// Accepts both `{"data": ..., "success": ...}` envelopes and bare payloads.
fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<Payload<T>, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;

    match value {
        Value::Object(mut envelope) if envelope.contains_key("data") => {
            let logical_failure = matches!(envelope.get("success"), Some(Value::Bool(false)));
            let data = match envelope.remove("data") {
                None | Some(Value::Null) => None,
                Some(data) => Some(serde_json::from_value(data)?),
            };
            Ok(Payload {
                data,
                logical_failure,
            })
        }
        bare => Ok(Payload {
            data: Some(serde_json::from_value(bare)?),
            logical_failure: false,
        }),
    }
}

fn interpret_error<T>(result: &mut ApiResponse<T>) {
    result.error_code = i32::from(result.http_code);
    result.error_description = if result.http_description.trim().is_empty() {
        UNKNOWN_ERROR_DESCRIPTION.to_owned()
    } else {
        result.http_description.clone()
    };

    if let Ok(error) = serde_json::from_str::<ErrorBody>(&result.response) {
        result.error_code = error.code;
        result.error_description = error.error;
    }
}
