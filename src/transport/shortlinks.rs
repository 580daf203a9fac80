//! Wire encoding for the shortlink endpoints, plus their response quirks.

use serde::Serialize;

use crate::domain::{
    ApiRequest, ApiResponse, CreateShortlink, ShortlinkId, ShortlinkListFilter, ShortlinkResponse,
    ShortlinkStatus, ValidationError,
};

pub const LIST_PATH: &str = "short_link/";
pub const CREATE_PATH: &str = "short_link";
pub const NOT_FOUND_CODE: i32 = 404;
pub const NOT_FOUND_DESCRIPTION: &str = "Shortlink not found";

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    long_url: &'a str,
    name: Option<&'a str>,
    status: ShortlinkStatus,
}

#[derive(Debug, Serialize)]
struct UpdateStatusBody {
    status: ShortlinkStatus,
}

pub fn encode_list(filter: &ShortlinkListFilter) -> Result<ApiRequest, ValidationError> {
    let mut request = ApiRequest::get(LIST_PATH)?.append_query_to_url(true);

    if let Some(id) = filter.id.as_ref() {
        return Ok(request.param("id", id.as_str()));
    }

    if let Some(start_date) = non_blank(filter.start_date.as_deref()) {
        request = request.param("start_date", start_date);
    }
    if let Some(end_date) = non_blank(filter.end_date.as_deref()) {
        request = request.param("end_date", end_date);
    }
    if let Some(limit) = filter.limit.filter(|limit| *limit > 0) {
        request = request.param("limit", limit.to_string());
    }
    if let Some(offset) = filter.offset {
        request = request.param("offset", offset.to_string());
    }

    Ok(request)
}

pub fn encode_get(id: &ShortlinkId) -> Result<ApiRequest, ValidationError> {
    Ok(ApiRequest::get(LIST_PATH)?
        .append_query_to_url(true)
        .param("id", id.as_str()))
}

pub fn encode_create(request: &CreateShortlink) -> Result<ApiRequest, ValidationError> {
    let body = CreateBody {
        long_url: request.long_url.as_str(),
        name: non_blank(request.name.as_deref()),
        status: request.status,
    };
    ApiRequest::post(CREATE_PATH)?.json(&body)
}

/// The id is signed as a parameter but only travels in the path.
pub fn encode_update_status(
    id: &ShortlinkId,
    status: ShortlinkStatus,
) -> Result<ApiRequest, ValidationError> {
    ApiRequest::put(format!("short_link/{}/status", id.as_str()))?
        .param("id", id.as_str())
        .json(&UpdateStatusBody { status })
}

/// A listing that finds nothing comes back as 404; report it as an empty list.
pub fn normalize_list(
    mut response: ApiResponse<Vec<ShortlinkResponse>>,
) -> ApiResponse<Vec<ShortlinkResponse>> {
    if response.is_ok() {
        if let Some(items) = response.data.as_mut() {
            items.iter_mut().for_each(ShortlinkResponse::fill_url_id);
        }
        return response;
    }
    if is_not_found(&response) {
        return ApiResponse::success(Vec::new(), response.response);
    }
    response
}

pub fn normalize_single(
    mut response: ApiResponse<ShortlinkResponse>,
) -> ApiResponse<ShortlinkResponse> {
    if let Some(item) = response.data.as_mut() {
        item.fill_url_id();
    }
    response
}

pub fn normalize_get(response: ApiResponse<ShortlinkResponse>) -> ApiResponse<ShortlinkResponse> {
    if !response.is_ok() && is_not_found(&response) {
        return ApiResponse::error(NOT_FOUND_CODE, NOT_FOUND_DESCRIPTION, 404);
    }
    normalize_single(response)
}

pub(crate) fn is_not_found<T>(response: &ApiResponse<T>) -> bool {
    response.http_code == 404 || response.error_code == NOT_FOUND_CODE
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
