use tokio_util::sync::CancellationToken;

use crate::client::{ContactoSmsError, Executor};
use crate::domain::{
    ApiResponse, CreateShortlink, ShortlinkId, ShortlinkListFilter, ShortlinkResponse,
    ShortlinkStatus,
};
use crate::transport::shortlinks as wire;

#[derive(Clone, Copy)]
/// Shortlink operations, from [`ContactoSmsClient::shortlinks`](crate::ContactoSmsClient::shortlinks)
/// or [`RetryingClient::shortlinks`](crate::RetryingClient::shortlinks).
pub struct Shortlinks<'a> {
    executor: Executor<'a>,
}

impl<'a> Shortlinks<'a> {
    pub(crate) fn new(executor: Executor<'a>) -> Self {
        Self { executor }
    }

    /// List shortlinks matching `filter`.
    ///
    /// A 404 from the server is reported as an empty, successful list.
    pub async fn list(
        &self,
        filter: &ShortlinkListFilter,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<ShortlinkResponse>>, ContactoSmsError> {
        let request = wire::encode_list(filter)?;
        let response = self.executor.execute(request, cancel).await?;
        Ok(wire::normalize_list(response))
    }

    /// Look up one shortlink; a 404 becomes "Shortlink not found".
    pub async fn get(
        &self,
        id: &ShortlinkId,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ShortlinkResponse>, ContactoSmsError> {
        let response = self.executor.execute(wire::encode_get(id)?, cancel).await?;
        if !response.is_ok() && wire::is_not_found(&response) {
            tracing::warn!(id = id.as_str(), "shortlink not found");
        }
        Ok(wire::normalize_get(response))
    }

    /// Shorten `request.long_url`.
    pub async fn create(
        &self,
        request: &CreateShortlink,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ShortlinkResponse>, ContactoSmsError> {
        let request = wire::encode_create(request)?;
        let response = self.executor.execute(request, cancel).await?;
        Ok(wire::normalize_single(response))
    }

    /// Activate or deactivate a shortlink.
    pub async fn update_status(
        &self,
        id: &ShortlinkId,
        status: ShortlinkStatus,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ShortlinkResponse>, ContactoSmsError> {
        let request = wire::encode_update_status(id, status)?;
        let response = self.executor.execute(request, cancel).await?;
        Ok(wire::normalize_single(response))
    }
}
