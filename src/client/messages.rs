use tokio_util::sync::CancellationToken;

use crate::client::{ContactoSmsError, Executor};
use crate::domain::{
    ActionMessageResponse, AddSchedule, ApiResponse, InboxFilter, InboxMessageResponse,
    MessageListFilter, MessageResponse, ScheduleMessageResponse, SendToContact, SendToGroups,
};
use crate::transport::messages as wire;

#[derive(Clone, Copy)]
/// Message operations, from [`ContactoSmsClient::messages`](crate::ContactoSmsClient::messages)
/// or [`RetryingClient::messages`](crate::RetryingClient::messages).
pub struct Messages<'a> {
    executor: Executor<'a>,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(executor: Executor<'a>) -> Self {
        Self { executor }
    }

    /// Send one message to a single MSISDN.
    pub async fn send_to_contact(
        &self,
        request: &SendToContact,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<MessageResponse>, ContactoSmsError> {
        let request = wire::encode_send_to_contact(request)?;
        self.executor.execute(request, cancel).await
    }

    /// Send one message to every member of the given groups.
    pub async fn send_to_groups(
        &self,
        request: &SendToGroups,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<MessageResponse>, ContactoSmsError> {
        let request = wire::encode_send_to_groups(request)?;
        self.executor.execute(request, cancel).await
    }

    /// Sent (or received, depending on the direction filter) messages.
    pub async fn list(
        &self,
        filter: &MessageListFilter,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<MessageResponse>>, ContactoSmsError> {
        let request = wire::encode_message_list(filter)?;
        self.executor.execute(request, cancel).await
    }

    /// Messages received from contacts (MO).
    pub async fn inbox(
        &self,
        filter: &InboxFilter,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<InboxMessageResponse>>, ContactoSmsError> {
        let request = wire::encode_inbox(filter)?;
        self.executor.execute(request, cancel).await
    }

    /// Recurring messages that are currently scheduled.
    pub async fn scheduled(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<ScheduleMessageResponse>>, ContactoSmsError> {
        self.executor.execute(wire::encode_scheduled()?, cancel).await
    }

    /// Schedule a recurring message for a set of groups.
    pub async fn add_schedule(
        &self,
        request: &AddSchedule,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ActionMessageResponse>, ContactoSmsError> {
        let request = wire::encode_add_schedule(request)?;
        self.executor.execute(request, cancel).await
    }

    /// Cancel a scheduled message by its `message_id`.
    pub async fn remove_schedule(
        &self,
        message_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ActionMessageResponse>, ContactoSmsError> {
        let request = wire::encode_remove_schedule(message_id)?;
        self.executor.execute(request, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use crate::client::DEFAULT_QUERY_TIMEOUT;
    use crate::client::testing::{FakeTransport, client_with};
    use crate::domain::{MessageDirection, MessageStatus, MessageText, Msisdn, ValidationError};

    use super::*;

    #[tokio::test]
    async fn send_to_contact_returns_created_message() {
        let transport = FakeTransport::new(
            200,
            r#"{"data": {"message_id": 120, "status": "SENT", "direction": "MT", "msisdn": "50212345678", "message": "hola", "unknown_field": 1}, "success": true}"#,
        );
        let client = client_with(&transport);
        let request = SendToContact::new(
            Msisdn::new("50212345678").unwrap(),
            MessageText::new("hola").unwrap(),
        );

        let response = client
            .messages()
            .send_to_contact(&request, &CancellationToken::new())
            .await
            .unwrap();

        let message = response.data.unwrap();
        assert_eq!(message.message_id, 120);
        assert_eq!(message.status, MessageStatus::Sent);
        assert_eq!(message.direction, MessageDirection::Mt);

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(
            sent.url.as_str(),
            "https://api.example.invalid/api/messages/send_to_contact"
        );
        assert_eq!(
            sent.body.as_deref(),
            Some(r#"{"message":"hola","msisdn":"50212345678"}"#)
        );
    }

    #[tokio::test]
    async fn list_uses_query_timeout_and_appends_query() {
        let transport = FakeTransport::new(200, r#"[{"message_id": 1}, {"message_id": 2}]"#);
        let client = client_with(&transport);

        let response = client
            .messages()
            .list(&MessageListFilter::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.data.map(|items| items.len()), Some(2));
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.timeout, DEFAULT_QUERY_TIMEOUT);
        assert_eq!(sent.url.query(), Some("direction=MT&include_recipients=false"));
    }

    #[tokio::test]
    async fn remove_schedule_validates_before_sending() {
        let transport = FakeTransport::new(200, "{}");
        let client = client_with(&transport);

        let err = client
            .messages()
            .remove_schedule(" ", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ContactoSmsError::Validation(ValidationError::Empty { field: "message_id" })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn scheduled_lists_schedules() {
        let transport = FakeTransport::new(
            200,
            r#"{"data": [{"id": 4, "name": "promo", "groups": [{"short_name": "vip"}]}]}"#,
        );
        let client = client_with(&transport);

        let response = client
            .messages()
            .scheduled(&CancellationToken::new())
            .await
            .unwrap();

        let schedules = response.data.unwrap();
        assert_eq!(schedules[0].name, "promo");
        assert_eq!(schedules[0].groups[0].short_name, "vip");
        assert_eq!(transport.last_request().unwrap().method, Method::GET);
    }
}
