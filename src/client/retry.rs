use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::client::{
    ContactoSmsClient, ContactoSmsError, Executor, Messages, RetryOptions, Shortlinks,
};
use crate::domain::{ApiRequest, ApiResponse, TRANSPORT_FAILURE_CODE, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Fixed-delay retry schedule.
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first call, so `1` disables retries.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, ValidationError> {
        if max_attempts == 0 {
            return Err(ValidationError::ZeroCount {
                field: "max_attempts",
            });
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    pub fn from_options(options: &RetryOptions) -> Result<Self, ValidationError> {
        Self::new(options.max_attempts, Duration::from_millis(options.delay_ms))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Only idempotent calls are repeated, and only after no response at all or a 5xx.
    ///
    /// A POST that timed out may already have been accepted, so sends are never repeated.
    pub fn should_retry<T>(&self, method: &Method, response: &ApiResponse<T>) -> bool {
        method.is_idempotent()
            && (response.error_code == TRANSPORT_FAILURE_CODE
                || (500..=599).contains(&response.http_code))
    }
}

#[derive(Clone)]
/// Wraps a [`ContactoSmsClient`] and repeats transient failures of idempotent calls.
///
/// Every attempt is signed again, so the `Date` header is always fresh. POST requests
/// (message sends, schedule and shortlink creation) go out exactly once.
pub struct RetryingClient {
    inner: ContactoSmsClient,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(inner: ContactoSmsClient, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &ContactoSmsClient {
        &self.inner
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Message endpoints with this client's retry policy.
    pub fn messages(&self) -> Messages<'_> {
        Messages::new(Executor::Retrying(self))
    }

    /// Shortlink endpoints with this client's retry policy.
    pub fn shortlinks(&self) -> Shortlinks<'_> {
        Shortlinks::new(Executor::Retrying(self))
    }

    /// Like [`ContactoSmsClient::execute`]; returns the last outcome once attempts run out.
    pub async fn execute<T>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ContactoSmsError>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 1;
        loop {
            let response = self.inner.execute::<T>(request.clone(), cancel).await?;
            if attempt >= self.policy.max_attempts || !self.policy.should_retry(request.method(), &response) {
                return Ok(response);
            }

            tracing::warn!(
                method = %request.method(),
                path = request.path(),
                attempt,
                max_attempts = self.policy.max_attempts,
                error_code = response.error_code,
                status = response.http_code,
                "retrying request"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ContactoSmsError::Cancelled),
                _ = tokio::time::sleep(self.policy.delay) => {}
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::client::TransportError;
    use crate::client::testing::{FakeTransport, client_with};

    use super::*;

    fn retrying(transport: &FakeTransport, attempts: u32) -> RetryingClient {
        RetryingClient::new(
            client_with(transport),
            RetryPolicy::new(attempts, Duration::from_millis(1)).unwrap(),
        )
    }

    #[tokio::test]
    async fn transport_failure_is_retried_until_success() {
        let transport = FakeTransport::default();
        transport.push_error(TransportError::Network("reset".into()));
        transport.push_response(200, r#"{"data": {"ok": true}}"#);
        let client = retrying(&transport, 3);

        let response: ApiResponse<serde_json::Value> = client
            .execute(
                ApiRequest::get("messages").unwrap(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(response.is_ok());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn server_errors_stop_after_max_attempts() {
        let transport = FakeTransport::new(502, "bad gateway");
        let client = retrying(&transport, 3);

        let response: ApiResponse<serde_json::Value> = client
            .execute(
                ApiRequest::get("messages").unwrap(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.http_code, 502);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn client_errors_and_logical_failures_are_not_retried() {
        let transport = FakeTransport::new(400, r#"{"code": 10, "error": "bad msisdn"}"#);
        let client = retrying(&transport, 3);
        let _: ApiResponse<serde_json::Value> = client
            .execute(
                ApiRequest::get("messages").unwrap(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(transport.calls(), 1);

        let transport = FakeTransport::new(200, r#"{"data": null, "success": false}"#);
        let client = retrying(&transport, 3);
        let response: ApiResponse<serde_json::Value> = client
            .execute(
                ApiRequest::get("messages").unwrap(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(response.error_code, 500);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn posts_are_sent_once_even_on_transport_failure() {
        let transport = FakeTransport::default();
        transport.push_error(TransportError::Timeout("slow".into()));
        transport.push_response(200, r#"{"data": {"ok": true}}"#);
        let client = retrying(&transport, 3);

        let response: ApiResponse<serde_json::Value> = client
            .execute(
                ApiRequest::post("messages/send_to_contact").unwrap(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.error_code, TRANSPORT_FAILURE_CODE);
        assert_eq!(response.http_code, 408);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn puts_and_deletes_are_retried() {
        for request in [
            ApiRequest::put("short_link/abc/status").unwrap(),
            ApiRequest::delete("messages/scheduled").unwrap(),
        ] {
            let transport = FakeTransport::new(503, "");
            let client = retrying(&transport, 2);

            let _: ApiResponse<serde_json::Value> = client
                .execute(request, &CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(transport.calls(), 2);
        }
    }

    #[tokio::test]
    async fn resource_services_use_the_retry_policy() {
        let transport = FakeTransport::default();
        transport.push_response(502, "");
        transport.push_response(200, r#"{"data": []}"#);
        let client = retrying(&transport, 3);

        let response = client
            .messages()
            .scheduled(&CancellationToken::new())
            .await
            .unwrap();

        assert!(response.is_ok());
        assert_eq!(response.data, Some(Vec::new()));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn resource_sends_are_not_repeated() {
        let transport = FakeTransport::new(503, "");
        let client = retrying(&transport, 3);
        let request = crate::domain::SendToContact::new(
            crate::domain::Msisdn::new("50212345678").unwrap(),
            crate::domain::MessageText::new("hola").unwrap(),
        );

        let response = client
            .messages()
            .send_to_contact(&request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.http_code, 503);
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn should_retry_checks_method_and_outcome() {
        let policy = RetryPolicy::default();
        let unavailable = ApiResponse::<()>::error(TRANSPORT_FAILURE_CODE, "down", 503);
        let bad_request = ApiResponse::<()>::error(400, "bad", 400);

        assert!(policy.should_retry(&Method::GET, &unavailable));
        assert!(!policy.should_retry(&Method::POST, &unavailable));
        assert!(!policy.should_retry(&Method::GET, &bad_request));
    }

    #[tokio::test]
    async fn cancellation_during_backoff_stops_retrying() {
        let transport = FakeTransport::new(503, "");
        let client = RetryingClient::new(
            client_with(&transport),
            RetryPolicy::new(5, Duration::from_secs(60)).unwrap(),
        );
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result = client
            .execute::<serde_json::Value>(ApiRequest::get("messages").unwrap(), &cancel)
            .await;

        assert!(matches!(result, Err(ContactoSmsError::Cancelled)));
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn policy_requires_at_least_one_attempt() {
        assert_eq!(
            RetryPolicy::new(0, Duration::ZERO),
            Err(ValidationError::ZeroCount {
                field: "max_attempts"
            })
        );

        let policy = RetryPolicy::from_options(&RetryOptions::default()).unwrap();
        assert_eq!(policy, RetryPolicy::default());
    }
}
