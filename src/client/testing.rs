use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::{BoxFuture, ContactoSmsClient, HttpTransport, TransportError};
use crate::domain::{ApiKey, ApiUrl, SecretKey};
use crate::transport::{Credentials, HttpRequest, HttpResponse};

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    responses: VecDeque<Result<HttpResponse, TransportError>>,
    hang: bool,
}

impl FakeTransport {
    pub(crate) fn new(status: u16, body: impl Into<String>) -> Self {
        let transport = Self::default();
        transport.push_response(status, body);
        transport
    }

    /// A transport whose calls never complete.
    pub(crate) fn hanging() -> Self {
        let transport = Self::default();
        transport.state.lock().unwrap().hang = true;
        transport
    }

    pub(crate) fn push_response(&self, status: u16, body: impl Into<String>) {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or_default()
            .to_owned();
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Ok(HttpResponse {
                status,
                reason,
                body: body.into(),
            }));
    }

    pub(crate) fn push_error(&self, error: TransportError) {
        self.state.lock().unwrap().responses.push_back(Err(error));
    }

    pub(crate) fn calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

impl HttpTransport for FakeTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let (hang, next) = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(request);
                let next = state.responses.pop_front();
                // The last queued response is sticky.
                if let Some(Ok(response)) = next.as_ref() {
                    if state.responses.is_empty() {
                        state.responses.push_back(Ok(response.clone()));
                    }
                }
                (state.hang, next)
            };
            if hang {
                std::future::pending::<()>().await;
            }
            next.unwrap_or_else(|| Err(TransportError::Network("no response queued".into())))
        })
    }
}

pub(crate) fn credentials() -> Credentials {
    Credentials::new(
        ApiKey::new("test-api-key").unwrap(),
        SecretKey::new("test-secret").unwrap(),
    )
}

pub(crate) fn base_url() -> ApiUrl {
    ApiUrl::parse("https://api.example.invalid/api/").unwrap()
}

pub(crate) fn client_with(transport: &FakeTransport) -> ContactoSmsClient {
    ContactoSmsClient::builder(credentials(), base_url())
        .transport(Arc::new(transport.clone()))
        .build()
        .unwrap()
}
