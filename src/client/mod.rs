//! Client layer: signs requests, drives the transport and interprets responses.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    ApiKey, ApiRequest, ApiResponse, ApiUrl, CallClass, SecretKey, TRANSPORT_FAILURE_CODE,
    ValidationError,
};
use crate::transport::{
    Credentials, HttpRequest, HttpResponse, build_signed_request, interpret_response,
};

mod messages;
mod options;
mod retry;
mod shortlinks;
#[cfg(test)]
pub(crate) mod testing;

pub use messages::Messages;
pub use options::{ClientOptions, ProxyOptions, RetryOptions};
pub use retry::{RetryPolicy, RetryingClient};
pub use shortlinks::Shortlinks;

/// Timeout for sends and other small calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for list/query calls.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(90);

pub const TIMEOUT_DESCRIPTION: &str = "Request timeout";
const TIMEOUT_HTTP_CODE: u16 = 408;
const NETWORK_FAILURE_HTTP_CODE: u16 = 503;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sends one signed request and returns the raw response.
///
/// The default implementation is [`ReqwestTransport`]. Implement this to route requests
/// through something else (tests, recording proxies).
pub trait HttpTransport: Send + Sync {
    fn send<'a>(&'a self, request: HttpRequest)
    -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

#[derive(Debug, thiserror::Error)]
/// A request that never produced an HTTP response.
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(#[source] Box<dyn StdError + Send + Sync>),

    /// DNS, connect, TLS or body read failure.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn StdError + Send + Sync>),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(Box::new(err))
        } else {
            Self::Network(Box::new(err))
        }
    }
}

#[derive(Debug, Clone)]
/// [`HttpTransport`] over a pooled `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method, request.url)
                .timeout(request.timeout);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok(HttpResponse {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
                body,
            })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`ContactoSmsClient`].
///
/// API-level failures (non-2xx, error bodies, unreachable server) are not errors: they come
/// back as an [`ApiResponse`] whose [`ApiResponse::is_ok`] is false.
pub enum ContactoSmsError {
    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The underlying HTTP client could not be built (TLS backend, proxy address).
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// An environment variable is missing or malformed.
    #[error("configuration error in {var}: {reason}")]
    Config { var: &'static str, reason: String },

    /// The cancellation token fired before the response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// [`block_on`] was called from inside an async runtime.
    #[error("blocking call made from inside an async runtime; use the async API instead")]
    BlockingInAsyncContext,

    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

#[derive(Clone)]
/// Builder for [`ContactoSmsClient`].
pub struct ContactoSmsClientBuilder {
    credentials: Credentials,
    api_url: ApiUrl,
    timeout: Duration,
    query_timeout: Duration,
    proxy: Option<ProxyOptions>,
    enable_logging: bool,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ContactoSmsClientBuilder {
    pub fn new(credentials: Credentials, api_url: ApiUrl) -> Self {
        Self {
            credentials,
            api_url,
            timeout: DEFAULT_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            proxy: None,
            enable_logging: false,
            user_agent: None,
            transport: None,
        }
    }

    /// Timeout for [`CallClass::Standard`] calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout for [`CallClass::Query`] calls.
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn proxy(mut self, proxy: ProxyOptions) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Emit debug events for every request and response.
    pub fn enable_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom transport instead of building a `reqwest::Client`.
    ///
    /// Proxy and user-agent settings only apply to the built-in transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<ContactoSmsClient, ContactoSmsError> {
        if self.timeout.is_zero() {
            return Err(ValidationError::ZeroDuration { field: "timeout" }.into());
        }
        if self.query_timeout.is_zero() {
            return Err(ValidationError::ZeroDuration {
                field: "query_timeout",
            }
            .into());
        }

        let http = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                if let Some(proxy) = self.proxy {
                    builder = builder.proxy(proxy.to_reqwest()?);
                }
                let client = builder.build().map_err(ContactoSmsError::HttpClient)?;
                Arc::new(ReqwestTransport::new(client))
            }
        };

        Ok(ContactoSmsClient {
            credentials: self.credentials,
            api_url: self.api_url,
            timeout: self.timeout,
            query_timeout: self.query_timeout,
            enable_logging: self.enable_logging,
            http,
        })
    }
}

#[derive(Clone)]
/// Async client for the Contacto SMS REST API.
///
/// Every call goes through [`ContactoSmsClient::execute`]: the request is signed with a fresh
/// timestamp, sent through the configured [`HttpTransport`] and turned into an
/// [`ApiResponse`]. The client holds no mutable state and can be shared across tasks.
pub struct ContactoSmsClient {
    credentials: Credentials,
    api_url: ApiUrl,
    timeout: Duration,
    query_timeout: Duration,
    enable_logging: bool,
    http: Arc<dyn HttpTransport>,
}

impl ContactoSmsClient {
    pub fn builder(credentials: Credentials, api_url: ApiUrl) -> ContactoSmsClientBuilder {
        ContactoSmsClientBuilder::new(credentials, api_url)
    }

    /// Validate `options` and build a client with the built-in transport.
    pub fn from_options(options: &ClientOptions) -> Result<Self, ContactoSmsError> {
        options.validate()?;
        let credentials = Credentials::new(
            ApiKey::new(options.api_key.as_str())?,
            SecretKey::new(options.secret_key.as_str())?,
        );
        let mut builder = Self::builder(credentials, ApiUrl::parse(options.api_url.as_str())?)
            .timeout(options.timeout())
            .query_timeout(options.query_timeout())
            .enable_logging(options.enable_logging);
        if let Some(proxy) = options.proxy.clone() {
            builder = builder.proxy(proxy);
        }
        builder.build()
    }

    pub fn api_url(&self) -> &ApiUrl {
        &self.api_url
    }

    pub fn timeout_for(&self, class: CallClass) -> Duration {
        match class {
            CallClass::Standard => self.timeout,
            CallClass::Query => self.query_timeout,
        }
    }

    /// Message endpoints, one attempt per call.
    pub fn messages(&self) -> Messages<'_> {
        Messages::new(Executor::Single(self))
    }

    /// Shortlink endpoints, one attempt per call.
    pub fn shortlinks(&self) -> Shortlinks<'_> {
        Shortlinks::new(Executor::Single(self))
    }

    /// Sign, send and interpret one request.
    ///
    /// Returns `Err` only for cancellation. Transport failures are reported as
    /// [`TRANSPORT_FAILURE_CODE`] with HTTP 503, or HTTP 408 for timeouts.
    pub async fn execute<T>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ContactoSmsError>
    where
        T: DeserializeOwned,
    {
        if cancel.is_cancelled() {
            return Err(ContactoSmsError::Cancelled);
        }

        let timeout = self.timeout_for(request.class());
        let http_request = build_signed_request(&self.credentials, &self.api_url, &request, timeout);

        if self.enable_logging {
            tracing::debug!(
                method = %http_request.method,
                url = %http_request.url,
                api_key = self.credentials.api_key().as_str(),
                timeout_secs = timeout.as_secs(),
                "sending request"
            );
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(method = %request.method(), path = request.path(), "request cancelled");
                return Err(ContactoSmsError::Cancelled);
            }
            outcome = self.http.send(http_request) => outcome,
        };

        let response = match outcome {
            Ok(response) => interpret_response(response),
            Err(TransportError::Timeout(source)) => {
                tracing::warn!(
                    method = %request.method(),
                    path = request.path(),
                    error = %source,
                    "request timed out"
                );
                ApiResponse::error(TRANSPORT_FAILURE_CODE, TIMEOUT_DESCRIPTION, TIMEOUT_HTTP_CODE)
            }
            Err(TransportError::Network(source)) => {
                tracing::warn!(
                    method = %request.method(),
                    path = request.path(),
                    error = %source,
                    "request failed"
                );
                ApiResponse::error(
                    TRANSPORT_FAILURE_CODE,
                    source.to_string(),
                    NETWORK_FAILURE_HTTP_CODE,
                )
            }
        };

        self.log_response(&request, &response);
        Ok(response)
    }

    /// [`ContactoSmsClient::execute`] with a token that never fires.
    pub async fn execute_uncancellable<T>(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse<T>, ContactoSmsError>
    where
        T: DeserializeOwned,
    {
        self.execute(request, &CancellationToken::new()).await
    }

    fn log_response<T>(&self, request: &ApiRequest, response: &ApiResponse<T>) {
        if response.error_code == TRANSPORT_FAILURE_CODE {
            return;
        }
        if response.is_ok() {
            if self.enable_logging {
                tracing::debug!(
                    method = %request.method(),
                    path = request.path(),
                    status = response.http_code,
                    body = %response.response,
                    "request succeeded"
                );
            }
        } else {
            tracing::warn!(
                method = %request.method(),
                path = request.path(),
                status = response.http_code,
                error_code = response.error_code,
                error = %response.error_description,
                "API returned an error"
            );
        }
    }
}

/// Run `future` to completion on a private current-thread runtime.
///
/// For synchronous callers. Fails with [`ContactoSmsError::BlockingInAsyncContext`] when called
/// from a thread that already drives a tokio runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, ContactoSmsError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(ContactoSmsError::BlockingInAsyncContext);
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}


/// What the resource services send through.
#[derive(Clone, Copy)]
pub(crate) enum Executor<'a> {
    Single(&'a ContactoSmsClient),
    Retrying(&'a RetryingClient),
}

impl Executor<'_> {
    pub(crate) async fn execute<T>(
        self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, ContactoSmsError>
    where
        T: DeserializeOwned,
    {
        match self {
            Self::Single(client) => client.execute(request, cancel).await,
            Self::Retrying(client) => client.execute(request, cancel).await,
        }
    }
}
