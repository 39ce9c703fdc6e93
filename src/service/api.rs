//! ApiService implementation
//!
//! One internal dispatch path shared by all four verbs: validate, resolve
//! the URL, dress the request, send under deadline/cancellation, classify
//! the outcome. The public surface offers strongly-typed payload variants
//! per verb: JSON (`get`/`post`/…), raw text (`*_text`), raw bytes
//! (`*_bytes`), and no-body (`*_unit`).

use super::types::{CancelSignal, ErrorResponse};
use crate::codec::JsonCodec;
use crate::connector::Connector;
use crate::error::{Error, Result};
use crate::http::{dress, extend_body};
use crate::request::UriRequest;
use crate::types::JsonValue;
use bytes::Bytes;
use reqwest::{header, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

/// Caller-supplied mapping from a non-success response to a custom error
type ErrorMapper = Box<dyn FnOnce(ErrorResponse) -> Error + Send>;

/// Typed HTTP dispatcher for one backend
///
/// Holds only read-only state; concurrent calls through one instance are
/// safe. The transport client is acquired fresh per call and dropped on
/// every exit path.
pub struct ApiService {
    connector: Connector,
    codec: JsonCodec,
    cancel: Option<CancelSignal>,
    log_invalid_requests: bool,
}

impl ApiService {
    /// Create a service for the given connector
    pub fn new(connector: Connector) -> Self {
        let codec = JsonCodec::new(connector.codec);
        Self {
            connector,
            codec,
            cancel: None,
            log_invalid_requests: false,
        }
    }

    /// Attach a cancellation signal governing every call of this service
    #[must_use]
    pub fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    /// Also emit log events for caller-contract violations
    #[must_use]
    pub fn log_invalid_requests(mut self, log: bool) -> Self {
        self.log_invalid_requests = log;
        self
    }

    /// The connector this service dispatches against
    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    // ------------------------------------------------------------------
    // GET
    // ------------------------------------------------------------------

    /// HTTP GET, decoding a JSON payload into `T`
    pub async fn get<T: DeserializeOwned>(
        &self,
        request: &UriRequest,
        accept_json: bool,
    ) -> Result<T> {
        const ACTION: &str = "ApiService.get";
        let response = self
            .dispatch(ACTION, Method::GET, request, None, accept_json, None)
            .await?;
        let text = self.read_text(ACTION, response).await?;
        self.codec.decode(&text)
    }

    /// HTTP GET, returning the payload as text
    pub async fn get_text(&self, request: &UriRequest, accept_json: bool) -> Result<String> {
        const ACTION: &str = "ApiService.get_text";
        let response = self
            .dispatch(ACTION, Method::GET, request, None, accept_json, None)
            .await?;
        self.read_text(ACTION, response).await
    }

    /// HTTP GET, returning the payload as raw bytes
    pub async fn get_bytes(&self, request: &UriRequest) -> Result<Bytes> {
        const ACTION: &str = "ApiService.get_bytes";
        let response = self
            .dispatch(ACTION, Method::GET, request, None, false, None)
            .await?;
        self.read_bytes(ACTION, response).await
    }

    /// HTTP GET for responses with no payload; the body is never read
    pub async fn get_unit(&self, request: &UriRequest, accept_json: bool) -> Result<()> {
        self.dispatch(
            "ApiService.get_unit",
            Method::GET,
            request,
            None,
            accept_json,
            None,
        )
        .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // POST
    // ------------------------------------------------------------------

    /// HTTP POST with a JSON body, decoding a JSON payload into `T`
    pub async fn post<T, B>(&self, request: &UriRequest, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        const ACTION: &str = "ApiService.post";
        let body = serde_json::to_value(body)?;
        let response = self
            .dispatch(ACTION, Method::POST, request, Some(body), false, None)
            .await?;
        let text = self.read_text(ACTION, response).await?;
        self.codec.decode(&text)
    }

    /// HTTP POST, returning the payload as text
    pub async fn post_text<B>(&self, request: &UriRequest, body: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        const ACTION: &str = "ApiService.post_text";
        let body = serde_json::to_value(body)?;
        let response = self
            .dispatch(ACTION, Method::POST, request, Some(body), false, None)
            .await?;
        self.read_text(ACTION, response).await
    }

    /// HTTP POST, returning the payload as raw bytes
    pub async fn post_bytes<B>(&self, request: &UriRequest, body: &B) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        const ACTION: &str = "ApiService.post_bytes";
        let body = serde_json::to_value(body)?;
        let response = self
            .dispatch(ACTION, Method::POST, request, Some(body), false, None)
            .await?;
        self.read_bytes(ACTION, response).await
    }

    /// HTTP POST for responses with no payload; the body is never read
    pub async fn post_unit<B>(&self, request: &UriRequest, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.dispatch(
            "ApiService.post_unit",
            Method::POST,
            request,
            Some(body),
            false,
            None,
        )
        .await?;
        Ok(())
    }

    /// HTTP POST mapping non-success responses through a caller error mapper
    pub async fn post_or_else<T, B, F>(
        &self,
        request: &UriRequest,
        body: &B,
        on_error: F,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
        F: FnOnce(ErrorResponse) -> Error + Send + 'static,
    {
        const ACTION: &str = "ApiService.post";
        let body = serde_json::to_value(body)?;
        let response = self
            .dispatch(
                ACTION,
                Method::POST,
                request,
                Some(body),
                false,
                Some(Box::new(on_error)),
            )
            .await?;
        let text = self.read_text(ACTION, response).await?;
        self.codec.decode(&text)
    }

    // ------------------------------------------------------------------
    // PUT
    // ------------------------------------------------------------------

    /// HTTP PUT with a JSON body, decoding a JSON payload into `T`
    pub async fn put<T, B>(&self, request: &UriRequest, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        const ACTION: &str = "ApiService.put";
        let body = serde_json::to_value(body)?;
        let response = self
            .dispatch(ACTION, Method::PUT, request, Some(body), false, None)
            .await?;
        let text = self.read_text(ACTION, response).await?;
        self.codec.decode(&text)
    }

    /// HTTP PUT, returning the payload as text
    pub async fn put_text<B>(&self, request: &UriRequest, body: &B) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        const ACTION: &str = "ApiService.put_text";
        let body = serde_json::to_value(body)?;
        let response = self
            .dispatch(ACTION, Method::PUT, request, Some(body), false, None)
            .await?;
        self.read_text(ACTION, response).await
    }

    /// HTTP PUT for responses with no payload; the body is never read
    pub async fn put_unit<B>(&self, request: &UriRequest, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.dispatch(
            "ApiService.put_unit",
            Method::PUT,
            request,
            Some(body),
            false,
            None,
        )
        .await?;
        Ok(())
    }

    /// HTTP PUT mapping non-success responses through a caller error mapper
    pub async fn put_or_else<T, B, F>(
        &self,
        request: &UriRequest,
        body: &B,
        on_error: F,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
        F: FnOnce(ErrorResponse) -> Error + Send + 'static,
    {
        const ACTION: &str = "ApiService.put";
        let body = serde_json::to_value(body)?;
        let response = self
            .dispatch(
                ACTION,
                Method::PUT,
                request,
                Some(body),
                false,
                Some(Box::new(on_error)),
            )
            .await?;
        let text = self.read_text(ACTION, response).await?;
        self.codec.decode(&text)
    }

    // ------------------------------------------------------------------
    // DELETE
    // ------------------------------------------------------------------

    /// HTTP DELETE, decoding a JSON payload into `T`
    pub async fn delete<T: DeserializeOwned>(
        &self,
        request: &UriRequest,
        accept_json: bool,
    ) -> Result<T> {
        const ACTION: &str = "ApiService.delete";
        let response = self
            .dispatch(ACTION, Method::DELETE, request, None, accept_json, None)
            .await?;
        let text = self.read_text(ACTION, response).await?;
        self.codec.decode(&text)
    }

    /// HTTP DELETE, returning the payload as text
    pub async fn delete_text(&self, request: &UriRequest, accept_json: bool) -> Result<String> {
        const ACTION: &str = "ApiService.delete_text";
        let response = self
            .dispatch(ACTION, Method::DELETE, request, None, accept_json, None)
            .await?;
        self.read_text(ACTION, response).await
    }

    /// HTTP DELETE for responses with no payload; the body is never read
    pub async fn delete_unit(&self, request: &UriRequest, accept_json: bool) -> Result<()> {
        self.dispatch(
            "ApiService.delete_unit",
            Method::DELETE,
            request,
            None,
            accept_json,
            None,
        )
        .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Dispatch core
    // ------------------------------------------------------------------

    /// Run one call end-to-end, returning the successful response.
    /// Every failure is classified and reported here.
    async fn dispatch(
        &self,
        action: &'static str,
        method: Method,
        request: &UriRequest,
        body: Option<JsonValue>,
        accept_json: bool,
        on_error: Option<ErrorMapper>,
    ) -> Result<Response> {
        match self
            .execute(action, method, request, body, accept_json, on_error)
            .await
        {
            Ok(response) => Ok(response),
            Err(err) => {
                self.report(action, &err);
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        action: &'static str,
        method: Method,
        request: &UriRequest,
        body: Option<JsonValue>,
        accept_json: bool,
        on_error: Option<ErrorMapper>,
    ) -> Result<Response> {
        self.connector.validate()?;
        let url = request.to_url(&self.connector.endpoint)?;

        // Fresh client per call; dropped on every exit path.
        let client = self.build_client()?;
        let mut req = client.request(method.clone(), url.clone());
        req = dress(&self.connector, req, accept_json)?;

        if let Some(body) = body {
            if let Some(merged) = extend_body(&self.connector, Some(body))? {
                req = req
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(self.codec.encode_value(merged));
            }
        }

        let response = self.send(action, req).await?;
        let status = response.status();

        if status.is_success() {
            debug!("Request succeeded: {} {}", method, url);
            return Ok(response);
        }

        let body_text = response.text().await.unwrap_or_default();

        if let Some(on_error) = on_error {
            return Err(on_error(ErrorResponse {
                status: status.as_u16(),
                body: body_text,
            }));
        }

        Err(Error::http_status(status.as_u16(), body_text))
    }

    /// Send under the connector deadline, racing the cancellation signal.
    /// An already-active signal wins over an elapsed deadline.
    async fn send(&self, action: &'static str, req: reqwest::RequestBuilder) -> Result<Response> {
        let send = tokio::time::timeout(self.connector.timeout, req.send());

        let outcome = match &self.cancel {
            Some(cancel) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(Error::cancelled(action)),
                    outcome = send => outcome,
                }
            }
            None => send.await,
        };

        match outcome {
            Err(_elapsed) => Err(self.timeout_error()),
            Ok(Err(e)) if e.is_timeout() => Err(self.timeout_error()),
            Ok(Err(e)) => Err(Error::Http(e)),
            Ok(Ok(response)) => Ok(response),
        }
    }

    async fn read_text(&self, action: &'static str, response: Response) -> Result<String> {
        match response.text().await {
            Ok(text) => Ok(text),
            Err(e) => {
                let err = self.classify_read(e);
                self.report(action, &err);
                Err(err)
            }
        }
    }

    async fn read_bytes(&self, action: &'static str, response: Response) -> Result<Bytes> {
        match response.bytes().await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                let err = self.classify_read(e);
                self.report(action, &err);
                Err(err)
            }
        }
    }

    fn classify_read(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            self.timeout_error()
        } else {
            Error::Http(e)
        }
    }

    fn timeout_error(&self) -> Error {
        Error::Timeout {
            timeout_ms: u64::try_from(self.connector.timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    fn build_client(&self) -> Result<Client> {
        let client = Client::builder()
            .timeout(self.connector.timeout)
            .user_agent(&self.connector.user_agent)
            .danger_accept_invalid_certs(self.connector.insecure_skip_verify)
            .build()?;
        Ok(client)
    }

    /// Emit a structured event for runtime faults. Caller-contract
    /// violations only log when the service is configured to.
    fn report(&self, action: &str, err: &Error) {
        match err {
            Error::HttpStatus { status, body } => {
                error!(action, status, body = body.as_str(), "request failed");
            }
            Error::Timeout { timeout_ms } => {
                error!(action, timeout_ms, "request reached timeout");
            }
            Error::Cancelled { .. } => {
                error!(action, "request was cancelled");
            }
            Error::Http(e) => {
                error!(action, error = %e, "transport failure");
            }
            e if e.is_invalid_request() => {
                if self.log_invalid_requests {
                    error!(action, error = %e, "invalid request");
                }
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for ApiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiService")
            .field("connector", &self.connector)
            .field("has_cancel", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}
