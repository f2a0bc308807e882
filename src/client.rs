use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::id::{Id, IdGenerator};
use crate::log;
use crate::request::{self, Arguments, Notification, Payload};
use crate::response::{self, Parsed};
use crate::Result;

/// Carries a serialized message to the server and brings back the reply.
pub trait Transport: Send + Sync {
    /// Send `request` and return the response body.
    ///
    /// When `response_expected` is false the server won't answer, and an empty
    /// string is the expected return value.
    fn send_message(
        &self,
        request: &str,
        response_expected: bool,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// A response body as received, and what it parsed into.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub text: String,
    pub data: Parsed,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ok = self.data.total_ok();
        match self.data.total_errors() {
            0 => write!(f, "<Response[{}]>", ok),
            errors => write!(f, "<Response[{} ok, {} errors]>", ok, errors),
        }
    }
}

/// Overrides of the client's configuration for one call.
#[derive(Clone, Default)]
pub struct RequestOptions {
    id: Option<Id>,
    id_generator: Option<Arc<dyn IdGenerator>>,
    validate_against_schema: Option<bool>,
    trim_log_values: Option<bool>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this id instead of asking a generator.
    pub fn id(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(ids);
        self
    }

    pub fn validate_against_schema(mut self, validate: bool) -> Self {
        self.validate_against_schema = Some(validate);
        self
    }

    pub fn trim_log_values(mut self, trim: bool) -> Self {
        self.trim_log_values = Some(trim);
        self
    }
}

pub struct Client<T> {
    inner: Arc<ClientInner<T>>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Deref for Client<T> {
    type Target = ClientInner<T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        let ids = config.id_generator.generator();
        Self::with_id_generator(transport, config, ids)
    }

    /// `ids` is shared by every request this client builds.
    pub fn with_id_generator(
        transport: T,
        config: ClientConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Client {
            inner: Arc::new(ClientInner {
                transport,
                config,
                id_generator: ids,
            }),
        }
    }
}

pub struct ClientInner<T> {
    transport: T,
    config: ClientConfig,
    id_generator: Arc<dyn IdGenerator>,
}

impl<T: Transport> ClientInner<T> {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn request(&self, method: &str, args: Arguments) -> Result<Response> {
        self.request_with(method, args, RequestOptions::default()).await
    }

    pub async fn request_with(
        &self,
        method: &str,
        args: Arguments,
        options: RequestOptions,
    ) -> Result<Response> {
        let ids = options.id_generator.as_ref().unwrap_or(&self.id_generator);
        let message = request::build(method, args, true, options.id.clone(), &**ids);
        self.send_with(message, &options).await
    }

    pub async fn notify(&self, method: &str, args: Arguments) -> Result<Response> {
        self.notify_with(method, args, RequestOptions::default()).await
    }

    pub async fn notify_with(
        &self,
        method: &str,
        args: Arguments,
        options: RequestOptions,
    ) -> Result<Response> {
        self.send_with(Notification::new(method, args), &options).await
    }

    /// Request `method` and decode its result, escalating an error response
    /// to [`Error::Rpc`].
    pub async fn call<R: DeserializeOwned>(&self, method: &str, args: Arguments) -> Result<R> {
        match self.request(method, args).await?.data {
            Parsed::Single(outcome) => outcome.decode(),
            Parsed::Batch(_) => Err(Error::Schema(
                "expected a single response, got a batch".to_string(),
            )),
        }
    }

    pub async fn send(&self, payload: impl Into<Payload>) -> Result<Response> {
        self.send_with(payload, &RequestOptions::default()).await
    }

    pub async fn send_with(
        &self,
        payload: impl Into<Payload>,
        options: &RequestOptions,
    ) -> Result<Response> {
        let payload = payload.into();
        let text = request::serialize(&payload)?;
        self.dispatch(text, payload.is_batch(), payload.expects_response(), options)
            .await
    }

    /// Send an already serialized request.
    ///
    /// An array is a batch; a single object expects a response only if it
    /// carries an `id`.
    pub async fn send_text(&self, text: &str) -> Result<Response> {
        let value: Value = serde_json::from_str(text).map_err(Error::Request)?;
        let batch = value.is_array();
        let response_expected = batch || value.get("id").is_some();
        self.dispatch(
            text.to_string(),
            batch,
            response_expected,
            &RequestOptions::default(),
        )
        .await
    }

    async fn dispatch(
        &self,
        request: String,
        batch: bool,
        response_expected: bool,
        options: &RequestOptions,
    ) -> Result<Response> {
        let trim = options
            .trim_log_values
            .unwrap_or(self.config.trim_log_values);
        let validate = options
            .validate_against_schema
            .unwrap_or(self.config.validate_against_schema);

        log::log_request(&request, trim);
        let text = self
            .transport
            .send_message(&request, response_expected)
            .await?;
        if !text.is_empty() {
            log::log_response(&text, trim);
        }

        let data = response::parse(&text, batch, validate)?;
        tracing::debug!(
            ok = data.total_ok(),
            errors = data.total_errors(),
            "response parsed"
        );
        Ok(Response { text, data })
    }
}
