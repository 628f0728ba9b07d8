//! Authenticated request executor with fixed-delay retries.
//!
//! [`MpesaClient`] owns the configuration, the transport, and the [`TokenCache`]. Every call goes
//! through [`RequestExecutor::execute`]: a valid bearer token is attached before each attempt,
//! 2xx bodies are returned verbatim, and any transport failure or non-2xx status is retried up to
//! [`Config::retry_count`] more times with [`Config::retry_delay`] between attempts. Token
//! acquisition failures and request-construction failures end the call immediately.

mod metrics;

pub use metrics::RequestMetrics;

// std
use std::thread;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Authenticator, HttpAuthenticator, TokenCache},
	config::Config,
	error::ConfigError,
	http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport},
	models::ErrorEnvelope,
	obs::{self, Operation, OperationSpan, Outcome},
	services::{C2bService, StkPushService},
};

/// Outbound business request: method, gateway-relative path, and optional JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	/// Operation label used for spans and metrics.
	pub operation: Operation,
	/// HTTP method.
	pub method: Method,
	/// Path relative to the configured base URL (leading slash, optional query).
	pub path: String,
	/// JSON body; `None` sends no body at all.
	pub body: Option<serde_json::Value>,
}
impl ApiRequest {
	/// Creates a request without a body.
	pub fn new(operation: Operation, method: Method, path: impl Into<String>) -> Self {
		Self { operation, method, path: path.into(), body: None }
	}

	/// Creates a `POST` request carrying `body` serialized as JSON.
	pub fn post_json(
		operation: Operation,
		path: impl Into<String>,
		body: &impl Serialize,
	) -> Result<Self> {
		Self::new(operation, Method::POST, path).with_json(body)
	}

	/// Serializes `body` and attaches it to the request.
	pub fn with_json(mut self, body: &impl Serialize) -> Result<Self> {
		let value =
			serde_json::to_value(body).map_err(|source| ConfigError::RequestBody { source })?;

		self.body = Some(value);

		Ok(self)
	}
}

/// The "do request" capability endpoint services depend on.
///
/// Implemented by [`MpesaClient`] and by test doubles; services never see the concrete client.
pub trait RequestExecutor
where
	Self: Send + Sync,
{
	/// Sends `request` and returns the raw 2xx body, or a classified error.
	fn execute(&self, request: ApiRequest) -> Result<Vec<u8>>;
}
impl<E> RequestExecutor for &E
where
	E: ?Sized + RequestExecutor,
{
	fn execute(&self, request: ApiRequest) -> Result<Vec<u8>> {
		(**self).execute(request)
	}
}
impl<E> RequestExecutor for Arc<E>
where
	E: ?Sized + RequestExecutor,
{
	fn execute(&self, request: ApiRequest) -> Result<Vec<u8>> {
		(**self).execute(request)
	}
}

/// Gateway client that owns the token cache and runs the retry loop.
///
/// The client is `Send + Sync`; share it behind `Arc` to issue calls from several threads. All of
/// them reuse the same cached token.
pub struct MpesaClient<T = ReqwestTransport>
where
	T: ?Sized + HttpTransport,
{
	config: Config,
	transport: Arc<T>,
	tokens: TokenCache,
	metrics: RequestMetrics,
}
impl MpesaClient<ReqwestTransport> {
	/// Creates a client with its own reqwest blocking transport honoring [`Config::timeout`].
	pub fn new(config: Config) -> Result<Self> {
		let transport = ReqwestTransport::with_timeout(config.timeout)?;

		Self::with_transport(config, transport)
	}
}
impl<T> MpesaClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport for both token exchanges and
	/// business calls.
	pub fn with_transport(config: Config, transport: impl Into<Arc<T>>) -> Result<Self> {
		let transport = transport.into();
		let authenticator = HttpAuthenticator::<T>::new(&config, transport.clone())?;

		Ok(Self::with_authenticator(config, transport, Arc::new(authenticator)))
	}

	/// Creates a client with a custom [`Authenticator`] (token vaults, test doubles).
	pub fn with_authenticator(
		config: Config,
		transport: impl Into<Arc<T>>,
		authenticator: Arc<dyn Authenticator>,
	) -> Self {
		Self {
			config,
			transport: transport.into(),
			tokens: TokenCache::new(authenticator),
			metrics: RequestMetrics::default(),
		}
	}

	/// Returns the immutable configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns the owned token cache.
	pub fn tokens(&self) -> &TokenCache {
		&self.tokens
	}

	/// Returns attempt/retry counters for this client.
	pub fn metrics(&self) -> &RequestMetrics {
		&self.metrics
	}

	/// Returns a valid bearer token, authenticating when the cache is empty or expired.
	pub fn get_token(&self) -> Result<AccessToken> {
		self.tokens.get_valid_token()
	}

	/// STK push service bound to this client.
	pub fn stk_push(&self) -> StkPushService<&Self> {
		StkPushService::new(self)
	}

	/// C2B service bound to this client.
	pub fn c2b(&self) -> C2bService<&Self> {
		C2bService::new(self)
	}

	fn run(&self, request: &ApiRequest) -> Result<Vec<u8>> {
		let url = self.config.endpoint(&request.path)?;
		let payload = request
			.body
			.as_ref()
			.map(serde_json::to_vec)
			.transpose()
			.map_err(|source| ConfigError::RequestBody { source })?;
		let retries = self.config.retry_count;
		let mut attempt = 0;

		loop {
			let token = self.tokens.get_valid_token()?;

			self.metrics.record_attempt();

			let failure = match self.send_once(&request.method, &url, payload.as_deref(), &token) {
				Ok(body) => return Ok(body),
				Err(err) => err,
			};

			let failure = settle_failure(failure, attempt, retries)?;

			attempt += 1;

			obs::retry_scheduled(request.operation, attempt, self.config.retry_delay, &failure);
			obs::record_outcome(request.operation, Outcome::Retry);
			self.metrics.record_retry();

			thread::sleep(self.config.retry_delay);
		}
	}

	fn send_once(
		&self,
		method: &Method,
		url: &Url,
		payload: Option<&[u8]>,
		token: &AccessToken,
	) -> Result<Vec<u8>> {
		let mut request = HttpRequest::new(method.clone(), url.clone())
			.json_content_type()
			.authorization(token.bearer_authorization());

		if let Some(bytes) = payload {
			request = request.json_body(bytes.to_vec());
		}

		let response = self.transport.send(request)?;

		if response.is_success() {
			return Ok(response.body);
		}
		if response.status == StatusCode::UNAUTHORIZED {
			self.tokens.discard(token);
		}

		Err(classify_failure(response))
	}
}
impl<T> RequestExecutor for MpesaClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn execute(&self, request: ApiRequest) -> Result<Vec<u8>> {
		let operation = request.operation;
		let _span = OperationSpan::new(operation, &request.method, &request.path).entered();

		obs::record_outcome(operation, Outcome::Attempt);

		let result = self.run(&request);

		match &result {
			Ok(_) => {
				self.metrics.record_success();
				obs::record_outcome(operation, Outcome::Success);
			},
			Err(err) => {
				self.metrics.record_failure();
				obs::request_failed(operation, err);
				obs::record_outcome(operation, Outcome::Failure);
			},
		}

		result
	}
}
impl<T> Debug for MpesaClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MpesaClient")
			.field("environment", &self.config.environment)
			.field("base_url", &self.config.base_url.as_str())
			.field("tokens", &self.tokens)
			.field("metrics", &self.metrics)
			.finish()
	}
}

/// Ends the call with `Err` when `failure` is not retryable or the budget is spent; otherwise hands
/// the failure back so the loop can log it and try again.
fn settle_failure(failure: Error, attempt: u32, retries: u32) -> Result<Error> {
	if !failure.is_retryable() {
		return Err(failure);
	}
	if attempt >= retries {
		return Err(Error::RetriesExhausted { retries, source: Box::new(failure) });
	}

	Ok(failure)
}

fn classify_failure(response: HttpResponse) -> Error {
	let status = response.status.as_u16();

	match serde_json::from_slice::<ErrorEnvelope>(&response.body) {
		Ok(envelope) =>
			Error::Api { status, code: envelope.error_code, message: envelope.error_message },
		Err(_) => Error::UnexpectedStatus { status, body: response.body },
	}
}
