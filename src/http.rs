//! Transport primitives shared by the authenticator and the request executor.
//!
//! The module exposes [`HttpTransport`], a one-method capability that sends a fully built
//! [`HttpRequest`] and returns the raw [`HttpResponse`]. The SDK never talks to an HTTP stack
//! directly; [`ReqwestTransport`] is the default implementation and tests plug in fakes that
//! script failures without opening sockets.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use reqwest::{
	blocking::Client as BlockingClient,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderName},
	redirect::Policy,
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Abstraction over blocking HTTP stacks capable of reaching the gateway.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by the
/// authenticator and the executor behind `Arc<T>`. A returned `Err` means no HTTP status was
/// observed (connect failure, timeout, I/O); any status, including 4xx/5xx, is an `Ok`.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and blocks until the full response body has been read.
	fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Fully resolved outbound request.
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Header pairs applied in order.
	pub headers: Vec<(HeaderName, String)>,
	/// Serialized body, if any.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Creates a request without headers or body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Appends a header pair.
	pub fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));

		self
	}

	/// Sets the `Authorization` header.
	pub fn authorization(self, value: impl Into<String>) -> Self {
		self.header(AUTHORIZATION, value)
	}

	/// Attaches a serialized JSON body.
	pub fn json_body(mut self, body: Vec<u8>) -> Self {
		self.body = Some(body);

		self
	}

	/// Sets `Content-Type: application/json`.
	pub fn json_content_type(self) -> Self {
		self.header(CONTENT_TYPE, "application/json")
	}

	/// Returns the first value recorded for `name`.
	pub fn header_value(&self, name: &HeaderName) -> Option<&str> {
		self.headers.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}
}

/// Raw response captured by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Full response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response from a status and body.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for statuses in `[200, 300)`.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}
}

/// Thin wrapper around the reqwest blocking client so shared HTTP behavior lives in one place.
///
/// Gateway endpoints answer directly; redirects are not followed. Configure any custom client
/// passed to [`ReqwestTransport::with_client`] the same way.
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub BlockingClient);
impl ReqwestTransport {
	/// Builds a client that enforces `timeout` on every request.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = BlockingClient::builder()
			.timeout(timeout)
			.redirect(Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest blocking client.
	pub fn with_client(client: BlockingClient) -> Self {
		Self(client)
	}
}
impl AsRef<BlockingClient> for ReqwestTransport {
	fn as_ref(&self) -> &BlockingClient {
		&self.0
	}
}
impl Deref for ReqwestTransport {
	type Target = BlockingClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let mut builder = self.0.request(request.method, request.url);

		for (name, value) in request.headers {
			builder = builder.header(name, value);
		}
		if let Some(body) = request.body {
			builder = builder.body(body);
		}

		let response = builder.send()?;
		let status = response.status();
		let body = response.bytes()?.to_vec();

		Ok(HttpResponse { status, body })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_builder_records_headers_and_body() {
		let url = Url::parse("https://apisandbox.safaricom.et/v1/c2b/payments")
			.expect("Test URL should parse.");
		let request = HttpRequest::new(Method::POST, url)
			.json_content_type()
			.authorization("Bearer abc")
			.json_body(b"{}".to_vec());

		assert_eq!(request.header_value(&CONTENT_TYPE), Some("application/json"));
		assert_eq!(request.header_value(&AUTHORIZATION), Some("Bearer abc"));
		assert_eq!(request.body.as_deref(), Some(b"{}".as_slice()));
	}

	#[test]
	fn response_success_covers_2xx_only() {
		assert!(HttpResponse::new(StatusCode::OK, Vec::new()).is_success());
		assert!(HttpResponse::new(StatusCode::NO_CONTENT, Vec::new()).is_success());
		assert!(!HttpResponse::new(StatusCode::MULTIPLE_CHOICES, Vec::new()).is_success());
		assert!(!HttpResponse::new(StatusCode::UNAUTHORIZED, Vec::new()).is_success());
	}

	#[test]
	fn reqwest_transport_builds_with_timeout() {
		assert!(ReqwestTransport::with_timeout(StdDuration::from_secs(5)).is_ok());
	}
}
