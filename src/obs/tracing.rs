// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, obs::Operation};

/// A span builder used by the authenticator and the request executor.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the operation, HTTP method, and relative path.
	pub fn new(operation: Operation, method: &Method, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"mpesa_sdk.request",
				operation = operation.as_str(),
				method = method.as_str(),
				path
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, method, path);

			Self {}
		}
	}

	/// Enters the span for the rest of the blocking call.
	pub fn entered(self) -> OperationSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OperationSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			OperationSpanGuard {}
		}
	}
}

/// RAII guard returned by [`OperationSpan::entered`].
pub struct OperationSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for OperationSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OperationSpanGuard(..)")
	}
}

/// Emits a debug event after a successful token exchange. The token value is never logged.
pub fn token_refreshed(expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(%expires_at, "bearer token refreshed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = expires_at;
	}
}

/// Emits a warning before the executor sleeps and retries.
pub fn retry_scheduled(operation: Operation, attempt: u32, delay: StdDuration, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			operation = operation.as_str(),
			attempt,
			delay_ms = delay.as_millis() as u64,
			error = %error,
			"attempt failed; retrying"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, attempt, delay, error);
	}
}

/// Emits an error event for a failure handed back to the caller.
pub fn request_failed(operation: Operation, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(operation = operation.as_str(), error = %error, "request failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, error);
	}
}
