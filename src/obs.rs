//! Optional observability helpers for the request pipeline.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `mpesa_sdk.request` with the `operation`,
//!   `method`, and `path` fields, plus events for token refreshes, retries, and failures.
//! - Enable `metrics` to increment the `mpesa_sdk_request_total` counter for every
//!   attempt/retry/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Gateway operations observed by the SDK.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Client-credentials token exchange.
	Authenticate,
	/// STK push initiation.
	StkPush,
	/// C2B confirmation/validation URL registration.
	RegisterUrl,
	/// C2B payment processing.
	ProcessPayment,
	/// Ad-hoc call issued directly through the executor.
	Custom,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Authenticate => "authenticate",
			Operation::StkPush => "stk_push",
			Operation::RegisterUrl => "register_url",
			Operation::ProcessPayment => "process_payment",
			Operation::Custom => "custom",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to a pipeline helper.
	Attempt,
	/// A failed attempt that will be retried after the fixed delay.
	Retry,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Retry => "retry",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
