//! `mpesa_sdk_request_total` counter.
//!
//! One increment per executor or authenticator event. The `operation` label is the
//! [`Operation`] name (`stk_push`, `authenticate`, ...) and `outcome` is one of `attempt`,
//! `retry`, `success`, or `failure`. A call with two retries that finally succeeds therefore
//! counts one `attempt`, two `retry`, and one `success`.

// self
use crate::obs::{Operation, Outcome};

/// Counter name exported to the installed `metrics` recorder.
pub const REQUEST_COUNTER: &str = "mpesa_sdk_request_total";

/// Bumps [`REQUEST_COUNTER`] for `operation`/`outcome`; a no-op without the `metrics` feature.
pub fn record_outcome(operation: Operation, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			REQUEST_COUNTER,
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_cover_every_pipeline_outcome() {
		let outcomes = [Outcome::Attempt, Outcome::Retry, Outcome::Success, Outcome::Failure];

		for outcome in outcomes {
			record_outcome(Operation::ProcessPayment, outcome);
		}

		assert_eq!(
			outcomes.map(Outcome::as_str),
			["attempt", "retry", "success", "failure"],
		);
		assert_eq!(REQUEST_COUNTER, "mpesa_sdk_request_total");
	}
}
