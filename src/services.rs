//! Typed endpoint services layered on a [`RequestExecutor`](crate::client::RequestExecutor).
//!
//! Services only fill request defaults, pick the endpoint, and decode the 2xx body; tokens,
//! retries, and status classification stay in the executor.

pub mod c2b;
pub mod stk_push;

pub use c2b::*;
pub use stk_push::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, obs::Operation};

/// Formats `at` as the gateway's `YYYYMMDDHHMMSS` timestamp.
pub fn gateway_timestamp(at: OffsetDateTime) -> String {
	format!(
		"{:04}{:02}{:02}{:02}{:02}{:02}",
		at.year(),
		u8::from(at.month()),
		at.day(),
		at.hour(),
		at.minute(),
		at.second(),
	)
}

fn fill_default(field: &mut String, default: &str) {
	if field.is_empty() {
		*field = default.to_owned();
	}
}

fn decode<R>(operation: Operation, body: &[u8]) -> Result<R>
where
	R: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| Error::Decode { operation: operation.as_str(), source })
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn timestamp_is_zero_padded() {
		assert_eq!(gateway_timestamp(datetime!(2024-03-05 07:08:09 UTC)), "20240305070809");
	}

	#[test]
	fn decode_failure_names_operation() {
		let err = decode::<serde_json::Value>(Operation::ProcessPayment, b"invalid response")
			.expect_err("Invalid JSON should fail to decode.");

		assert!(matches!(err, Error::Decode { operation: "process_payment", .. }));
	}
}
