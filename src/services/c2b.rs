//! Customer-to-business (C2B) URL registration and payment processing.

// self
use crate::{
	_prelude::*,
	client::{ApiRequest, RequestExecutor},
	models::{Initiator, Parameter, Party, ReceiverParty, ReferenceItem},
	obs::Operation,
};

/// Endpoint for confirmation/validation URL registration.
pub const REGISTER_URL_PATH: &str = "/v1/c2b-register-url/register";
/// Endpoint for C2B payment processing.
pub const PAYMENT_PATH: &str = "/v1/c2b/payments";

const DEFAULT_REGISTER_COMMAND: &str = "RegisterURL";
const DEFAULT_RESPONSE_TYPE: &str = "Completed";
const DEFAULT_PAYMENT_COMMAND: &str = "CustomerPayBillOnline";
const DEFAULT_SOURCE_SYSTEM: &str = "USSD";

/// Callback URL registration payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUrlRequest {
	/// Short code the URLs are registered for.
	#[serde(rename = "ShortCode")]
	pub short_code: String,
	/// Action when validation is unreachable; defaults to `Completed`.
	#[serde(rename = "ResponseType")]
	pub response_type: String,
	/// Defaults to `RegisterURL`.
	#[serde(rename = "CommandID")]
	pub command_id: String,
	/// Receives confirmed payments.
	#[serde(rename = "ConfirmationURL")]
	pub confirmation_url: String,
	/// Validates payments before completion.
	#[serde(rename = "ValidationURL")]
	pub validation_url: String,
}

/// URL registration acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterUrlResponse {
	/// Response header block.
	pub header: RegisterUrlHeader,
}

/// `header` block of [`RegisterUrlResponse`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterUrlHeader {
	/// Numeric response code.
	pub response_code: i64,
	/// Response message.
	pub response_message: String,
	/// Customer-facing message.
	pub customer_message: String,
	/// Gateway timestamp.
	pub timestamp: String,
}

/// C2B payment payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
	/// Caller-side request reference.
	#[serde(rename = "RequestRefID")]
	pub request_ref_id: String,
	/// Defaults to `CustomerPayBillOnline`.
	#[serde(rename = "CommandID")]
	pub command_id: String,
	/// Free-form remark.
	#[serde(rename = "Remark")]
	pub remark: String,
	/// Channel session identifier.
	#[serde(rename = "ChannelSessionID")]
	pub channel_session_id: String,
	/// Originating channel; defaults to `USSD`.
	#[serde(rename = "SourceSystem")]
	pub source_system: String,
	/// Caller-supplied timestamp.
	#[serde(rename = "Timestamp")]
	pub timestamp: String,
	/// Payment parameters (amount, account, currency, ...).
	#[serde(rename = "Parameters")]
	pub parameters: Vec<Parameter>,
	/// Reference entries.
	#[serde(rename = "ReferenceData")]
	pub reference_data: Vec<ReferenceItem>,
	/// Initiating party.
	#[serde(rename = "Initiator")]
	pub initiator: Initiator,
	/// Debit party.
	#[serde(rename = "PrimaryParty")]
	pub primary_party: Party,
	/// Credit party.
	#[serde(rename = "ReceiverParty")]
	pub receiver_party: ReceiverParty,
}

/// C2B payment result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentResponse {
	/// Echoed request reference.
	#[serde(rename = "RequestRefID")]
	pub request_ref_id: String,
	/// `"0"` on success.
	#[serde(rename = "ResponseCode")]
	pub response_code: String,
	/// Response description.
	#[serde(rename = "ResponseDesc")]
	pub response_desc: String,
	/// Gateway transaction identifier.
	#[serde(rename = "TransactionID")]
	pub transaction_id: String,
	/// Extra informational entries.
	#[serde(rename = "AdditionalInfo")]
	pub additional_info: Vec<String>,
}

/// C2B endpoint client.
#[derive(Clone, Debug)]
pub struct C2bService<E> {
	executor: E,
}
impl<E> C2bService<E>
where
	E: RequestExecutor,
{
	/// Wraps an executor such as `&MpesaClient` or `Arc<MpesaClient>`.
	pub fn new(executor: E) -> Self {
		Self { executor }
	}

	/// Registers the confirmation and validation URLs.
	pub fn register_url(&self, mut request: RegisterUrlRequest) -> Result<RegisterUrlResponse> {
		super::fill_default(&mut request.command_id, DEFAULT_REGISTER_COMMAND);
		super::fill_default(&mut request.response_type, DEFAULT_RESPONSE_TYPE);

		let body = self.executor.execute(ApiRequest::post_json(
			Operation::RegisterUrl,
			REGISTER_URL_PATH,
			&request,
		)?)?;

		super::decode(Operation::RegisterUrl, &body)
	}

	/// Processes a C2B payment.
	pub fn process_payment(&self, mut request: PaymentRequest) -> Result<PaymentResponse> {
		super::fill_default(&mut request.command_id, DEFAULT_PAYMENT_COMMAND);
		super::fill_default(&mut request.source_system, DEFAULT_SOURCE_SYSTEM);

		let body = self.executor.execute(ApiRequest::post_json(
			Operation::ProcessPayment,
			PAYMENT_PATH,
			&request,
		)?)?;

		super::decode(Operation::ProcessPayment, &body)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use parking_lot::Mutex;
	// self
	use super::*;
	use crate::error::TransportError;

	type Reply = fn() -> Result<Vec<u8>>;

	struct MockExecutor {
		reply: Reply,
		seen: Mutex<Vec<ApiRequest>>,
	}
	impl MockExecutor {
		fn new(reply: Reply) -> Self {
			Self { reply, seen: Mutex::new(Vec::new()) }
		}
	}
	impl RequestExecutor for MockExecutor {
		fn execute(&self, request: ApiRequest) -> Result<Vec<u8>> {
			self.seen.lock().push(request);

			(self.reply)()
		}
	}

	fn payment() -> PaymentRequest {
		PaymentRequest { request_ref_id: "12345".into(), ..Default::default() }
	}

	#[test]
	fn successful_payment_decodes_and_fills_defaults() {
		let executor = MockExecutor::new(|| {
			Ok(br#"{
				"RequestRefID": "12345",
				"ResponseCode": "0",
				"ResponseDesc": "Success",
				"TransactionID": "67890",
				"AdditionalInfo": []
			}"#
			.to_vec())
		});
		let response = C2bService::new(&executor)
			.process_payment(payment())
			.expect("Payment should succeed.");

		assert_eq!(response, PaymentResponse {
			request_ref_id: "12345".into(),
			response_code: "0".into(),
			response_desc: "Success".into(),
			transaction_id: "67890".into(),
			additional_info: Vec::new(),
		});

		let seen = executor.seen.lock();
		let body = seen[0].body.as_ref().expect("Payment should carry a body.");

		assert_eq!(seen[0].path, PAYMENT_PATH);
		assert_eq!(body["CommandID"], "CustomerPayBillOnline");
		assert_eq!(body["SourceSystem"], "USSD");
		assert_eq!(body["ReferenceData"], serde_json::json!([]));
		assert_eq!(body["ReceiverParty"]["ShortCode"], "");
	}

	#[test]
	fn executor_failure_is_propagated() {
		let executor = MockExecutor::new(|| {
			Err(TransportError::from(std::io::Error::from(std::io::ErrorKind::TimedOut)).into())
		});
		let err = C2bService::new(&executor)
			.process_payment(payment())
			.expect_err("Executor failure should surface.");

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));
	}

	#[test]
	fn invalid_response_is_a_decode_error() {
		let executor = MockExecutor::new(|| Ok(b"invalid response".to_vec()));
		let err = C2bService::new(&executor)
			.process_payment(payment())
			.expect_err("Invalid body should fail to decode.");

		assert!(matches!(err, Error::Decode { operation: "process_payment", .. }));
		assert!(!err.is_retryable());
	}

	#[test]
	fn register_url_fills_defaults_and_decodes_header() {
		let executor = MockExecutor::new(|| {
			Ok(br#"{"header":{"responseCode":200,"responseMessage":"Request processed successfully","customerMessage":"Request processed successfully","timestamp":"2024-03-05T07:08:09.000"}}"#
				.to_vec())
		});
		let response = C2bService::new(&executor)
			.register_url(RegisterUrlRequest {
				short_code: "101010".into(),
				confirmation_url: "https://example.com/confirm".into(),
				validation_url: "https://example.com/validate".into(),
				..Default::default()
			})
			.expect("Registration should succeed.");

		assert_eq!(response.header.response_code, 200);
		assert_eq!(response.header.response_message, "Request processed successfully");

		let seen = executor.seen.lock();
		let body = seen[0].body.as_ref().expect("Registration should carry a body.");

		assert_eq!(seen[0].operation, Operation::RegisterUrl);
		assert_eq!(body["CommandID"], "RegisterURL");
		assert_eq!(body["ResponseType"], "Completed");
	}
}
