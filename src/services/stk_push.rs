//! Merchant-initiated push payments (STK push).

// self
use crate::{
	_prelude::*,
	client::{ApiRequest, RequestExecutor},
	models::ReferenceItem,
	obs::Operation,
};

/// Endpoint for STK push initiation.
pub const STK_PUSH_PATH: &str = "/mpesa/stkpush/v3/processrequest";
/// Transaction type applied when the request leaves it empty.
pub const DEFAULT_TRANSACTION_TYPE: &str = "CustomerPayBillOnline";

/// STK push initiation payload.
///
/// `timestamp` and `transaction_type` are filled in by [`StkPushService::initiate`] when empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StkPushRequest {
	/// Merchant-side correlation identifier.
	#[serde(rename = "MerchantRequestID")]
	pub merchant_request_id: String,
	/// Paybill or till number receiving the funds.
	#[serde(rename = "BusinessShortCode")]
	pub business_short_code: String,
	/// Encoded request password.
	#[serde(rename = "Password")]
	pub password: String,
	/// `YYYYMMDDHHMMSS` request timestamp.
	#[serde(rename = "Timestamp")]
	pub timestamp: String,
	/// Transaction type.
	#[serde(rename = "TransactionType")]
	pub transaction_type: String,
	/// Amount as a decimal string.
	#[serde(rename = "Amount")]
	pub amount: String,
	/// Paying MSISDN.
	#[serde(rename = "PartyA")]
	pub party_a: String,
	/// Receiving short code.
	#[serde(rename = "PartyB")]
	pub party_b: String,
	/// Handset prompted to authorize the payment.
	#[serde(rename = "PhoneNumber")]
	pub phone_number: String,
	/// Free-form description.
	#[serde(rename = "TransactionDesc")]
	pub transaction_desc: String,
	/// Callback that receives the final result.
	#[serde(rename = "CallBackURL")]
	pub callback_url: String,
	/// Account reference shown to the payer.
	#[serde(rename = "AccountReference")]
	pub account_reference: String,
	/// Optional reference entries; omitted from the body when empty.
	#[serde(rename = "ReferenceData", default, skip_serializing_if = "Vec::is_empty")]
	pub reference_data: Vec<ReferenceItem>,
}

/// Acknowledgement returned by the STK push endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StkPushResponse {
	/// Echoed merchant correlation identifier.
	#[serde(rename = "MerchantRequestID")]
	pub merchant_request_id: String,
	/// Gateway checkout identifier used to match the callback.
	#[serde(rename = "CheckoutRequestID")]
	pub checkout_request_id: String,
	/// `"0"` when accepted.
	#[serde(rename = "ResponseCode")]
	pub response_code: String,
	/// Response description.
	#[serde(rename = "ResponseDescription")]
	pub response_description: String,
	/// Message suitable for the end customer.
	#[serde(rename = "CustomerMessage")]
	pub customer_message: String,
}

/// STK push endpoint client.
#[derive(Clone, Debug)]
pub struct StkPushService<E> {
	executor: E,
}
impl<E> StkPushService<E>
where
	E: RequestExecutor,
{
	/// Wraps an executor such as `&MpesaClient` or `Arc<MpesaClient>`.
	pub fn new(executor: E) -> Self {
		Self { executor }
	}

	/// Fills request defaults and initiates the push.
	pub fn initiate(&self, mut request: StkPushRequest) -> Result<StkPushResponse> {
		if request.timestamp.is_empty() {
			request.timestamp = super::gateway_timestamp(OffsetDateTime::now_utc());
		}

		super::fill_default(&mut request.transaction_type, DEFAULT_TRANSACTION_TYPE);

		let body = self.executor.execute(ApiRequest::post_json(
			Operation::StkPush,
			STK_PUSH_PATH,
			&request,
		)?)?;

		super::decode(Operation::StkPush, &body)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use parking_lot::Mutex;
	// self
	use super::*;

	struct MockExecutor {
		seen: Mutex<Vec<ApiRequest>>,
	}
	impl RequestExecutor for MockExecutor {
		fn execute(&self, request: ApiRequest) -> Result<Vec<u8>> {
			self.seen.lock().push(request);

			Ok(br#"{
				"MerchantRequestID": "12345",
				"CheckoutRequestID": "67890",
				"ResponseCode": "0",
				"ResponseDescription": "Success",
				"CustomerMessage": "Request accepted for processing"
			}"#
			.to_vec())
		}
	}

	#[test]
	fn initiate_decodes_acknowledgement_and_fills_defaults() {
		let executor = MockExecutor { seen: Mutex::new(Vec::new()) };
		let service = StkPushService::new(&executor);
		let response = service
			.initiate(StkPushRequest {
				business_short_code: "554433".into(),
				password: "123".into(),
				amount: "10.00".into(),
				party_a: "251700404789".into(),
				party_b: "554433".into(),
				phone_number: "251700404789".into(),
				transaction_desc: "Test Payment".into(),
				callback_url: "https://your-callback-url.com".into(),
				account_reference: "TEST".into(),
				..Default::default()
			})
			.expect("STK push should succeed.");

		assert_eq!(response.merchant_request_id, "12345");
		assert_eq!(response.checkout_request_id, "67890");
		assert_eq!(response.response_code, "0");
		assert_eq!(response.response_description, "Success");
		assert_eq!(response.customer_message, "Request accepted for processing");

		let seen = executor.seen.lock();
		let request = &seen[0];
		let body = request.body.as_ref().expect("STK push should carry a body.");

		assert_eq!(request.method, Method::POST);
		assert_eq!(request.path, STK_PUSH_PATH);
		assert_eq!(request.operation, Operation::StkPush);
		assert_eq!(body["TransactionType"], "CustomerPayBillOnline");
		assert_eq!(body["CallBackURL"], "https://your-callback-url.com");
		assert_eq!(body["Timestamp"].as_str().map(str::len), Some(14));
		assert!(body.get("ReferenceData").is_none());
	}

	#[test]
	fn explicit_fields_are_kept() {
		let executor = MockExecutor { seen: Mutex::new(Vec::new()) };

		StkPushService::new(&executor)
			.initiate(StkPushRequest {
				timestamp: "20240101000000".into(),
				transaction_type: "CustomerBuyGoodsOnline".into(),
				reference_data: vec![ReferenceItem::new("CashierName", "Abebe")],
				..Default::default()
			})
			.expect("STK push should succeed.");

		let seen = executor.seen.lock();
		let body = seen[0].body.as_ref().expect("STK push should carry a body.");

		assert_eq!(body["Timestamp"], "20240101000000");
		assert_eq!(body["TransactionType"], "CustomerBuyGoodsOnline");
		assert_eq!(body["ReferenceData"][0]["Key"], "CashierName");
	}
}
