//! Sends an STK push through the authenticated pipeline against a local mock gateway.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use mpesa_sdk::{
	client::MpesaClient,
	config::{Config, Environment},
	services::{STK_PUSH_PATH, StkPushRequest},
	url::Url,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(GET).path("/v1/token/generate");
		then.status(200).body(r#"{"access_token":"demo-access","expires_in":"3599"}"#);
	});

	let stk_mock = server.mock(|when, then| {
		when.method(POST).path(STK_PUSH_PATH).header("authorization", "Bearer demo-access");
		then.status(200).header("content-type", "application/json").body(
			r#"{"MerchantRequestID":"demo-merchant","CheckoutRequestID":"ws_CO_demo","ResponseCode":"0","ResponseDescription":"Success. Request accepted for processing","CustomerMessage":"Success. Request accepted for processing"}"#,
		);
	});
	let config = Config::new("demo-key", "demo-secret", Environment::Sandbox)?
		.with_base_url(Url::parse(&server.base_url())?);
	let client = MpesaClient::new(config)?;
	let response = client.stk_push().initiate(StkPushRequest {
		merchant_request_id: "demo-merchant".into(),
		business_short_code: "554433".into(),
		password: "demo-password".into(),
		amount: "10.00".into(),
		party_a: "251700404789".into(),
		party_b: "554433".into(),
		phone_number: "251700404789".into(),
		transaction_desc: "Demo payment".into(),
		callback_url: "https://example.com/stk/callback".into(),
		account_reference: "DEMO".into(),
		..Default::default()
	})?;

	println!("Checkout request {} ({}).", response.checkout_request_id, response.customer_message);

	stk_mock.assert();

	Ok(())
}
