//! Registers C2B callback URLs and processes a payment against a local mock gateway, sharing one
//! client (and one cached token) across both calls.

// std
use std::{sync::Arc, time::Duration};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use mpesa_sdk::{
	client::MpesaClient,
	config::{Config, Environment},
	models::{Initiator, Parameter, Party, ReceiverParty},
	services::{C2bService, PAYMENT_PATH, PaymentRequest, REGISTER_URL_PATH, RegisterUrlRequest},
	url::Url,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();
	let token_mock = server.mock(|when, then| {
		when.method(GET).path("/v1/token/generate");
		then.status(200).body(r#"{"access_token":"demo-access","expires_in":"3599"}"#);
	});

	server.mock(|when, then| {
		when.method(POST).path(REGISTER_URL_PATH);
		then.status(200).body(
			r#"{"header":{"responseCode":200,"responseMessage":"Request processed successfully","customerMessage":"Request processed successfully","timestamp":"2024-03-05T07:08:09.000"}}"#,
		);
	});
	server.mock(|when, then| {
		when.method(POST).path(PAYMENT_PATH);
		then.status(200).body(
			r#"{"RequestRefID":"demo-ref","ResponseCode":"0","ResponseDesc":"The service request is processed successfully.","TransactionID":"RCF0000DEMO","AdditionalInfo":[]}"#,
		);
	});

	let config = Config::new("demo-key", "demo-secret", Environment::Sandbox)?
		.with_base_url(Url::parse(&server.base_url())?)
		.with_retry(1, Duration::from_millis(250));
	let client = Arc::new(MpesaClient::new(config)?);
	let c2b = C2bService::new(client.clone());
	let registration = c2b.register_url(RegisterUrlRequest {
		short_code: "101010".into(),
		confirmation_url: "https://example.com/c2b/confirmation".into(),
		validation_url: "https://example.com/c2b/validation".into(),
		..Default::default()
	})?;

	println!("URL registration: {}.", registration.header.response_message);

	let payment = c2b.process_payment(PaymentRequest {
		request_ref_id: "demo-ref".into(),
		remark: "Demo payment".into(),
		channel_session_id: "10100000037656400042".into(),
		parameters: vec![Parameter::new("Amount", "500"), Parameter::new("AccountReference", "DEMO")],
		initiator: Initiator {
			identifier_type: 1,
			identifier: "251799100026".into(),
			security_credential: "demo-credential".into(),
			secret_key: "demo-secret-key".into(),
		},
		primary_party: Party { identifier_type: 1, identifier: "251799100026".into() },
		receiver_party: ReceiverParty {
			identifier_type: 4,
			identifier: "370360".into(),
			short_code: "370360".into(),
		},
		..Default::default()
	})?;

	println!("Payment {} completed: {}.", payment.transaction_id, payment.response_desc);
	println!("Executor metrics: {:?}.", client.metrics());

	token_mock.assert();

	Ok(())
}
