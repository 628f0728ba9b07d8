// std
use std::{sync::Arc, thread, time::Duration as StdDuration};
// crates.io
use httpmock::prelude::*;
// self
use mpesa_sdk::{
	client::{ApiRequest, MpesaClient, RequestExecutor},
	config::{Config, Environment},
	error::Error,
	obs::Operation,
	reqwest::Method,
	url::Url,
};

const TOKEN_PATH: &str = "/v1/token/generate";
const PROBE_PATH: &str = "/v1/probe";

fn client(server: &MockServer, retry_count: u32) -> MpesaClient {
	let config = Config::new("consumer-key", "consumer-secret", Environment::Sandbox)
		.expect("Configuration fixture should build.")
		.with_base_url(Url::parse(&server.base_url()).expect("Mock server URL should parse."))
		.with_retry(retry_count, StdDuration::from_millis(10));

	MpesaClient::new(config).expect("Client should build.")
}

fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server.mock(|when, then| {
		when.method(GET).path(TOKEN_PATH);
		then.status(200)
			.header("content-type", "application/json")
			.body(r#"{"access_token":"mock_token","token_type":"Bearer","expires_in":"3600"}"#);
	})
}

fn probe() -> ApiRequest {
	ApiRequest::post_json(Operation::Custom, PROBE_PATH, &serde_json::json!({"Amount": "10.00"}))
		.expect("Probe request should serialize.")
}

#[test]
fn sequential_calls_share_one_token() {
	let server = MockServer::start();
	let token = mock_token(&server);
	let business = server.mock(|when, then| {
		when.method(POST)
			.path(PROBE_PATH)
			.header("authorization", "Bearer mock_token")
			.header("content-type", "application/json");
		then.status(200).body(r#"{"ok":true}"#);
	});
	let client = client(&server, 0);

	for _ in 0..3 {
		let body = client.execute(probe()).expect("Business call should succeed.");

		assert_eq!(body, br#"{"ok":true}"#);
	}

	token.assert_calls(1);
	business.assert_calls(3);
	assert_eq!(client.metrics().successes(), 3);
}

#[test]
fn concurrent_callers_share_one_token() {
	let server = MockServer::start();
	let token = mock_token(&server);

	server.mock(|when, then| {
		when.method(POST).path(PROBE_PATH);
		then.status(200).body("{}");
	});

	let client = Arc::new(client(&server, 0));

	thread::scope(|scope| {
		for _ in 0..4 {
			let client = client.clone();

			scope.spawn(move || {
				client.execute(probe()).expect("Concurrent call should succeed.");
			});
		}
	});

	token.assert_calls(1);
}

#[test]
fn failing_endpoint_exhausts_retry_budget() {
	let server = MockServer::start();
	let token = mock_token(&server);
	let business = server.mock(|when, then| {
		when.method(POST).path(PROBE_PATH);
		then.status(500).body("internal failure");
	});
	let client = client(&server, 2);
	let err = client.execute(probe()).expect_err("Failing endpoint should exhaust retries.");

	match &err {
		Error::RetriesExhausted { retries, source } => {
			assert_eq!(*retries, 2);
			assert!(matches!(
				**source,
				Error::UnexpectedStatus { status: 500, ref body } if body == b"internal failure"
			));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	business.assert_calls(3);
	token.assert_calls(1);
	assert_eq!(client.metrics().retries(), 2);
}

#[test]
fn error_envelope_is_surfaced_as_api_error() {
	let server = MockServer::start();

	mock_token(&server);
	server.mock(|when, then| {
		when.method(POST).path(PROBE_PATH);
		then.status(400).header("content-type", "application/json").body(
			r#"{"requestId":"req-1","errorCode":"400.002.02","errorMessage":"Bad Request - Invalid Amount"}"#,
		);
	});

	let client = client(&server, 0);
	let err = client.execute(probe()).expect_err("Rejected call should fail.");

	assert!(matches!(
		err.last_failure(),
		Error::Api { status: 400, code, message }
			if code == "400.002.02" && message == "Bad Request - Invalid Amount"
	));
}

#[test]
fn unauthorized_response_discards_cached_token() {
	let server = MockServer::start();
	let token = mock_token(&server);
	let business = server.mock(|when, then| {
		when.method(POST).path(PROBE_PATH);
		then.status(401).body(r#"{"errorCode":"404.001.03","errorMessage":"Invalid Access Token"}"#);
	});
	let client = client(&server, 1);

	client.execute(probe()).expect_err("Unauthorized call should fail.");

	business.assert_calls(2);
	token.assert_calls(2);
}

#[test]
fn token_failure_stops_before_business_call() {
	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(GET).path(TOKEN_PATH);
		then.status(401).body(r#"{"resultCode":"999991","resultDesc":"Invalid client id passed"}"#);
	});

	let business = server.mock(|when, then| {
		when.method(POST).path(PROBE_PATH);
		then.status(200).body("{}");
	});
	let client = client(&server, 3);
	let err = client.execute(probe()).expect_err("Token failure should surface.");

	assert!(matches!(err, Error::Authentication(_)));
	assert!(!err.is_retryable());

	business.assert_calls(0);
}

#[test]
fn get_requests_send_no_body() {
	let server = MockServer::start();

	mock_token(&server);

	let status = server.mock(|when, then| {
		when.method(GET).path("/v1/status").header("authorization", "Bearer mock_token");
		then.status(204);
	});
	let client = client(&server, 0);
	let body = client
		.execute(ApiRequest::new(Operation::Custom, Method::GET, "/v1/status"))
		.expect("Status call should succeed.");

	assert!(body.is_empty());

	status.assert_calls(1);
}

#[test]
fn prefixed_base_url_is_kept_for_token_and_business_calls() {
	let server = MockServer::start();
	let token = server.mock(|when, then| {
		when.method(GET).path("/mpesa/v1/token/generate");
		then.status(200).body(r#"{"access_token":"mock_token","expires_in":"3600"}"#);
	});
	let business = server.mock(|when, then| {
		when.method(POST).path("/mpesa/v1/probe").header("authorization", "Bearer mock_token");
		then.status(200).body("{}");
	});
	let config = Config::new("consumer-key", "consumer-secret", Environment::Sandbox)
		.expect("Configuration fixture should build.")
		.with_base_url(Url::parse(&server.url("/mpesa")).expect("Prefixed mock URL should parse."))
		.with_retry(0, StdDuration::ZERO);
	let client = MpesaClient::new(config).expect("Client should build.");

	client.execute(probe()).expect("Prefixed business call should succeed.");

	token.assert_calls(1);
	business.assert_calls(1);
}
