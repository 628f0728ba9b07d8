//! Exchanges consumer credentials for a bearer token against a local mock gateway and shows that
//! repeated lookups reuse the cached value.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use mpesa_sdk::{
	client::MpesaClient,
	config::{Config, Environment},
	url::Url,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();
	let token_mock = server.mock(|when, then| {
		when.method(GET)
			.path("/v1/token/generate")
			.query_param("grant_type", "client_credentials");
		then.status(200).header("content-type", "application/json").body(
			r#"{"access_token":"demo-access","token_type":"Bearer","expires_in":"3599"}"#,
		);
	});
	let config = Config::new("demo-key", "demo-secret", Environment::Sandbox)?
		.with_base_url(Url::parse(&server.base_url())?);
	let client = MpesaClient::new(config)?;
	let token = client.get_token()?;
	let again = client.get_token()?;

	println!("Bearer token: {} (valid until {}).", token.expose(), token.expires_at);
	println!("Second lookup reused the cache: {}.", token == again);

	token_mock.assert();

	Ok(())
}
