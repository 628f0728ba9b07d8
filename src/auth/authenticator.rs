//! Client-credentials exchange against the gateway token endpoint.
//!
//! [`HttpAuthenticator`] sends `GET /v1/token/generate?grant_type=client_credentials` with HTTP
//! Basic credentials and turns the reply into an [`AccessToken`]. Provider result codes are
//! classified through [`AuthError::from_result_code`]; the caller (normally
//! [`TokenCache`](crate::auth::TokenCache)) owns the cached value.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, ExpiresIn, parse_lifetime},
	config::Config,
	error::AuthError,
	http::{HttpRequest, HttpResponse, HttpTransport},
	obs::{self, Operation, OperationSpan, Outcome},
};

/// Relative path (with query) of the token endpoint.
pub const TOKEN_PATH: &str = "/v1/token/generate?grant_type=client_credentials";

/// Capability that exchanges credentials for a fresh bearer token.
pub trait Authenticator
where
	Self: Send + Sync,
{
	/// Performs one token exchange. Implementations must not retry internally.
	fn authenticate(&self) -> Result<AccessToken>;
}

/// Successful token endpoint payload.
#[derive(Clone, Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default)]
	expires_in: Option<ExpiresIn>,
}

/// Error payload returned by the token endpoint.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultEnvelope {
	result_code: String,
	#[serde(default)]
	result_desc: String,
}

/// [`Authenticator`] that calls the gateway token endpoint through an [`HttpTransport`].
pub struct HttpAuthenticator<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	credentials: Credentials,
	token_url: Url,
	safety_margin: Duration,
}
impl<T> HttpAuthenticator<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an authenticator for the configuration's base URL and credentials.
	pub fn new(config: &Config, transport: impl Into<Arc<T>>) -> Result<Self> {
		Ok(Self {
			transport: transport.into(),
			credentials: config.credentials.clone(),
			token_url: config.endpoint(TOKEN_PATH)?,
			safety_margin: config.token_safety_margin,
		})
	}

	/// Returns the absolute token endpoint URL.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	fn interpret(&self, response: HttpResponse, issued_at: OffsetDateTime) -> Result<AccessToken> {
		if !response.is_success() {
			return Err(classify_failure(response).into());
		}

		let mut de = serde_json::Deserializer::from_slice(&response.body);
		let payload: TokenResponse = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| AuthError::MalformedResponse { source })?;
		let lifetime = parse_lifetime(payload.expires_in.as_ref());

		Ok(AccessToken::with_lifetime(
			payload.access_token,
			issued_at,
			lifetime,
			self.safety_margin,
		))
	}
}
impl<T> Authenticator for HttpAuthenticator<T>
where
	T: ?Sized + HttpTransport,
{
	fn authenticate(&self) -> Result<AccessToken> {
		const OP: Operation = Operation::Authenticate;

		let _span = OperationSpan::new(OP, &Method::GET, "/v1/token/generate").entered();

		obs::record_outcome(OP, Outcome::Attempt);

		let request = HttpRequest::new(Method::GET, self.token_url.clone())
			.authorization(self.credentials.basic_authorization());
		let issued_at = OffsetDateTime::now_utc();
		let result = self
			.transport
			.send(request)
			.map_err(Error::from)
			.and_then(|response| self.interpret(response, issued_at));

		match &result {
			Ok(token) => {
				obs::token_refreshed(token.expires_at);
				obs::record_outcome(OP, Outcome::Success);
			},
			Err(err) => {
				obs::request_failed(OP, err);
				obs::record_outcome(OP, Outcome::Failure);
			},
		}

		result
	}
}
impl<T> Debug for HttpAuthenticator<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpAuthenticator")
			.field("credentials", &self.credentials)
			.field("token_url", &self.token_url.as_str())
			.field("safety_margin", &self.safety_margin)
			.finish()
	}
}

fn classify_failure(response: HttpResponse) -> AuthError {
	match serde_json::from_slice::<ResultEnvelope>(&response.body) {
		Ok(envelope) => AuthError::from_result_code(envelope.result_code, envelope.result_desc),
		Err(_) => AuthError::UnexpectedStatus {
			status: response.status.as_u16(),
			body: response.body,
		},
	}
}
