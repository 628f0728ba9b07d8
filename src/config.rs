//! Client configuration: credentials, target environment, timeouts, and retry budget.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, auth::Credentials, error::ConfigError};

/// Gateway environment; selects the base URL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
	#[default]
	/// `https://apisandbox.safaricom.et`.
	Sandbox,
	/// `https://api.safaricom.et`.
	Production,
}
impl Environment {
	/// Returns the stable lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Sandbox => "sandbox",
			Self::Production => "production",
		}
	}

	/// Returns the gateway base URL for the environment.
	pub const fn base_url(self) -> &'static str {
		match self {
			Self::Sandbox => "https://apisandbox.safaricom.et",
			Self::Production => "https://api.safaricom.et",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Environment {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"sandbox" => Ok(Self::Sandbox),
			"production" => Ok(Self::Production),
			_ => Err(ConfigError::UnknownEnvironment { value: s.to_owned() }),
		}
	}
}

/// Immutable SDK configuration consumed by [`MpesaClient`](crate::client::MpesaClient).
///
/// Construction validates the credentials; the `with_*` helpers consume and return the value so
/// a finished configuration is never mutated in place.
#[derive(Clone, Debug)]
pub struct Config {
	/// Consumer key + secret pair.
	pub credentials: Credentials,
	/// Target environment.
	pub environment: Environment,
	/// Gateway base URL; derived from the environment unless overridden.
	pub base_url: Url,
	/// Per-request timeout enforced by the transport.
	pub timeout: StdDuration,
	/// Additional attempts after the first failed one.
	pub retry_count: u32,
	/// Fixed pause between attempts.
	pub retry_delay: StdDuration,
	/// Subtracted from the provider-reported token lifetime.
	pub token_safety_margin: Duration,
}
impl Config {
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(5);
	/// Default retry budget.
	pub const DEFAULT_RETRY_COUNT: u32 = 2;
	/// Default pause between attempts.
	pub const DEFAULT_RETRY_DELAY: StdDuration = StdDuration::from_secs(5);
	/// Default early-expiry buffer for cached tokens.
	pub const DEFAULT_TOKEN_SAFETY_MARGIN: Duration = Duration::seconds(60);

	const ENV_CONSUMER_KEY: &'static str = "MPESA_CONSUMER_KEY";
	const ENV_CONSUMER_SECRET: &'static str = "MPESA_CONSUMER_SECRET";
	const ENV_ENVIRONMENT: &'static str = "MPESA_ENVIRONMENT";

	/// Creates a configuration for the given credentials and environment with default timings.
	pub fn new(
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
		environment: Environment,
	) -> Result<Self, ConfigError> {
		let credentials = Credentials::new(consumer_key, consumer_secret)?;
		let base_url = Url::parse(environment.base_url())?;

		Ok(Self {
			credentials,
			environment,
			base_url,
			timeout: Self::DEFAULT_TIMEOUT,
			retry_count: Self::DEFAULT_RETRY_COUNT,
			retry_delay: Self::DEFAULT_RETRY_DELAY,
			token_safety_margin: Self::DEFAULT_TOKEN_SAFETY_MARGIN,
		})
	}

	/// Reads `MPESA_CONSUMER_KEY`, `MPESA_CONSUMER_SECRET`, and the optional
	/// `MPESA_ENVIRONMENT` (defaults to sandbox).
	pub fn from_env() -> Result<Self, ConfigError> {
		let key = std::env::var(Self::ENV_CONSUMER_KEY)
			.map_err(|_| ConfigError::MissingEnvVar { name: Self::ENV_CONSUMER_KEY })?;
		let secret = std::env::var(Self::ENV_CONSUMER_SECRET)
			.map_err(|_| ConfigError::MissingEnvVar { name: Self::ENV_CONSUMER_SECRET })?;
		let environment = match std::env::var(Self::ENV_ENVIRONMENT) {
			Ok(value) => value.parse()?,
			Err(_) => Environment::default(),
		};

		Self::new(key, secret, environment)
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the retry budget and the fixed pause between attempts.
	pub fn with_retry(mut self, count: u32, delay: StdDuration) -> Self {
		self.retry_count = count;
		self.retry_delay = delay;

		self
	}

	/// Points the client at a different gateway host (mock servers, private deployments).
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = base_url;

		self
	}

	/// Overrides the token safety margin; negative values clamp to zero.
	pub fn with_token_safety_margin(mut self, margin: Duration) -> Self {
		self.token_safety_margin = if margin.is_negative() { Duration::ZERO } else { margin };

		self
	}

	/// Appends a gateway path (leading slash, optional query) to the base URL.
	///
	/// Any path prefix on the base URL is kept, so `https://gw.example.com/mpesa` plus
	/// `/v1/c2b/payments` targets `https://gw.example.com/mpesa/v1/c2b/payments`. Protocol-relative
	/// paths (`//host/...`) are rejected because they would name another host.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		if path.starts_with("//") {
			return Err(ConfigError::InvalidPath { path: path.to_owned() });
		}

		let (relative, query) = match path.split_once('?') {
			Some((relative, query)) => (relative, Some(query)),
			None => (path, None),
		};
		let prefix = self.base_url.path().trim_end_matches('/');
		let mut url = self.base_url.clone();

		url.set_path(&format!("{prefix}/{}", relative.trim_start_matches('/')));
		url.set_query(query);
		url.set_fragment(None);

		Ok(url)
	}
}
