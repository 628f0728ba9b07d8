//! SDK-level error types shared across the token pipeline, the request executor, and services.

// self
use crate::_prelude::*;

/// SDK-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical SDK error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint rejected the credentials or answered with an unusable body.
	#[error(transparent)]
	Authentication(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Business endpoint answered with a non-2xx status and a decodable error envelope.
	#[error("API error (HTTP {status}): {code} - {message}.")]
	Api {
		/// HTTP status returned by the gateway.
		status: u16,
		/// Gateway `errorCode` field.
		code: String,
		/// Gateway `errorMessage` field.
		message: String,
	},
	/// Business endpoint answered with a non-2xx status and a body that is not an error envelope.
	#[error("HTTP {status}: {}.", String::from_utf8_lossy(.body))]
	UnexpectedStatus {
		/// HTTP status returned by the gateway.
		status: u16,
		/// Raw response body.
		body: Vec<u8>,
	},
	/// A 2xx body could not be decoded into the expected response shape.
	#[error("Failed to decode the {operation} response.")]
	Decode {
		/// Operation label whose response failed to decode.
		operation: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Every attempt failed; carries the last observed failure.
	#[error("Request failed after {retries} retries.")]
	RetriesExhausted {
		/// Configured retry budget that was spent.
		retries: u32,
		/// Failure observed on the final attempt.
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	/// Returns `true` when the executor may retry the failed attempt.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transport(_) | Self::Api { .. } | Self::UnexpectedStatus { .. })
	}

	/// Returns the innermost failure, looking through [`Error::RetriesExhausted`].
	pub fn last_failure(&self) -> &Error {
		match self {
			Self::RetriesExhausted { source, .. } => source.last_failure(),
			other => other,
		}
	}
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Consumer key or consumer secret is empty.
	#[error("Consumer key and secret are required.")]
	MissingCredentials,
	/// A required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnvVar {
		/// Variable name.
		name: &'static str,
	},
	/// Environment label is neither `sandbox` nor `production`.
	#[error("Unknown environment `{value}`.")]
	UnknownEnvironment {
		/// Label that failed to parse.
		value: String,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint path would leave the configured gateway host.
	#[error("Endpoint path `{path}` is not relative to the gateway base URL.")]
	InvalidPath {
		/// Rejected path.
		path: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	RequestBody {
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidUrl { source }
	}
}

/// Token endpoint failures, classified by the provider's `resultCode`.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Result code `999991`.
	#[error("Invalid client ID: {description}.")]
	InvalidClientId {
		/// Provider-supplied `resultDesc`.
		description: String,
	},
	/// Result code `999996`.
	#[error("Invalid authentication type: {description}.")]
	InvalidAuthType {
		/// Provider-supplied `resultDesc`.
		description: String,
	},
	/// Result code `999997`.
	#[error("Invalid authorization header: {description}.")]
	InvalidAuthorizationHeader {
		/// Provider-supplied `resultDesc`.
		description: String,
	},
	/// Result code `999998`.
	#[error("Invalid grant type: {description}.")]
	InvalidGrantType {
		/// Provider-supplied `resultDesc`.
		description: String,
	},
	/// Any other provider result code.
	#[error("Authentication error: {code} - {description}.")]
	Provider {
		/// Provider-supplied `resultCode`.
		code: String,
		/// Provider-supplied `resultDesc`.
		description: String,
	},
	/// Non-2xx token response whose body is not a result envelope.
	#[error("Token endpoint returned HTTP {status}: {}.", String::from_utf8_lossy(.body))]
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: Vec<u8>,
	},
	/// 2xx token response that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl AuthError {
	/// Maps a provider `resultCode`/`resultDesc` pair onto the error taxonomy.
	pub fn from_result_code(code: impl Into<String>, description: impl Into<String>) -> Self {
		let code = code.into();
		let description = description.into();

		match code.as_str() {
			"999991" => Self::InvalidClientId { description },
			"999996" => Self::InvalidAuthType { description },
			"999997" => Self::InvalidAuthorizationHeader { description },
			"999998" => Self::InvalidGrantType { description },
			_ => Self::Provider { code, description },
		}
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the gateway.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The per-request timeout elapsed.
	#[error("Request timed out while calling the gateway.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the gateway.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
