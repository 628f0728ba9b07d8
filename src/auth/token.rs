//! Immutable bearer-token values and their expiry bookkeeping.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Bearer token paired with the instant it stops being usable.
///
/// `expires_at` already has the safety margin subtracted, so validity checks compare against it
/// directly. Values are replaced wholesale on refresh; nothing mutates a token in place.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
	/// Bearer secret; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Instant the provider issued the token (local clock).
	pub issued_at: OffsetDateTime,
	/// Instant after which the token must not be attached to requests.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Lifetime assumed when the provider omits `expires_in` or sends an unparsable value.
	pub const DEFAULT_LIFETIME: Duration = Duration::seconds(3599);

	/// Creates a token that expires at an absolute instant.
	pub fn new(
		secret: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_at: OffsetDateTime,
	) -> Self {
		Self { secret: TokenSecret::new(secret), issued_at, expires_at }
	}

	/// Creates a token from a provider-reported lifetime, subtracting `margin`.
	///
	/// The margin is capped at half the lifetime: a 30 s token under the default 60 s margin
	/// expires 15 s after issue.
	pub fn with_lifetime(
		secret: impl Into<String>,
		issued_at: OffsetDateTime,
		lifetime: Duration,
		margin: Duration,
	) -> Self {
		let lifetime = lifetime.max(Duration::ZERO);
		let usable = lifetime - margin.clamp(Duration::ZERO, lifetime / 2);

		Self::new(secret, issued_at, issued_at + usable)
	}

	/// Returns `true` while `instant` is strictly before the expiry threshold.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Convenience helper that checks validity against the current UTC clock.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Returns the bearer value. Callers must avoid logging it.
	pub fn expose(&self) -> &str {
		self.secret.expose()
	}

	/// Builds the `Authorization` header value for business calls.
	pub fn bearer_authorization(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Parses a provider `expires_in` value, falling back to [`AccessToken::DEFAULT_LIFETIME`].
///
/// The gateway sends the lifetime as a numeric string (`"3599"`); plain JSON numbers are accepted
/// too. Missing, unparsable, or non-positive values use the default.
pub fn parse_lifetime(raw: Option<&ExpiresIn>) -> Duration {
	let seconds = match raw {
		Some(ExpiresIn::Seconds(value)) => Some(*value),
		Some(ExpiresIn::Text(value)) => value.trim().parse::<i64>().ok(),
		None => None,
	};

	match seconds {
		Some(value) if value > 0 => Duration::seconds(value),
		_ => AccessToken::DEFAULT_LIFETIME,
	}
}

/// `expires_in` as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpiresIn {
	/// Numeric lifetime in seconds.
	Seconds(i64),
	/// Lifetime encoded as a decimal string.
	Text(String),
}
