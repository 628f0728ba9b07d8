//! Single-slot bearer-token cache with double-checked refresh.
//!
//! Readers check validity under a shared lock. A miss upgrades to the exclusive lock and
//! re-validates before calling the [`Authenticator`], so callers racing the same miss piggy-back
//! on one refresh instead of stampeding the token endpoint. The slot is only written after a
//! successful exchange, so a failed refresh leaves the previous value untouched.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Authenticator},
};

/// Owned token cache; one per client instance.
pub struct TokenCache {
	authenticator: Arc<dyn Authenticator>,
	slot: RwLock<Option<AccessToken>>,
	refreshes: AtomicU64,
}
impl TokenCache {
	/// Creates an empty cache backed by `authenticator`.
	pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
		Self { authenticator, slot: RwLock::new(None), refreshes: AtomicU64::new(0) }
	}

	/// Returns a usable token, refreshing it when the cached one has expired.
	pub fn get_valid_token(&self) -> Result<AccessToken> {
		self.get_valid_token_at(OffsetDateTime::now_utc())
	}

	/// Same as [`TokenCache::get_valid_token`] with an explicit clock reading.
	pub fn get_valid_token_at(&self, now: OffsetDateTime) -> Result<AccessToken> {
		if let Some(token) = self.cached_at(now) {
			return Ok(token);
		}

		let mut slot = self.slot.write();

		if let Some(token) = slot.as_ref().filter(|token| token.is_valid_at(now)) {
			return Ok(token.clone());
		}

		self.refreshes.fetch_add(1, Ordering::Relaxed);

		let token = self.authenticator.authenticate()?;

		*slot = Some(token.clone());

		Ok(token)
	}

	/// Returns the cached token if it is still valid at `now`, without refreshing.
	pub fn cached_at(&self, now: OffsetDateTime) -> Option<AccessToken> {
		self.slot.read().as_ref().filter(|token| token.is_valid_at(now)).cloned()
	}

	/// Clears the cached token so the next lookup re-authenticates.
	pub fn invalidate(&self) {
		*self.slot.write() = None;
	}

	/// Clears the slot only if it still holds `stale`.
	///
	/// A concurrent caller may already have replaced the rejected token; that newer value is kept.
	pub fn discard(&self, stale: &AccessToken) {
		let mut slot = self.slot.write();

		if slot.as_ref() == Some(stale) {
			*slot = None;
		}
	}

	/// Returns how many times the cache has called its authenticator.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("cached", &self.slot.read().is_some())
			.field("refreshes", &self.refreshes())
			.finish()
	}
}
