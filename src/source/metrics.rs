// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for a single caching source.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	reuses: AtomicU64,
	refreshes: AtomicU64,
	failures: AtomicU64,
	notify_failures: AtomicU64,
}
impl RefreshMetrics {
	/// Returns how many times the wrapped source was asked for a token.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns how many fetches were answered from the cache.
	pub fn reuses(&self) -> u64 {
		self.reuses.load(Ordering::Relaxed)
	}

	/// Returns how many refreshes produced a new token (including ones the callback rejected).
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns how many refresh attempts failed in the wrapped source.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Returns how many notify callbacks reported an error.
	pub fn notify_failures(&self) -> u64 {
		self.notify_failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_reuse(&self) {
		self.reuses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self) {
		self.refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_notify_failure(&self) {
		self.notify_failures.fetch_add(1, Ordering::Relaxed);
	}
}
