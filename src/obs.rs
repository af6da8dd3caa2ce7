//! Optional observability helpers for caching token sources.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every fetch inside an `oauth2_notify.refresh` span with a `stage`
//!   field, and to emit a `debug` event per outcome.
//! - Enable `metrics` to increment the `oauth2_notify_refresh_total` counter, labeled by
//!   `outcome`.
//!
//! Both are no-ops when their feature is disabled.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded by caching sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// The wrapped source is about to be called.
	Attempt,
	/// A cached token was still valid and returned.
	Reused,
	/// The wrapped source produced a new token.
	Refreshed,
	/// The wrapped source failed.
	Failure,
	/// The notify callback rejected a refreshed token.
	NotifyFailure,
}
impl RefreshOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshOutcome::Attempt => "attempt",
			RefreshOutcome::Reused => "reused",
			RefreshOutcome::Refreshed => "refreshed",
			RefreshOutcome::Failure => "failure",
			RefreshOutcome::NotifyFailure => "notify_failure",
		}
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
