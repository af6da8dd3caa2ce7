//! Error types shared by token sources, notify callbacks, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error accepted from foreign token sources and callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error returned by [`TokenSource`](crate::source::TokenSource) implementations.
///
/// The caching source passes acquisition errors from the wrapped source through untouched;
/// only [`Error::Notify`] is produced on its behalf, and only by the `TokenSource` view of a
/// refresh whose callback failed.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The underlying source could not acquire a token (network, upstream, parsing).
	#[error("Token acquisition failed.")]
	Acquisition {
		/// Source-specific failure.
		#[source]
		source: BoxError,
	},
	/// Provider rejected the grant (e.g., an expired or reused refresh token).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or source-supplied reason string.
		reason: String,
	},
	/// Token has been revoked and must not be reused.
	#[error("Token has been revoked.")]
	Revoked,
	/// A refreshed token was obtained and cached but the notify callback rejected it.
	#[error(transparent)]
	Notify(#[from] NotifyError),
	/// Storage-layer failure raised by a store-backed source.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
}
impl Error {
	/// Wraps a source-specific failure as [`Error::Acquisition`].
	pub fn acquisition(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Acquisition { source: Box::new(src) }
	}

	/// Returns `true` when the error came from a notify callback rather than acquisition.
	///
	/// A notify failure means a fresh token exists and is cached; acquisition failures mean
	/// no new token was produced.
	pub fn is_notify(&self) -> bool {
		matches!(self, Self::Notify(_))
	}
}

/// Failures reported by [`TokenNotify`](crate::notify::TokenNotify) callbacks.
#[derive(Debug, ThisError)]
pub enum NotifyError {
	/// The callback refused the token for downstream use.
	#[error("Refreshed token was rejected: {reason}.")]
	Rejected {
		/// Callback-supplied reason string.
		reason: String,
	},
	/// Persisting the refreshed token failed.
	#[error("Refreshed token could not be persisted.")]
	Persist(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Any other callback failure.
	#[error("Notify callback failed.")]
	Other {
		/// Callback-specific failure.
		#[source]
		source: BoxError,
	},
}
impl NotifyError {
	/// Builds a [`NotifyError::Rejected`] from a reason.
	pub fn rejected(reason: impl Into<String>) -> Self {
		Self::Rejected { reason: reason.into() }
	}

	/// Wraps a callback-specific failure as [`NotifyError::Other`].
	pub fn other(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Other { source: Box::new(src) }
	}
}
