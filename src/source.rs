//! Token source contracts and the caching, notifying source built on top of them.

mod metrics;
mod notify_refresh;
mod static_token;

pub use metrics::RefreshMetrics;
pub use notify_refresh::*;
pub use static_token::StaticTokenSource;

// self
use crate::{_prelude::*, auth::TokenRecord};

/// Boxed future returned by [`TokenSource::token`].
pub type TokenFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Token value that can judge its own validity.
///
/// Caches never second-guess this predicate: clock skew, early expiry, and required fields are
/// the implementor's call.
pub trait Credential
where
	Self: 'static + Clone + Send + Sync,
{
	/// Returns `true` if the token can be handed out as-is.
	fn is_valid(&self) -> bool;
}

/// Anything that can produce a token on demand.
///
/// Terminal implementations (a refresh-token exchange, a metadata server call, ...) must be
/// safe to call repeatedly and must not cache; wrap them in a [`NotifyRefreshTokenSource`]
/// for that.
pub trait TokenSource<T = TokenRecord>
where
	Self: Send + Sync,
	T: Credential,
{
	/// Returns a token, acquiring or refreshing one if necessary.
	fn token(&self) -> TokenFuture<'_, T>;

	/// Returns the caching source behind `self`, if `self` is one.
	///
	/// Used by [`NotifyRefreshTokenSource::new`] to avoid stacking caches; other
	/// implementations keep the default.
	fn as_notify_refresh(&self) -> Option<&NotifyRefreshTokenSource<T>> {
		None
	}
}
impl<T, S> TokenSource<T> for Arc<S>
where
	T: Credential,
	S: ?Sized + TokenSource<T>,
{
	fn token(&self) -> TokenFuture<'_, T> {
		(**self).token()
	}

	fn as_notify_refresh(&self) -> Option<&NotifyRefreshTokenSource<T>> {
		(**self).as_notify_refresh()
	}
}
