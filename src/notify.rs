//! Callbacks invoked with every freshly refreshed token.
//!
//! A [`TokenNotify`] runs while the caching source still holds its lock, so at most one
//! callback is in flight per cache and every rotated token is observed exactly once. Its error
//! is reported to the caller that triggered the refresh; the token stays cached either way.
//!
//! Three ways to provide one:
//!
//! - a synchronous closure `Fn(&T) -> Result<(), NotifyError>` (see [`notify_fn`]);
//! - an async closure wrapped in [`AsyncNotifyFn`];
//! - [`StoreNotify`], which saves each refreshed [`TokenRecord`](crate::auth::TokenRecord) into
//!   a [`TokenStore`](crate::store::TokenStore).

pub mod store;

pub use store::StoreNotify;

// self
use crate::{_prelude::*, error::NotifyError, source::Credential};

/// Boxed future returned by [`TokenNotify::notify`].
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + 'a + Send>>;

/// Hook receiving every token obtained by a refresh.
pub trait TokenNotify<T>
where
	Self: Send + Sync,
	T: Credential,
{
	/// Handles a freshly refreshed token; an error vetoes its use downstream.
	fn notify<'a>(&'a self, token: &'a T) -> NotifyFuture<'a>;
}
impl<T, F> TokenNotify<T> for F
where
	T: Credential,
	F: Send + Sync + Fn(&T) -> Result<(), NotifyError>,
{
	fn notify<'a>(&'a self, token: &'a T) -> NotifyFuture<'a> {
		let result = self(token);

		Box::pin(async move { result })
	}
}

/// Pins a closure to the synchronous callback signature so its argument and error types are
/// inferred without annotations at the call site.
pub fn notify_fn<T, F>(f: F) -> F
where
	T: Credential,
	F: 'static + Send + Sync + Fn(&T) -> Result<(), NotifyError>,
{
	f
}

/// Adapter turning an async closure into a [`TokenNotify`].
///
/// The closure receives an owned clone of the token so its future may outlive the borrow.
pub struct AsyncNotifyFn<F>(F);
impl<F> AsyncNotifyFn<F> {
	/// Wraps `f`.
	pub fn new(f: F) -> Self {
		Self(f)
	}
}
impl<T, F, Fut> TokenNotify<T> for AsyncNotifyFn<F>
where
	T: Credential,
	F: Send + Sync + Fn(T) -> Fut,
	Fut: 'static + Send + Future<Output = Result<(), NotifyError>>,
{
	fn notify<'a>(&'a self, token: &'a T) -> NotifyFuture<'a> {
		Box::pin((self.0)(token.clone()))
	}
}
impl<F> Debug for AsyncNotifyFn<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("AsyncNotifyFn(..)")
	}
}
