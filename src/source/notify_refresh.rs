//! Caching token source that refreshes under a single lock and notifies on rotation.
//!
//! [`NotifyRefreshTokenSource`] keeps the last token it handed out. Each call either returns
//! that token (while [`Credential::is_valid`] holds) or asks the wrapped source for a new one,
//! caches it, and passes it to the attached [`TokenNotify`] before returning. The whole
//! check-refresh-notify-store sequence runs under one async mutex, so concurrent callers share
//! a single refresh and a single callback invocation.
//!
//! The new token is committed to the cache only after the callback returns. Dropping a fetch
//! future midway (a timeout, an aborted task) therefore never leaves a rotated token cached
//! without its notification.

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	error::NotifyError,
	notify::TokenNotify,
	obs::{self, RefreshOutcome, RefreshSpan},
	source::{Credential, RefreshMetrics, TokenFuture, TokenSource},
};

type SharedNotify<T> = Arc<dyn TokenNotify<T>>;

/// Where a [`Fetched`] token came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenOrigin {
	/// The cached token was still valid.
	Cached,
	/// The wrapped source produced a new token during this call.
	Refreshed,
}

/// Outcome of [`NotifyRefreshTokenSource::fetch`].
///
/// A refresh whose callback failed still yields the new token (it is already cached), with the
/// callback error attached in `notify_error`.
#[derive(Debug)]
pub struct Fetched<T> {
	/// Token to use.
	pub token: T,
	/// Whether the token was reused or freshly obtained.
	pub origin: TokenOrigin,
	/// Error reported by the notify callback for a refreshed token.
	pub notify_error: Option<NotifyError>,
}
impl<T> Fetched<T> {
	/// Returns `true` if the token was obtained during this call.
	pub fn is_refreshed(&self) -> bool {
		matches!(self.origin, TokenOrigin::Refreshed)
	}

	/// Collapses into the [`TokenSource`] view: a callback failure becomes
	/// [`Error::Notify`] and the token is dropped.
	pub fn into_result(self) -> Result<T> {
		match self.notify_error {
			Some(err) => Err(err.into()),
			None => Ok(self.token),
		}
	}
}

/// Token source that caches the current token, refreshes it through the wrapped source when
/// it stops being valid, and reports each refreshed token to an optional callback.
///
/// The handle is cheap to clone and every clone shares the same cached token, lock, and
/// callback slot. Use [`NotifyRefreshTokenSource::ptr_eq`] to compare identities.
pub struct NotifyRefreshTokenSource<T = TokenRecord>
where
	T: Credential,
{
	shared: Arc<Shared<T>>,
}
impl<T> NotifyRefreshTokenSource<T>
where
	T: Credential,
{
	/// Wraps `source`, starting from `initial` (if any).
	///
	/// If `source` is itself a `NotifyRefreshTokenSource`, no second layer is built:
	///
	/// - with `initial == None` that cache is returned as-is, keeping its token and callback;
	/// - otherwise a fresh cache is built over the inner cache's own source, seeded with
	///   `initial` and without a callback.
	pub fn new(initial: Option<T>, source: Arc<dyn TokenSource<T>>) -> Self {
		let source = match source.as_notify_refresh() {
			Some(existing) if initial.is_none() => return existing.clone(),
			Some(existing) => existing.shared.source.clone(),
			None => source,
		};

		Self {
			shared: Arc::new(Shared {
				source,
				token: AsyncMutex::new(initial),
				notify: RwLock::new(None),
				metrics: RefreshMetrics::default(),
			}),
		}
	}

	/// Convenience over [`NotifyRefreshTokenSource::new`] for an owned source.
	pub fn wrap<S>(initial: Option<T>, source: S) -> Self
	where
		S: 'static + TokenSource<T>,
	{
		Self::new(initial, Arc::new(source))
	}

	/// Attaches `notify`, replacing any previous callback, and returns the handle.
	///
	/// The callback slot is shared by every clone of this cache, so the replacement applies to
	/// all of them from the next refresh on. Callbacks are not chained.
	pub fn with_notify<N>(self, notify: N) -> Self
	where
		N: 'static + TokenNotify<T>,
	{
		self.set_notify(notify);

		self
	}

	/// In-place form of [`NotifyRefreshTokenSource::with_notify`].
	pub fn set_notify<N>(&self, notify: N)
	where
		N: 'static + TokenNotify<T>,
	{
		let notify: SharedNotify<T> = Arc::new(notify);

		*self.shared.notify.write() = Some(notify);
	}

	/// Detaches the callback; later refreshes only update the cache.
	pub fn clear_notify(&self) {
		*self.shared.notify.write() = None;
	}

	/// Returns `true` if a callback is attached.
	pub fn has_notify(&self) -> bool {
		self.shared.notify.read().is_some()
	}

	/// Returns the cached token without validating or refreshing it.
	///
	/// Waits for an in-flight refresh to finish first.
	pub async fn current(&self) -> Option<T> {
		self.shared.token.lock().await.clone()
	}

	/// Per-instance counters shared by all clones.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.shared.metrics
	}

	/// Returns `true` if both handles point at the same cache.
	pub fn ptr_eq(this: &Self, other: &Self) -> bool {
		Arc::ptr_eq(&this.shared, &other.shared)
	}

	/// Returns the cached token if valid, otherwise refreshes it.
	///
	/// `Err` means the wrapped source failed; its error is returned unchanged and the cached
	/// token is left as it was, which also holds when this future is dropped before completing.
	/// A callback failure is not an `Err` here: the new token is cached and returned with
	/// [`Fetched::notify_error`] set.
	pub async fn fetch(&self) -> Result<Fetched<T>> {
		let span = RefreshSpan::new("fetch");

		span.instrument(self.fetch_locked()).await
	}

	async fn fetch_locked(&self) -> Result<Fetched<T>> {
		let shared = &self.shared;
		let mut current = shared.token.lock().await;

		if let Some(token) = &*current
			&& token.is_valid()
		{
			shared.metrics.record_reuse();
			obs::record_refresh_outcome(RefreshOutcome::Reused);

			return Ok(Fetched {
				token: token.clone(),
				origin: TokenOrigin::Cached,
				notify_error: None,
			});
		}

		shared.metrics.record_attempt();
		obs::record_refresh_outcome(RefreshOutcome::Attempt);

		let token = shared.source.token().await.inspect_err(|_| {
			shared.metrics.record_failure();
			obs::record_refresh_outcome(RefreshOutcome::Failure);
		})?;

		let notify = shared.notify.read().clone();
		let notify_error = match notify {
			Some(notify) => notify.notify(&token).await.err(),
			None => None,
		};

		// Commit only once the callback finished; a fetch dropped before this point leaves the
		// previous token in place and the next caller refreshes and notifies again.
		*current = Some(token.clone());

		shared.metrics.record_refresh();
		obs::record_refresh_outcome(RefreshOutcome::Refreshed);

		if notify_error.is_some() {
			shared.metrics.record_notify_failure();
			obs::record_refresh_outcome(RefreshOutcome::NotifyFailure);
		}

		Ok(Fetched { token, origin: TokenOrigin::Refreshed, notify_error })
	}
}
impl<T> TokenSource<T> for NotifyRefreshTokenSource<T>
where
	T: Credential,
{
	fn token(&self) -> TokenFuture<'_, T> {
		Box::pin(async move { self.fetch().await?.into_result() })
	}

	fn as_notify_refresh(&self) -> Option<&NotifyRefreshTokenSource<T>> {
		Some(self)
	}
}
impl<T> Clone for NotifyRefreshTokenSource<T>
where
	T: Credential,
{
	fn clone(&self) -> Self {
		Self { shared: self.shared.clone() }
	}
}
impl<T> Debug for NotifyRefreshTokenSource<T>
where
	T: Credential,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("NotifyRefreshTokenSource")
			.field("notify_set", &self.has_notify())
			.field("metrics", &self.shared.metrics)
			.finish()
	}
}

struct Shared<T>
where
	T: Credential,
{
	source: Arc<dyn TokenSource<T>>,
	// Held across the whole fetch body, including the source call and the callback.
	token: AsyncMutex<Option<T>>,
	notify: RwLock<Option<SharedNotify<T>>>,
	metrics: RefreshMetrics,
}
