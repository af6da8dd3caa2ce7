//! Callback that persists refreshed tokens into a [`TokenStore`].

// self
use crate::{
	_prelude::*,
	auth::{TokenKey, TokenRecord},
	error::NotifyError,
	notify::{NotifyFuture, TokenNotify},
	source::{NotifyRefreshTokenSource, TokenSource},
	store::{StoreError, TokenStore},
};

/// Saves every refreshed [`TokenRecord`] under a fixed [`TokenKey`].
///
/// Store failures surface as [`NotifyError::Persist`], so the refresh caller learns that the
/// rotated refresh token only lives in memory.
#[derive(Clone)]
pub struct StoreNotify {
	store: Arc<dyn TokenStore>,
	key: TokenKey,
}
impl StoreNotify {
	/// Creates a callback writing to `store` under `key`.
	pub fn new(store: Arc<dyn TokenStore>, key: TokenKey) -> Self {
		Self { store, key }
	}

	/// Key the callback writes to.
	pub fn key(&self) -> &TokenKey {
		&self.key
	}

	/// Reads the last persisted record, typically to seed a cache on startup.
	pub async fn load(&self) -> Result<Option<TokenRecord>, StoreError> {
		self.store.fetch(&self.key).await
	}
}
impl TokenNotify<TokenRecord> for StoreNotify {
	fn notify<'a>(&'a self, token: &'a TokenRecord) -> NotifyFuture<'a> {
		Box::pin(async move {
			self.store.save(&self.key, token.clone()).await.map_err(NotifyError::from)
		})
	}
}
impl Debug for StoreNotify {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StoreNotify").field("key", &self.key).finish()
	}
}

impl NotifyRefreshTokenSource<TokenRecord> {
	/// Builds a cache seeded from `store[key]` that writes every refreshed token back there.
	///
	/// When nothing is stored yet the cache starts empty and refreshes on first use. A `source`
	/// that is itself a cache is unwrapped exactly as [`NotifyRefreshTokenSource::new`] does.
	pub async fn from_store(
		store: Arc<dyn TokenStore>,
		key: TokenKey,
		source: Arc<dyn TokenSource<TokenRecord>>,
	) -> Result<Self, StoreError> {
		let notify = StoreNotify::new(store, key);
		let initial = notify.load().await?;

		Ok(Self::new(initial, source).with_notify(notify))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, store::MemoryStore};

	#[tokio::test]
	async fn notify_saves_under_key() {
		let store = Arc::new(MemoryStore::default());
		let key = TokenKey::new("github:octocat").expect("Key fixture should be valid.");
		let notify = StoreNotify::new(store.clone(), key.clone());

		assert!(notify.load().await.expect("Empty store fetch should succeed.").is_none());

		notify.notify(&fresh_record("access-1")).await.expect("Saving should succeed.");

		let loaded = notify
			.load()
			.await
			.expect("Store fetch should succeed.")
			.expect("Record should be persisted after notify.");

		assert_eq!(loaded.access_token.expose(), "access-1");
		assert_eq!(notify.key(), &key);
	}

	#[tokio::test]
	async fn from_store_seeds_and_persists() {
		let store = Arc::new(MemoryStore::default());
		let key = TokenKey::new("tenant-a/billing").expect("Key fixture should be valid.");

		store.save(&key, expired_record("stale")).await.expect("Seeding the store should succeed.");

		let source = Arc::new(ScriptedSource::always(fresh_record("rotated")));
		let cache =
			NotifyRefreshTokenSource::from_store(store.clone(), key.clone(), source.clone())
				.await
				.expect("Building a store-backed cache should succeed.");
		let seeded = cache.current().await.expect("Cache should be seeded from the store.");

		assert_eq!(seeded.access_token.expose(), "stale");

		let token = cache.token().await.expect("Expired seed should be refreshed.");
		let persisted = store
			.fetch(&key)
			.await
			.expect("Store fetch should succeed.")
			.expect("Refreshed record should be persisted.");

		assert_eq!(token.access_token.expose(), "rotated");
		assert_eq!(persisted.access_token.expose(), "rotated");
		assert_eq!(source.calls(), 1);
	}
}
