// crates.io
use time::macros;
// self
use oauth2_notify::{
	_preludet::*,
	auth::{TokenKey, TokenRecord},
	notify::StoreNotify,
	source::{NotifyRefreshTokenSource, TokenSource},
	store::{MemoryStore, StoreError, StoreFuture, TokenStore},
};

fn make_key(value: &str) -> TokenKey {
	TokenKey::new(value).expect("Failed to build token key for memory store tests.")
}

fn build_record(access: &str, refresh: Option<&str>) -> TokenRecord {
	let issued = macros::datetime!(2025-11-10 12:00 UTC);
	let mut builder = TokenRecord::builder()
		.access_token(access)
		.issued_at(issued)
		.expires_at(issued + Duration::hours(1));

	if let Some(value) = refresh {
		builder = builder.refresh_token(value);
	}

	builder.build().expect("Token record fixture should build successfully.")
}

/// Store whose writes always fail, standing in for an unreachable secrets backend.
struct ReadOnlyStore;
impl TokenStore for ReadOnlyStore {
	fn save<'a>(&'a self, _key: &'a TokenKey, _record: TokenRecord) -> StoreFuture<'a, ()> {
		Box::pin(async { Err(StoreError::Backend { message: "read-only".into() }) })
	}

	fn fetch<'a>(&'a self, _key: &'a TokenKey) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async { Ok(None) })
	}

	fn remove<'a>(&'a self, _key: &'a TokenKey) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async { Ok(None) })
	}
}

#[tokio::test]
async fn save_fetch_and_remove() {
	let store = MemoryStore::default();
	let key = make_key("github:octocat");
	let record = build_record("access-1", Some("refresh-1"));

	store.save(&key, record.clone()).await.expect("Saving record into memory store should succeed.");

	let fetched = store
		.fetch(&key)
		.await
		.expect("Fetching from memory store should succeed.")
		.expect("Stored record should remain present.");

	assert_eq!(fetched.access_token.expose(), record.access_token.expose());
	assert_eq!(
		fetched.refresh_token.as_ref().map(|secret| secret.expose()),
		record.refresh_token.as_ref().map(|secret| secret.expose())
	);
	assert_eq!(store.len(), 1);

	let removed = store.remove(&key).await.expect("Removing should succeed.");

	assert!(removed.is_some());
	assert!(store.is_empty());
	assert!(store.fetch(&key).await.expect("Fetch should succeed.").is_none());
}

#[tokio::test]
async fn save_replaces_existing_record_and_keys_are_isolated() {
	let store = MemoryStore::default();
	let alpha = make_key("tenant-a");
	let beta = make_key("tenant-b");

	store.save(&alpha, build_record("a-1", None)).await.expect("First save should succeed.");
	store.save(&alpha, build_record("a-2", None)).await.expect("Replacement should succeed.");
	store.save(&beta, build_record("b-1", None)).await.expect("Second key save should succeed.");

	let alpha_record =
		store.fetch(&alpha).await.expect("Fetch should succeed.").expect("Alpha should exist.");
	let beta_record =
		store.fetch(&beta).await.expect("Fetch should succeed.").expect("Beta should exist.");

	assert_eq!(alpha_record.access_token.expose(), "a-2");
	assert_eq!(beta_record.access_token.expose(), "b-1");
	assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn every_rotation_is_persisted_in_order() {
	let store = Arc::new(MemoryStore::default());
	let key = make_key("svc:billing");
	let source = Arc::new(
		ScriptedSource::always(fresh_record("rotation-2")).then(Ok(expired_record("rotation-1"))),
	);
	let cache =
		NotifyRefreshTokenSource::from_store(store.clone(), key.clone(), source.clone())
			.await
			.expect("Building a cache over an empty store should succeed.");

	assert!(cache.current().await.is_none());

	// The first rotation is already expired, so the second call rotates again.
	cache.token().await.expect("First rotation should succeed.");

	let first = store.fetch(&key).await.expect("Fetch should succeed.").expect("Persisted.");

	assert_eq!(first.access_token.expose(), "rotation-1");

	cache.token().await.expect("Second rotation should succeed.");

	let second = store.fetch(&key).await.expect("Fetch should succeed.").expect("Persisted.");

	assert_eq!(second.access_token.expose(), "rotation-2");
	assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn persistence_failure_is_reported_but_token_stays_cached() {
	let key = make_key("svc:ledger");
	let source = Arc::new(ScriptedSource::always(fresh_record("unsaved")));
	let cache = NotifyRefreshTokenSource::<TokenRecord>::new(None, source.clone())
		.with_notify(StoreNotify::new(Arc::new(ReadOnlyStore), key));
	let fetched = cache.fetch().await.expect("Acquisition should succeed.");

	assert_eq!(fetched.token.access_token.expose(), "unsaved");
	assert!(matches!(
		fetched.notify_error,
		Some(oauth2_notify::error::NotifyError::Persist(StoreError::Backend { .. }))
	));

	let token = cache.token().await.expect("Cached token should be reused.");

	assert_eq!(token.access_token.expose(), "unsaved");
	assert_eq!(source.calls(), 1);
}
