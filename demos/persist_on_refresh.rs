//! Demonstrates persisting every rotated token to a JSON file and seeding the cache from it on
//! the next start.

// std
use std::{
	env,
	sync::{
		Arc,
		atomic::{AtomicU32, Ordering},
	},
};
// crates.io
use color_eyre::Result;
use time::{Duration, OffsetDateTime};
// self
use oauth2_notify::{
	auth::{TokenKey, TokenRecord},
	error::Error,
	source::{NotifyRefreshTokenSource, TokenFuture, TokenSource},
	store::{FileStore, TokenStore},
};

/// Stand-in for a refresh-token exchange: every call mints a short-lived token.
#[derive(Default)]
struct RotatingSource(AtomicU32);
impl TokenSource<TokenRecord> for RotatingSource {
	fn token(&self) -> TokenFuture<'_, TokenRecord> {
		Box::pin(async move {
			let generation = self.0.fetch_add(1, Ordering::SeqCst) + 1;

			TokenRecord::builder()
				.access_token(format!("access-{generation}"))
				.refresh_token(format!("refresh-{generation}"))
				.issued_at(OffsetDateTime::now_utc())
				.expires_in(Duration::minutes(30))
				.build()
				.map_err(Error::acquisition)
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let path = env::temp_dir().join("oauth2_notify_demo.json");
	let store = Arc::new(FileStore::open(&path)?);
	let key = TokenKey::new("demo:service")?;
	let source: Arc<dyn TokenSource<TokenRecord>> = Arc::new(RotatingSource::default());
	let cache = NotifyRefreshTokenSource::from_store(store.clone(), key.clone(), source).await?;

	match cache.current().await {
		Some(seed) => println!("Seeded from {} (status: {:?}).", path.display(), seed.status()),
		None => println!("No persisted token at {}; the first call refreshes.", path.display()),
	}

	let fetched = cache.fetch().await?;

	println!("Using {:?} token (notify error: {:?}).", fetched.origin, fetched.notify_error);

	if let Some(persisted) = store.fetch(&key).await? {
		println!("Persisted record expires at {:?}.", persisted.expires_at);
	}

	Ok(())
}
