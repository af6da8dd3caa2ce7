//! Caching OAuth 2.0 token source that refreshes expired tokens exactly once under contention
//! and notifies a callback with every rotated token so it can be persisted.
//!
//! Wrap any [`source::TokenSource`] in a [`source::NotifyRefreshTokenSource`], attach a
//! [`notify::TokenNotify`] (a plain closure works), and hand the cache to whatever needs
//! tokens. Wrapping a cache in another cache is collapsed at construction time.

#![deny(clippy::all, missing_docs)]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod auth;
pub mod error;
pub mod notify;
pub mod obs;
pub mod source;
pub mod store;
#[cfg(any(test, feature = "test"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::{
		collections::VecDeque,
		sync::atomic::{AtomicUsize, Ordering},
	};
	// crates.io
	use parking_lot::Mutex;
	// self
	use crate::{
		auth::TokenRecord,
		source::{TokenFuture, TokenSource},
	};

	/// Builds a record that stays valid for an hour.
	pub fn fresh_record(access: &str) -> TokenRecord {
		TokenRecord::builder()
			.access_token(access)
			.refresh_token(format!("{access}-refresh"))
			.issued_now()
			.expires_in(Duration::hours(1))
			.build()
			.expect("Fresh token record fixture should build successfully.")
	}

	/// Builds a record whose expiry already passed.
	pub fn expired_record(access: &str) -> TokenRecord {
		let issued = OffsetDateTime::now_utc() - Duration::hours(2);

		TokenRecord::builder()
			.access_token(access)
			.issued_at(issued)
			.expires_at(issued + Duration::hours(1))
			.build()
			.expect("Expired token record fixture should build successfully.")
	}

	/// Builds a record without an expiry instant.
	pub fn non_expiring_record(access: &str) -> TokenRecord {
		TokenRecord::builder()
			.access_token(access)
			.build()
			.expect("Non-expiring token record fixture should build successfully.")
	}

	/// Terminal source that replays scripted results and counts every call.
	///
	/// Once the script is exhausted the last configured fallback is returned; without a
	/// fallback the source panics so tests can assert it is never reached.
	#[derive(Default)]
	pub struct ScriptedSource {
		script: Mutex<VecDeque<Result<TokenRecord>>>,
		fallback: Option<TokenRecord>,
		calls: AtomicUsize,
	}
	impl ScriptedSource {
		/// Source that must never be called.
		pub fn forbidden() -> Self {
			Self::default()
		}

		/// Source that always returns `record`.
		pub fn always(record: TokenRecord) -> Self {
			Self { fallback: Some(record), ..Self::default() }
		}

		/// Queues a result returned before the fallback is consulted.
		pub fn then(self, result: Result<TokenRecord>) -> Self {
			self.script.lock().push_back(result);

			self
		}

		/// Number of times [`TokenSource::token`] was invoked.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl TokenSource<TokenRecord> for ScriptedSource {
		fn token(&self) -> TokenFuture<'_, TokenRecord> {
			Box::pin(async move {
				self.calls.fetch_add(1, Ordering::SeqCst);

				let next = self.script.lock().pop_front();

				match next {
					Some(result) => result,
					None => Ok(self
						.fallback
						.clone()
						.expect("ScriptedSource was called but has no result scripted.")),
				}
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

