// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	source::{Credential, TokenFuture, TokenSource},
};

/// Terminal source that always returns the same token, valid or not.
///
/// Handy for long-lived API keys and for seeding tests; it never refreshes anything.
#[derive(Clone, Debug)]
pub struct StaticTokenSource<T = TokenRecord>(T);
impl<T> StaticTokenSource<T>
where
	T: Credential,
{
	/// Wraps the token that every call will return.
	pub fn new(token: T) -> Self {
		Self(token)
	}
}
impl<T> TokenSource<T> for StaticTokenSource<T>
where
	T: Credential,
{
	fn token(&self) -> TokenFuture<'_, T> {
		let token = self.0.clone();

		Box::pin(async move { Ok(token) })
	}
}
