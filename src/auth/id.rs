//! Validated keys naming persisted tokens.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const TOKEN_KEY_MAX_LEN: usize = 128;

/// Error returned when token key validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The key was empty.
	#[error("Token key cannot be empty.")]
	Empty,
	/// The key contains whitespace characters.
	#[error("Token key contains whitespace.")]
	ContainsWhitespace,
	/// The key exceeded the allowed length.
	#[error("Token key exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted length in bytes.
		max: usize,
	},
}

/// Name under which a token is saved in a [`TokenStore`](crate::store::TokenStore)
/// (for example `github:octocat` or `tenant-a/billing`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenKey(String);
impl TokenKey {
	/// Creates a new key after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for TokenKey {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for TokenKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for TokenKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<TokenKey> for String {
	fn from(value: TokenKey) -> Self {
		value.0
	}
}
impl TryFrom<String> for TokenKey {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for TokenKey {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for TokenKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenKey({})", self.0)
	}
}
impl Display for TokenKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > TOKEN_KEY_MAX_LEN {
		return Err(IdentifierError::TooLong { max: TOKEN_KEY_MAX_LEN });
	}

	Ok(())
}
