//! Immutable token record struct, validity helpers, and builder.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret, source::Credential};

/// Validity status of a token record at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// The record carries an empty access token and can never be used.
	Empty,
	/// The record can be attached to requests.
	Active,
	/// The record is past (or within [`TokenRecord::EXPIRY_DELTA`] of) its expiry instant.
	Expired,
}

/// Errors produced by [`TokenRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenRecordBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when the expiry instant precedes the issued-at instant.
	#[error("Expiry must not precede the issued-at instant.")]
	ExpiryBeforeIssue,
}

/// Immutable record describing an issued OAuth token.
///
/// A refresh produces a new record; existing records are never mutated in place.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenRecord {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Token type reported by the provider (usually `Bearer`).
	pub token_type: String,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Issued-at instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant; `None` marks a token that never expires.
	pub expires_at: Option<OffsetDateTime>,
}
impl TokenRecord {
	/// Tokens are treated as expired this long before their expiry instant.
	pub const EXPIRY_DELTA: Duration = Duration::seconds(10);

	/// Returns a builder for records.
	pub fn builder() -> TokenRecordBuilder {
		TokenRecordBuilder::default()
	}

	/// Computes the validity status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if self.access_token.is_empty() {
			return TokenStatus::Empty;
		}
		if let Some(expires_at) = self.expires_at
			&& instant >= expires_at - Self::EXPIRY_DELTA
		{
			return TokenStatus::Expired;
		}

		TokenStatus::Active
	}

	/// Checks the status using the current UTC instant.
	pub fn status(&self) -> TokenStatus {
		self.status_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if the record can be used at the provided instant.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Active)
	}

	/// Returns `true` if the record is expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Time left before the record stops being valid, or `None` for non-expiring tokens.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Option<Duration> {
		self.expires_at.map(|expires_at| {
			let remaining = expires_at - Self::EXPIRY_DELTA - instant;

			if remaining.is_negative() { Duration::ZERO } else { remaining }
		})
	}
}
impl Credential for TokenRecord {
	fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`TokenRecord`].
#[derive(Clone, Debug, Default)]
pub struct TokenRecordBuilder {
	access_token: Option<TokenSecret>,
	token_type: Option<String>,
	refresh_token: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl TokenRecordBuilder {
	const DEFAULT_TOKEN_TYPE: &'static str = "Bearer";

	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Overrides the token type (defaults to `Bearer`).
	pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = Some(token_type.into());

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Stamps `issued_at` with the current clock.
	pub fn issued_now(self) -> Self {
		self.issued_at(OffsetDateTime::now_utc())
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces a [`TokenRecord`].
	///
	/// Leaving both `expires_at` and `expires_in` unset yields a non-expiring record.
	pub fn build(self) -> Result<TokenRecord, TokenRecordBuilderError> {
		let access_token = self.access_token.ok_or(TokenRecordBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => Some(instant),
			(None, Some(delta)) => Some(issued_at + delta),
			(None, None) => None,
		};

		if expires_at.is_some_and(|instant| instant < issued_at) {
			return Err(TokenRecordBuilderError::ExpiryBeforeIssue);
		}

		Ok(TokenRecord {
			access_token,
			token_type: self.token_type.unwrap_or_else(|| Self::DEFAULT_TOKEN_TYPE.into()),
			refresh_token: self.refresh_token,
			issued_at,
			expires_at,
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn record_expiring_at(expires: OffsetDateTime) -> TokenRecord {
		TokenRecord::builder()
			.access_token("access")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_at(expires)
			.build()
			.expect("Token record builder should succeed for status tests.")
	}

	#[test]
	fn status_honours_expiry_delta() {
		let record = record_expiring_at(macros::datetime!(2025-01-01 01:00 UTC));

		assert_eq!(record.status_at(macros::datetime!(2025-01-01 00:30 UTC)), TokenStatus::Active);
		assert_eq!(
			record.status_at(macros::datetime!(2025-01-01 00:59:49 UTC)),
			TokenStatus::Active
		);
		assert_eq!(
			record.status_at(macros::datetime!(2025-01-01 00:59:50 UTC)),
			TokenStatus::Expired
		);
		assert!(record.is_expired_at(macros::datetime!(2025-01-01 02:00 UTC)));
	}

	#[test]
	fn empty_access_token_is_never_valid() {
		let record = TokenRecord::builder()
			.access_token("")
			.build()
			.expect("Builder accepts empty strings and reports them through status.");

		assert_eq!(record.status(), TokenStatus::Empty);
		assert!(!record.is_valid());
	}

	#[test]
	fn missing_expiry_never_expires() {
		let record = TokenRecord::builder()
			.access_token("forever")
			.build()
			.expect("Builder should accept records without expiry.");

		assert!(record.expires_at.is_none());
		assert!(record.is_valid_at(macros::datetime!(2999-01-01 00:00 UTC)));
		assert_eq!(record.remaining_at(OffsetDateTime::now_utc()), None);
		assert_eq!(record.token_type, "Bearer");
	}

	#[test]
	fn builder_handles_relative_expiry_and_rejects_inverted_ranges() {
		let record = TokenRecord::builder()
			.access_token("secret")
			.token_type("MAC")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_in(Duration::minutes(30))
			.build()
			.expect("Token record builder should support relative expiry calculations.");

		assert_eq!(record.expires_at, Some(macros::datetime!(2025-01-01 00:30 UTC)));
		assert_eq!(record.token_type, "MAC");
		assert_eq!(
			record.remaining_at(macros::datetime!(2025-01-01 00:29 UTC)),
			Some(Duration::seconds(50))
		);
		assert_eq!(record.remaining_at(macros::datetime!(2025-01-01 01:00 UTC)), Some(Duration::ZERO));

		let err = TokenRecord::builder()
			.access_token("secret")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_at(macros::datetime!(2024-12-31 00:00 UTC))
			.build()
			.expect_err("Expiry before issue should be rejected.");

		assert_eq!(err, TokenRecordBuilderError::ExpiryBeforeIssue);
		assert_eq!(
			TokenRecord::builder().build().expect_err("Access token is mandatory."),
			TokenRecordBuilderError::MissingAccessToken
		);
	}

	#[test]
	fn debug_redacts_secrets() {
		let record = TokenRecord::builder()
			.access_token("gho_live")
			.refresh_token("ghr_live")
			.build()
			.expect("Record fixture should build.");
		let rendered = format!("{record:?}");

		assert!(!rendered.contains("gho_live"));
		assert!(!rendered.contains("ghr_live"));
	}
}
