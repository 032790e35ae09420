//! Submitter identity redaction.
//!
//! This is the single authoritative implementation of the visibility rule:
//! a submitter's email is disclosed only for `public` records, and every
//! projection resolves identity through this function. No other code path
//! may decide redaction.

use crate::types::Visibility;

/// Sentinel returned in place of a redacted submitter identity.
pub const REDACTED_IDENTITY: &str = "Unknown";

/// Resolves the submitter identity a viewer is allowed to see.
///
/// Returns the real email only when the record is `public` and the submitter
/// still exists; otherwise the [`REDACTED_IDENTITY`] sentinel, regardless of
/// who is asking.
pub fn resolve_submitter_identity<'a>(
	visibility: Visibility,
	submitter_email: Option<&'a str>,
) -> &'a str {
	match (visibility, submitter_email) {
		(Visibility::Public, Some(email)) => email,
		_ => REDACTED_IDENTITY,
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(Visibility::Public, Some("a@uni.edu"), "a@uni.edu")]
	#[case(Visibility::Private, Some("a@uni.edu"), REDACTED_IDENTITY)]
	#[case(Visibility::Public, None, REDACTED_IDENTITY)]
	#[case(Visibility::Private, None, REDACTED_IDENTITY)]
	fn discloses_only_public_submitters(
		#[case] visibility: Visibility,
		#[case] email: Option<&str>,
		#[case] expected: &str,
	) {
		assert_eq!(resolve_submitter_identity(visibility, email), expected);
	}
}
