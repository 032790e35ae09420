//! Closed enumerations shared by complaints and suggestions.
//!
//! Each enum carries an explicit value ⇄ wire-string table. Values cross the
//! boundary as strings (HTTP payloads and database columns alike); parsing
//! goes through [`FromStr`], which rejects anything outside the table with
//! [`Error::InvalidInput`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Account role. Admins triage complaints and suggestions; students submit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
	Student,
	Admin,
}

impl UserRole {
	pub fn as_str(&self) -> &'static str {
		match self {
			UserRole::Student => "student",
			UserRole::Admin => "admin",
		}
	}
}

impl fmt::Display for UserRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for UserRole {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"student" => Ok(UserRole::Student),
			"admin" => Ok(UserRole::Admin),
			other => Err(Error::InvalidInput(format!("unknown role: {other}"))),
		}
	}
}

/// Topic a complaint or suggestion is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
	Academic,
	Activities,
	Administrative,
	#[serde(rename = "IT")]
	#[sqlx(rename = "IT")]
	It,
}

impl Category {
	pub fn as_str(&self) -> &'static str {
		match self {
			Category::Academic => "academic",
			Category::Activities => "activities",
			Category::Administrative => "administrative",
			Category::It => "IT",
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Category {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"academic" => Ok(Category::Academic),
			"activities" => Ok(Category::Activities),
			"administrative" => Ok(Category::Administrative),
			"IT" => Ok(Category::It),
			other => Err(Error::InvalidInput(format!("unknown category: {other}"))),
		}
	}
}

/// Declared disclosure level of a submission.
///
/// `Public` exposes the submitter's email to viewers; `Private` redacts it
/// through [`crate::policy::resolve_submitter_identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Visibility {
	Public,
	Private,
}

impl Visibility {
	pub fn as_str(&self) -> &'static str {
		match self {
			Visibility::Public => "public",
			Visibility::Private => "private",
		}
	}
}

impl fmt::Display for Visibility {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Visibility {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"public" => Ok(Visibility::Public),
			"private" => Ok(Visibility::Private),
			other => Err(Error::InvalidInput(format!("unknown visibility: {other}"))),
		}
	}
}

/// Triage state of a complaint.
///
/// Initial state is `UnderChecking`. Admins may move a complaint from any
/// state to any state; there is no forward-only restriction and no automatic
/// terminal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ComplaintStatus {
	UnderChecking,
	UnderReview,
	InProgress,
	Done,
}

impl ComplaintStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			ComplaintStatus::UnderChecking => "under_checking",
			ComplaintStatus::UnderReview => "under_review",
			ComplaintStatus::InProgress => "in_progress",
			ComplaintStatus::Done => "done",
		}
	}
}

impl fmt::Display for ComplaintStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ComplaintStatus {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"under_checking" => Ok(ComplaintStatus::UnderChecking),
			"under_review" => Ok(ComplaintStatus::UnderReview),
			"in_progress" => Ok(ComplaintStatus::InProgress),
			"done" => Ok(ComplaintStatus::Done),
			other => Err(Error::InvalidInput(format!(
				"unknown complaint status: {other}"
			))),
		}
	}
}

/// Review state of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReviewStatus {
	Unreviewed,
	Reviewed,
}

impl ReviewStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			ReviewStatus::Unreviewed => "unreviewed",
			ReviewStatus::Reviewed => "reviewed",
		}
	}
}

impl fmt::Display for ReviewStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ReviewStatus {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"unreviewed" => Ok(ReviewStatus::Unreviewed),
			"reviewed" => Ok(ReviewStatus::Reviewed),
			other => Err(Error::InvalidInput(format!(
				"unknown review status: {other}"
			))),
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("academic", Category::Academic)]
	#[case("activities", Category::Activities)]
	#[case("administrative", Category::Administrative)]
	#[case("IT", Category::It)]
	fn category_wire_table_round_trips(#[case] wire: &str, #[case] value: Category) {
		assert_eq!(wire.parse::<Category>().unwrap(), value);
		assert_eq!(value.as_str(), wire);
	}

	#[rstest]
	#[case("under_checking", ComplaintStatus::UnderChecking)]
	#[case("under_review", ComplaintStatus::UnderReview)]
	#[case("in_progress", ComplaintStatus::InProgress)]
	#[case("done", ComplaintStatus::Done)]
	fn complaint_status_wire_table_round_trips(
		#[case] wire: &str,
		#[case] value: ComplaintStatus,
	) {
		assert_eq!(wire.parse::<ComplaintStatus>().unwrap(), value);
		assert_eq!(value.as_str(), wire);
	}

	#[rstest]
	#[case::role("superuser")]
	#[case::empty("")]
	#[case::case_sensitive("Admin")]
	fn unknown_role_is_invalid_input(#[case] wire: &str) {
		let err = wire.parse::<UserRole>().unwrap_err();
		assert!(matches!(err, Error::InvalidInput(_)));
	}

	#[rstest]
	#[case::typo("pubic")]
	#[case::upper("PRIVATE")]
	fn unknown_visibility_is_invalid_input(#[case] wire: &str) {
		let err = wire.parse::<Visibility>().unwrap_err();
		assert!(matches!(err, Error::InvalidInput(_)));
	}

	#[rstest]
	#[case::close_but_wrong("in progress")]
	#[case::unknown("escalated")]
	fn unknown_complaint_status_is_invalid_input(#[case] wire: &str) {
		let err = wire.parse::<ComplaintStatus>().unwrap_err();
		assert!(matches!(err, Error::InvalidInput(_)));
	}

	#[test]
	fn review_status_wire_table_round_trips() {
		assert_eq!(
			"unreviewed".parse::<ReviewStatus>().unwrap(),
			ReviewStatus::Unreviewed
		);
		assert_eq!(ReviewStatus::Reviewed.as_str(), "reviewed");
		assert!("pending".parse::<ReviewStatus>().is_err());
	}

	#[test]
	fn serde_uses_the_same_wire_strings() {
		assert_eq!(serde_json::to_string(&Category::It).unwrap(), "\"IT\"");
		assert_eq!(
			serde_json::to_string(&ComplaintStatus::UnderChecking).unwrap(),
			"\"under_checking\""
		);
		assert_eq!(
			serde_json::from_str::<Visibility>("\"private\"").unwrap(),
			Visibility::Private
		);
	}
}
