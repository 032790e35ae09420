//! Outward-facing views.
//!
//! Pure shaping of stored entities: submitter identity goes through
//! [`crate::policy`], timestamps are formatted, enums flatten to their
//! canonical wire strings via serde. No side effects; the lookups feeding
//! these functions are the only possible failure source.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Complaint, Notification, Suggestion, User};
use crate::policy;
use crate::types::{Category, ComplaintStatus, ReviewStatus, UserRole, Visibility};

/// Date format used for submission and response dates in views.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Public account view. Never contains the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
	pub user_id: Uuid,
	pub name: String,
	pub email: String,
	pub role: UserRole,
}

pub fn user_view(user: &User) -> UserView {
	UserView {
		user_id: user.id,
		name: user.name.clone(),
		email: user.email.clone(),
		role: user.role,
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplaintView {
	pub complaint_id: Uuid,
	pub complaint_title: String,
	pub complaint_message: String,
	pub complaint_type: Category,
	pub complaint_visibility: Visibility,
	pub complaint_status: ComplaintStatus,
	pub complaint_date: String,
	pub file_name: Option<String>,
	pub file_url: Option<String>,
	pub response_message: Option<String>,
	pub response_date: Option<String>,
	pub student_email: String,
}

/// Shapes a complaint for external consumers.
///
/// `sender_email` is the looked-up submitter email, if the submitter still
/// exists; redaction is decided here and nowhere else.
pub fn complaint_view(complaint: &Complaint, sender_email: Option<&str>) -> ComplaintView {
	ComplaintView {
		complaint_id: complaint.id,
		complaint_title: complaint.title.clone(),
		complaint_message: complaint.message.clone(),
		complaint_type: complaint.category,
		complaint_visibility: complaint.visibility,
		complaint_status: complaint.status,
		complaint_date: complaint.created_at.format(DATE_FORMAT).to_string(),
		file_name: complaint.file_name.clone(),
		file_url: complaint.file_url.clone(),
		response_message: complaint.response_message.clone(),
		response_date: complaint
			.response_created_at
			.map(|at| at.format(DATE_FORMAT).to_string()),
		student_email: policy::resolve_submitter_identity(complaint.visibility, sender_email)
			.to_string(),
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionView {
	pub suggestion_id: Uuid,
	pub suggestion_title: String,
	pub suggestion_message: String,
	pub suggestion_type: Category,
	pub suggestion_visibility: Visibility,
	pub review_status: ReviewStatus,
	pub suggestion_date: String,
	pub file_name: Option<String>,
	pub file_url: Option<String>,
	pub response_message: Option<String>,
	pub student_email: String,
}

pub fn suggestion_view(suggestion: &Suggestion, owner_email: Option<&str>) -> SuggestionView {
	SuggestionView {
		suggestion_id: suggestion.id,
		suggestion_title: suggestion.title.clone(),
		suggestion_message: suggestion.message.clone(),
		suggestion_type: suggestion.category,
		suggestion_visibility: suggestion.visibility,
		review_status: suggestion.review_status,
		suggestion_date: suggestion.created_at.format(DATE_FORMAT).to_string(),
		file_name: suggestion.file_name.clone(),
		file_url: suggestion.file_url.clone(),
		response_message: suggestion.response_message.clone(),
		student_email: policy::resolve_submitter_identity(suggestion.visibility, owner_email)
			.to_string(),
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
	pub notification_id: Uuid,
	pub message: String,
	pub created_at: String,
	pub is_read: bool,
	pub complaint_id: Option<Uuid>,
	pub suggestion_id: Option<Uuid>,
}

pub fn notification_view(notification: &Notification) -> NotificationView {
	NotificationView {
		notification_id: notification.id,
		message: notification.message.clone(),
		created_at: notification.created_at.to_rfc3339(),
		is_read: notification.is_read,
		complaint_id: notification.complaint_id,
		suggestion_id: notification.suggestion_id,
	}
}

#[cfg(test)]
mod tests {
	use chrono::{TimeZone, Utc};

	use super::*;
	use crate::policy::REDACTED_IDENTITY;

	fn complaint(visibility: Visibility) -> Complaint {
		Complaint {
			id: Uuid::new_v4(),
			sender_id: Uuid::new_v4(),
			category: Category::Academic,
			visibility,
			status: ComplaintStatus::UnderChecking,
			title: "Broken projector".into(),
			message: "Room 12 projector flickers".into(),
			file_name: None,
			file_url: None,
			created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
			responder_id: None,
			response_message: None,
			response_created_at: None,
		}
	}

	#[test]
	fn private_complaint_redacts_sender() {
		let view = complaint_view(&complaint(Visibility::Private), Some("a@uni.edu"));
		assert_eq!(view.student_email, REDACTED_IDENTITY);
	}

	#[test]
	fn public_complaint_discloses_sender() {
		let view = complaint_view(&complaint(Visibility::Public), Some("a@uni.edu"));
		assert_eq!(view.student_email, "a@uni.edu");
	}

	#[test]
	fn dates_use_day_precision() {
		let view = complaint_view(&complaint(Visibility::Public), None);
		assert_eq!(view.complaint_date, "2025-03-14");
		assert_eq!(view.response_date, None);
	}

	#[test]
	fn user_view_has_no_credential_fields() {
		let json = serde_json::to_value(user_view(&User {
			id: Uuid::new_v4(),
			name: "A".into(),
			email: "a@uni.edu".into(),
			password_hash: "secret-hash".into(),
			role: UserRole::Student,
			created_at: Utc::now(),
		}))
		.unwrap();
		assert!(json.get("password_hash").is_none());
		assert!(!json.to_string().contains("secret-hash"));
	}

	#[test]
	fn enums_flatten_to_wire_strings() {
		let json =
			serde_json::to_value(complaint_view(&complaint(Visibility::Public), None)).unwrap();
		assert_eq!(json["complaint_type"], "academic");
		assert_eq!(json["complaint_status"], "under_checking");
		assert_eq!(json["complaint_visibility"], "public");
	}
}
