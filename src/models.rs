//! Stored entities.
//!
//! These structs mirror the five logical tables (chat artifacts excluded).
//! Relationships are plain foreign-key fields; there is no object-graph
//! cascade. Ownership rules: a user owns their complaints (as sender),
//! suggestions, and notifications; a complaint's responder reference is
//! non-owning and is nulled, not cascaded, when the responder is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Category, ComplaintStatus, ReviewStatus, UserRole, Visibility};

/// A registered account.
///
/// `password_hash` never leaves the store boundary; projections expose name,
/// email, and role only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub id: Uuid,
	pub name: String,
	pub email: String,
	pub password_hash: String,
	pub role: UserRole,
	pub created_at: DateTime<Utc>,
}

/// Descriptor of a stored attachment: the original filename plus the locator
/// handed back by the file store. Raw bytes never enter the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
	pub file_name: String,
	pub file_url: String,
}

/// A complaint record.
///
/// `response_message` is write-once: the store only ever sets it through a
/// conditional update guarded on the field being NULL. `responder_id` and
/// `response_created_at` are set in the same statement, so the three fields
/// are always present or absent together.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Complaint {
	pub id: Uuid,
	pub sender_id: Uuid,
	pub category: Category,
	pub visibility: Visibility,
	pub status: ComplaintStatus,
	pub title: String,
	pub message: String,
	pub file_name: Option<String>,
	pub file_url: Option<String>,
	pub created_at: DateTime<Utc>,
	pub responder_id: Option<Uuid>,
	pub response_message: Option<String>,
	pub response_created_at: Option<DateTime<Utc>>,
}

impl Complaint {
	pub fn attachment(&self) -> Option<Attachment> {
		match (&self.file_name, &self.file_url) {
			(Some(name), Some(url)) => Some(Attachment {
				file_name: name.clone(),
				file_url: url.clone(),
			}),
			_ => None,
		}
	}
}

/// A suggestion record.
///
/// Unlike complaints, the response is overwritable; see `DESIGN.md` for why
/// the asymmetry is preserved.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Suggestion {
	pub id: Uuid,
	pub owner_id: Uuid,
	pub category: Category,
	pub visibility: Visibility,
	pub review_status: ReviewStatus,
	pub title: String,
	pub message: String,
	pub file_name: Option<String>,
	pub file_url: Option<String>,
	pub created_at: DateTime<Utc>,
	pub response_message: Option<String>,
}

impl Suggestion {
	pub fn attachment(&self) -> Option<Attachment> {
		match (&self.file_name, &self.file_url) {
			(Some(name), Some(url)) => Some(Attachment {
				file_name: name.clone(),
				file_url: url.clone(),
			}),
			_ => None,
		}
	}
}

/// Back-reference from a notification to the record that produced it.
///
/// At most one of the two may be set on a stored row; constructing the
/// notification through [`Notification::new`] makes more than one
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationRef {
	Complaint(Uuid),
	Suggestion(Uuid),
}

/// A notification record.
///
/// Created only as a side effect of lifecycle events (submission, response),
/// mutated only to flip the read flag, and deleted only by the owner cascade.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
	pub id: Uuid,
	pub user_id: Uuid,
	pub message: String,
	pub created_at: DateTime<Utc>,
	pub is_read: bool,
	pub complaint_id: Option<Uuid>,
	pub suggestion_id: Option<Uuid>,
}

impl Notification {
	/// Builds a fresh unread notification for `user_id`.
	pub fn new(user_id: Uuid, message: impl Into<String>, related: Option<NotificationRef>) -> Self {
		let (complaint_id, suggestion_id) = match related {
			Some(NotificationRef::Complaint(id)) => (Some(id), None),
			Some(NotificationRef::Suggestion(id)) => (None, Some(id)),
			None => (None, None),
		};
		Self {
			id: Uuid::new_v4(),
			user_id,
			message: message.into(),
			created_at: Utc::now(),
			is_read: false,
			complaint_id,
			suggestion_id,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn notification_carries_at_most_one_back_reference() {
		let user = Uuid::new_v4();
		let complaint = Uuid::new_v4();
		let suggestion = Uuid::new_v4();

		let n = Notification::new(user, "hi", Some(NotificationRef::Complaint(complaint)));
		assert_eq!(n.complaint_id, Some(complaint));
		assert_eq!(n.suggestion_id, None);
		assert!(!n.is_read);

		let n = Notification::new(user, "hi", Some(NotificationRef::Suggestion(suggestion)));
		assert_eq!(n.complaint_id, None);
		assert_eq!(n.suggestion_id, Some(suggestion));

		let n = Notification::new(user, "hi", None);
		assert_eq!(n.complaint_id, None);
		assert_eq!(n.suggestion_id, None);
	}

	#[test]
	fn attachment_requires_both_fields() {
		let complaint = Complaint {
			id: Uuid::new_v4(),
			sender_id: Uuid::new_v4(),
			category: Category::Academic,
			visibility: Visibility::Private,
			status: ComplaintStatus::UnderChecking,
			title: "t".into(),
			message: "m".into(),
			file_name: Some("notes.pdf".into()),
			file_url: None,
			created_at: Utc::now(),
			responder_id: None,
			response_message: None,
			response_created_at: None,
		};
		assert!(complaint.attachment().is_none());
	}
}
