//! Complaint lifecycle: submission, triage, and the exactly-once response.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Attachment, Complaint, Notification, NotificationRef, User};
use crate::projection::{self, ComplaintView};
use crate::store::Store;
use crate::types::{Category, ComplaintStatus, UserRole, Visibility};

pub struct ComplaintService {
	store: Store,
	config: Config,
}

impl ComplaintService {
	pub fn new(store: Store, config: Config) -> Self {
		Self { store, config }
	}

	/// Creates a complaint in `under_checking` and fans notifications out to
	/// every admin and to the sender. The fan-out commits with the insert,
	/// so the notifications are observable when this returns.
	pub async fn submit(
		&self,
		sender_email: &str,
		category: Category,
		visibility: Visibility,
		title: &str,
		message: &str,
		attachment: Option<Attachment>,
	) -> Result<Complaint> {
		require_nonempty(title, "title")?;
		require_nonempty(message, "message")?;

		let sender = self
			.store
			.find_user_by_email(sender_email)
			.await?
			.ok_or(Error::NotFound("user"))?;

		let (file_name, file_url) = match attachment {
			Some(a) => (Some(a.file_name), Some(a.file_url)),
			None => (None, None),
		};

		let complaint = Complaint {
			id: Uuid::new_v4(),
			sender_id: sender.id,
			category,
			visibility,
			status: ComplaintStatus::UnderChecking,
			title: title.to_string(),
			message: message.to_string(),
			file_name,
			file_url,
			created_at: Utc::now(),
			responder_id: None,
			response_message: None,
			response_created_at: None,
		};

		let related = Some(NotificationRef::Complaint(complaint.id));
		let mut fan_out: Vec<Notification> = self
			.store
			.list_users_by_role(UserRole::Admin)
			.await?
			.into_iter()
			.map(|admin| {
				Notification::new(admin.id, format!("New complaint submitted: {title}"), related)
			})
			.collect();
		fan_out.push(Notification::new(
			sender.id,
			format!("Your complaint \"{title}\" was received and is under checking"),
			related,
		));

		self.store.create_complaint(&complaint, &fan_out).await?;
		info!(
			complaint_id = %complaint.id,
			recipients = fan_out.len(),
			"complaint submitted"
		);
		Ok(complaint)
	}

	/// Overwrites the triage status. Any state may follow any state; the
	/// only rejections are an unknown id and a value outside the enumeration.
	pub async fn set_status(
		&self,
		id: Uuid,
		new_status: &str,
		acting_admin: &User,
	) -> Result<Complaint> {
		require_admin(acting_admin)?;
		let status: ComplaintStatus = new_status.parse()?;

		self.store.set_complaint_status(id, status).await?;
		info!(complaint_id = %id, %status, "complaint status updated");

		self.store
			.get_complaint(id)
			.await?
			.ok_or(Error::NotFound("complaint"))
	}

	/// Records the single response and notifies the sender, atomically.
	///
	/// A second call fails with [`Error::AlreadyResponded`] and leaves the
	/// stored response untouched. Whether the status is forced to `done` is
	/// the `respond_marks_done` config knob.
	pub async fn respond(
		&self,
		id: Uuid,
		response_message: &str,
		acting_admin: &User,
	) -> Result<Complaint> {
		require_admin(acting_admin)?;
		require_nonempty(response_message, "response message")?;

		// Pre-read only to address the notification; the write-once guard
		// stays inside the store's conditional update.
		let complaint = self
			.store
			.get_complaint(id)
			.await?
			.ok_or(Error::NotFound("complaint"))?;

		let notification = Notification::new(
			complaint.sender_id,
			format!(
				"Your complaint \"{}\" has been answered: {response_message}",
				complaint.title
			),
			Some(NotificationRef::Complaint(id)),
		);

		let updated = self
			.store
			.respond_complaint(
				id,
				acting_admin.id,
				response_message,
				Utc::now(),
				self.config.respond_marks_done,
				&notification,
			)
			.await?;

		info!(complaint_id = %id, responder = %acting_admin.email, "complaint responded");
		Ok(updated)
	}

	/// Single complaint, shaped through the visibility policy.
	pub async fn get_by_id(&self, id: Uuid) -> Result<ComplaintView> {
		let complaint = self
			.store
			.get_complaint(id)
			.await?
			.ok_or(Error::NotFound("complaint"))?;
		self.project(&complaint).await
	}

	/// All complaints a sender filed. An unknown email yields an empty list,
	/// not an error.
	pub async fn list_by_sender(&self, sender_email: &str) -> Result<Vec<ComplaintView>> {
		let Some(sender) = self.store.find_user_by_email(sender_email).await? else {
			return Ok(Vec::new());
		};
		let complaints = self.store.list_complaints_by_sender(sender.id).await?;
		let mut views = Vec::with_capacity(complaints.len());
		for complaint in &complaints {
			views.push(self.project(complaint).await?);
		}
		Ok(views)
	}

	/// Every complaint, each projected through the visibility policy.
	pub async fn list_all(&self) -> Result<Vec<ComplaintView>> {
		let complaints = self.store.list_complaints().await?;
		let mut views = Vec::with_capacity(complaints.len());
		for complaint in &complaints {
			views.push(self.project(complaint).await?);
		}
		Ok(views)
	}

	async fn project(&self, complaint: &Complaint) -> Result<ComplaintView> {
		let sender = self.store.find_user(complaint.sender_id).await?;
		Ok(projection::complaint_view(
			complaint,
			sender.as_ref().map(|u| u.email.as_str()),
		))
	}
}

fn require_admin(user: &User) -> Result<()> {
	if user.role != UserRole::Admin {
		return Err(Error::Unauthorized);
	}
	Ok(())
}

fn require_nonempty(value: &str, field: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::InvalidInput(format!("{field} must not be empty")));
	}
	Ok(())
}
