//! Suggestion lifecycle: submission, review, and the (overwritable) response.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Attachment, Notification, NotificationRef, Suggestion, User};
use crate::projection::{self, SuggestionView};
use crate::store::Store;
use crate::types::{Category, ReviewStatus, UserRole, Visibility};

pub struct SuggestionService {
	store: Store,
}

impl SuggestionService {
	pub fn new(store: Store) -> Self {
		Self { store }
	}

	/// Creates a suggestion as `unreviewed` and fans notifications out to
	/// every admin and to the owner, atomically with the insert.
	pub async fn submit(
		&self,
		owner_email: &str,
		category: Category,
		visibility: Visibility,
		title: &str,
		message: &str,
		attachment: Option<Attachment>,
	) -> Result<Suggestion> {
		require_nonempty(title, "title")?;
		require_nonempty(message, "message")?;

		let owner = self
			.store
			.find_user_by_email(owner_email)
			.await?
			.ok_or(Error::NotFound("user"))?;

		let (file_name, file_url) = match attachment {
			Some(a) => (Some(a.file_name), Some(a.file_url)),
			None => (None, None),
		};

		let suggestion = Suggestion {
			id: Uuid::new_v4(),
			owner_id: owner.id,
			category,
			visibility,
			review_status: ReviewStatus::Unreviewed,
			title: title.to_string(),
			message: message.to_string(),
			file_name,
			file_url,
			created_at: Utc::now(),
			response_message: None,
		};

		let related = Some(NotificationRef::Suggestion(suggestion.id));
		let mut fan_out: Vec<Notification> = self
			.store
			.list_users_by_role(UserRole::Admin)
			.await?
			.into_iter()
			.map(|admin| {
				Notification::new(
					admin.id,
					format!("New suggestion submitted: {title}"),
					related,
				)
			})
			.collect();
		fan_out.push(Notification::new(
			owner.id,
			format!("Your suggestion \"{title}\" was received"),
			related,
		));

		self.store.create_suggestion(&suggestion, &fan_out).await?;
		info!(
			suggestion_id = %suggestion.id,
			recipients = fan_out.len(),
			"suggestion submitted"
		);
		Ok(suggestion)
	}

	pub async fn set_review_status(&self, id: Uuid, new_status: &str) -> Result<Suggestion> {
		let status: ReviewStatus = new_status.parse()?;
		self.store.set_suggestion_review_status(id, status).await?;
		info!(suggestion_id = %id, %status, "suggestion review status updated");

		self.store
			.get_suggestion(id)
			.await?
			.ok_or(Error::NotFound("suggestion"))
	}

	/// Sets the response text. Repeated calls overwrite silently; suggestions
	/// do not carry the complaint write-once rule (see `DESIGN.md`).
	pub async fn respond(&self, id: Uuid, response_message: &str) -> Result<Suggestion> {
		require_nonempty(response_message, "response message")?;

		self.store.respond_suggestion(id, response_message).await?;
		info!(suggestion_id = %id, "suggestion responded");

		self.store
			.get_suggestion(id)
			.await?
			.ok_or(Error::NotFound("suggestion"))
	}

	pub async fn get_by_id(&self, id: Uuid) -> Result<SuggestionView> {
		let suggestion = self
			.store
			.get_suggestion(id)
			.await?
			.ok_or(Error::NotFound("suggestion"))?;
		self.project(&suggestion).await
	}

	/// An unknown owner email yields an empty list, not an error.
	pub async fn list_by_owner(&self, owner_email: &str) -> Result<Vec<SuggestionView>> {
		let Some(owner) = self.store.find_user_by_email(owner_email).await? else {
			return Ok(Vec::new());
		};
		let suggestions = self.store.list_suggestions_by_owner(owner.id).await?;
		let mut views = Vec::with_capacity(suggestions.len());
		for suggestion in &suggestions {
			views.push(self.project(suggestion).await?);
		}
		Ok(views)
	}

	/// Every suggestion, optionally narrowed to one visibility, each
	/// projected through the visibility policy.
	pub async fn list_all(&self, filter: Option<Visibility>) -> Result<Vec<SuggestionView>> {
		let suggestions = self.store.list_suggestions(filter).await?;
		let mut views = Vec::with_capacity(suggestions.len());
		for suggestion in &suggestions {
			views.push(self.project(suggestion).await?);
		}
		Ok(views)
	}

	async fn project(&self, suggestion: &Suggestion) -> Result<SuggestionView> {
		let owner = self.store.find_user(suggestion.owner_id).await?;
		Ok(projection::suggestion_view(
			suggestion,
			owner.as_ref().map(|u| u.email.as_str()),
		))
	}
}

fn require_nonempty(value: &str, field: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::InvalidInput(format!("{field} must not be empty")));
	}
	Ok(())
}
