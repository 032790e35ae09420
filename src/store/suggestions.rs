//! Suggestion table access.

use uuid::Uuid;

use super::{Store, notifications};
use crate::error::{Error, Result};
use crate::models::{Notification, Suggestion};
use crate::types::{ReviewStatus, Visibility};

const SUGGESTION_COLUMNS: &str = "id, owner_id, category, visibility, review_status, title, \
	message, file_name, file_url, created_at, response_message";

impl Store {
	/// Inserts a suggestion together with its submission fan-out, atomically.
	pub async fn create_suggestion(
		&self,
		suggestion: &Suggestion,
		fan_out: &[Notification],
	) -> Result<()> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			"INSERT INTO suggestions (id, owner_id, category, visibility, review_status, \
			 title, message, file_name, file_url, created_at, response_message) \
			 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
		)
		.bind(suggestion.id)
		.bind(suggestion.owner_id)
		.bind(suggestion.category)
		.bind(suggestion.visibility)
		.bind(suggestion.review_status)
		.bind(&suggestion.title)
		.bind(&suggestion.message)
		.bind(&suggestion.file_name)
		.bind(&suggestion.file_url)
		.bind(suggestion.created_at)
		.bind(&suggestion.response_message)
		.execute(&mut *tx)
		.await?;

		for notification in fan_out {
			notifications::insert(&mut tx, notification).await?;
		}

		tx.commit().await?;
		Ok(())
	}

	pub async fn get_suggestion(&self, id: Uuid) -> Result<Option<Suggestion>> {
		let suggestion = sqlx::query_as::<_, Suggestion>(&format!(
			"SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE id = ?1"
		))
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;
		Ok(suggestion)
	}

	pub async fn list_suggestions_by_owner(&self, owner_id: Uuid) -> Result<Vec<Suggestion>> {
		let suggestions = sqlx::query_as::<_, Suggestion>(&format!(
			"SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE owner_id = ?1 \
			 ORDER BY created_at DESC"
		))
		.bind(owner_id)
		.fetch_all(&self.pool)
		.await?;
		Ok(suggestions)
	}

	/// Lists suggestions, optionally narrowed to one visibility.
	pub async fn list_suggestions(&self, filter: Option<Visibility>) -> Result<Vec<Suggestion>> {
		let suggestions = match filter {
			Some(visibility) => {
				sqlx::query_as::<_, Suggestion>(&format!(
					"SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE visibility = ?1 \
					 ORDER BY created_at DESC"
				))
				.bind(visibility)
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query_as::<_, Suggestion>(&format!(
					"SELECT {SUGGESTION_COLUMNS} FROM suggestions ORDER BY created_at DESC"
				))
				.fetch_all(&self.pool)
				.await?
			}
		};
		Ok(suggestions)
	}

	pub async fn set_suggestion_review_status(
		&self,
		id: Uuid,
		status: ReviewStatus,
	) -> Result<()> {
		let result = sqlx::query("UPDATE suggestions SET review_status = ?1 WHERE id = ?2")
			.bind(status)
			.bind(id)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("suggestion"));
		}
		Ok(())
	}

	/// Sets the response text. Unlike complaints this is an unconditional
	/// overwrite; repeated responses silently replace the previous one.
	pub async fn respond_suggestion(&self, id: Uuid, response_message: &str) -> Result<()> {
		let result = sqlx::query("UPDATE suggestions SET response_message = ?1 WHERE id = ?2")
			.bind(response_message)
			.bind(id)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("suggestion"));
		}
		Ok(())
	}
}
