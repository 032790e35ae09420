//! Complaint table access.
//!
//! The write-once response guarantee lives here: `respond_complaint` is a
//! single conditional update guarded on `response_message IS NULL`, so two
//! concurrent responders cannot both observe "unset" and overwrite each
//! other.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Store, notifications};
use crate::error::{Error, Result};
use crate::models::{Complaint, Notification};
use crate::types::ComplaintStatus;

const COMPLAINT_COLUMNS: &str = "id, sender_id, category, visibility, status, title, message, \
	file_name, file_url, created_at, responder_id, response_message, response_created_at";

impl Store {
	/// Inserts a complaint together with its submission fan-out, atomically.
	/// The notifications are observable by the time this returns.
	pub async fn create_complaint(
		&self,
		complaint: &Complaint,
		fan_out: &[Notification],
	) -> Result<()> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			"INSERT INTO complaints (id, sender_id, category, visibility, status, title, \
			 message, file_name, file_url, created_at, responder_id, response_message, \
			 response_created_at) \
			 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
		)
		.bind(complaint.id)
		.bind(complaint.sender_id)
		.bind(complaint.category)
		.bind(complaint.visibility)
		.bind(complaint.status)
		.bind(&complaint.title)
		.bind(&complaint.message)
		.bind(&complaint.file_name)
		.bind(&complaint.file_url)
		.bind(complaint.created_at)
		.bind(complaint.responder_id)
		.bind(&complaint.response_message)
		.bind(complaint.response_created_at)
		.execute(&mut *tx)
		.await?;

		for notification in fan_out {
			notifications::insert(&mut tx, notification).await?;
		}

		tx.commit().await?;
		Ok(())
	}

	pub async fn get_complaint(&self, id: Uuid) -> Result<Option<Complaint>> {
		let complaint = sqlx::query_as::<_, Complaint>(&format!(
			"SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?1"
		))
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;
		Ok(complaint)
	}

	pub async fn list_complaints_by_sender(&self, sender_id: Uuid) -> Result<Vec<Complaint>> {
		let complaints = sqlx::query_as::<_, Complaint>(&format!(
			"SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE sender_id = ?1 \
			 ORDER BY created_at DESC"
		))
		.bind(sender_id)
		.fetch_all(&self.pool)
		.await?;
		Ok(complaints)
	}

	pub async fn list_complaints(&self) -> Result<Vec<Complaint>> {
		let complaints = sqlx::query_as::<_, Complaint>(&format!(
			"SELECT {COMPLAINT_COLUMNS} FROM complaints ORDER BY created_at DESC"
		))
		.fetch_all(&self.pool)
		.await?;
		Ok(complaints)
	}

	/// Unconditional status overwrite; any state may follow any state.
	pub async fn set_complaint_status(&self, id: Uuid, status: ComplaintStatus) -> Result<()> {
		let result = sqlx::query("UPDATE complaints SET status = ?1 WHERE id = ?2")
			.bind(status)
			.bind(id)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("complaint"));
		}
		Ok(())
	}

	/// Sets the write-once response and the sender's notification in one
	/// transaction.
	///
	/// The guard `response_message IS NULL` makes the check-and-set atomic.
	/// When the update matches nothing, a follow-up point query decides
	/// between [`Error::AlreadyResponded`] and [`Error::NotFound`].
	pub async fn respond_complaint(
		&self,
		id: Uuid,
		responder_id: Uuid,
		response_message: &str,
		responded_at: DateTime<Utc>,
		mark_done: bool,
		notification: &Notification,
	) -> Result<Complaint> {
		let mut tx = self.pool.begin().await?;

		let sql = if mark_done {
			"UPDATE complaints SET response_message = ?1, responder_id = ?2, \
			 response_created_at = ?3, status = 'done' \
			 WHERE id = ?4 AND response_message IS NULL"
		} else {
			"UPDATE complaints SET response_message = ?1, responder_id = ?2, \
			 response_created_at = ?3 \
			 WHERE id = ?4 AND response_message IS NULL"
		};

		let result = sqlx::query(sql)
			.bind(response_message)
			.bind(responder_id)
			.bind(responded_at)
			.bind(id)
			.execute(&mut *tx)
			.await?;

		if result.rows_affected() == 0 {
			let exists = sqlx::query_scalar::<_, i64>("SELECT 1 FROM complaints WHERE id = ?1")
				.bind(id)
				.fetch_optional(&mut *tx)
				.await?;
			return Err(if exists.is_some() {
				Error::AlreadyResponded
			} else {
				Error::NotFound("complaint")
			});
		}

		notifications::insert(&mut tx, notification).await?;

		let complaint = sqlx::query_as::<_, Complaint>(&format!(
			"SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?1"
		))
		.bind(id)
		.fetch_one(&mut *tx)
		.await?;

		tx.commit().await?;
		Ok(complaint)
	}
}
