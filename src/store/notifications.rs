//! Notification table access.
//!
//! Inserts always happen inside the transaction of the lifecycle write that
//! produced them; there is no standalone creation path except the explicit
//! [`Store::insert_notification`], which the notification service uses.

use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use super::Store;
use crate::error::{Error, Result};
use crate::models::Notification;

const NOTIFICATION_COLUMNS: &str =
	"id, user_id, message, created_at, is_read, complaint_id, suggestion_id";

/// Inserts a notification within the caller's transaction.
pub(crate) async fn insert(
	tx: &mut Transaction<'_, Sqlite>,
	notification: &Notification,
) -> Result<()> {
	sqlx::query(
		"INSERT INTO notifications (id, user_id, message, created_at, is_read, \
		 complaint_id, suggestion_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
	)
	.bind(notification.id)
	.bind(notification.user_id)
	.bind(&notification.message)
	.bind(notification.created_at)
	.bind(notification.is_read)
	.bind(notification.complaint_id)
	.bind(notification.suggestion_id)
	.execute(&mut **tx)
	.await?;
	Ok(())
}

impl Store {
	/// Inserts a single notification in its own transaction.
	pub async fn insert_notification(&self, notification: &Notification) -> Result<()> {
		let mut tx = self.pool.begin().await?;
		insert(&mut tx, notification).await?;
		tx.commit().await?;
		Ok(())
	}

	/// All notifications for a user, newest first.
	pub async fn list_notifications_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
		let notifications = sqlx::query_as::<_, Notification>(&format!(
			"SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = ?1 \
			 ORDER BY created_at DESC"
		))
		.bind(user_id)
		.fetch_all(&self.pool)
		.await?;
		Ok(notifications)
	}

	/// Flips the read flag. Marking an already-read notification matches the
	/// row again, so the call is an idempotent success; only an unknown id
	/// is an error.
	pub async fn mark_notification_read(&self, id: Uuid) -> Result<()> {
		let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?1")
			.bind(id)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("notification"));
		}
		Ok(())
	}
}
