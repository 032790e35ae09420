//! Notification delivery and read-state queries.

use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Notification, NotificationRef, User};
use crate::projection::{self, NotificationView};
use crate::store::Store;

pub struct NotificationService {
	store: Store,
}

impl NotificationService {
	pub fn new(store: Store) -> Self {
		Self { store }
	}

	/// Delivers a single notification outside a lifecycle transaction.
	///
	/// Lifecycle fan-out does not go through here; it commits with the write
	/// that produced it. This entry point exists for callers that need an
	/// ad-hoc delivery with the same at-most-one back-reference rule.
	pub async fn notify(
		&self,
		recipient: &User,
		message: &str,
		related: Option<NotificationRef>,
	) -> Result<Notification> {
		let notification = Notification::new(recipient.id, message, related);
		self.store.insert_notification(&notification).await?;
		debug!(recipient = %recipient.email, "notification delivered");
		Ok(notification)
	}

	/// All notifications for a user, newest first.
	pub async fn list_for_user(&self, user: &User) -> Result<Vec<NotificationView>> {
		let notifications = self.store.list_notifications_for_user(user.id).await?;
		Ok(notifications.iter().map(projection::notification_view).collect())
	}

	/// Marks a notification read. Idempotent: an already-read notification
	/// is a no-op success; only an unknown id fails.
	pub async fn mark_read(&self, id: Uuid) -> Result<()> {
		self.store.mark_notification_read(id).await
	}
}
