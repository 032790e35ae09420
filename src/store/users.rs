//! User table access and the explicit deletion cascade.

use uuid::Uuid;

use super::Store;
use crate::error::{Error, Result};
use crate::models::User;
use crate::types::UserRole;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

impl Store {
	/// Inserts a user. The UNIQUE constraint on `email` is the authority on
	/// duplicates, so concurrent registrations cannot race past an
	/// application-level check.
	pub async fn insert_user(&self, user: &User) -> Result<()> {
		sqlx::query(
			"INSERT INTO users (id, name, email, password_hash, role, created_at) \
			 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
		)
		.bind(user.id)
		.bind(&user.name)
		.bind(&user.email)
		.bind(&user.password_hash)
		.bind(user.role)
		.bind(user.created_at)
		.execute(&self.pool)
		.await
		.map_err(map_unique_violation)?;
		Ok(())
	}

	/// Case-sensitive exact match; absence is `None`, not an error.
	pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>(&format!(
			"SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
		))
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;
		Ok(user)
	}

	pub async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>(&format!(
			"SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
		))
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;
		Ok(user)
	}

	pub async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>> {
		let users = sqlx::query_as::<_, User>(&format!(
			"SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY created_at"
		))
		.bind(role)
		.fetch_all(&self.pool)
		.await?;
		Ok(users)
	}

	/// Partial update of profile fields; `None` leaves a field untouched.
	pub async fn update_user(
		&self,
		id: Uuid,
		name: Option<&str>,
		email: Option<&str>,
		password_hash: Option<&str>,
	) -> Result<()> {
		let result = sqlx::query(
			"UPDATE users SET \
			 name = COALESCE(?1, name), \
			 email = COALESCE(?2, email), \
			 password_hash = COALESCE(?3, password_hash) \
			 WHERE id = ?4",
		)
		.bind(name)
		.bind(email)
		.bind(password_hash)
		.bind(id)
		.execute(&self.pool)
		.await
		.map_err(map_unique_violation)?;

		if result.rows_affected() == 0 {
			return Err(Error::NotFound("user"));
		}
		Ok(())
	}

	/// Deletes a user and everything they own, in one transaction.
	///
	/// Order matters: responder references are non-owning and get nulled
	/// first; notification back-references to records about to disappear are
	/// cleared before the records themselves; owned rows go before the user
	/// row so foreign keys hold at every step.
	pub async fn delete_user_cascading(&self, id: Uuid) -> Result<()> {
		let mut tx = self.pool.begin().await?;

		sqlx::query("UPDATE complaints SET responder_id = NULL WHERE responder_id = ?1")
			.bind(id)
			.execute(&mut *tx)
			.await?;
		sqlx::query(
			"UPDATE notifications SET complaint_id = NULL WHERE complaint_id IN \
			 (SELECT id FROM complaints WHERE sender_id = ?1)",
		)
		.bind(id)
		.execute(&mut *tx)
		.await?;
		sqlx::query(
			"UPDATE notifications SET suggestion_id = NULL WHERE suggestion_id IN \
			 (SELECT id FROM suggestions WHERE owner_id = ?1)",
		)
		.bind(id)
		.execute(&mut *tx)
		.await?;
		sqlx::query("DELETE FROM notifications WHERE user_id = ?1")
			.bind(id)
			.execute(&mut *tx)
			.await?;
		sqlx::query("DELETE FROM suggestions WHERE owner_id = ?1")
			.bind(id)
			.execute(&mut *tx)
			.await?;
		sqlx::query("DELETE FROM complaints WHERE sender_id = ?1")
			.bind(id)
			.execute(&mut *tx)
			.await?;

		let result = sqlx::query("DELETE FROM users WHERE id = ?1")
			.bind(id)
			.execute(&mut *tx)
			.await?;
		if result.rows_affected() == 0 {
			return Err(Error::NotFound("user"));
		}

		tx.commit().await?;
		Ok(())
	}
}

fn map_unique_violation(e: sqlx::Error) -> Error {
	if e.as_database_error()
		.is_some_and(|db| db.is_unique_violation())
	{
		Error::DuplicateEmail
	} else {
		Error::Storage(e)
	}
}
