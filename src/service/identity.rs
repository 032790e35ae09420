//! Account registration, credential verification, and user management.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::hasher::PasswordHasher;
use crate::models::User;
use crate::store::Store;
use crate::types::UserRole;

pub struct IdentityService {
	store: Store,
	hasher: Arc<dyn PasswordHasher>,
}

impl IdentityService {
	pub fn new(store: Store, hasher: Arc<dyn PasswordHasher>) -> Self {
		Self { store, hasher }
	}

	/// Registers a new account.
	///
	/// Uniqueness is enforced by the store's UNIQUE constraint, so two
	/// concurrent registrations with the same email cannot both succeed.
	pub async fn register(
		&self,
		name: &str,
		email: &str,
		password: &str,
		role: UserRole,
	) -> Result<User> {
		require_nonempty(name, "name")?;
		require_nonempty(email, "email")?;
		require_nonempty(password, "password")?;

		let user = User {
			id: Uuid::new_v4(),
			name: name.to_string(),
			email: email.to_string(),
			password_hash: self.hasher.hash(password)?,
			role,
			created_at: Utc::now(),
		};

		match self.store.insert_user(&user).await {
			Ok(()) => {
				info!(email = %user.email, role = %user.role, "user registered");
				Ok(user)
			}
			Err(Error::DuplicateEmail) => {
				warn!(%email, "registration conflict");
				Err(Error::DuplicateEmail)
			}
			Err(e) => Err(e),
		}
	}

	/// Verifies email + password; yields the user on success.
	pub async fn login(&self, email: &str, password: &str) -> Result<User> {
		let Some(user) = self.store.find_user_by_email(email).await? else {
			return Err(Error::Unauthorized);
		};
		if self.verify_credential(&user, password)? {
			Ok(user)
		} else {
			Err(Error::Unauthorized)
		}
	}

	/// Compares a plaintext against the stored hash. The hash itself never
	/// crosses this boundary outward.
	pub fn verify_credential(&self, user: &User, plaintext: &str) -> Result<bool> {
		self.hasher.verify(plaintext, &user.password_hash)
	}

	/// Case-sensitive exact lookup; `None` is a valid result.
	pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
		self.store.find_user_by_email(email).await
	}

	pub async fn list_students(&self) -> Result<Vec<User>> {
		self.store.list_users_by_role(UserRole::Student).await
	}

	/// Partial profile update addressed by current email. A new password is
	/// re-hashed; other fields pass through unchanged when `None`.
	pub async fn update_student(
		&self,
		email: &str,
		new_name: Option<&str>,
		new_email: Option<&str>,
		new_password: Option<&str>,
	) -> Result<()> {
		let user = self
			.store
			.find_user_by_email(email)
			.await?
			.ok_or(Error::NotFound("user"))?;

		let new_hash = new_password
			.map(|password| self.hasher.hash(password))
			.transpose()?;

		self.store
			.update_user(user.id, new_name, new_email, new_hash.as_deref())
			.await
	}

	/// Deletes the account and everything it owns (explicit ordered cascade
	/// in the store). Complaint authorship the user *responded* to is
	/// preserved with the responder reference nulled.
	pub async fn delete_user(&self, email: &str) -> Result<()> {
		let user = self
			.store
			.find_user_by_email(email)
			.await?
			.ok_or(Error::NotFound("user"))?;
		self.store.delete_user_cascading(user.id).await?;
		info!(%email, "user deleted");
		Ok(())
	}
}

fn require_nonempty(value: &str, field: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::InvalidInput(format!("{field} must not be empty")));
	}
	Ok(())
}
