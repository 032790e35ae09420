//! Password hashing.
//!
//! The store keeps argon2id hashes only; a plaintext password exists for the
//! duration of a single hash or verify call and is never persisted.

use argon2::Argon2;

use crate::error::{Error, Result};

/// Password hasher trait.
///
/// Implement this to swap the hashing algorithm; the identity service only
/// depends on this trait.
pub trait PasswordHasher: Send + Sync {
	/// Hashes a plaintext password into a self-describing hash string.
	fn hash(&self, password: &str) -> Result<String>;

	/// Verifies a plaintext password against a stored hash.
	///
	/// Returns `Ok(false)` on mismatch; an `Err` means the stored hash could
	/// not be parsed at all.
	fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Argon2id password hasher.
#[derive(Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String> {
		use argon2::password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng};

		let salt = SaltString::generate(&mut OsRng);
		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| Error::Hash(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool> {
		use argon2::password_hash::{PasswordHash, PasswordVerifier};

		let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Hash(e.to_string()))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}
