//! Error types for the complaint/suggestion core.
//!
//! Every variant here is recoverable at the HTTP boundary; the [`crate::http`]
//! layer maps each one onto a status code and a user-visible message. Nothing
//! in this taxonomy should ever crash the process.

use thiserror::Error;

/// Errors produced by the campus-voice core.
#[derive(Debug, Error)]
pub enum Error {
	/// A referenced entity does not exist.
	#[error("{0} not found")]
	NotFound(&'static str),

	/// Malformed enum value or missing required field.
	#[error("invalid input: {0}")]
	InvalidInput(String),

	/// Registration attempted with an email that is already taken.
	#[error("email already registered")]
	DuplicateEmail,

	/// A second response was attempted on a complaint that already carries one.
	#[error("complaint already responded to")]
	AlreadyResponded,

	/// Credential check failed or the acting user lacks the required role.
	#[error("unauthorized")]
	Unauthorized,

	/// Password hashing or verification failed.
	#[error("credential hashing error: {0}")]
	Hash(String),

	/// Storage failure not covered by a more specific variant.
	#[error("storage error: {0}")]
	Storage(#[from] sqlx::Error),

	/// An attachment could not be written to the file store.
	#[error("file store error: {0}")]
	FileStore(#[from] std::io::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
