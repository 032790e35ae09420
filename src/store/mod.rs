//! SQLite-backed persistence.
//!
//! The store is an explicitly constructed handle passed into every service;
//! there is no ambient global. The database is the sole source of truth and
//! carries the per-record guarantees the services rely on: the UNIQUE email
//! constraint backs registration, and the write-once response is a single
//! conditional update. Cascading deletes are explicit, ordered routines
//! inside one transaction (see [`Store::delete_user_cascading`]).

mod complaints;
mod notifications;
mod suggestions;
mod users;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
	id BLOB PRIMARY KEY,
	name TEXT NOT NULL,
	email TEXT NOT NULL UNIQUE,
	password_hash TEXT NOT NULL,
	role TEXT NOT NULL DEFAULT 'student',
	created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS complaints (
	id BLOB PRIMARY KEY,
	sender_id BLOB NOT NULL REFERENCES users(id),
	category TEXT NOT NULL,
	visibility TEXT NOT NULL,
	status TEXT NOT NULL DEFAULT 'under_checking',
	title TEXT NOT NULL,
	message TEXT NOT NULL,
	file_name TEXT,
	file_url TEXT,
	created_at TEXT NOT NULL,
	responder_id BLOB REFERENCES users(id),
	response_message TEXT,
	response_created_at TEXT
);

CREATE TABLE IF NOT EXISTS suggestions (
	id BLOB PRIMARY KEY,
	owner_id BLOB NOT NULL REFERENCES users(id),
	category TEXT NOT NULL,
	visibility TEXT NOT NULL,
	review_status TEXT NOT NULL DEFAULT 'unreviewed',
	title TEXT NOT NULL,
	message TEXT NOT NULL,
	file_name TEXT,
	file_url TEXT,
	created_at TEXT NOT NULL,
	response_message TEXT
);

CREATE TABLE IF NOT EXISTS notifications (
	id BLOB PRIMARY KEY,
	user_id BLOB NOT NULL REFERENCES users(id),
	message TEXT NOT NULL,
	created_at TEXT NOT NULL,
	is_read INTEGER NOT NULL DEFAULT 0,
	complaint_id BLOB REFERENCES complaints(id),
	suggestion_id BLOB REFERENCES suggestions(id),
	CHECK (complaint_id IS NULL OR suggestion_id IS NULL)
);

CREATE INDEX IF NOT EXISTS idx_complaints_sender ON complaints(sender_id);
CREATE INDEX IF NOT EXISTS idx_suggestions_owner ON suggestions(owner_id);
CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, created_at);
"#;

/// Shared handle over the SQLite pool. Cheap to clone; every clone talks to
/// the same database.
#[derive(Clone)]
pub struct Store {
	pool: SqlitePool,
}

impl Store {
	/// Opens (creating if missing) the database at `url` and applies the
	/// schema.
	pub async fn connect(url: &str) -> Result<Self> {
		let options = SqliteConnectOptions::from_str(url)?
			.create_if_missing(true)
			.foreign_keys(true);
		let pool = SqlitePoolOptions::new().connect_with(options).await?;
		let store = Self { pool };
		store.init_schema().await?;
		Ok(store)
	}

	/// In-memory store for tests. Pinned to a single connection, since each
	/// SQLite `:memory:` connection is its own database.
	pub async fn open_in_memory() -> Result<Self> {
		let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.connect_with(options)
			.await?;
		let store = Self { pool };
		store.init_schema().await?;
		Ok(store)
	}

	async fn init_schema(&self) -> Result<()> {
		sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
		Ok(())
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}
}
