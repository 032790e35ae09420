//! Runtime configuration, read once at startup.

use std::env;

use tracing::info;

/// Runtime configuration for the server and services.
#[derive(Debug, Clone)]
pub struct Config {
	/// SQLite connection URL.
	pub database_url: String,
	/// Address the HTTP server binds to.
	pub bind_addr: String,
	/// Directory the local file store writes attachments into.
	pub upload_dir: String,
	/// Whether a successful complaint response also forces the status to
	/// `done`. Deployments differ on this, so it is an explicit knob
	/// instead of a hard-coded behavior.
	pub respond_marks_done: bool,
}

impl Config {
	pub fn from_env() -> Self {
		Self {
			database_url: load("DATABASE_URL", "sqlite:campus_voice.db"),
			bind_addr: load("BIND_ADDR", "127.0.0.1:8000"),
			upload_dir: load("UPLOAD_DIR", "uploads"),
			respond_marks_done: load("RESPOND_MARKS_DONE", "false")
				.parse()
				.unwrap_or(false),
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			database_url: "sqlite:campus_voice.db".to_string(),
			bind_addr: "127.0.0.1:8000".to_string(),
			upload_dir: "uploads".to_string(),
			respond_marks_done: false,
		}
	}
}

fn load(key: &str, default: &str) -> String {
	env::var(key).unwrap_or_else(|_| {
		info!("{key} not set, using default: {default}");
		default.to_string()
	})
}
