//! Attachment storage.
//!
//! The core never keeps raw bytes: a file store turns bytes plus a filename
//! into a stable retrieval locator, and records store only that locator and
//! the original name. The write must be durable before the owning record is
//! committed, which is why [`FileStore::put`] syncs before returning.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Attachment;

#[async_trait]
pub trait FileStore: Send + Sync {
	/// Stores `bytes` under a fresh locator derived from `file_name` and
	/// returns the attachment descriptor. When this returns, the bytes are
	/// durably on disk; callers commit the owning record only afterwards.
	async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<Attachment>;
}

/// File store writing into a local directory.
///
/// Locators have the shape `/files/{uuid}-{basename}`, so two uploads of the
/// same filename never collide and a stored name can never escape the root.
pub struct LocalFileStore {
	root: PathBuf,
}

impl LocalFileStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}
}

#[async_trait]
impl FileStore for LocalFileStore {
	async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<Attachment> {
		// Keep only the final path component of whatever the client sent.
		let base = file_name
			.rsplit(['/', '\\'])
			.next()
			.filter(|s| !s.is_empty())
			.unwrap_or("attachment");

		let stored = format!("{}-{}", Uuid::new_v4(), base);
		let path = self.root.join(&stored);

		fs::create_dir_all(&self.root).await?;
		fs::write(&path, bytes).await?;
		fs::File::open(&path).await?.sync_all().await?;

		Ok(Attachment {
			file_name: base.to_string(),
			file_url: format!("/files/{stored}"),
		})
	}
}
