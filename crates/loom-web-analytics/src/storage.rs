// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage slots scoped to one browsing context.
//!
//! A slot holds at most one serialized session. Contexts never share a slot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::warn;

use crate::error::Result;
use crate::store::SESSION_STORAGE_KEY;

/// A single replaceable value that lives as long as the browsing context.
pub trait SessionSlot: Send + Sync {
	/// Returns the stored value, `None` if the slot is empty or unreadable.
	fn load(&self) -> Option<String>;

	/// Replaces the stored value.
	fn store(&self, value: &str) -> Result<()>;

	/// Empties the slot.
	fn clear(&self) -> Result<()>;
}

impl<T: SessionSlot + ?Sized> SessionSlot for std::sync::Arc<T> {
	fn load(&self) -> Option<String> {
		(**self).load()
	}

	fn store(&self, value: &str) -> Result<()> {
		(**self).store(value)
	}

	fn clear(&self) -> Result<()> {
		(**self).clear()
	}
}

/// In-memory slot, the equivalent of a tab's session storage.
#[derive(Debug, Default)]
pub struct MemorySlot {
	value: Mutex<Option<String>>,
}

impl MemorySlot {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a slot that already holds `value`, e.g. a restored context.
	pub fn with_value(value: impl Into<String>) -> Self {
		Self {
			value: Mutex::new(Some(value.into())),
		}
	}
}

impl SessionSlot for MemorySlot {
	fn load(&self) -> Option<String> {
		self.value.lock().clone()
	}

	fn store(&self, value: &str) -> Result<()> {
		*self.value.lock() = Some(value.to_string());
		Ok(())
	}

	fn clear(&self) -> Result<()> {
		*self.value.lock() = None;
		Ok(())
	}
}

/// File-backed slot for native hosts whose browsing context outlives the process.
///
/// Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileSlot {
	path: PathBuf,
}

impl FileSlot {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Slot file named after the session storage key inside `dir`.
	pub fn in_dir(dir: impl AsRef<Path>) -> Self {
		Self::new(dir.as_ref().join(format!("{SESSION_STORAGE_KEY}.json")))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn temp_path(&self) -> PathBuf {
		let mut name = self
			.path
			.file_name()
			.map(|n| n.to_os_string())
			.unwrap_or_else(|| "session".into());
		name.push(".tmp");
		self.path.with_file_name(name)
	}
}

impl SessionSlot for FileSlot {
	fn load(&self) -> Option<String> {
		match std::fs::read_to_string(&self.path) {
			Ok(content) => Some(content),
			Err(e) if e.kind() == ErrorKind::NotFound => None,
			Err(e) => {
				warn!(path = %self.path.display(), error = %e, "Failed to read session slot");
				None
			}
		}
	}

	fn store(&self, value: &str) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			if !parent.as_os_str().is_empty() {
				std::fs::create_dir_all(parent)?;
			}
		}
		let temp = self.temp_path();
		std::fs::write(&temp, value)?;
		std::fs::rename(&temp, &self.path)?;
		Ok(())
	}

	fn clear(&self) -> Result<()> {
		match std::fs::remove_file(&self.path) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e.into()),
		}
	}
}
