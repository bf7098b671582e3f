// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for lorebook access decisions.
//!
//! - [`Handle`]: the stable identity string of a user
//! - [`Identity`]: the resolved requester (handle plus admin/botmaker flags)
//! - [`Access`]: whether the caller reads or mutates the lorebook
//! - [`AdminHandles`]: the configured set of privileged handles

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Handle used when no account system is active or the profile carries no handle.
pub const DEFAULT_USER_HANDLE: &str = "default-user";

/// Handles treated as administrators when no explicit configuration is supplied.
pub const DEFAULT_ADMIN_HANDLES: &[&str] = &["admin", "default-user"];

// =============================================================================
// Handle
// =============================================================================

/// Stable identity string for a user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
	/// Create a handle from any string-like value.
	pub fn new(handle: impl Into<String>) -> Self {
		Self(handle.into())
	}

	/// The fallback handle for requests without an account.
	pub fn default_user() -> Self {
		Self::new(DEFAULT_USER_HANDLE)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_inner(self) -> String {
		self.0
	}
}

impl fmt::Display for Handle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Handle {
	fn from(handle: &str) -> Self {
		Self::new(handle)
	}
}

impl From<String> for Handle {
	fn from(handle: String) -> Self {
		Self(handle)
	}
}

impl AsRef<str> for Handle {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

// =============================================================================
// Identity
// =============================================================================

/// The requester of an access decision.
///
/// Built once per request by [`crate::IdentityResolver`] and never mutated
/// while a decision is being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	pub handle: Handle,
	pub is_admin: bool,
	pub is_botmaker: bool,
}

impl Identity {
	/// Creates a non-privileged identity.
	pub fn new(handle: impl Into<Handle>) -> Self {
		Self {
			handle: handle.into(),
			is_admin: false,
			is_botmaker: false,
		}
	}

	/// Builder: set the admin flag.
	pub fn with_admin(mut self, is_admin: bool) -> Self {
		self.is_admin = is_admin;
		self
	}

	/// Builder: set the botmaker flag.
	pub fn with_botmaker(mut self, is_botmaker: bool) -> Self {
		self.is_botmaker = is_botmaker;
		self
	}
}

// =============================================================================
// Access
// =============================================================================

/// Kind of access requested on a lorebook.
///
/// Read and write currently share one rule set; the kind is still carried
/// into logs and audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
	Read,
	Write,
}

impl Access {
	/// Maps the legacy `requires_write` flag onto an access kind.
	pub fn from_requires_write(requires_write: bool) -> Self {
		if requires_write {
			Access::Write
		} else {
			Access::Read
		}
	}

	pub fn requires_write(self) -> bool {
		matches!(self, Access::Write)
	}
}

impl fmt::Display for Access {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Access::Read => write!(f, "read"),
			Access::Write => write!(f, "write"),
		}
	}
}

// =============================================================================
// Admin handles
// =============================================================================

/// Set of handles that are administrators regardless of their profile flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminHandles(BTreeSet<Handle>);

impl AdminHandles {
	pub fn new<I, H>(handles: I) -> Self
	where
		I: IntoIterator<Item = H>,
		H: Into<Handle>,
	{
		Self(handles.into_iter().map(Into::into).collect())
	}

	/// An empty set: only the explicit profile flag grants admin.
	pub fn none() -> Self {
		Self(BTreeSet::new())
	}

	pub fn contains(&self, handle: &Handle) -> bool {
		self.0.contains(handle)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Handle> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Default for AdminHandles {
	fn default() -> Self {
		Self::new(DEFAULT_ADMIN_HANDLES.iter().copied())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identity_new_is_unprivileged() {
		let identity = Identity::new("alice");
		assert_eq!(identity.handle.as_str(), "alice");
		assert!(!identity.is_admin);
		assert!(!identity.is_botmaker);
	}

	#[test]
	fn identity_builders_set_flags() {
		let identity = Identity::new("alice").with_admin(true).with_botmaker(true);
		assert!(identity.is_admin);
		assert!(identity.is_botmaker);
	}

	#[test]
	fn access_maps_requires_write_flag() {
		assert_eq!(Access::from_requires_write(false), Access::Read);
		assert_eq!(Access::from_requires_write(true), Access::Write);
		assert!(Access::Write.requires_write());
		assert!(!Access::Read.requires_write());
	}

	#[test]
	fn access_serializes_snake_case() {
		assert_eq!(serde_json::to_string(&Access::Write).unwrap(), "\"write\"");
		assert_eq!(Access::Read.to_string(), "read");
	}

	#[test]
	fn default_admin_handles_match_legacy_set() {
		let admins = AdminHandles::default();
		assert!(admins.contains(&Handle::new("admin")));
		assert!(admins.contains(&Handle::default_user()));
		assert!(!admins.contains(&Handle::new("alice")));
		assert_eq!(admins.len(), 2);
	}

	#[test]
	fn handle_serializes_transparently() {
		let handle = Handle::new("bob");
		assert_eq!(serde_json::to_string(&handle).unwrap(), "\"bob\"");
		assert_eq!(handle.to_string(), "bob");
	}
}
