// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lorebook resource names and the attributes parsed from them.
//!
//! Lorebook names encode ownership and visibility in the name itself:
//!
//! - `#hidden#` anywhere in the name marks an admin-only lorebook
//! - `$$-{handle}-{rest}` marks a lorebook personally owned by `handle`
//! - anything without the `$$-` prefix is a global, shared lorebook
//!
//! The name is parsed once into [`ResourceAttrs`] so that policy evaluation
//! works on explicit attributes instead of string prefixes.

use crate::error::AccessError;
use crate::types::Handle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker substring denoting an admin-only lorebook.
pub const HIDDEN_MARKER: &str = "#hidden#";

/// Prefix denoting a personally scoped lorebook.
pub const PERSONAL_PREFIX: &str = "$$-";

/// Separator between the owner handle and the rest of a personal name.
pub const OWNER_SEPARATOR: char = '-';

/// A validated, non-empty lorebook name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
	/// Parses a raw lorebook name, rejecting empty or blank names.
	pub fn parse(raw: impl Into<String>) -> Result<Self, AccessError> {
		let raw = raw.into();
		if raw.trim().is_empty() {
			return Err(AccessError::MissingName);
		}
		Ok(Self(raw))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true if the name carries the personal prefix of `handle`.
	pub fn has_owner_prefix(&self, handle: &Handle) -> bool {
		owner_tail(&self.0)
			.map(|tail| tail_matches_owner(tail, handle))
			.unwrap_or(false)
	}

	pub fn is_personal(&self) -> bool {
		self.0.starts_with(PERSONAL_PREFIX)
	}

	pub fn is_hidden(&self) -> bool {
		self.0.contains(HIDDEN_MARKER)
	}
}

impl fmt::Display for ResourceName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl TryFrom<String> for ResourceName {
	type Error = AccessError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl From<ResourceName> for String {
	fn from(name: ResourceName) -> Self {
		name.0
	}
}

impl AsRef<str> for ResourceName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Who a lorebook belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Ownership {
	/// Shared by everyone.
	Global,
	/// Personally scoped. `tail` is everything after the `$$-` prefix; the
	/// owner is whichever handle the tail begins with, followed by `-`.
	Personal { tail: String },
}

/// Attributes of a lorebook, derived from its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAttrs {
	pub name: ResourceName,
	pub is_hidden: bool,
	pub ownership: Ownership,
}

impl ResourceAttrs {
	/// Derives attributes from a validated name.
	pub fn from_name(name: ResourceName) -> Self {
		let is_hidden = name.is_hidden();
		let ownership = match owner_tail(name.as_str()) {
			Some(tail) => Ownership::Personal {
				tail: tail.to_string(),
			},
			None => Ownership::Global,
		};

		Self {
			name,
			is_hidden,
			ownership,
		}
	}

	/// Parses a raw name straight into attributes.
	pub fn parse(raw: impl Into<String>) -> Result<Self, AccessError> {
		ResourceName::parse(raw).map(Self::from_name)
	}

	pub fn is_global(&self) -> bool {
		matches!(self.ownership, Ownership::Global)
	}

	/// Returns true if this is a personal lorebook owned by `handle`.
	pub fn is_owned_by(&self, handle: &Handle) -> bool {
		match &self.ownership {
			Ownership::Personal { tail } => tail_matches_owner(tail, handle),
			Ownership::Global => false,
		}
	}
}

fn owner_tail(name: &str) -> Option<&str> {
	name.strip_prefix(PERSONAL_PREFIX)
}

fn tail_matches_owner(tail: &str, handle: &Handle) -> bool {
	tail
		.strip_prefix(handle.as_str())
		.map(|rest| rest.starts_with(OWNER_SEPARATOR))
		.unwrap_or(false)
}
