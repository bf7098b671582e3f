// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Botmaker allow-lists.
//!
//! A botmaker may touch other users' personal lorebooks, but only those that
//! are explicitly granted to them. The grants come from an
//! [`AllowListProvider`]; the policy never caches what it returns.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::AllowListError;
use crate::types::Handle;

/// Source of botmaker membership and per-botmaker grants.
pub trait AllowListProvider: Send + Sync {
	/// Returns true if `handle` has the botmaker role.
	fn is_botmaker(&self, handle: &Handle) -> bool;

	/// Lorebook names granted to `handle`.
	///
	/// A handle without an entry yields an empty set, not an error.
	fn allowed_resources(&self, handle: &Handle) -> Result<BTreeSet<String>, AllowListError>;
}

/// Provider with no botmakers at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyAllowList;

impl AllowListProvider for EmptyAllowList {
	fn is_botmaker(&self, _handle: &Handle) -> bool {
		false
	}

	fn allowed_resources(&self, _handle: &Handle) -> Result<BTreeSet<String>, AllowListError> {
		Ok(BTreeSet::new())
	}
}

/// In-memory allow-list, usually built from configuration.
///
/// Every handle with an entry is a botmaker, including handles whose entry
/// is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAllowList {
	grants: BTreeMap<Handle, BTreeSet<String>>,
}

impl StaticAllowList {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: register a botmaker with the given grants.
	pub fn with_botmaker<I, S>(mut self, handle: impl Into<Handle>, resources: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.insert(handle, resources);
		self
	}

	/// Registers a botmaker, extending any grants it already has.
	pub fn insert<I, S>(&mut self, handle: impl Into<Handle>, resources: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self
			.grants
			.entry(handle.into())
			.or_default()
			.extend(resources.into_iter().map(Into::into));
	}

	pub fn botmakers(&self) -> impl Iterator<Item = &Handle> {
		self.grants.keys()
	}

	pub fn len(&self) -> usize {
		self.grants.len()
	}

	pub fn is_empty(&self) -> bool {
		self.grants.is_empty()
	}
}

impl<H, I, S> FromIterator<(H, I)> for StaticAllowList
where
	H: Into<Handle>,
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (H, I)>>(iter: T) -> Self {
		let mut list = Self::new();
		for (handle, resources) in iter {
			list.insert(handle, resources);
		}
		list
	}
}

impl AllowListProvider for StaticAllowList {
	fn is_botmaker(&self, handle: &Handle) -> bool {
		self.grants.contains_key(handle)
	}

	fn allowed_resources(&self, handle: &Handle) -> Result<BTreeSet<String>, AllowListError> {
		Ok(self.grants.get(handle).cloned().unwrap_or_default())
	}
}
