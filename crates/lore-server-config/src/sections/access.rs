// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control configuration: admin handles and botmaker allow-lists.

use std::collections::BTreeMap;
use std::sync::Arc;

use lore_server_access::types::DEFAULT_ADMIN_HANDLES;
use lore_server_access::{
	AccessPolicyEngine, AdminHandles, IdentityResolver, StaticAllowList, DEFAULT_USER_HANDLE,
};
use serde::Deserialize;

use crate::error::ConfigError;

/// Access configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
	pub admin_handles: Vec<String>,
	pub default_handle: String,
	pub botmakers: BTreeMap<String, Vec<String>>,
}

impl Default for AccessConfig {
	fn default() -> Self {
		AccessConfigLayer::default().finalize()
	}
}

impl AccessConfig {
	pub fn admin_set(&self) -> AdminHandles {
		AdminHandles::new(self.admin_handles.iter().cloned())
	}

	pub fn allow_list(&self) -> StaticAllowList {
		self
			.botmakers
			.iter()
			.map(|(handle, books)| (handle.clone(), books.clone()))
			.collect()
	}

	/// Builds the resolver and engine sharing one allow-list.
	pub fn build(&self) -> (IdentityResolver, AccessPolicyEngine) {
		let allow_list = Arc::new(self.allow_list());
		let resolver = IdentityResolver::new(self.admin_set(), allow_list.clone())
			.with_default_handle(self.default_handle.clone());
		let engine = AccessPolicyEngine::new(allow_list);
		(resolver, engine)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.default_handle.trim().is_empty() {
			return Err(ConfigError::validation("access.default_handle must not be empty"));
		}

		if self.admin_handles.iter().any(|h| h.trim().is_empty()) {
			return Err(ConfigError::validation(
				"access.admin_handles must not contain empty handles",
			));
		}

		for (handle, books) in &self.botmakers {
			if handle.trim().is_empty() {
				return Err(ConfigError::validation(
					"access.botmakers must not contain an empty handle",
				));
			}
			if books.iter().any(|b| b.trim().is_empty()) {
				return Err(ConfigError::validation(format!(
					"access.botmakers.{handle} contains an empty lorebook name"
				)));
			}
		}

		Ok(())
	}
}

/// Access configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessConfigLayer {
	#[serde(default)]
	pub admin_handles: Option<Vec<String>>,
	#[serde(default)]
	pub default_handle: Option<String>,
	#[serde(default)]
	pub botmakers: Option<BTreeMap<String, Vec<String>>>,
}

impl AccessConfigLayer {
	pub fn merge(&mut self, other: AccessConfigLayer) {
		if other.admin_handles.is_some() {
			self.admin_handles = other.admin_handles;
		}
		if other.default_handle.is_some() {
			self.default_handle = other.default_handle;
		}
		if other.botmakers.is_some() {
			self.botmakers = other.botmakers;
		}
	}

	pub fn finalize(self) -> AccessConfig {
		AccessConfig {
			admin_handles: self.admin_handles.unwrap_or_else(|| {
				DEFAULT_ADMIN_HANDLES
					.iter()
					.map(|h| h.to_string())
					.collect()
			}),
			default_handle: self
				.default_handle
				.unwrap_or_else(|| DEFAULT_USER_HANDLE.to_string()),
			botmakers: self.botmakers.unwrap_or_default(),
		}
	}
}
