// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity resolution.
//!
//! Turns whatever the account system attached to a request into an
//! [`Identity`]. The admin predicate is evaluated here, once per request,
//! before any lorebook-specific rule runs.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

use crate::allow_list::AllowListProvider;
use crate::types::{AdminHandles, Handle, Identity};

/// Profile data supplied by the account system for an authenticated request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	#[serde(default)]
	pub handle: Option<String>,
	#[serde(default)]
	pub admin: Option<bool>,
}

impl UserProfile {
	pub fn new(handle: impl Into<String>) -> Self {
		Self {
			handle: Some(handle.into()),
			admin: None,
		}
	}

	pub fn with_admin(mut self, admin: bool) -> Self {
		self.admin = Some(admin);
		self
	}
}

/// Resolves request profiles into identities.
#[derive(Clone)]
pub struct IdentityResolver {
	admin_handles: AdminHandles,
	default_handle: Handle,
	botmakers: Arc<dyn AllowListProvider>,
}

impl IdentityResolver {
	pub fn new(admin_handles: AdminHandles, botmakers: Arc<dyn AllowListProvider>) -> Self {
		Self {
			admin_handles,
			default_handle: Handle::default_user(),
			botmakers,
		}
	}

	/// Builder: override the handle used for requests without an account.
	pub fn with_default_handle(mut self, handle: impl Into<Handle>) -> Self {
		self.default_handle = handle.into();
		self
	}

	pub fn admin_handles(&self) -> &AdminHandles {
		&self.admin_handles
	}

	pub fn default_handle(&self) -> &Handle {
		&self.default_handle
	}

	/// Resolves the identity for a request.
	///
	/// Without a profile handle the request belongs to the default user, but
	/// the admin predicate only ever sees the handle the profile carried, so
	/// the substituted default handle never grants admin.
	pub fn resolve(&self, profile: Option<&UserProfile>) -> Identity {
		let own_handle = profile
			.and_then(|p| p.handle.as_deref())
			.filter(|h| !h.is_empty())
			.map(Handle::new);

		let is_admin = profile
			.map(|p| self.is_admin(p, own_handle.as_ref()))
			.unwrap_or(false);
		let handle = own_handle.unwrap_or_else(|| self.default_handle.clone());
		let is_botmaker = self.botmakers.is_botmaker(&handle);

		trace!(%handle, is_admin, is_botmaker, "resolved identity");

		Identity {
			handle,
			is_admin,
			is_botmaker,
		}
	}

	/// Admin if the profile says so or its own handle is a configured admin handle.
	fn is_admin(&self, profile: &UserProfile, handle: Option<&Handle>) -> bool {
		profile.admin == Some(true) || handle.is_some_and(|h| self.admin_handles.contains(h))
	}
}

impl std::fmt::Debug for IdentityResolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("IdentityResolver")
			.field("admin_handles", &self.admin_handles)
			.field("default_handle", &self.default_handle)
			.finish_non_exhaustive()
	}
}
