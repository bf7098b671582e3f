// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-user permission summary for clients.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::AccessPolicyEngine;
use crate::types::{Handle, Identity};

/// What a client needs to know to render lorebook controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissions {
	pub is_botmaker: bool,
	pub allowed_books: Vec<String>,
	pub user_handle: Handle,
}

impl AccessPolicyEngine {
	/// Summarizes botmaker status and grants for `identity`.
	///
	/// A failing allow-list lookup reports no grants.
	pub fn user_permissions(&self, identity: &Identity) -> UserPermissions {
		let is_botmaker = self.allow_list().is_botmaker(&identity.handle);
		let allowed_books = match self.allow_list().allowed_resources(&identity.handle) {
			Ok(books) => books.into_iter().collect(),
			Err(e) => {
				warn!(handle = %identity.handle, error = %e, "allow-list lookup failed");
				Vec::new()
			}
		};

		UserPermissions {
			is_botmaker,
			allowed_books,
			user_handle: identity.handle.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::allow_list::StaticAllowList;
	use std::sync::Arc;

	fn engine() -> AccessPolicyEngine {
		let list = StaticAllowList::new().with_botmaker("maker", ["$$-bob-notes", "$$-carol-world"]);
		AccessPolicyEngine::new(Arc::new(list))
	}

	#[test]
	fn botmaker_sees_sorted_grants() {
		let permissions = engine().user_permissions(&Identity::new("maker"));
		assert!(permissions.is_botmaker);
		assert_eq!(
			permissions.allowed_books,
			vec!["$$-bob-notes".to_string(), "$$-carol-world".to_string()]
		);
		assert_eq!(permissions.user_handle.as_str(), "maker");
	}

	#[test]
	fn regular_user_has_no_grants() {
		let permissions = engine().user_permissions(&Identity::new("alice"));
		assert!(!permissions.is_botmaker);
		assert!(permissions.allowed_books.is_empty());
	}

	#[test]
	fn serializes_camel_case() {
		let json = serde_json::to_value(engine().user_permissions(&Identity::new("maker"))).unwrap();
		assert_eq!(json["isBotmaker"], true);
		assert_eq!(json["userHandle"], "maker");
		assert_eq!(json["allowedBooks"][0], "$$-bob-notes");
	}
}
