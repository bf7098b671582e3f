// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-level guards for lorebook operations.
//!
//! Handlers call [`AccessPolicyEngine::authorize`] with the raw name from the
//! request. Get, delete and edit go through the access policy; import is a
//! creation-time check on the new name and never consults the policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::engine::AccessPolicyEngine;
use crate::error::{AccessError, AccessResult};
use crate::resource::ResourceName;
use crate::types::{Access, Identity};

/// Lorebook operations exposed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LorebookOperation {
	Get,
	Delete,
	Edit,
	Import,
}

impl LorebookOperation {
	pub fn required_access(self) -> Access {
		match self {
			LorebookOperation::Get => Access::Read,
			LorebookOperation::Delete | LorebookOperation::Edit | LorebookOperation::Import => {
				Access::Write
			}
		}
	}

	/// Message shown to the user when the operation is refused.
	pub fn denial_message(self) -> &'static str {
		match self {
			LorebookOperation::Get => "You do not have permission to access this lorebook",
			LorebookOperation::Delete => "You do not have permission to delete this lorebook",
			LorebookOperation::Edit => "You do not have permission to edit this lorebook",
			LorebookOperation::Import => "You can only import lorebooks with your own username prefix",
		}
	}
}

impl fmt::Display for LorebookOperation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LorebookOperation::Get => write!(f, "get"),
			LorebookOperation::Delete => write!(f, "delete"),
			LorebookOperation::Edit => write!(f, "edit"),
			LorebookOperation::Import => write!(f, "import"),
		}
	}
}

/// Checks that `identity` may create a lorebook called `name`.
///
/// Personal names must carry the creator's own handle; admins may import
/// under any prefix. Global names are always accepted.
pub fn check_import_name(identity: &Identity, name: &ResourceName) -> AccessResult<()> {
	if identity.is_admin || !name.is_personal() || name.has_owner_prefix(&identity.handle) {
		return Ok(());
	}

	debug!(
		handle = %identity.handle,
		resource = %name,
		"import refused: personal prefix belongs to another handle"
	);
	Err(AccessError::denied(LorebookOperation::Import))
}

impl AccessPolicyEngine {
	/// Validates the requested name and authorizes `operation` on it.
	///
	/// Returns the parsed name so the handler can go on to touch storage.
	pub fn authorize(
		&self,
		identity: &Identity,
		operation: LorebookOperation,
		raw_name: &str,
	) -> AccessResult<ResourceName> {
		let name = ResourceName::parse(raw_name)?;

		if operation == LorebookOperation::Import {
			check_import_name(identity, &name)?;
			return Ok(name);
		}

		if self.can_access(identity, &name, operation.required_access()) {
			Ok(name)
		} else {
			Err(AccessError::denied(operation))
		}
	}
}
