// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::guard::LorebookOperation;

pub type AccessResult<T> = Result<T, AccessError>;

/// Errors surfaced to request handlers guarding lorebook operations.
///
/// `Denied` deliberately carries only the user-facing message; which policy
/// rule produced the denial stays in the logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
	#[error("lorebook name is missing")]
	MissingName,

	#[error("Access denied: {message}")]
	Denied {
		operation: LorebookOperation,
		message: &'static str,
	},
}

impl AccessError {
	pub fn denied(operation: LorebookOperation) -> Self {
		Self::Denied {
			operation,
			message: operation.denial_message(),
		}
	}

	pub fn is_denied(&self) -> bool {
		matches!(self, Self::Denied { .. })
	}
}

/// Failure looking up a botmaker's allow-list.
#[derive(Error, Debug)]
pub enum AllowListError {
	#[error("allow-list source unavailable: {0}")]
	Unavailable(String),
}

/// Failure recording an access decision.
#[derive(Error, Debug)]
pub enum AuditError {
	#[error("audit sink '{sink}' rejected event: {message}")]
	Sink { sink: String, message: String },

	#[error("audit sink lock poisoned")]
	Poisoned,
}
