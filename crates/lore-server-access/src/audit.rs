// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit trail for lorebook access decisions.
//!
//! Every evaluation produces an [`AccessAuditEvent`] that is handed to a
//! [`DecisionObserver`]. Observers are side channels: a failing observer is
//! logged and ignored, it never changes the decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::{Decision, Rule};
use crate::error::AuditError;
use crate::resource::ResourceAttrs;
use crate::types::{Access, Handle, Identity};

/// Tracing target used for decision records.
pub const AUDIT_TARGET: &str = "lore_access::audit";

/// Outcome category of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
	/// Access to a lorebook was granted.
	AccessGranted,
	/// Access to a lorebook was denied.
	AccessDenied,
}

impl std::fmt::Display for AuditEventType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			AuditEventType::AccessGranted => "access_granted",
			AuditEventType::AccessDenied => "access_denied",
		};
		write!(f, "{s}")
	}
}

/// A single recorded access decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessAuditEvent {
	/// Unique identifier for this event.
	pub id: Uuid,
	/// When the decision was made.
	pub timestamp: DateTime<Utc>,
	pub event_type: AuditEventType,
	/// Handle of the requester.
	pub handle: Handle,
	pub is_admin: bool,
	pub is_botmaker: bool,
	/// Lorebook name as requested.
	pub resource: String,
	pub access: Access,
	/// The policy rule that decided the outcome.
	pub rule: Rule,
}

impl AccessAuditEvent {
	pub fn new(
		identity: &Identity,
		resource: &ResourceAttrs,
		access: Access,
		decision: Decision,
	) -> Self {
		let event_type = if decision.is_allowed() {
			AuditEventType::AccessGranted
		} else {
			AuditEventType::AccessDenied
		};

		Self {
			id: Uuid::new_v4(),
			timestamp: Utc::now(),
			event_type,
			handle: identity.handle.clone(),
			is_admin: identity.is_admin,
			is_botmaker: identity.is_botmaker,
			resource: resource.name.to_string(),
			access,
			rule: decision.rule,
		}
	}

	pub fn is_granted(&self) -> bool {
		self.event_type == AuditEventType::AccessGranted
	}
}

/// Receives access decisions for auditing.
pub trait DecisionObserver: Send + Sync {
	/// Short name used when reporting observer failures.
	fn name(&self) -> &'static str;

	fn on_decision(&self, event: &AccessAuditEvent) -> Result<(), AuditError>;
}

/// Writes decisions to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DecisionObserver for TracingObserver {
	fn name(&self) -> &'static str {
		"tracing"
	}

	fn on_decision(&self, event: &AccessAuditEvent) -> Result<(), AuditError> {
		if event.is_granted() {
			debug!(
				target: AUDIT_TARGET,
				handle = %event.handle,
				resource = %event.resource,
				access = %event.access,
				rule = %event.rule,
				"lorebook access granted"
			);
		} else {
			info!(
				target: AUDIT_TARGET,
				handle = %event.handle,
				resource = %event.resource,
				access = %event.access,
				rule = %event.rule,
				"lorebook access denied"
			);
		}
		Ok(())
	}
}

/// Discards every decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DecisionObserver for NoopObserver {
	fn name(&self) -> &'static str {
		"noop"
	}

	fn on_decision(&self, _event: &AccessAuditEvent) -> Result<(), AuditError> {
		Ok(())
	}
}

/// Keeps decisions in memory.
#[derive(Debug, Default)]
pub struct MemoryObserver {
	events: Mutex<Vec<AccessAuditEvent>>,
}

impl MemoryObserver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of recorded events, oldest first.
	pub fn events(&self) -> Vec<AccessAuditEvent> {
		self
			.events
			.lock()
			.map(|events| events.clone())
			.unwrap_or_default()
	}

	pub fn len(&self) -> usize {
		self.events.lock().map(|events| events.len()).unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl DecisionObserver for MemoryObserver {
	fn name(&self) -> &'static str {
		"memory"
	}

	fn on_decision(&self, event: &AccessAuditEvent) -> Result<(), AuditError> {
		let mut events = self.events.lock().map_err(|_| AuditError::Poisoned)?;
		events.push(event.clone());
		Ok(())
	}
}
