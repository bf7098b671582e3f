// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lorebook access policy evaluation.
//!
//! [`evaluate`] walks a fixed list of rules and stops at the first one that
//! matches:
//!
//! 1. **Admin override**: administrators may do anything, hidden lorebooks included
//! 2. **Hidden**: `#hidden#` lorebooks are denied to everyone else
//! 3. **Own personal**: `$$-{handle}-...` is allowed for `handle`
//! 4. **Global**: names without the `$$-` prefix are allowed for everyone
//! 5. **Botmaker allow-list**: botmakers may access other users' personal
//!    lorebooks that are explicitly granted to them
//! 6. **Default**: deny
//!
//! Read and write share the same rules. Evaluation is pure apart from the
//! allow-list lookup, which only happens for botmakers reaching step 5.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{instrument, trace, warn};

use crate::allow_list::AllowListProvider;
use crate::audit::{AccessAuditEvent, DecisionObserver, TracingObserver};
use crate::resource::{ResourceAttrs, ResourceName};
use crate::types::{Access, Identity};

/// The rule that settled an access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
	AdminOverride,
	HiddenResource,
	OwnPersonal,
	Global,
	BotmakerAllowListed,
	BotmakerNotListed,
	DefaultDeny,
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Rule::AdminOverride => "admin_override",
			Rule::HiddenResource => "hidden_resource",
			Rule::OwnPersonal => "own_personal",
			Rule::Global => "global",
			Rule::BotmakerAllowListed => "botmaker_allow_listed",
			Rule::BotmakerNotListed => "botmaker_not_listed",
			Rule::DefaultDeny => "default_deny",
		};
		write!(f, "{s}")
	}
}

/// Result of a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
	pub rule: Rule,
	allowed: bool,
}

impl Decision {
	pub fn allow(rule: Rule) -> Self {
		Self {
			rule,
			allowed: true,
		}
	}

	pub fn deny(rule: Rule) -> Self {
		Self {
			rule,
			allowed: false,
		}
	}

	pub fn is_allowed(&self) -> bool {
		self.allowed
	}
}

/// Evaluates whether `identity` may access `resource`.
///
/// An allow-list lookup failure denies (fails closed).
#[instrument(
	level = "debug",
	skip(identity, resource, allow_list),
	fields(
		handle = %identity.handle,
		resource = %resource.name,
		access = %access,
	)
)]
pub fn evaluate(
	identity: &Identity,
	resource: &ResourceAttrs,
	access: Access,
	allow_list: &dyn AllowListProvider,
) -> Decision {
	let decision = evaluate_rules(identity, resource, allow_list);
	trace!(rule = %decision.rule, allowed = decision.is_allowed(), "rule matched");
	decision
}

fn evaluate_rules(
	identity: &Identity,
	resource: &ResourceAttrs,
	allow_list: &dyn AllowListProvider,
) -> Decision {
	if identity.is_admin {
		return Decision::allow(Rule::AdminOverride);
	}

	if resource.is_hidden {
		return Decision::deny(Rule::HiddenResource);
	}

	if resource.is_owned_by(&identity.handle) {
		return Decision::allow(Rule::OwnPersonal);
	}

	if resource.is_global() {
		return Decision::allow(Rule::Global);
	}

	if identity.is_botmaker {
		let listed = match allow_list.allowed_resources(&identity.handle) {
			Ok(granted) => granted.contains(resource.name.as_str()),
			Err(e) => {
				warn!(handle = %identity.handle, error = %e, "allow-list lookup failed, denying");
				false
			}
		};

		return if listed {
			Decision::allow(Rule::BotmakerAllowListed)
		} else {
			Decision::deny(Rule::BotmakerNotListed)
		};
	}

	Decision::deny(Rule::DefaultDeny)
}

/// Boolean form of [`evaluate`] using the legacy `requires_write` flag.
pub fn can_access(
	identity: &Identity,
	name: &ResourceName,
	requires_write: bool,
	allow_list: &dyn AllowListProvider,
) -> bool {
	let resource = ResourceAttrs::from_name(name.clone());
	evaluate(
		identity,
		&resource,
		Access::from_requires_write(requires_write),
		allow_list,
	)
	.is_allowed()
}

/// Policy evaluation bundled with its allow-list provider and audit observer.
///
/// Holds no mutable state; share it behind an `Arc` between request handlers.
#[derive(Clone)]
pub struct AccessPolicyEngine {
	allow_list: Arc<dyn AllowListProvider>,
	observer: Arc<dyn DecisionObserver>,
}

impl AccessPolicyEngine {
	/// Creates an engine that reports decisions through [`TracingObserver`].
	pub fn new(allow_list: Arc<dyn AllowListProvider>) -> Self {
		Self {
			allow_list,
			observer: Arc::new(TracingObserver),
		}
	}

	/// Builder: replace the audit observer.
	pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
		self.observer = observer;
		self
	}

	pub fn allow_list(&self) -> &Arc<dyn AllowListProvider> {
		&self.allow_list
	}

	/// Evaluates and records a decision.
	pub fn decide(&self, identity: &Identity, resource: &ResourceAttrs, access: Access) -> Decision {
		let decision = evaluate(identity, resource, access, self.allow_list.as_ref());
		self.record(identity, resource, access, decision);
		decision
	}

	pub fn can_access(&self, identity: &Identity, name: &ResourceName, access: Access) -> bool {
		let resource = ResourceAttrs::from_name(name.clone());
		self.decide(identity, &resource, access).is_allowed()
	}

	fn record(&self, identity: &Identity, resource: &ResourceAttrs, access: Access, decision: Decision) {
		let event = AccessAuditEvent::new(identity, resource, access, decision);
		if let Err(e) = self.observer.on_decision(&event) {
			warn!(
				observer = self.observer.name(),
				error = %e,
				"failed to record access decision"
			);
		}
	}
}

impl fmt::Debug for AccessPolicyEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AccessPolicyEngine")
			.field("observer", &self.observer.name())
			.finish_non_exhaustive()
	}
}
