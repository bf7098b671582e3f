// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control for lorebooks.
//!
//! This crate provides:
//! - [`IdentityResolver`] - turns request profiles into an [`Identity`]
//! - [`ResourceAttrs`] - ownership and visibility parsed from a lorebook name
//! - [`evaluate`] / [`AccessPolicyEngine`] - the access policy itself
//! - [`AllowListProvider`] - botmaker grants supplied by the caller
//! - [`LorebookOperation`] guards for get, delete, edit and import handlers
//!
//! # Usage
//!
//! ```ignore
//! use lore_server_access::{AccessPolicyEngine, LorebookOperation, StaticAllowList};
//!
//! let engine = AccessPolicyEngine::new(Arc::new(StaticAllowList::new()));
//! let identity = resolver.resolve(request.profile());
//! let name = engine.authorize(&identity, LorebookOperation::Edit, &body.name)?;
//! ```

pub mod allow_list;
pub mod audit;
pub mod engine;
pub mod error;
pub mod guard;
pub mod identity;
pub mod permissions;
pub mod resource;
pub mod types;

pub use allow_list::{AllowListProvider, EmptyAllowList, StaticAllowList};
pub use audit::{
	AccessAuditEvent, AuditEventType, DecisionObserver, MemoryObserver, NoopObserver,
	TracingObserver,
};
pub use engine::{can_access, evaluate, AccessPolicyEngine, Decision, Rule};
pub use error::{AccessError, AccessResult, AllowListError, AuditError};
pub use guard::{check_import_name, LorebookOperation};
pub use identity::{IdentityResolver, UserProfile};
pub use permissions::UserPermissions;
pub use resource::{Ownership, ResourceAttrs, ResourceName, HIDDEN_MARKER, PERSONAL_PREFIX};
pub use types::{Access, AdminHandles, Handle, Identity, DEFAULT_USER_HANDLE};
