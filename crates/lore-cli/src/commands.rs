// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subcommand implementations. Each returns a JSON report plus whether the
//! requested operation was allowed.

use std::collections::BTreeMap;

use anyhow::Result;
use lore_server_access::{
	Access, AccessError, AccessPolicyEngine, IdentityResolver, LorebookOperation, ResourceAttrs,
	Rule, UserPermissions, UserProfile,
};
use lore_server_config::ServerConfig;
use serde::Serialize;

/// Builds the request profile the account system would have attached.
///
/// No handle and no admin flag means no account at all.
pub fn profile(handle: Option<String>, admin: bool) -> Option<UserProfile> {
	if handle.is_none() && !admin {
		return None;
	}
	Some(UserProfile {
		handle,
		admin: admin.then_some(true),
	})
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
	pub allowed: bool,
	pub handle: String,
	pub resource: String,
	pub access: Access,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rule: Option<Rule>,
}

pub fn check(
	resolver: &IdentityResolver,
	engine: &AccessPolicyEngine,
	profile: Option<&UserProfile>,
	name: &str,
	write: bool,
	explain: bool,
) -> Result<CheckReport> {
	let identity = resolver.resolve(profile);
	let resource = ResourceAttrs::parse(name)?;
	let access = Access::from_requires_write(write);
	let decision = engine.decide(&identity, &resource, access);

	Ok(CheckReport {
		allowed: decision.is_allowed(),
		handle: identity.handle.to_string(),
		resource: resource.name.to_string(),
		access,
		rule: explain.then_some(decision.rule),
	})
}

#[derive(Debug, Serialize)]
pub struct ImportReport {
	pub allowed: bool,
	pub handle: String,
	pub resource: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

pub fn import(
	resolver: &IdentityResolver,
	engine: &AccessPolicyEngine,
	profile: Option<&UserProfile>,
	name: &str,
) -> Result<ImportReport> {
	let identity = resolver.resolve(profile);
	let (allowed, message) = match engine.authorize(&identity, LorebookOperation::Import, name) {
		Ok(_) => (true, None),
		Err(e @ AccessError::Denied { .. }) => (false, Some(e.to_string())),
		Err(e) => return Err(e.into()),
	};

	Ok(ImportReport {
		allowed,
		handle: identity.handle.to_string(),
		resource: name.to_string(),
		message,
	})
}

pub fn permissions(
	resolver: &IdentityResolver,
	engine: &AccessPolicyEngine,
	profile: Option<&UserProfile>,
) -> UserPermissions {
	let identity = resolver.resolve(profile);
	engine.user_permissions(&identity)
}

#[derive(Debug, Serialize)]
pub struct ConfigReport<'a> {
	pub admin_handles: &'a [String],
	pub default_handle: &'a str,
	pub botmakers: &'a BTreeMap<String, Vec<String>>,
	pub log_level: &'a str,
}

pub fn config_report(config: &ServerConfig) -> ConfigReport<'_> {
	ConfigReport {
		admin_handles: &config.access.admin_handles,
		default_handle: &config.access.default_handle,
		botmakers: &config.access.botmakers,
		log_level: &config.logging.level,
	}
}
