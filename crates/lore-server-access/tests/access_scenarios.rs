// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end lorebook access scenarios: profile resolution, policy
//! evaluation and handler guards wired together the way a server uses them.

use std::sync::Arc;

use lore_server_access::{
	can_access, AccessError, AccessPolicyEngine, AdminHandles, AuditEventType, EmptyAllowList,
	Identity, IdentityResolver, LorebookOperation, MemoryObserver, ResourceName, Rule,
	StaticAllowList, UserProfile,
};

fn name(raw: &str) -> ResourceName {
	ResourceName::parse(raw).unwrap()
}

fn identity(handle: &str, is_admin: bool, is_botmaker: bool) -> Identity {
	Identity::new(handle)
		.with_admin(is_admin)
		.with_botmaker(is_botmaker)
}

mod scenarios {
	use super::*;

	#[test]
	fn owner_reads_own_notes() {
		assert!(can_access(
			&identity("alice", false, false),
			&name("$$-alice-notes"),
			false,
			&EmptyAllowList
		));
	}

	#[test]
	fn user_cannot_read_someone_elses_notes() {
		assert!(!can_access(
			&identity("alice", false, false),
			&name("$$-bob-notes"),
			false,
			&EmptyAllowList
		));
	}

	#[test]
	fn botmaker_writes_granted_notes() {
		let granted = StaticAllowList::new().with_botmaker("alice", ["$$-bob-notes"]);
		assert!(can_access(
			&identity("alice", false, true),
			&name("$$-bob-notes"),
			true,
			&granted
		));

		let empty = StaticAllowList::new().with_botmaker("alice", Vec::<String>::new());
		assert!(!can_access(
			&identity("alice", false, true),
			&name("$$-bob-notes"),
			true,
			&empty
		));
	}

	#[test]
	fn anyone_reads_global_lore() {
		assert!(can_access(
			&identity("eve", false, false),
			&name("global-lore"),
			false,
			&EmptyAllowList
		));
	}

	#[test]
	fn admin_writes_hidden_book() {
		assert!(can_access(
			&identity("x", true, false),
			&name("secret#hidden#book"),
			true,
			&EmptyAllowList
		));
	}

	#[test]
	fn admin_reaches_everything() {
		let admin = identity("root", true, false);
		for raw in [
			"global-lore",
			"$$-bob-notes",
			"$$-root-notes",
			"secret#hidden#book",
			"$$-bob-#hidden#",
		] {
			for requires_write in [false, true] {
				assert!(
					can_access(&admin, &name(raw), requires_write, &EmptyAllowList),
					"admin denied {raw} (write={requires_write})"
				);
			}
		}
	}
}

mod request_flow {
	use super::*;

	struct Server {
		resolver: IdentityResolver,
		engine: AccessPolicyEngine,
		audit: Arc<MemoryObserver>,
	}

	fn server() -> Server {
		let grants = Arc::new(StaticAllowList::new().with_botmaker("maker", ["$$-bob-notes"]));
		let audit = Arc::new(MemoryObserver::new());
		Server {
			resolver: IdentityResolver::new(AdminHandles::default(), grants.clone()),
			engine: AccessPolicyEngine::new(grants).with_observer(audit.clone()),
			audit,
		}
	}

	#[test]
	fn botmaker_profile_edits_granted_book_only() {
		let server = server();
		let maker = server.resolver.resolve(Some(&UserProfile::new("maker")));
		assert!(maker.is_botmaker);

		assert!(server
			.engine
			.authorize(&maker, LorebookOperation::Edit, "$$-bob-notes")
			.is_ok());
		let err = server
			.engine
			.authorize(&maker, LorebookOperation::Delete, "$$-carol-notes")
			.unwrap_err();
		assert!(err.is_denied());

		let events = server.audit.events();
		assert_eq!(events.len(), 2);
		assert_eq!(events[0].rule, Rule::BotmakerAllowListed);
		assert_eq!(events[1].rule, Rule::BotmakerNotListed);
		assert_eq!(events[1].event_type, AuditEventType::AccessDenied);
	}

	#[test]
	fn anonymous_request_is_not_admin() {
		let server = server();
		let anonymous = server.resolver.resolve(None);
		assert!(!anonymous.is_admin);

		let err = server
			.engine
			.authorize(&anonymous, LorebookOperation::Get, "secret#hidden#book")
			.unwrap_err();
		assert_eq!(err.to_string(), "Access denied: You do not have permission to access this lorebook");
	}

	#[test]
	fn profile_without_handle_cannot_touch_hidden_book() {
		let server = server();
		for profile in [UserProfile::default(), UserProfile::new("")] {
			let requester = server.resolver.resolve(Some(&profile));
			assert!(!requester.is_admin);

			for operation in [
				LorebookOperation::Get,
				LorebookOperation::Edit,
				LorebookOperation::Delete,
			] {
				let err = server
					.engine
					.authorize(&requester, operation, "secret#hidden#book")
					.unwrap_err();
				assert_eq!(err, AccessError::denied(operation));
			}
		}

		let events = server.audit.events();
		assert_eq!(events.len(), 6);
		assert!(events.iter().all(|e| e.rule == Rule::HiddenResource));
	}

	#[test]
	fn admin_handle_profile_reads_hidden_book() {
		let server = server();
		let admin = server.resolver.resolve(Some(&UserProfile::new("admin")));
		assert!(server
			.engine
			.authorize(&admin, LorebookOperation::Get, "secret#hidden#book")
			.is_ok());
	}

	#[test]
	fn import_checks_prefix_without_recording_a_decision() {
		let server = server();
		let alice = server.resolver.resolve(Some(&UserProfile::new("alice")));

		assert!(server
			.engine
			.authorize(&alice, LorebookOperation::Import, "$$-alice-world")
			.is_ok());
		assert_eq!(
			server
				.engine
				.authorize(&alice, LorebookOperation::Import, "$$-bob-world")
				.unwrap_err(),
			AccessError::denied(LorebookOperation::Import)
		);
		assert!(server.audit.is_empty());
	}

	#[test]
	fn permission_summary_matches_grants() {
		let server = server();
		let maker = server.resolver.resolve(Some(&UserProfile::new("maker")));
		let permissions = server.engine.user_permissions(&maker);
		assert!(permissions.is_botmaker);
		assert_eq!(permissions.allowed_books, vec!["$$-bob-notes".to_string()]);
	}
}
