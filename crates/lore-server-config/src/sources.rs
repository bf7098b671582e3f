// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{AccessConfigLayer, LoggingConfigLayer};

/// Default location of the server configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/lore/server.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: LORE_SERVER_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			access: Some(load_access_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_list(name: &str) -> Option<Vec<String>> {
	env_var(name).map(|s| parse_list(&s))
}

fn parse_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
		.collect()
}

fn parse_botmakers(key: &str, json: &str) -> Result<BTreeMap<String, Vec<String>>, ConfigError> {
	serde_json::from_str(json).map_err(|e| ConfigError::InvalidValue {
		key: key.to_string(),
		message: format!("expected a JSON object of handle to lorebook list: {e}"),
	})
}

fn load_access_from_env() -> Result<AccessConfigLayer, ConfigError> {
	let botmakers = match env_var("LORE_SERVER_BOTMAKERS") {
		Some(json) => Some(parse_botmakers("LORE_SERVER_BOTMAKERS", &json)?),
		None => None,
	};

	Ok(AccessConfigLayer {
		admin_handles: env_list("LORE_SERVER_ADMIN_HANDLES"),
		default_handle: env_var("LORE_SERVER_DEFAULT_HANDLE"),
		botmakers,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("LORE_SERVER_LOG_LEVEL"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;
	use std::io::Write;
	use std::sync::Mutex;

	static ENV_MUTEX: Mutex<()> = Mutex::new(());

	const ENV_VARS: [&str; 4] = [
		"LORE_SERVER_ADMIN_HANDLES",
		"LORE_SERVER_DEFAULT_HANDLE",
		"LORE_SERVER_BOTMAKERS",
		"LORE_SERVER_LOG_LEVEL",
	];

	fn clear_lore_env() {
		for name in ENV_VARS {
			env::remove_var(name);
		}
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.access.is_none());
		assert!(layer.logging.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/server.toml");
		let layer = source.load().unwrap();
		assert!(layer.access.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[access]
admin_handles = ["root"]

[access.botmakers]
maker = ["$$-bob-notes"]

[logging]
level = "debug"
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		let access = layer.access.unwrap();
		assert_eq!(access.admin_handles, Some(vec!["root".to_string()]));
		assert_eq!(
			access.botmakers.unwrap()["maker"],
			vec!["$$-bob-notes".to_string()]
		);
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("debug"));
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[access\nadmin_handles = ").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_parse_list_trims_and_skips_empty() {
		assert_eq!(parse_list(" admin, ,root ,"), vec!["admin", "root"]);
	}

	#[test]
	fn test_parse_botmakers_json() {
		let parsed = parse_botmakers("KEY", r#"{"maker": ["$$-bob-notes"], "idle": []}"#).unwrap();
		assert_eq!(parsed.len(), 2);
		assert!(parsed["idle"].is_empty());

		let err = parse_botmakers("KEY", "[1, 2]").unwrap_err();
		assert!(err.to_string().contains("KEY"));
	}

	#[test]
	fn test_env_source_without_vars_sets_nothing() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_lore_env();

		let layer = EnvSource.load().unwrap();
		let access = layer.access.unwrap();
		assert_eq!(access.admin_handles, None);
		assert_eq!(access.default_handle, None);
		assert_eq!(access.botmakers, None);
		assert_eq!(layer.logging.unwrap().level, None);
	}

	#[test]
	fn test_env_source_reads_every_variable() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_lore_env();
		env::set_var("LORE_SERVER_ADMIN_HANDLES", "root, ops");
		env::set_var("LORE_SERVER_DEFAULT_HANDLE", "guest");
		env::set_var("LORE_SERVER_BOTMAKERS", r#"{"maker": ["$$-bob-notes"]}"#);
		env::set_var("LORE_SERVER_LOG_LEVEL", "trace");

		let layer = EnvSource.load();
		clear_lore_env();

		let layer = layer.unwrap();
		let access = layer.access.unwrap();
		assert_eq!(
			access.admin_handles,
			Some(vec!["root".to_string(), "ops".to_string()])
		);
		assert_eq!(access.default_handle.as_deref(), Some("guest"));
		assert_eq!(
			access.botmakers.unwrap()["maker"],
			vec!["$$-bob-notes".to_string()]
		);
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("trace"));
	}

	#[test]
	fn test_env_overrides_config_file() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_lore_env();

		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[access]
admin_handles = ["root"]
default_handle = "from-file"

[access.botmakers]
maker = ["$$-bob-notes"]

[logging]
level = "debug"
"#
		)
		.unwrap();

		env::set_var("LORE_SERVER_ADMIN_HANDLES", "ops");
		env::set_var("LORE_SERVER_DEFAULT_HANDLE", "from-env");
		env::set_var("LORE_SERVER_BOTMAKERS", r#"{"helper": []}"#);
		env::set_var("LORE_SERVER_LOG_LEVEL", "warn");

		let sources: Vec<Box<dyn ConfigSource>> = vec![
			Box::new(EnvSource),
			Box::new(TomlSource::new(file.path())),
			Box::new(DefaultsSource),
		];
		let config = crate::load_from_sources(sources);
		clear_lore_env();

		let config = config.unwrap();
		assert_eq!(config.access.admin_handles, vec!["ops"]);
		assert_eq!(config.access.default_handle, "from-env");
		assert!(config.access.botmakers.contains_key("helper"));
		assert!(!config.access.botmakers.contains_key("maker"));
		assert_eq!(config.logging.level, "warn");
	}

	#[test]
	fn test_env_unset_falls_through_to_config_file() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_lore_env();

		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[access]\ndefault_handle = \"from-file\"").unwrap();
		env::set_var("LORE_SERVER_LOG_LEVEL", "warn");

		let sources: Vec<Box<dyn ConfigSource>> = vec![
			Box::new(DefaultsSource),
			Box::new(TomlSource::new(file.path())),
			Box::new(EnvSource),
		];
		let config = crate::load_from_sources(sources);
		clear_lore_env();

		let config = config.unwrap();
		assert_eq!(config.access.default_handle, "from-file");
		assert_eq!(config.logging.level, "warn");
	}

	#[test]
	fn test_env_source_rejects_malformed_botmakers() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_lore_env();
		env::set_var("LORE_SERVER_BOTMAKERS", "maker=$$-bob-notes");

		let result = EnvSource.load();
		clear_lore_env();

		match result {
			Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "LORE_SERVER_BOTMAKERS"),
			other => panic!("expected InvalidValue, got {other:?}"),
		}
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
				#[test]
				fn parse_list_yields_trimmed_non_empty_entries(value in "[a-z ,\\-]{0,40}") {
						for entry in parse_list(&value) {
								prop_assert!(!entry.is_empty());
								prop_assert_eq!(entry.trim(), entry.as_str());
								prop_assert!(!entry.contains(','));
						}
				}
		}
	}
}
