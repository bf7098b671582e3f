// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Lorebook access control command line.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Exit code returned when the policy refuses the operation.
const EXIT_DENIED: u8 = 3;

/// lore-access - evaluate lorebook access decisions against the server configuration.
#[derive(Parser, Debug)]
#[command(name = "lore-access", about = "Lorebook access control", version)]
struct Cli {
	/// Config file to use instead of /etc/lore/server.toml
	#[arg(long, global = true, env = "LORE_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

/// Who is asking. Omit both flags to act as a request without an account.
#[derive(Args, Debug)]
struct Requester {
	/// Handle from the request profile
	#[arg(long)]
	handle: Option<String>,

	/// Set the explicit admin flag on the profile
	#[arg(long)]
	admin: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Decide whether a requester may read or write a lorebook
	Check {
		#[command(flatten)]
		requester: Requester,

		/// Lorebook name
		#[arg(long)]
		name: String,

		/// Check write access instead of read access
		#[arg(long)]
		write: bool,

		/// Include the rule that decided the outcome
		#[arg(long)]
		explain: bool,
	},

	/// Check whether a requester may import a lorebook under a name
	Import {
		#[command(flatten)]
		requester: Requester,

		/// Name of the lorebook being created
		#[arg(long)]
		name: String,
	},

	/// Show botmaker status and granted lorebooks
	Permissions {
		#[command(flatten)]
		requester: Requester,
	},

	/// Show the resolved configuration
	Config,
}

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	let config = match &cli.config {
		Some(path) => lore_server_config::load_config_with_file(path),
		None => lore_server_config::load_config(),
	}
	.context("failed to load configuration")?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	let (resolver, engine) = config.access.build();

	let allowed = match cli.command {
		Command::Check {
			requester,
			name,
			write,
			explain,
		} => {
			let profile = commands::profile(requester.handle, requester.admin);
			let report = commands::check(&resolver, &engine, profile.as_ref(), &name, write, explain)?;
			print_json(&report)?;
			report.allowed
		}
		Command::Import { requester, name } => {
			let profile = commands::profile(requester.handle, requester.admin);
			let report = commands::import(&resolver, &engine, profile.as_ref(), &name)?;
			print_json(&report)?;
			report.allowed
		}
		Command::Permissions { requester } => {
			let profile = commands::profile(requester.handle, requester.admin);
			print_json(&commands::permissions(&resolver, &engine, profile.as_ref()))?;
			true
		}
		Command::Config => {
			print_json(&commands::config_report(&config))?;
			true
		}
	};

	if allowed {
		Ok(ExitCode::SUCCESS)
	} else {
		tracing::debug!("operation denied");
		Ok(ExitCode::from(EXIT_DENIED))
	}
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
	let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
	println!("{json}");
	Ok(())
}
