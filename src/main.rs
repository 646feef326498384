//! Daemon that periodically mirrors guild roles and bans onto local accounts.

#![deny(clippy::inconsistent_struct_constructor)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]
#![warn(clippy::cargo, clippy::nursery, clippy::pedantic)]

use std::{env, ffi::OsStr, fs, path::PathBuf};

use anyhow::Result;
use tokio::signal::unix::{signal, SignalKind};

use guild_sync::{
	cli::{Args, Mode},
	directory::{GuildDirectory, HttpDirectory},
	memory::MemoryStore,
	reconcile::Reconciler,
	sweep,
};

/// Get token from systemd credential storage, falling back to env var.
///
/// A missing token is tolerated: directory operations then degrade to
/// "unknown" answers instead of aborting the daemon.
fn token() -> Option<String> {
	if let Some(credential_dir) = env::var_os("CREDENTIALS_DIRECTORY") {
		tracing::info!("using systemd credential storage");
		let path: PathBuf = [&credential_dir, OsStr::new("token")].iter().collect();
		fs::read_to_string(path)
			.ok()
			.map(|token| token.trim().to_owned())
	} else {
		tracing::warn!("falling back to `DISCORD_BOT_TOKEN` environment variable");
		env::var("DISCORD_BOT_TOKEN").ok()
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt::init();

	let args = Args::parse();
	let token = token();
	if token.is_none() {
		tracing::warn!("no bot token configured, directory operations are disabled");
	}
	if args.guild_id.is_none() {
		tracing::warn!("no guild id configured, directory operations are disabled");
	}

	let directory = HttpDirectory::new(token, args.guild_id);
	let store = MemoryStore::new();

	// predefine every guild role before the first sweep
	match directory.guild_roles().await {
		Ok(roles) => Reconciler::new(&store).ensure_guild_roles(&roles),
		Err(error) => tracing::warn!(
			error = &error as &dyn std::error::Error,
			"skipping role predefinition"
		),
	}

	if let Some(Mode::Once) = args.mode {
		sweep::run(&directory, &store).await;
		return Ok(());
	}

	// Listen to sigint (ctrl-c) and sigterm (docker/podman).
	let mut sigint = signal(SignalKind::interrupt())?;
	let mut sigterm = signal(SignalKind::terminate())?;
	let mut interval = tokio::time::interval(args.interval());

	loop {
		tokio::select! {
			_ = interval.tick() => {
				sweep::run(&directory, &store).await;
			}
			_ = sigint.recv() => {
				tracing::info!("received SIGINT");
				break;
			}
			_ = sigterm.recv() => {
				tracing::info!("received SIGTERM");
				break;
			}
		}
	}

	tracing::info!("shutting down");
	Ok(())
}
