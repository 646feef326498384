use std::time::Duration;

use clap::{Parser, ValueEnum};
use twilight_model::id::{marker::GuildMarker, Id};

#[derive(Parser)]
#[command(about, version)]
pub struct Args {
	/// Guild whose roles and bans are mirrored.
	#[arg(env = "DISCORD_GUILD_ID", long)]
	pub guild_id: Option<Id<GuildMarker>>,

	/// Seconds between background sweeps.
	#[arg(default_value_t = 86_400, env = "SWEEP_INTERVAL", long)]
	pub interval: u64,

	/// Run mode.
	#[arg(value_enum)]
	pub mode: Option<Mode>,
}

impl Args {
	pub fn parse() -> Self {
		// to avoid importing `Parser` in main
		<Self as Parser>::parse()
	}

	pub const fn interval(&self) -> Duration {
		Duration::from_secs(self.interval)
	}
}

#[derive(Clone, Debug, ValueEnum)]
pub enum Mode {
	/// Run a single sweep and exit.
	Once,
}
