//! Remote guild directory, the authority on roles, membership and bans.

use async_trait::async_trait;
use thiserror::Error;
use twilight_http::{error::ErrorType, Client};
use twilight_model::{
	guild::{Ban, Role},
	id::{
		marker::{GuildMarker, RoleMarker, UserMarker},
		Id,
	},
};

/// A role as the guild defines it. Never mutated locally.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteRole {
	pub id: Id<RoleMarker>,
	pub name: String,
	pub color: u32,
}

impl From<Role> for RemoteRole {
	fn from(role: Role) -> Self {
		Self {
			id: role.id,
			name: role.name,
			color: role.color,
		}
	}
}

/// Membership lookup result.
///
/// `Absent` is a successful answer ("not in the guild"), distinct from a
/// failed fetch. Callers demote on `Absent` but must preserve local state on
/// [`DirectoryError`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Membership {
	Member(Vec<Id<RoleMarker>>),
	Absent,
}

/// An entry of the guild's ban list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BanEntry {
	pub user: Id<UserMarker>,
	pub username: String,
	pub reason: Option<String>,
}

impl From<Ban> for BanEntry {
	fn from(ban: Ban) -> Self {
		Self {
			user: ban.user.id,
			username: ban.user.name,
			reason: ban.reason,
		}
	}
}

#[derive(Debug, Error)]
pub enum DirectoryError {
	/// Bot token or guild id is not configured.
	///
	/// Means "unknown", never an authoritative empty set.
	#[error("bot token or guild id is not configured")]
	MissingCredentials,
	#[error("remote directory unavailable")]
	Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<twilight_http::Error> for DirectoryError {
	fn from(error: twilight_http::Error) -> Self {
		Self::Unavailable(Box::new(error))
	}
}

impl From<twilight_http::response::DeserializeBodyError> for DirectoryError {
	fn from(error: twilight_http::response::DeserializeBodyError) -> Self {
		Self::Unavailable(Box::new(error))
	}
}

/// Read and write operations against the guild directory.
///
/// No retries, no backoff: every operation is a single round-trip.
#[async_trait]
pub trait GuildDirectory: Send + Sync {
	/// All roles defined in the guild.
	async fn guild_roles(&self) -> Result<Vec<RemoteRole>, DirectoryError>;

	/// Role ids assigned to a member, or [`Membership::Absent`].
	async fn member_roles(&self, user: Id<UserMarker>) -> Result<Membership, DirectoryError>;

	/// The guild's ban list.
	async fn bans(&self) -> Result<Vec<BanEntry>, DirectoryError>;

	/// Whether a single user is banned.
	async fn is_banned(&self, user: Id<UserMarker>) -> Result<bool, DirectoryError>;

	/// Remove a user's ban.
	async fn remove_ban(&self, user: Id<UserMarker>) -> Result<(), DirectoryError>;
}

/// [`GuildDirectory`] over the Discord REST API.
pub struct HttpDirectory {
	http: Option<Client>,
	guild: Option<Id<GuildMarker>>,
}

impl HttpDirectory {
	/// Both credentials are optional; operations degrade to
	/// [`DirectoryError::MissingCredentials`] when either is absent.
	pub fn new(token: Option<String>, guild: Option<Id<GuildMarker>>) -> Self {
		Self {
			http: token.map(Client::new),
			guild,
		}
	}

	fn configured(&self) -> Result<(&Client, Id<GuildMarker>), DirectoryError> {
		match (&self.http, self.guild) {
			(Some(http), Some(guild)) => Ok((http, guild)),
			_ => Err(DirectoryError::MissingCredentials),
		}
	}
}

fn not_found(error: &twilight_http::Error) -> bool {
	matches!(error.kind(), ErrorType::Response { status, .. } if status.get() == 404)
}

#[async_trait]
impl GuildDirectory for HttpDirectory {
	async fn guild_roles(&self) -> Result<Vec<RemoteRole>, DirectoryError> {
		let (http, guild) = self.configured()?;
		let roles = http.roles(guild).await?.models().await?;
		Ok(roles.into_iter().map(RemoteRole::from).collect())
	}

	async fn member_roles(&self, user: Id<UserMarker>) -> Result<Membership, DirectoryError> {
		let (http, guild) = self.configured()?;
		match http.guild_member(guild, user).await {
			Ok(response) => Ok(Membership::Member(response.model().await?.roles)),
			Err(error) if not_found(&error) => Ok(Membership::Absent),
			Err(error) => Err(error.into()),
		}
	}

	async fn bans(&self) -> Result<Vec<BanEntry>, DirectoryError> {
		let (http, guild) = self.configured()?;
		let bans = http.bans(guild).await?.models().await?;
		Ok(bans.into_iter().map(BanEntry::from).collect())
	}

	async fn is_banned(&self, user: Id<UserMarker>) -> Result<bool, DirectoryError> {
		let (http, guild) = self.configured()?;
		match http.ban(guild, user).await {
			Ok(_) => Ok(true),
			Err(error) if not_found(&error) => Ok(false),
			Err(error) => Err(error.into()),
		}
	}

	async fn remove_ban(&self, user: Id<UserMarker>) -> Result<(), DirectoryError> {
		let (http, guild) = self.configured()?;
		http.delete_ban(guild, user).await?;
		Ok(())
	}
}
