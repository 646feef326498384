//! Ban checks during verification and the unban path.

use twilight_model::id::{marker::UserMarker, Id};

use crate::{
	account::AccountStore,
	directory::{BanEntry, DirectoryError, GuildDirectory},
	identity::RemoteIdentity,
};

/// Consults the guild's ban list before a session is established.
pub struct BanGate<'a> {
	directory: &'a dyn GuildDirectory,
	store: &'a dyn AccountStore,
}

impl<'a> BanGate<'a> {
	pub const fn new(directory: &'a dyn GuildDirectory, store: &'a dyn AccountStore) -> Self {
		Self { directory, store }
	}

	/// Whether the identity is banned from the guild.
	///
	/// Fails open: an unreachable or unconfigured directory answers `false`,
	/// trading strictness for availability. A positive answer also flags the
	/// local account, if one exists.
	pub async fn check(&self, identity: &RemoteIdentity) -> bool {
		match self.directory.is_banned(identity.id).await {
			Ok(true) => {
				if let Some(account) = self.store.find_by_remote_id(identity.id) {
					if let Err(error) = self.store.set_banned(account.id, true) {
						tracing::warn!(%error, "failed to flag banned account");
					}
				}
				true
			}
			Ok(false) => false,
			Err(error) => {
				tracing::warn!(
					error = &error as &dyn std::error::Error,
					"ban lookup failed, allowing login"
				);
				false
			}
		}
	}

	/// Remove a user's remote ban and best-effort clear the local flag.
	///
	/// The remote deletion is the operation that matters; a missing local
	/// account or a failed flag update does not undo it.
	pub async fn unban(&self, user: Id<UserMarker>) -> Result<(), DirectoryError> {
		self.directory.remove_ban(user).await?;
		tracing::info!(%user, "removed remote ban");

		if let Some(account) = self.store.find_by_remote_id(user) {
			if let Err(error) = self.store.set_banned(account.id, false) {
				tracing::warn!(%error, "remote unban succeeded but local flag was not cleared");
			}
		}
		Ok(())
	}

	/// The guild's ban list, for moderation views.
	pub async fn banned_members(&self) -> Result<Vec<BanEntry>, DirectoryError> {
		self.directory.bans().await
	}
}
