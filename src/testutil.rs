//! Stub collaborators shared between unit tests.

use std::{
	collections::HashMap,
	sync::Mutex,
};

use async_trait::async_trait;
use twilight_model::id::{
	marker::{RoleMarker, UserMarker},
	Id,
};

use crate::{
	account::{AccountId, AccountStore, NewAccount, RemoteBinding},
	directory::{BanEntry, DirectoryError, GuildDirectory, Membership, RemoteRole},
	identity::RemoteIdentity,
};

pub fn role(id: u64, name: &str) -> RemoteRole {
	RemoteRole {
		id: Id::new(id),
		name: name.to_owned(),
		color: 0,
	}
}

pub fn identity(id: u64) -> RemoteIdentity {
	RemoteIdentity {
		id: Id::new(id),
		username: None,
		discriminator: None,
		avatar: None,
		email: None,
	}
}

/// Create an account bound to remote id `remote`.
pub fn linked_account(store: &dyn AccountStore, remote: u64) -> AccountId {
	let account = store.create(NewAccount {
		username: format!("user-{remote}"),
		email: format!("user-{remote}@example.com"),
		password: "pw".to_owned(),
	});
	store
		.bind_remote(
			account,
			RemoteBinding {
				id: Id::new(remote),
				username: format!("user-{remote}"),
				discriminator: None,
				avatar: None,
			},
		)
		.expect("account exists");
	account
}

/// Scriptable [`GuildDirectory`]. Users without a `members` entry are absent.
#[derive(Default)]
pub struct StubDirectory {
	pub roles: Vec<RemoteRole>,
	pub members: HashMap<Id<UserMarker>, Vec<Id<RoleMarker>>>,
	pub bans: HashMap<Id<UserMarker>, Option<String>>,
	/// Every operation answers `Unavailable`.
	pub down: bool,
	/// Only the guild role list is unavailable.
	pub roles_down: bool,
	/// Every operation answers `MissingCredentials`.
	pub unconfigured: bool,
	pub removed_bans: Mutex<Vec<Id<UserMarker>>>,
}

impl StubDirectory {
	pub fn down() -> Self {
		Self {
			down: true,
			..Self::default()
		}
	}

	pub fn unconfigured() -> Self {
		Self {
			unconfigured: true,
			..Self::default()
		}
	}

	fn gate(&self) -> Result<(), DirectoryError> {
		if self.unconfigured {
			Err(DirectoryError::MissingCredentials)
		} else if self.down {
			Err(DirectoryError::Unavailable("stubbed outage".into()))
		} else {
			Ok(())
		}
	}
}

#[async_trait]
impl GuildDirectory for StubDirectory {
	async fn guild_roles(&self) -> Result<Vec<RemoteRole>, DirectoryError> {
		self.gate()?;
		if self.roles_down {
			return Err(DirectoryError::Unavailable("stubbed outage".into()));
		}
		Ok(self.roles.clone())
	}

	async fn member_roles(&self, user: Id<UserMarker>) -> Result<Membership, DirectoryError> {
		self.gate()?;
		Ok(self
			.members
			.get(&user)
			.map_or(Membership::Absent, |roles| Membership::Member(roles.clone())))
	}

	async fn bans(&self) -> Result<Vec<BanEntry>, DirectoryError> {
		self.gate()?;
		Ok(self
			.bans
			.iter()
			.map(|(&user, reason)| BanEntry {
				user,
				username: user.to_string(),
				reason: reason.clone(),
			})
			.collect())
	}

	async fn is_banned(&self, user: Id<UserMarker>) -> Result<bool, DirectoryError> {
		self.gate()?;
		Ok(self.bans.contains_key(&user))
	}

	async fn remove_ban(&self, user: Id<UserMarker>) -> Result<(), DirectoryError> {
		self.gate()?;
		self.removed_bans.lock().expect("not poisoned").push(user);
		Ok(())
	}
}
