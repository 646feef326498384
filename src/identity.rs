//! Maps verified remote identities onto local accounts.

use rand::{distributions::Alphanumeric, Rng};
use twilight_model::id::{marker::UserMarker, Id};

use crate::account::{AccountId, AccountStore, NewAccount, RemoteBinding, StoreError};

/// A user identity as reported by the identity provider.
///
/// Arrives already verified (the OAuth exchange happens upstream) and is
/// immutable for the rest of the request.
#[derive(Clone, Debug)]
pub struct RemoteIdentity {
	pub id: Id<UserMarker>,
	pub username: Option<String>,
	pub discriminator: Option<String>,
	pub avatar: Option<String>,
	pub email: Option<String>,
}

impl RemoteIdentity {
	/// Login name, synthesized from the id when the provider omits one.
	pub fn name(&self) -> String {
		self.username
			.clone()
			.unwrap_or_else(|| format!("discord_{}", self.id))
	}

	/// Contact address, synthesized when the provider withholds the email.
	///
	/// Synthesized addresses feed the fallback lookup in [`resolve`], so two
	/// identities sharing an address resolve to one account.
	pub fn address(&self) -> String {
		self.email
			.clone()
			.unwrap_or_else(|| format!("{}@discord.local", self.id))
	}
}

impl From<&RemoteIdentity> for RemoteBinding {
	fn from(identity: &RemoteIdentity) -> Self {
		Self {
			id: identity.id,
			username: identity.name(),
			discriminator: identity.discriminator.clone(),
			avatar: identity.avatar.clone(),
		}
	}
}

/// Which path [`resolve`] took.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolution {
	/// The identity was already bound to this account.
	Existing(AccountId),
	/// An account with a matching contact address absorbed the identity.
	LinkedByAddress(AccountId),
	/// No match, a fresh account was created with a generated credential.
	Created(AccountId),
}

impl Resolution {
	pub const fn account(self) -> AccountId {
		match self {
			Self::Existing(id) | Self::LinkedByAddress(id) | Self::Created(id) => id,
		}
	}
}

/// Find or create the local account for an identity and bind its metadata.
///
/// Lookup order: bound remote id, then contact address, then create. The
/// address fallback deliberately lets a pre-existing account absorb a new
/// remote identity; its binding is overwritten with the incoming one.
pub fn resolve(
	store: &dyn AccountStore,
	identity: &RemoteIdentity,
) -> Result<Resolution, StoreError> {
	let resolution = if let Some(account) = store.find_by_remote_id(identity.id) {
		Resolution::Existing(account.id)
	} else if let Some(account) = store.find_by_email(&identity.address()) {
		tracing::info!(account = %account.id, "contact address absorbed a new remote identity");
		Resolution::LinkedByAddress(account.id)
	} else {
		let id = store.create(NewAccount {
			username: identity.name(),
			email: identity.address(),
			password: generated_password(),
		});
		tracing::info!(account = %id, "created account for remote identity");
		Resolution::Created(id)
	};

	store.bind_remote(resolution.account(), RemoteBinding::from(identity))?;
	Ok(resolution)
}

fn generated_password() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(12)
		.map(char::from)
		.collect()
}
