//! The verification pipeline: ban check, resolution, reconciliation, session.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
	account::{AccountId, AccountStore, StoreError},
	ban::BanGate,
	directory::{GuildDirectory, Membership},
	identity::{self, RemoteIdentity, Resolution},
	reconcile::{Reconciler, INACTIVE},
};

/// An established session.
#[derive(Clone, Debug)]
pub struct Session {
	pub account: AccountId,
	pub resolution: Resolution,
	/// Assigned role slugs at login time.
	pub roles: BTreeSet<String>,
}

#[derive(Debug, Error)]
pub enum LoginError {
	/// The only failure an end user ever observes.
	#[error("identity is banned from the guild")]
	Banned,
	#[error(transparent)]
	Store(#[from] StoreError),
}

/// Verify a remote identity and establish a session.
///
/// Runs the steps in a fixed order: ban gate, account resolution, role
/// reconciliation. A directory outage during the role fetch skips
/// reconciliation and logs in with the previous roles; only a ban denies.
#[tracing::instrument(skip_all, fields(remote = %identity.id))]
pub async fn verify(
	directory: &dyn GuildDirectory,
	store: &dyn AccountStore,
	identity: &RemoteIdentity,
) -> Result<Session, LoginError> {
	if BanGate::new(directory, store).check(identity).await {
		tracing::info!("rejected banned identity");
		return Err(LoginError::Banned);
	}

	let resolution = identity::resolve(store, identity)?;
	let account = resolution.account();

	let reconciler = Reconciler::new(store);
	match directory.member_roles(identity.id).await {
		Ok(Membership::Member(member_roles)) => match directory.guild_roles().await {
			Ok(guild_roles) => {
				reconciler.reconcile(account, &member_roles, &guild_roles)?;
			}
			Err(error) => tracing::warn!(
				error = &error as &dyn std::error::Error,
				%account,
				"role list fetch failed, keeping previous roles"
			),
		},
		Ok(Membership::Absent) => {
			reconciler.demote(account, INACTIVE)?;
		}
		Err(error) => tracing::warn!(
			error = &error as &dyn std::error::Error,
			%account,
			"membership fetch failed, keeping previous roles"
		),
	}

	let roles = store
		.get(account)
		.map(|account| account.roles)
		.unwrap_or_default();
	tracing::info!(%account, "session established");
	Ok(Session {
		account,
		resolution,
		roles,
	})
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use twilight_model::id::Id;

	use super::{verify, LoginError};
	use crate::{
		account::AccountStore, identity::Resolution, memory::MemoryStore, testutil,
	};

	fn owned(slugs: &[&str]) -> BTreeSet<String> {
		slugs.iter().map(|&s| s.to_owned()).collect()
	}

	#[tokio::test]
	async fn first_login_creates_and_syncs() {
		let store = MemoryStore::new();
		let mut directory = testutil::StubDirectory::default();
		directory.roles = vec![testutil::role(1, "Member")];
		directory.members.insert(Id::new(42), vec![Id::new(1)]);

		let session = verify(&directory, &store, &testutil::identity(42))
			.await
			.unwrap();

		assert!(matches!(session.resolution, Resolution::Created(_)));
		assert_eq!(session.roles, owned(&["member"]));
		assert_eq!(store.get(session.account).unwrap().roles, session.roles);
	}

	#[tokio::test]
	async fn banned_identity_is_denied() {
		let store = MemoryStore::new();
		let account = testutil::linked_account(&store, 42);
		let mut directory = testutil::StubDirectory::default();
		directory.bans.insert(Id::new(42), Some("spam".to_owned()));

		let result = verify(&directory, &store, &testutil::identity(42)).await;

		assert!(matches!(result, Err(LoginError::Banned)));
		assert!(store.get(account).unwrap().banned);
	}

	#[tokio::test]
	async fn outage_logs_in_with_previous_roles() {
		let store = MemoryStore::new();
		let account = testutil::linked_account(&store, 42);
		store.set_roles(account, owned(&["moderator"])).unwrap();

		let session = verify(
			&testutil::StubDirectory::down(),
			&store,
			&testutil::identity(42),
		)
		.await
		.unwrap();

		assert_eq!(session.account, account);
		assert_eq!(session.roles, owned(&["moderator"]));
	}

	#[tokio::test]
	async fn departed_member_logs_in_as_inactive() {
		let store = MemoryStore::new();
		let account = testutil::linked_account(&store, 42);
		store.set_roles(account, owned(&["member"])).unwrap();

		let session = verify(
			&testutil::StubDirectory::default(),
			&store,
			&testutil::identity(42),
		)
		.await
		.unwrap();

		assert_eq!(session.account, account);
		assert_eq!(session.roles, owned(&["inactive"]));
	}
}
