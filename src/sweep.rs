//! Periodic pass that re-mirrors every linked account from the guild.

use crate::{
	account::{AccountStore, LocalAccount},
	directory::{GuildDirectory, Membership},
	reconcile::{Reconciler, INACTIVE},
};

/// Per-account tallies of a completed sweep.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SweepSummary {
	/// Accounts whose roles now mirror the guild.
	pub synced: usize,
	/// Accounts demoted to the inactive marker (gone from the guild).
	pub demoted: usize,
	/// Accounts left untouched because a remote fetch failed.
	pub skipped: usize,
}

/// Reconcile all linked accounts, sequentially.
///
/// Each account costs at least two directory round-trips (membership, then the
/// guild role list), so duration grows linearly with account count. A fetch
/// failure skips the account and preserves its roles; only a successful
/// "absent" answer demotes.
#[tracing::instrument(skip_all)]
pub async fn run(directory: &dyn GuildDirectory, store: &dyn AccountStore) -> SweepSummary {
	let reconciler = Reconciler::new(store);
	let mut summary = SweepSummary::default();

	for account in store.linked_accounts() {
		sweep_account(directory, &reconciler, &account, &mut summary).await;
	}

	tracing::info!(
		synced = summary.synced,
		demoted = summary.demoted,
		skipped = summary.skipped,
		"sweep finished"
	);
	summary
}

async fn sweep_account(
	directory: &dyn GuildDirectory,
	reconciler: &Reconciler<'_>,
	account: &LocalAccount,
	summary: &mut SweepSummary,
) {
	let Some(remote) = account.remote.as_ref() else {
		return;
	};

	let member_roles = match directory.member_roles(remote.id).await {
		Ok(Membership::Member(roles)) => roles,
		Ok(Membership::Absent) => {
			match reconciler.demote(account.id, INACTIVE) {
				Ok(_) => summary.demoted += 1,
				Err(error) => {
					tracing::warn!(%error, account = %account.id, "demotion failed");
					summary.skipped += 1;
				}
			}
			return;
		}
		Err(error) => {
			tracing::warn!(
				error = &error as &dyn std::error::Error,
				account = %account.id,
				"membership fetch failed, preserving roles"
			);
			summary.skipped += 1;
			return;
		}
	};

	let guild_roles = match directory.guild_roles().await {
		Ok(roles) => roles,
		Err(error) => {
			tracing::warn!(
				error = &error as &dyn std::error::Error,
				account = %account.id,
				"role list fetch failed, preserving roles"
			);
			summary.skipped += 1;
			return;
		}
	};

	match reconciler.reconcile(account.id, &member_roles, &guild_roles) {
		Ok(_) => summary.synced += 1,
		Err(error) => {
			tracing::warn!(%error, account = %account.id, "reconciliation failed");
			summary.skipped += 1;
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use twilight_model::id::Id;

	use super::{run, SweepSummary};
	use crate::{account::AccountStore, memory::MemoryStore, testutil};

	fn owned(slugs: &[&str]) -> BTreeSet<String> {
		slugs.iter().map(|&s| s.to_owned()).collect()
	}

	#[tokio::test]
	async fn mirrors_member_roles() {
		let store = MemoryStore::new();
		let account = testutil::linked_account(&store, 42);
		store.set_roles(account, owned(&["moderator"])).unwrap();

		let mut directory = testutil::StubDirectory::default();
		directory.roles = vec![testutil::role(1, "Member"), testutil::role(2, "Moderator")];
		directory
			.members
			.insert(Id::new(42), vec![Id::new(1), Id::new(2)]);

		let summary = run(&directory, &store).await;

		assert_eq!(
			summary,
			SweepSummary {
				synced: 1,
				demoted: 0,
				skipped: 0
			}
		);
		assert_eq!(
			store.get(account).unwrap().roles,
			owned(&["member", "moderator"])
		);
	}

	#[tokio::test]
	async fn departed_member_becomes_inactive() {
		let store = MemoryStore::new();
		let account = testutil::linked_account(&store, 42);
		store.set_roles(account, owned(&["moderator"])).unwrap();

		let mut directory = testutil::StubDirectory::default();
		directory.roles = vec![testutil::role(2, "Moderator")];
		// no members entry: lookup answers Absent

		let summary = run(&directory, &store).await;

		assert_eq!(summary.demoted, 1);
		assert_eq!(store.get(account).unwrap().roles, owned(&["inactive"]));
	}

	#[tokio::test]
	async fn outage_preserves_roles() {
		let store = MemoryStore::new();
		let account = testutil::linked_account(&store, 42);
		store.set_roles(account, owned(&["moderator"])).unwrap();

		let summary = run(&testutil::StubDirectory::down(), &store).await;

		assert_eq!(summary.skipped, 1);
		assert_eq!(summary.demoted, 0);
		assert_eq!(store.get(account).unwrap().roles, owned(&["moderator"]));
	}

	#[tokio::test]
	async fn role_list_outage_also_preserves() {
		// membership succeeds, the second round-trip does not
		let store = MemoryStore::new();
		let account = testutil::linked_account(&store, 42);
		store.set_roles(account, owned(&["moderator"])).unwrap();

		let mut directory = testutil::StubDirectory::default();
		directory.members.insert(Id::new(42), vec![Id::new(2)]);
		directory.roles_down = true;

		let summary = run(&directory, &store).await;

		assert_eq!(summary.skipped, 1);
		assert_eq!(store.get(account).unwrap().roles, owned(&["moderator"]));
	}

	#[tokio::test]
	async fn unconfigured_directory_changes_nothing() {
		let store = MemoryStore::new();
		let account = testutil::linked_account(&store, 42);
		store.set_roles(account, owned(&["moderator"])).unwrap();

		let summary = run(&testutil::StubDirectory::unconfigured(), &store).await;

		assert_eq!(summary.skipped, 1);
		assert_eq!(store.get(account).unwrap().roles, owned(&["moderator"]));
	}

	#[tokio::test]
	async fn unlinked_accounts_are_not_visited() {
		let store = MemoryStore::new();
		store.create(crate::account::NewAccount {
			username: "local-only".to_owned(),
			email: "local@example.com".to_owned(),
			password: "pw".to_owned(),
		});

		let summary = run(&testutil::StubDirectory::default(), &store).await;

		assert_eq!(summary, SweepSummary::default());
	}
}
