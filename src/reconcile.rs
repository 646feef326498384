//! Overwrites local role assignments to mirror a remote role set.

use std::collections::BTreeSet;

use twilight_model::id::{marker::RoleMarker, Id};

use crate::{
	account::{AccountId, AccountStore, StoreError},
	directory::RemoteRole,
	slug,
};

/// Marker slug for accounts that are no longer guild members.
///
/// A positive signal, distinct from an account that simply has no roles.
pub const INACTIVE: &str = "inactive";

/// Marker slug applied by the moderation ban action.
pub const BANNED: &str = "banned";

/// Applies remote role sets to local accounts.
pub struct Reconciler<'a> {
	store: &'a dyn AccountStore,
}

impl<'a> Reconciler<'a> {
	pub const fn new(store: &'a dyn AccountStore) -> Self {
		Self { store }
	}

	/// Mirror a member's remote roles onto an account.
	///
	/// An empty `member_roles` means the member is gone from the guild: the
	/// account is demoted to exactly [`INACTIVE`]. Otherwise the assigned set
	/// is fully replaced by the slugs of the matching guild roles; roles
	/// granted outside this system are not preserved. The result lands in one
	/// [`AccountStore::set_roles`] call and is idempotent.
	///
	/// Failed remote fetches must not reach this function; callers skip the
	/// account instead so a transient outage never demotes anyone.
	pub fn reconcile(
		&self,
		account: AccountId,
		member_roles: &[Id<RoleMarker>],
		guild_roles: &[RemoteRole],
	) -> Result<BTreeSet<String>, StoreError> {
		if member_roles.is_empty() {
			return self.demote(account, INACTIVE);
		}

		let mut assigned = BTreeSet::new();
		for role in guild_roles
			.iter()
			.filter(|role| member_roles.contains(&role.id))
		{
			let slug = slug::slugify(&role.name);
			if slug.is_empty() {
				continue;
			}
			self.ensure_role(&slug, &role.name);
			assigned.insert(slug);
		}

		self.store.set_roles(account, assigned.clone())?;
		tracing::debug!(%account, roles = assigned.len(), "synced roles");
		Ok(assigned)
	}

	/// Replace an account's roles with a single marker role.
	///
	/// Shared by the inactive ("left the guild") and banned (moderation)
	/// paths.
	pub fn demote(&self, account: AccountId, marker: &str) -> Result<BTreeSet<String>, StoreError> {
		self.ensure_role(marker, &title_case(marker));
		let assigned = BTreeSet::from([marker.to_owned()]);
		self.store.set_roles(account, assigned.clone())?;
		tracing::info!(%account, role = marker, "demoted account");
		Ok(assigned)
	}

	/// Predefine every guild role locally, as done once at startup.
	pub fn ensure_guild_roles(&self, guild_roles: &[RemoteRole]) {
		for role in guild_roles {
			let slug = slug::slugify(&role.name);
			if slug.is_empty() {
				continue;
			}
			if self.store.role_name(&slug).is_none() {
				tracing::info!(role = %role.name, "created local role definition");
			}
			self.ensure_role(&slug, &role.name);
		}
	}

	fn ensure_role(&self, slug: &str, name: &str) {
		self.store.ensure_role(slug, name);
	}
}

fn title_case(slug: &str) -> String {
	let mut chars = slug.chars();
	chars.next().map_or_else(String::new, |first| {
		first.to_uppercase().chain(chars).collect()
	})
}
