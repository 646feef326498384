//! Local account records and the store they live in.
//!
//! The store is a collaborator seam: the engine only needs the handful of CRUD
//! operations below, so anything keyed by account id can back it. The crate
//! ships [`MemoryStore`] as the reference implementation.
//!
//! [`MemoryStore`]: crate::memory::MemoryStore

use std::{collections::BTreeSet, fmt};

use thiserror::Error;
use twilight_model::id::{marker::UserMarker, Id};

/// Identifier of a [`LocalAccount`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Remote identity metadata bound to an account.
///
/// Bound on first verification and refreshed on every later one. The bound id
/// is authoritative for resolution: address fallback only applies to accounts
/// without a binding for the incoming identity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteBinding {
	pub id: Id<UserMarker>,
	pub username: String,
	pub discriminator: Option<String>,
	pub avatar: Option<String>,
}

/// An account owned by the local system.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocalAccount {
	pub id: AccountId,
	pub username: String,
	pub email: String,
	pub remote: Option<RemoteBinding>,
	/// Assigned role slugs, mirrored from the guild by reconciliation.
	pub roles: BTreeSet<String>,
	pub banned: bool,
}

/// Data for creating an account.
#[derive(Clone, Debug)]
pub struct NewAccount {
	pub username: String,
	pub email: String,
	pub password: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("account {0} not found")]
	NotFound(AccountId),
}

/// Account storage operations the engine depends on.
pub trait AccountStore: Send + Sync {
	/// Create an account, returning its id.
	fn create(&self, new: NewAccount) -> AccountId;

	fn get(&self, id: AccountId) -> Option<LocalAccount>;

	fn find_by_remote_id(&self, remote: Id<UserMarker>) -> Option<LocalAccount>;

	/// Case-insensitive contact address lookup.
	fn find_by_email(&self, email: &str) -> Option<LocalAccount>;

	/// Bind (or refresh) the remote identity metadata of an account.
	fn bind_remote(&self, id: AccountId, remote: RemoteBinding) -> Result<(), StoreError>;

	/// Replace the assigned role set in one logical update.
	///
	/// Callers rely on this being atomic: a cleared-but-not-yet-reassigned
	/// state must never be observable.
	fn set_roles(&self, id: AccountId, roles: BTreeSet<String>) -> Result<(), StoreError>;

	fn set_banned(&self, id: AccountId, banned: bool) -> Result<(), StoreError>;

	/// Create a role definition unless the slug already has one.
	fn ensure_role(&self, slug: &str, name: &str);

	/// Display name of a role definition, if the slug is known.
	fn role_name(&self, slug: &str) -> Option<String>;

	/// Accounts bound to a remote identity, in id order.
	fn linked_accounts(&self) -> Vec<LocalAccount>;
}
