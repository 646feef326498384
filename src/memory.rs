//! In-memory reference implementation of [`AccountStore`].

use std::{
	collections::{BTreeMap, BTreeSet},
	sync::Mutex,
};

use twilight_model::id::{marker::UserMarker, Id};

use crate::account::{AccountId, AccountStore, LocalAccount, NewAccount, RemoteBinding, StoreError};

/// Mutex-guarded account and role-definition tables.
pub struct MemoryStore {
	inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
	next_id: u64,
	accounts: BTreeMap<AccountId, Record>,
	/// Role definitions, slug to display name.
	roles: BTreeMap<String, String>,
}

struct Record {
	account: LocalAccount,
	/// Generated credential, kept but never read back by the engine.
	#[allow(dead_code)]
	password: String,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self {
			inner: Mutex::new(Inner::default()),
		}
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl Inner {
	fn record(&mut self, id: AccountId) -> Result<&mut Record, StoreError> {
		self.accounts.get_mut(&id).ok_or(StoreError::NotFound(id))
	}
}

impl AccountStore for MemoryStore {
	fn create(&self, new: NewAccount) -> AccountId {
		let mut inner = self.inner.lock().expect("not poisoned");
		inner.next_id += 1;
		let id = AccountId(inner.next_id);
		inner.accounts.insert(
			id,
			Record {
				account: LocalAccount {
					id,
					username: new.username,
					email: new.email,
					remote: None,
					roles: BTreeSet::new(),
					banned: false,
				},
				password: new.password,
			},
		);
		id
	}

	fn get(&self, id: AccountId) -> Option<LocalAccount> {
		let inner = self.inner.lock().expect("not poisoned");
		inner.accounts.get(&id).map(|record| record.account.clone())
	}

	fn find_by_remote_id(&self, remote: Id<UserMarker>) -> Option<LocalAccount> {
		let inner = self.inner.lock().expect("not poisoned");
		inner
			.accounts
			.values()
			.find(|record| {
				record
					.account
					.remote
					.as_ref()
					.is_some_and(|binding| binding.id == remote)
			})
			.map(|record| record.account.clone())
	}

	fn find_by_email(&self, email: &str) -> Option<LocalAccount> {
		let inner = self.inner.lock().expect("not poisoned");
		inner
			.accounts
			.values()
			.find(|record| record.account.email.eq_ignore_ascii_case(email))
			.map(|record| record.account.clone())
	}

	fn bind_remote(&self, id: AccountId, remote: RemoteBinding) -> Result<(), StoreError> {
		let mut inner = self.inner.lock().expect("not poisoned");
		inner.record(id)?.account.remote = Some(remote);
		Ok(())
	}

	fn set_roles(&self, id: AccountId, roles: BTreeSet<String>) -> Result<(), StoreError> {
		let mut inner = self.inner.lock().expect("not poisoned");
		inner.record(id)?.account.roles = roles;
		Ok(())
	}

	fn set_banned(&self, id: AccountId, banned: bool) -> Result<(), StoreError> {
		let mut inner = self.inner.lock().expect("not poisoned");
		inner.record(id)?.account.banned = banned;
		Ok(())
	}

	fn ensure_role(&self, slug: &str, name: &str) {
		let mut inner = self.inner.lock().expect("not poisoned");
		inner
			.roles
			.entry(slug.to_owned())
			.or_insert_with(|| name.to_owned());
	}

	fn role_name(&self, slug: &str) -> Option<String> {
		let inner = self.inner.lock().expect("not poisoned");
		inner.roles.get(slug).cloned()
	}

	fn linked_accounts(&self) -> Vec<LocalAccount> {
		let inner = self.inner.lock().expect("not poisoned");
		inner
			.accounts
			.values()
			.filter(|record| record.account.remote.is_some())
			.map(|record| record.account.clone())
			.collect()
	}
}
