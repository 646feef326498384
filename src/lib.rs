//! Mirrors a Discord guild's roles and bans onto a local account directory.
//!
//! An identity arrives already verified (the OAuth exchange happens upstream)
//! and flows through an explicit pipeline: ban gate, account resolution, role
//! reconciliation, session. A background sweep re-runs reconciliation for
//! every linked account on an interval. The guild is always authoritative;
//! the local side only ever mirrors it.
//!
//! The account store is a trait seam ([`account::AccountStore`]) with an
//! in-memory reference implementation ([`memory::MemoryStore`]).

#![deny(clippy::inconsistent_struct_constructor)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]
#![warn(clippy::cargo, clippy::nursery, clippy::pedantic)]

pub mod account;
pub mod ban;
pub mod cli;
pub mod directory;
pub mod identity;
pub mod login;
pub mod memory;
pub mod moderation;
pub mod reconcile;
pub mod reports;
pub mod slug;
pub mod sweep;

#[cfg(test)]
mod testutil;
