//! Admin actions on reports.

use thiserror::Error;

use crate::{
	account::{AccountStore, StoreError},
	reconcile::{Reconciler, BANNED},
	reports::{ReportError, ReportStatus, Reports},
};

#[derive(Debug, Error)]
pub enum ModerationError {
	#[error(transparent)]
	Report(#[from] ReportError),
	#[error(transparent)]
	Store(#[from] StoreError),
}

/// Closes reports, demoting the reported account when banning.
pub struct Moderation<'a> {
	reports: &'a Reports,
	store: &'a dyn AccountStore,
}

impl<'a> Moderation<'a> {
	pub const fn new(reports: &'a Reports, store: &'a dyn AccountStore) -> Self {
		Self { reports, store }
	}

	/// Close a report without consequences.
	pub fn resolve(&self, report: u64) -> Result<(), ModerationError> {
		self.reports.close(report, ReportStatus::Resolved)?;
		tracing::info!(report, "resolved report");
		Ok(())
	}

	/// Close a report and demote the reported account to the banned marker.
	///
	/// Local-only: no remote ban is issued.
	pub fn ban(&self, report: u64) -> Result<(), ModerationError> {
		let report = self.reports.close(report, ReportStatus::Banned)?;
		Reconciler::new(self.store).demote(report.reported, BANNED)?;
		tracing::info!(report = report.id, account = %report.reported, "banned reported account");
		Ok(())
	}
}
