//! User reports: filed once, closed once, never deleted.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::account::AccountId;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportStatus {
	Open,
	/// Closed without consequences. Terminal.
	Resolved,
	/// Closed by demoting the reported account. Terminal.
	Banned,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Report {
	pub id: u64,
	pub reported: AccountId,
	pub reporter: AccountId,
	pub reason: String,
	pub status: ReportStatus,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ReportError {
	#[error("accounts cannot report themselves")]
	SelfReport,
	#[error("report {0} not found")]
	NotFound(u64),
	#[error("report {0} is already closed")]
	AlreadyClosed(u64),
}

/// The report table. Append plus a single status transition, nothing else.
#[derive(Default)]
pub struct Reports {
	inner: Mutex<Vec<Report>>,
}

impl Reports {
	pub fn new() -> Self {
		Self::default()
	}

	/// File a report against an account.
	///
	/// Repeated reports against the same target are not deduplicated.
	pub fn file(
		&self,
		reporter: AccountId,
		reported: AccountId,
		reason: impl Into<String>,
	) -> Result<u64, ReportError> {
		if reporter == reported {
			return Err(ReportError::SelfReport);
		}

		let mut reports = self.inner.lock().expect("not poisoned");
		let id = reports.len() as u64 + 1;
		reports.push(Report {
			id,
			reported,
			reporter,
			reason: reason.into(),
			status: ReportStatus::Open,
			created_at: Utc::now(),
		});
		tracing::info!(report = id, %reported, %reporter, "filed report");
		Ok(id)
	}

	/// All reports, newest first.
	pub fn list(&self) -> Vec<Report> {
		let reports = self.inner.lock().expect("not poisoned");
		reports.iter().rev().cloned().collect()
	}

	pub fn get(&self, id: u64) -> Option<Report> {
		let reports = self.inner.lock().expect("not poisoned");
		reports.iter().find(|report| report.id == id).cloned()
	}

	/// Transition an open report into a terminal status.
	pub(crate) fn close(&self, id: u64, status: ReportStatus) -> Result<Report, ReportError> {
		let mut reports = self.inner.lock().expect("not poisoned");
		let report = reports
			.iter_mut()
			.find(|report| report.id == id)
			.ok_or(ReportError::NotFound(id))?;

		if report.status != ReportStatus::Open {
			return Err(ReportError::AlreadyClosed(id));
		}
		report.status = status;
		Ok(report.clone())
	}
}
