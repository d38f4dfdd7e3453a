use reclaim_core::AppError;
use reclaim_domain::{SnapshotRecord, VolumeRecord};
use thiserror::Error;

/// Resource class handled by one cleanup phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Block-storage volumes.
    Volume,
    /// Volume snapshots.
    Snapshot,
}

impl ResourceKind {
    /// Returns stable log value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Snapshot => "snapshot",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Volume that passed the retention policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredVolume {
    /// Volume as listed.
    pub record: VolumeRecord,
    /// Whole days since creation, measured at the run's sampled instant.
    pub age_days: i64,
}

/// Snapshot that passed the retention policy and origin-volume check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredSnapshot {
    /// Snapshot as listed.
    pub record: SnapshotRecord,
    /// Whole days since the snapshot started.
    pub age_days: i64,
}

/// Result of one discovery pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredResources<T> {
    /// Resources eligible for deletion, in listing order.
    pub resources: Vec<T>,
    /// Number of resources the provider returned.
    pub scanned: u32,
}

/// Outcome of one delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// Resource removed.
    Deleted,
    /// Resource left in place due to an expected transient condition.
    Skipped(String),
    /// Delete call failed.
    Failed(String),
}

/// Tally of one deletion batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionSummary {
    /// Delete calls issued.
    pub attempted: u32,
    /// Resources removed.
    pub deleted: u32,
    /// Hard failures.
    pub failed: u32,
    /// Soft skips.
    pub skipped: u32,
}

impl DeletionSummary {
    /// Adds one outcome to the tally.
    pub fn record(&mut self, outcome: &DeletionOutcome) {
        self.attempted = self.attempted.saturating_add(1);
        match outcome {
            DeletionOutcome::Deleted => self.deleted = self.deleted.saturating_add(1),
            DeletionOutcome::Skipped(_) => self.skipped = self.skipped.saturating_add(1),
            DeletionOutcome::Failed(_) => self.failed = self.failed.saturating_add(1),
        }
    }
}

/// Per-class result of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceCleanupSummary {
    /// Resources returned by the provider listing.
    pub scanned: u32,
    /// Resources that passed every eligibility check.
    pub eligible: u32,
    /// Resources removed.
    pub deleted: u32,
    /// Hard delete failures.
    pub failed: u32,
    /// Soft skips.
    pub skipped: u32,
}

impl ResourceCleanupSummary {
    /// Combines discovery and deletion tallies.
    #[must_use]
    pub fn new(scanned: u32, deletions: DeletionSummary) -> Self {
        Self {
            scanned,
            eligible: deletions.attempted,
            deleted: deletions.deleted,
            failed: deletions.failed,
            skipped: deletions.skipped,
        }
    }

    /// Resources kept because they did not pass the policy.
    #[must_use]
    pub fn excluded(&self) -> u32 {
        self.scanned.saturating_sub(self.eligible)
    }
}

/// Aggregate result of a full run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupRunSummary {
    /// Volume phase result.
    pub volumes: ResourceCleanupSummary,
    /// Snapshot phase result.
    pub snapshots: ResourceCleanupSummary,
}

impl CleanupRunSummary {
    /// Human-readable summary line reported to the invoker.
    #[must_use]
    pub fn status_message(&self) -> String {
        format!(
            "Successfully processed {} volumes and {} snapshots",
            self.volumes.eligible, self.snapshots.eligible
        )
    }

    /// Total hard delete failures across both phases.
    #[must_use]
    pub fn failed(&self) -> u32 {
        self.volumes.failed.saturating_add(self.snapshots.failed)
    }
}

/// Terminal failure of a run.
///
/// Raised when discovery for one resource class fails. Volume results are
/// attached when the volume phase had already completed.
#[derive(Debug, Error)]
#[error("{resource_kind} cleanup aborted: {source}")]
pub struct CleanupRunError {
    /// Phase that failed.
    pub resource_kind: ResourceKind,
    /// Volume phase result, when it finished before the failure.
    pub completed_volumes: Option<ResourceCleanupSummary>,
    /// Underlying provider or lookup error.
    #[source]
    pub source: AppError,
}

impl From<CleanupRunError> for AppError {
    fn from(value: CleanupRunError) -> Self {
        value.source
    }
}
