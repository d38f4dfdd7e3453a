use std::sync::Arc;

use chrono::{DateTime, Utc};
use reclaim_core::{AppError, AppResult};
use reclaim_domain::{
    RetentionConfig, SnapshotRecord, VolumeStatus, age_in_days, is_expired,
};
use tracing::{error, info, warn};

use crate::cleanup_ports::{
    CleanupRunError, CleanupRunSummary, DeletionOutcome, DeletionSummary, ExpiredResources,
    ExpiredSnapshot, ExpiredVolume, ResourceCleanupSummary, ResourceKind, ResourceProvider,
};

mod pagination;
mod run;
mod snapshots;
mod volumes;

use pagination::PageCursor;

/// Retention-driven cleanup of detached volumes and their snapshots.
///
/// Holds no state between runs; every run re-reads the account through the
/// injected provider.
#[derive(Clone)]
pub struct CleanupEngine {
    provider: Arc<dyn ResourceProvider>,
}

impl CleanupEngine {
    /// Creates a cleanup engine over one provider.
    #[must_use]
    pub fn new(provider: Arc<dyn ResourceProvider>) -> Self {
        Self { provider }
    }
}
