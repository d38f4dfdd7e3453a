use std::collections::BTreeSet;

use async_trait::async_trait;
use reclaim_core::AppResult;
use reclaim_domain::{SnapshotRecord, VolumeRecord, VolumeStatus};

/// One page of a provider listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePage<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Continuation token for the next page, absent on the last page.
    pub next_token: Option<String>,
}

impl<T> ResourcePage<T> {
    /// Creates the final page of a listing.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

/// Control-plane access to one account/region's block storage.
///
/// Adapters classify failures onto [`reclaim_core::AppError`]:
/// `NotFound` for missing resources and `Conflict` for resources that are
/// still in use. Everything else is reported as `Internal`.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Lists one page of volumes in the given state, filtered server-side.
    async fn list_volumes_page(
        &self,
        status: &VolumeStatus,
        next_token: Option<String>,
    ) -> AppResult<ResourcePage<VolumeRecord>>;

    /// Lists one page of snapshots owned by the calling account.
    async fn list_owned_snapshots_page(
        &self,
        next_token: Option<String>,
    ) -> AppResult<ResourcePage<SnapshotRecord>>;

    /// Returns the current state of one volume, or `NotFound`.
    async fn get_volume_status(&self, volume_id: &str) -> AppResult<VolumeStatus>;

    /// Deletes one volume.
    async fn delete_volume(&self, volume_id: &str) -> AppResult<()>;

    /// Deletes one snapshot. Returns `Conflict` when the snapshot is in use.
    async fn delete_snapshot(&self, snapshot_id: &str) -> AppResult<()>;

    /// Lists ids of instances currently running in the account.
    async fn list_running_instance_ids(&self) -> AppResult<BTreeSet<String>>;
}
