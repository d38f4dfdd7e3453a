use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reclaim_application::{ResourcePage, ResourceProvider};
use reclaim_core::{AppError, AppResult};
use reclaim_domain::{SnapshotRecord, VolumeRecord, VolumeStatus};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Volume entry in an account fixture.
#[derive(Debug, Clone, Deserialize)]
struct VolumeFixture {
    volume_id: String,
    #[serde(default)]
    size_gib: i32,
    created_at: DateTime<Utc>,
    status: String,
}

/// Snapshot entry in an account fixture.
#[derive(Debug, Clone, Deserialize)]
struct SnapshotFixture {
    snapshot_id: String,
    #[serde(default)]
    volume_id: Option<String>,
    started_at: DateTime<Utc>,
    #[serde(default)]
    description: Option<String>,
}

/// JSON description of a fake account used to seed the in-memory provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InMemoryAccountFixture {
    #[serde(default)]
    volumes: Vec<VolumeFixture>,
    #[serde(default)]
    snapshots: Vec<SnapshotFixture>,
    #[serde(default)]
    running_instance_ids: Vec<String>,
    #[serde(default)]
    in_use_snapshot_ids: Vec<String>,
    #[serde(default)]
    page_size: Option<usize>,
}

impl InMemoryAccountFixture {
    /// Parses a fixture document.
    pub fn from_json(value: &str) -> AppResult<Self> {
        serde_json::from_str(value).map_err(|error| {
            AppError::Validation(format!("invalid in-memory account fixture: {error}"))
        })
    }
}

/// In-memory account implementing the resource provider port.
///
/// Listings are served in id order and paginated with numeric offset tokens.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    page_size: usize,
    volumes: RwLock<BTreeMap<String, VolumeRecord>>,
    snapshots: RwLock<BTreeMap<String, SnapshotRecord>>,
    running_instance_ids: RwLock<BTreeSet<String>>,
    in_use_snapshot_ids: RwLock<BTreeSet<String>>,
    failing_volume_deletes: RwLock<BTreeSet<String>>,
    failing_volume_lookups: RwLock<BTreeSet<String>>,
}

impl InMemoryResourceProvider {
    /// Creates an empty account serving pages of at most `page_size` items.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Creates an account seeded from a fixture.
    pub fn from_fixture(fixture: InMemoryAccountFixture) -> AppResult<Self> {
        let provider = Self::new(fixture.page_size.unwrap_or(100));

        let mut volumes = BTreeMap::new();
        for volume in fixture.volumes {
            let record = VolumeRecord::new(
                volume.volume_id,
                volume.size_gib,
                volume.created_at,
                VolumeStatus::parse(volume.status.as_str()),
            )?;
            volumes.insert(record.volume_id().to_owned(), record);
        }

        let mut snapshots = BTreeMap::new();
        for snapshot in fixture.snapshots {
            let record = SnapshotRecord::new(
                snapshot.snapshot_id,
                snapshot.volume_id,
                snapshot.started_at,
                snapshot.description,
            )?;
            snapshots.insert(record.snapshot_id().to_owned(), record);
        }

        Ok(Self {
            volumes: RwLock::new(volumes),
            snapshots: RwLock::new(snapshots),
            running_instance_ids: RwLock::new(fixture.running_instance_ids.into_iter().collect()),
            in_use_snapshot_ids: RwLock::new(fixture.in_use_snapshot_ids.into_iter().collect()),
            ..provider
        })
    }

    /// Adds or replaces a volume.
    pub async fn insert_volume(&self, volume: VolumeRecord) {
        self.volumes
            .write()
            .await
            .insert(volume.volume_id().to_owned(), volume);
    }

    /// Adds or replaces a snapshot.
    pub async fn insert_snapshot(&self, snapshot: SnapshotRecord) {
        self.snapshots
            .write()
            .await
            .insert(snapshot.snapshot_id().to_owned(), snapshot);
    }

    /// Makes deletes of this snapshot report that it is in use.
    pub async fn mark_snapshot_in_use(&self, snapshot_id: &str) {
        self.in_use_snapshot_ids
            .write()
            .await
            .insert(snapshot_id.to_owned());
    }

    /// Makes deletes of this volume fail with an internal error.
    pub async fn fail_volume_delete(&self, volume_id: &str) {
        self.failing_volume_deletes
            .write()
            .await
            .insert(volume_id.to_owned());
    }

    /// Makes status lookups of this volume fail with an internal error.
    pub async fn fail_volume_lookup(&self, volume_id: &str) {
        self.failing_volume_lookups
            .write()
            .await
            .insert(volume_id.to_owned());
    }

    /// Returns ids of volumes still present.
    pub async fn volume_ids(&self) -> Vec<String> {
        self.volumes.read().await.keys().cloned().collect()
    }

    /// Returns ids of snapshots still present.
    pub async fn snapshot_ids(&self) -> Vec<String> {
        self.snapshots.read().await.keys().cloned().collect()
    }

    fn paginate<T: Clone>(
        &self,
        items: Vec<T>,
        next_token: Option<String>,
    ) -> AppResult<ResourcePage<T>> {
        let start = match next_token {
            Some(token) => token.parse::<usize>().map_err(|error| {
                AppError::Validation(format!("invalid pagination token '{token}': {error}"))
            })?,
            None => 0,
        };
        let start = start.min(items.len());
        let end = start.saturating_add(self.page_size.max(1)).min(items.len());
        let next_token = (end < items.len()).then(|| end.to_string());

        Ok(ResourcePage {
            items: items[start..end].to_vec(),
            next_token,
        })
    }
}

#[async_trait]
impl ResourceProvider for InMemoryResourceProvider {
    async fn list_volumes_page(
        &self,
        status: &VolumeStatus,
        next_token: Option<String>,
    ) -> AppResult<ResourcePage<VolumeRecord>> {
        let volumes: Vec<VolumeRecord> = self
            .volumes
            .read()
            .await
            .values()
            .filter(|volume| volume.status() == status)
            .cloned()
            .collect();

        self.paginate(volumes, next_token)
    }

    async fn list_owned_snapshots_page(
        &self,
        next_token: Option<String>,
    ) -> AppResult<ResourcePage<SnapshotRecord>> {
        let snapshots: Vec<SnapshotRecord> =
            self.snapshots.read().await.values().cloned().collect();

        self.paginate(snapshots, next_token)
    }

    async fn get_volume_status(&self, volume_id: &str) -> AppResult<VolumeStatus> {
        if self.failing_volume_lookups.read().await.contains(volume_id) {
            return Err(AppError::Internal(format!(
                "status lookup for volume '{volume_id}' failed"
            )));
        }

        self.volumes
            .read()
            .await
            .get(volume_id)
            .map(|volume| volume.status().clone())
            .ok_or_else(|| AppError::NotFound(format!("volume '{volume_id}' does not exist")))
    }

    async fn delete_volume(&self, volume_id: &str) -> AppResult<()> {
        if self.failing_volume_deletes.read().await.contains(volume_id) {
            return Err(AppError::Internal(format!(
                "delete of volume '{volume_id}' failed"
            )));
        }

        let mut volumes = self.volumes.write().await;
        match volumes.get(volume_id) {
            None => Err(AppError::NotFound(format!(
                "volume '{volume_id}' does not exist"
            ))),
            Some(volume) if !volume.status().is_available() => Err(AppError::Conflict(format!(
                "volume '{volume_id}' is {}",
                volume.status()
            ))),
            Some(_) => {
                volumes.remove(volume_id);
                Ok(())
            }
        }
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> AppResult<()> {
        if self.in_use_snapshot_ids.read().await.contains(snapshot_id) {
            return Err(AppError::Conflict(format!(
                "snapshot '{snapshot_id}' is currently in use"
            )));
        }

        self.snapshots
            .write()
            .await
            .remove(snapshot_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("snapshot '{snapshot_id}' does not exist")))
    }

    async fn list_running_instance_ids(&self) -> AppResult<BTreeSet<String>> {
        Ok(self.running_instance_ids.read().await.clone())
    }
}
