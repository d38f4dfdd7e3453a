use super::*;

impl CleanupEngine {
    /// Lists owned snapshots past the retention window whose origin volume is
    /// gone or detached.
    ///
    /// The age check runs before the per-snapshot origin lookup. A lookup
    /// failure other than not-found aborts discovery.
    pub async fn list_expired_snapshots(
        &self,
        config: RetentionConfig,
        now: DateTime<Utc>,
    ) -> AppResult<ExpiredResources<ExpiredSnapshot>> {
        let mut cursor = PageCursor::default();
        let mut resources = Vec::new();
        let mut scanned = 0_u32;

        while let Some(next_token) = cursor.next_request() {
            let page = self
                .provider
                .list_owned_snapshots_page(next_token)
                .await
                .map_err(|error| {
                    error!(error = %error, "failed to list snapshots");
                    error
                })?;

            for snapshot in cursor.accept(page) {
                scanned = scanned.saturating_add(1);

                let age_days = age_in_days(snapshot.started_at(), now);
                if !is_expired(age_days, config) {
                    continue;
                }

                if self.is_orphaned_or_unused(&snapshot).await? {
                    resources.push(ExpiredSnapshot {
                        record: snapshot,
                        age_days,
                    });
                }
            }
        }

        info!(
            scanned,
            eligible = resources.len(),
            pages = cursor.pages(),
            retention = %config,
            "found snapshots to delete"
        );

        Ok(ExpiredResources { resources, scanned })
    }

    /// Returns true when the snapshot's origin volume is absent, deleted, or
    /// detached.
    pub async fn is_orphaned_or_unused(&self, snapshot: &SnapshotRecord) -> AppResult<bool> {
        let snapshot_id = snapshot.snapshot_id();
        let Some(volume_id) = snapshot.origin_volume_id() else {
            info!(snapshot_id, "snapshot has no origin volume");
            return Ok(true);
        };

        match self.provider.get_volume_status(volume_id).await {
            Ok(status) => Ok(status.is_available()),
            Err(AppError::NotFound(_)) => {
                info!(snapshot_id, volume_id, "origin volume not found for snapshot");
                Ok(true)
            }
            Err(error) => {
                error!(
                    snapshot_id,
                    volume_id,
                    error = %error,
                    "failed to look up origin volume for snapshot"
                );
                Err(error)
            }
        }
    }

    /// Deletes each snapshot independently. Snapshots still in use are
    /// skipped rather than counted as failures.
    pub async fn delete_snapshots(&self, snapshots: &[ExpiredSnapshot]) -> DeletionSummary {
        let mut summary = DeletionSummary::default();

        for snapshot in snapshots {
            let outcome = self.delete_snapshot(snapshot).await;
            summary.record(&outcome);
        }

        summary
    }

    async fn delete_snapshot(&self, snapshot: &ExpiredSnapshot) -> DeletionOutcome {
        let snapshot_id = snapshot.record.snapshot_id();

        match self.provider.delete_snapshot(snapshot_id).await {
            Ok(()) => {
                info!(
                    snapshot_id,
                    age_days = snapshot.age_days,
                    description = snapshot.record.description(),
                    "deleted snapshot"
                );
                DeletionOutcome::Deleted
            }
            Err(AppError::Conflict(reason)) => {
                warn!(snapshot_id, reason = %reason, "snapshot is in use, skipping deletion");
                DeletionOutcome::Skipped(reason)
            }
            Err(error) => {
                warn!(snapshot_id, error = %error, "failed to delete snapshot");
                DeletionOutcome::Failed(error.to_string())
            }
        }
    }
}
