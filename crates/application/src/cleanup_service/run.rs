use super::*;

impl CleanupEngine {
    /// Runs one full cleanup pass against the current wall clock.
    pub async fn run(
        &self,
        config: RetentionConfig,
    ) -> Result<CleanupRunSummary, CleanupRunError> {
        self.run_at(config, Utc::now()).await
    }

    /// Runs one full cleanup pass with a fixed evaluation instant.
    ///
    /// Volumes are discovered and deleted before snapshots are listed, so a
    /// snapshot whose origin volume was just removed resolves as not-found.
    pub async fn run_at(
        &self,
        config: RetentionConfig,
        now: DateTime<Utc>,
    ) -> Result<CleanupRunSummary, CleanupRunError> {
        info!(retention = %config, now = %now, "cleanup run started");
        self.log_running_instances().await;

        let expired_volumes = self
            .list_expired_volumes(config, now)
            .await
            .map_err(|source| CleanupRunError {
                resource_kind: ResourceKind::Volume,
                completed_volumes: None,
                source,
            })?;
        let volume_deletions = self.delete_volumes(&expired_volumes.resources).await;
        let volumes = ResourceCleanupSummary::new(expired_volumes.scanned, volume_deletions);

        info!(
            scanned = volumes.scanned,
            excluded = volumes.excluded(),
            deleted = volumes.deleted,
            failed = volumes.failed,
            "volume cleanup finished"
        );

        let expired_snapshots = self
            .list_expired_snapshots(config, now)
            .await
            .map_err(|source| CleanupRunError {
                resource_kind: ResourceKind::Snapshot,
                completed_volumes: Some(volumes),
                source,
            })?;
        let snapshot_deletions = self.delete_snapshots(&expired_snapshots.resources).await;
        let snapshots = ResourceCleanupSummary::new(expired_snapshots.scanned, snapshot_deletions);

        info!(
            scanned = snapshots.scanned,
            excluded = snapshots.excluded(),
            deleted = snapshots.deleted,
            failed = snapshots.failed,
            skipped = snapshots.skipped,
            "snapshot cleanup finished"
        );

        Ok(CleanupRunSummary { volumes, snapshots })
    }

    /// Logs the running-instance inventory. Informational only.
    async fn log_running_instances(&self) {
        match self.provider.list_running_instance_ids().await {
            Ok(instance_ids) => {
                info!(running_instances = instance_ids.len(), "found active instances");
            }
            Err(error) => {
                warn!(error = %error, "failed to list running instances");
            }
        }
    }
}
