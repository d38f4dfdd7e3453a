use super::*;

impl CleanupEngine {
    /// Lists detached volumes past the retention window.
    ///
    /// Pages are filtered as they arrive. A listing failure aborts discovery;
    /// there is no partial-listing recovery.
    pub async fn list_expired_volumes(
        &self,
        config: RetentionConfig,
        now: DateTime<Utc>,
    ) -> AppResult<ExpiredResources<ExpiredVolume>> {
        let status_filter = VolumeStatus::Available;
        let mut cursor = PageCursor::default();
        let mut resources = Vec::new();
        let mut scanned = 0_u32;

        while let Some(next_token) = cursor.next_request() {
            let page = self
                .provider
                .list_volumes_page(&status_filter, next_token)
                .await
                .map_err(|error| {
                    error!(error = %error, "failed to list volumes");
                    error
                })?;

            for volume in cursor.accept(page) {
                scanned = scanned.saturating_add(1);

                if !volume.status().is_available() {
                    continue;
                }

                let age_days = age_in_days(volume.created_at(), now);
                if is_expired(age_days, config) {
                    resources.push(ExpiredVolume {
                        record: volume,
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
            "found unused volumes to delete"
        );

        Ok(ExpiredResources { resources, scanned })
    }

    /// Deletes each volume independently; one failure never stops the batch.
    pub async fn delete_volumes(&self, volumes: &[ExpiredVolume]) -> DeletionSummary {
        let mut summary = DeletionSummary::default();

        for volume in volumes {
            let outcome = self.delete_volume(volume).await;
            summary.record(&outcome);
        }

        summary
    }

    async fn delete_volume(&self, volume: &ExpiredVolume) -> DeletionOutcome {
        let volume_id = volume.record.volume_id();

        match self.provider.delete_volume(volume_id).await {
            Ok(()) => {
                info!(
                    volume_id,
                    size_gib = volume.record.size_gib(),
                    age_days = volume.age_days,
                    "deleted volume"
                );
                DeletionOutcome::Deleted
            }
            Err(error) => {
                warn!(volume_id, error = %error, "failed to delete volume");
                DeletionOutcome::Failed(error.to_string())
            }
        }
    }
}
