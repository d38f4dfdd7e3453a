use aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput;
use aws_sdk_ec2::primitives::DateTime as SdkDateTime;
use aws_sdk_ec2::types::{Snapshot, Volume};
use chrono::{DateTime, Utc};
use reclaim_core::{AppError, AppResult};
use reclaim_domain::{SnapshotRecord, VolumeRecord, VolumeStatus};

pub(super) fn volume_from_sdk(volume: &Volume) -> AppResult<VolumeRecord> {
    let volume_id = volume.volume_id().ok_or_else(|| {
        AppError::Internal("describe volumes returned a volume without an id".to_owned())
    })?;
    let created_at = volume.create_time().ok_or_else(|| {
        AppError::Internal(format!("volume '{volume_id}' has no create time"))
    })?;

    VolumeRecord::new(
        volume_id,
        volume.size().unwrap_or_default(),
        timestamp_from_sdk(created_at, volume_id)?,
        volume_status_from_sdk(volume)?,
    )
}

pub(super) fn volume_status_from_sdk(volume: &Volume) -> AppResult<VolumeStatus> {
    volume
        .state()
        .map(|state| VolumeStatus::parse(state.as_str()))
        .ok_or_else(|| {
            AppError::Internal(format!(
                "volume '{}' has no state",
                volume.volume_id().unwrap_or("<unknown>")
            ))
        })
}

pub(super) fn snapshot_from_sdk(snapshot: &Snapshot) -> AppResult<SnapshotRecord> {
    let snapshot_id = snapshot.snapshot_id().ok_or_else(|| {
        AppError::Internal("describe snapshots returned a snapshot without an id".to_owned())
    })?;
    let started_at = snapshot.start_time().ok_or_else(|| {
        AppError::Internal(format!("snapshot '{snapshot_id}' has no start time"))
    })?;

    SnapshotRecord::new(
        snapshot_id,
        snapshot.volume_id().map(str::to_owned),
        timestamp_from_sdk(started_at, snapshot_id)?,
        snapshot.description().map(str::to_owned),
    )
}

/// Instance ids across every reservation in one describe-instances page.
pub(super) fn instance_ids_from_sdk(output: &DescribeInstancesOutput) -> Vec<String> {
    output
        .reservations()
        .iter()
        .flat_map(|reservation| reservation.instances())
        .filter_map(|instance| instance.instance_id())
        .map(str::to_owned)
        .collect()
}

fn timestamp_from_sdk(value: &SdkDateTime, resource_id: &str) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos()).ok_or_else(|| {
        AppError::Internal(format!(
            "resource '{resource_id}' has an out-of-range timestamp"
        ))
    })
}

#[cfg(test)]
mod tests {
    use aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput;
    use aws_sdk_ec2::primitives::DateTime as SdkDateTime;
    use aws_sdk_ec2::types::{Instance, Reservation, Snapshot, Volume, VolumeState};
    use reclaim_domain::VolumeStatus;

    use super::{instance_ids_from_sdk, snapshot_from_sdk, volume_from_sdk};

    #[test]
    fn volume_conversion_keeps_state_and_timestamp() {
        let volume = Volume::builder()
            .volume_id("vol-0abc")
            .size(100)
            .create_time(SdkDateTime::from_secs(1_700_000_000))
            .state(VolumeState::Available)
            .build();

        let record = volume_from_sdk(&volume);
        assert!(record.is_ok());
        let record = record.unwrap_or_else(|_| unreachable!());

        assert_eq!(record.volume_id(), "vol-0abc");
        assert_eq!(record.size_gib(), 100);
        assert_eq!(record.status(), &VolumeStatus::Available);
        assert_eq!(record.created_at().timestamp(), 1_700_000_000);
    }

    #[test]
    fn attached_volume_state_is_in_use() {
        let volume = Volume::builder()
            .volume_id("vol-0def")
            .create_time(SdkDateTime::from_secs(1_700_000_000))
            .state(VolumeState::InUse)
            .build();

        let record = volume_from_sdk(&volume);
        assert!(record.is_ok());
        assert_eq!(
            record.unwrap_or_else(|_| unreachable!()).status(),
            &VolumeStatus::InUse
        );
    }

    #[test]
    fn volume_without_create_time_is_rejected() {
        let volume = Volume::builder()
            .volume_id("vol-0abc")
            .state(VolumeState::Available)
            .build();

        assert!(volume_from_sdk(&volume).is_err());
    }

    #[test]
    fn snapshot_conversion_normalizes_missing_fields() {
        let snapshot = Snapshot::builder()
            .snapshot_id("snap-0abc")
            .start_time(SdkDateTime::from_secs(1_600_000_000))
            .volume_id("")
            .build();

        let record = snapshot_from_sdk(&snapshot);
        assert!(record.is_ok());
        let record = record.unwrap_or_else(|_| unreachable!());

        assert_eq!(record.snapshot_id(), "snap-0abc");
        assert_eq!(record.origin_volume_id(), None);
        assert_eq!(record.description(), "No description");
    }

    #[test]
    fn instance_ids_are_collected_across_reservations() {
        let output = DescribeInstancesOutput::builder()
            .reservations(
                Reservation::builder()
                    .instances(Instance::builder().instance_id("i-0aaa").build())
                    .instances(Instance::builder().build())
                    .build(),
            )
            .reservations(
                Reservation::builder()
                    .instances(Instance::builder().instance_id("i-0bbb").build())
                    .build(),
            )
            .build();

        assert_eq!(
            instance_ids_from_sdk(&output),
            vec!["i-0aaa".to_owned(), "i-0bbb".to_owned()]
        );
    }
}
