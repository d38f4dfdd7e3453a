use chrono::{DateTime, Utc};
use reclaim_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Description reported for snapshots created without one.
pub const SNAPSHOT_DESCRIPTION_PLACEHOLDER: &str = "No description";

/// Point-in-time snapshot as read from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    snapshot_id: NonEmptyString,
    origin_volume_id: Option<String>,
    started_at: DateTime<Utc>,
    description: Option<String>,
}

impl SnapshotRecord {
    /// Creates a validated snapshot record.
    ///
    /// Blank origin volume ids and descriptions are normalized to absent.
    pub fn new(
        snapshot_id: impl Into<String>,
        origin_volume_id: Option<String>,
        started_at: DateTime<Utc>,
        description: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            snapshot_id: NonEmptyString::new(snapshot_id)?,
            origin_volume_id: origin_volume_id.filter(|value| !value.trim().is_empty()),
            started_at,
            description: description.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Returns the snapshot identifier.
    #[must_use]
    pub fn snapshot_id(&self) -> &str {
        self.snapshot_id.as_str()
    }

    /// Returns the volume this snapshot was taken from, if still recorded.
    #[must_use]
    pub fn origin_volume_id(&self) -> Option<&str> {
        self.origin_volume_id.as_deref()
    }

    /// Returns the instant the snapshot was started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the description or the placeholder.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or(SNAPSHOT_DESCRIPTION_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{SNAPSHOT_DESCRIPTION_PLACEHOLDER, SnapshotRecord};

    #[test]
    fn blank_origin_volume_is_treated_as_orphaned() {
        let snapshot = SnapshotRecord::new("snap-1", Some(String::new()), Utc::now(), None);
        assert!(snapshot.is_ok());
        let snapshot = snapshot.unwrap_or_else(|_| unreachable!());
        assert_eq!(snapshot.origin_volume_id(), None);
        assert_eq!(snapshot.description(), SNAPSHOT_DESCRIPTION_PLACEHOLDER);
    }

    #[test]
    fn snapshot_keeps_description_when_present() {
        let snapshot = SnapshotRecord::new(
            "snap-2",
            Some("vol-1".to_owned()),
            Utc::now(),
            Some("nightly backup".to_owned()),
        );
        assert!(snapshot.is_ok());
        let snapshot = snapshot.unwrap_or_else(|_| unreachable!());
        assert_eq!(snapshot.origin_volume_id(), Some("vol-1"));
        assert_eq!(snapshot.description(), "nightly backup");
    }

    #[test]
    fn snapshot_requires_identifier() {
        assert!(SnapshotRecord::new("", None, Utc::now(), None).is_err());
    }
}
