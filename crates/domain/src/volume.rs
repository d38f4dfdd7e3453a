use chrono::{DateTime, Utc};
use reclaim_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Attachment state reported by the provider for one volume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum VolumeStatus {
    /// Detached and ready to attach. The only state eligible for cleanup.
    Available,
    /// Attached to an instance.
    InUse,
    /// Any other provider state (`creating`, `deleting`, `error`, ...).
    Other(String),
}

impl VolumeStatus {
    /// Returns stable provider value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "available",
            Self::InUse => "in-use",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Parses provider value. Unknown states are carried verbatim.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "available" => Self::Available,
            "in-use" => Self::InUse,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns true when the volume is detached.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::fmt::Display for VolumeStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<String> for VolumeStatus {
    fn from(value: String) -> Self {
        Self::parse(value.as_str())
    }
}

impl From<VolumeStatus> for String {
    fn from(value: VolumeStatus) -> Self {
        value.as_str().to_owned()
    }
}

/// Block-storage volume as read from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRecord {
    volume_id: NonEmptyString,
    size_gib: i32,
    created_at: DateTime<Utc>,
    status: VolumeStatus,
}

impl VolumeRecord {
    /// Creates a validated volume record.
    pub fn new(
        volume_id: impl Into<String>,
        size_gib: i32,
        created_at: DateTime<Utc>,
        status: VolumeStatus,
    ) -> AppResult<Self> {
        Ok(Self {
            volume_id: NonEmptyString::new(volume_id)?,
            size_gib,
            created_at,
            status,
        })
    }

    /// Returns the provider-unique volume identifier.
    #[must_use]
    pub fn volume_id(&self) -> &str {
        self.volume_id.as_str()
    }

    /// Returns the provisioned size in GiB.
    #[must_use]
    pub fn size_gib(&self) -> i32 {
        self.size_gib
    }

    /// Returns the creation instant.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the attachment state at listing time.
    #[must_use]
    pub fn status(&self) -> &VolumeStatus {
        &self.status
    }
}
