//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod retention;
mod snapshot;
mod volume;

pub use retention::{DEFAULT_RETENTION_DAYS, RetentionConfig, age_in_days, is_expired};
pub use snapshot::{SNAPSHOT_DESCRIPTION_PLACEHOLDER, SnapshotRecord};
pub use volume::{VolumeRecord, VolumeStatus};
