mod execution;
mod provider;

pub use execution::{
    CleanupRunError, CleanupRunSummary, DeletionOutcome, DeletionSummary, ExpiredResources,
    ExpiredSnapshot, ExpiredVolume, ResourceCleanupSummary, ResourceKind,
};
pub use provider::{ResourcePage, ResourceProvider};
