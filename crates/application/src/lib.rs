//! Application services and ports.

#![forbid(unsafe_code)]

mod cleanup_ports;
mod cleanup_service;

pub use cleanup_ports::{
    CleanupRunError, CleanupRunSummary, DeletionOutcome, DeletionSummary, ExpiredResources,
    ExpiredSnapshot, ExpiredVolume, ResourceCleanupSummary, ResourceKind, ResourcePage,
    ResourceProvider,
};
pub use cleanup_service::CleanupEngine;
