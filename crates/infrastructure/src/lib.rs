//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod ec2_resource_provider;
mod in_memory_resource_provider;

pub use ec2_resource_provider::{Ec2ProviderConfig, Ec2ResourceProvider};
pub use in_memory_resource_provider::{InMemoryAccountFixture, InMemoryResourceProvider};
