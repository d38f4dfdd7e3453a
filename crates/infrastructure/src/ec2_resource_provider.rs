//! EC2 implementation of the resource provider port.
//!
//! Uses the AWS SDK standard credential chain (environment, profile,
//! instance/task role). Retries and timeouts are left to the SDK defaults.

use std::collections::BTreeSet;

use async_trait::async_trait;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ec2::types::Filter;
use reclaim_application::{ResourcePage, ResourceProvider};
use reclaim_core::{AppError, AppResult};
use reclaim_domain::{SnapshotRecord, VolumeRecord, VolumeStatus};
use tracing::debug;

mod conversions;

use conversions::{
    instance_ids_from_sdk, snapshot_from_sdk, volume_from_sdk, volume_status_from_sdk,
};

const VOLUME_NOT_FOUND_CODE: &str = "InvalidVolume.NotFound";
const SNAPSHOT_NOT_FOUND_CODE: &str = "InvalidSnapshot.NotFound";
const SNAPSHOT_IN_USE_CODE: &str = "InvalidSnapshot.InUse";

/// Connection settings for the EC2 adapter.
#[derive(Debug, Clone, Default)]
pub struct Ec2ProviderConfig {
    /// Region override; the SDK's region chain applies when absent.
    pub region: Option<String>,
    /// Endpoint override, e.g. a localstack URL.
    pub endpoint_url: Option<String>,
}

/// Resource provider backed by the EC2 control-plane API.
pub struct Ec2ResourceProvider {
    client: Client,
}

impl Ec2ResourceProvider {
    /// Loads SDK configuration and builds a client.
    pub async fn connect(config: Ec2ProviderConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = config.region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let sdk_config = loader.load().await;

        let mut ec2_config = aws_sdk_ec2::config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = config.endpoint_url {
            ec2_config = ec2_config.endpoint_url(endpoint_url);
        }

        Self::from_client(Client::from_conf(ec2_config.build()))
    }

    /// Wraps an already configured client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceProvider for Ec2ResourceProvider {
    async fn list_volumes_page(
        &self,
        status: &VolumeStatus,
        next_token: Option<String>,
    ) -> AppResult<ResourcePage<VolumeRecord>> {
        let output = self
            .client
            .describe_volumes()
            .filters(Filter::builder().name("status").values(status.as_str()).build())
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|error| classify_error("failed to describe volumes".to_owned(), error))?;

        let items = output
            .volumes()
            .iter()
            .map(volume_from_sdk)
            .collect::<AppResult<Vec<_>>>()?;
        debug!(count = items.len(), "described volume page");

        Ok(ResourcePage {
            items,
            next_token: output.next_token().map(str::to_owned),
        })
    }

    async fn list_owned_snapshots_page(
        &self,
        next_token: Option<String>,
    ) -> AppResult<ResourcePage<SnapshotRecord>> {
        let output = self
            .client
            .describe_snapshots()
            .owner_ids("self")
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|error| classify_error("failed to describe snapshots".to_owned(), error))?;

        let items = output
            .snapshots()
            .iter()
            .map(snapshot_from_sdk)
            .collect::<AppResult<Vec<_>>>()?;
        debug!(count = items.len(), "described snapshot page");

        Ok(ResourcePage {
            items,
            next_token: output.next_token().map(str::to_owned),
        })
    }

    async fn get_volume_status(&self, volume_id: &str) -> AppResult<VolumeStatus> {
        let output = self
            .client
            .describe_volumes()
            .volume_ids(volume_id)
            .send()
            .await
            .map_err(|error| {
                classify_error(format!("failed to describe volume '{volume_id}'"), error)
            })?;

        let volume = output.volumes().first().ok_or_else(|| {
            AppError::NotFound(format!("volume '{volume_id}' was not returned"))
        })?;

        volume_status_from_sdk(volume)
    }

    async fn delete_volume(&self, volume_id: &str) -> AppResult<()> {
        self.client
            .delete_volume()
            .volume_id(volume_id)
            .send()
            .await
            .map_err(|error| classify_error(format!("failed to delete volume '{volume_id}'"), error))?;

        Ok(())
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> AppResult<()> {
        self.client
            .delete_snapshot()
            .snapshot_id(snapshot_id)
            .send()
            .await
            .map_err(|error| {
                classify_error(format!("failed to delete snapshot '{snapshot_id}'"), error)
            })?;

        Ok(())
    }

    async fn list_running_instance_ids(&self) -> AppResult<BTreeSet<String>> {
        let mut pages = self
            .client
            .describe_instances()
            .filters(
                Filter::builder()
                    .name("instance-state-name")
                    .values("running")
                    .build(),
            )
            .into_paginator()
            .send();

        let mut instance_ids = BTreeSet::new();
        while let Some(page) = pages.next().await {
            let output = page.map_err(|error| {
                classify_error("failed to describe running instances".to_owned(), error)
            })?;
            instance_ids.extend(instance_ids_from_sdk(&output));
        }

        Ok(instance_ids)
    }
}

/// Maps EC2 error codes onto application error categories.
fn classify_error<E>(context: String, error: E) -> AppError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = error.code().map(str::to_owned);
    let message = format!("{context}: {}", DisplayErrorContext(&error));
    classify_error_code(code.as_deref(), message)
}

fn classify_error_code(code: Option<&str>, message: String) -> AppError {
    match code {
        Some(VOLUME_NOT_FOUND_CODE | SNAPSHOT_NOT_FOUND_CODE) => AppError::NotFound(message),
        Some(SNAPSHOT_IN_USE_CODE) => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}
