//! Reclaim cleanup worker runtime.
//!
//! Runs one retention pass per invocation and exits.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;

use reclaim_application::{CleanupEngine, CleanupRunSummary, ResourceProvider};
use reclaim_core::{AppError, AppResult};
use reclaim_domain::RetentionConfig;
use reclaim_infrastructure::{
    Ec2ProviderConfig, Ec2ResourceProvider, InMemoryAccountFixture, InMemoryResourceProvider,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProviderKind {
    Ec2,
    Memory,
}

impl ProviderKind {
    fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ec2" => Ok(Self::Ec2),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Validation(format!(
                "unknown RECLAIM_PROVIDER value '{other}', expected 'ec2' or 'memory'"
            ))),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Ec2 => "ec2",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
struct WorkerConfig {
    provider: ProviderKind,
    region: Option<String>,
    endpoint_url: Option<String>,
    memory_fixture_path: Option<String>,
    event_payload: String,
}

/// Invocation payload accepted from the scheduler.
#[derive(Debug, Default, Deserialize)]
struct CleanupInvocation {
    #[serde(default)]
    retention_days: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvocationResponse {
    status_code: u16,
    body: String,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load(env::args().nth(1))?;
    let invocation = CleanupInvocation::parse(config.event_payload.as_str())?;
    let retention = invocation.retention_config();
    let provider = build_provider(&config).await?;

    info!(
        provider = config.provider.as_str(),
        region = config.region.as_deref().unwrap_or("<sdk default>"),
        retention = %retention,
        "reclaim-worker started"
    );

    match CleanupEngine::new(provider).run(retention).await {
        Ok(summary) => {
            let response = InvocationResponse::success(&summary);
            let rendered = serde_json::to_string(&response).map_err(|error| {
                AppError::Internal(format!("failed to render invocation response: {error}"))
            })?;
            println!("{rendered}");
            Ok(())
        }
        Err(run_error) => {
            if let Some(volumes) = run_error.completed_volumes {
                info!(
                    volumes_processed = volumes.eligible,
                    volumes_deleted = volumes.deleted,
                    volumes_failed = volumes.failed,
                    "volume cleanup completed before failure"
                );
            }
            error!(
                resource_kind = %run_error.resource_kind,
                error = %run_error.source,
                "error in cleanup execution"
            );
            Err(run_error.into())
        }
    }
}

async fn build_provider(config: &WorkerConfig) -> AppResult<Arc<dyn ResourceProvider>> {
    match config.provider {
        ProviderKind::Ec2 => {
            let provider = Ec2ResourceProvider::connect(Ec2ProviderConfig {
                region: config.region.clone(),
                endpoint_url: config.endpoint_url.clone(),
            })
            .await;
            Ok(Arc::new(provider))
        }
        ProviderKind::Memory => {
            let fixture = match config.memory_fixture_path.as_deref() {
                Some(path) => {
                    let contents = tokio::fs::read_to_string(path).await.map_err(|error| {
                        AppError::Validation(format!(
                            "failed to read RECLAIM_MEMORY_FIXTURE '{path}': {error}"
                        ))
                    })?;
                    InMemoryAccountFixture::from_json(contents.as_str())?
                }
                None => InMemoryAccountFixture::default(),
            };
            Ok(Arc::new(InMemoryResourceProvider::from_fixture(fixture)?))
        }
    }
}

impl CleanupInvocation {
    fn parse(payload: &str) -> AppResult<Self> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Ok(Self::default());
        }

        let value = serde_json::from_str::<Value>(payload).map_err(|error| {
            AppError::Validation(format!("invocation payload is not valid JSON: {error}"))
        })?;
        if !value.is_object() {
            return Err(AppError::Validation(
                "invocation payload must be a JSON object".to_owned(),
            ));
        }

        serde_json::from_value(value).map_err(|error| {
            AppError::Validation(format!("invalid invocation payload: {error}"))
        })
    }

    fn retention_config(&self) -> RetentionConfig {
        let retention = RetentionConfig::from_requested_days(self.retention_days);
        if retention == RetentionConfig::Unenforced {
            warn!(
                retention_days = ?self.retention_days,
                "retention_days <= 0 disables the retention check; every detached volume and unused snapshot is eligible"
            );
        }

        retention
    }
}

impl InvocationResponse {
    fn success(summary: &CleanupRunSummary) -> Self {
        Self {
            status_code: 200,
            body: summary.status_message(),
        }
    }
}

impl WorkerConfig {
    fn load(cli_event: Option<String>) -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok(), cli_event)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        cli_event: Option<String>,
    ) -> AppResult<Self> {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let provider = match non_blank("RECLAIM_PROVIDER") {
            Some(value) => ProviderKind::parse(value.as_str())?,
            None => ProviderKind::Ec2,
        };
        let region = non_blank("AWS_REGION");
        let endpoint_url = non_blank("RECLAIM_EC2_ENDPOINT_URL")
            .map(|value| value.trim_end_matches('/').to_owned());
        let memory_fixture_path = non_blank("RECLAIM_MEMORY_FIXTURE");
        let event_payload = cli_event
            .filter(|value| !value.trim().is_empty())
            .or_else(|| non_blank("RECLAIM_EVENT"))
            .unwrap_or_else(|| "{}".to_owned());

        if provider == ProviderKind::Ec2 && memory_fixture_path.is_some() {
            return Err(AppError::Validation(
                "RECLAIM_MEMORY_FIXTURE requires RECLAIM_PROVIDER=memory".to_owned(),
            ));
        }

        Ok(Self {
            provider,
            region,
            endpoint_url,
            memory_fixture_path,
            event_payload,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
