//! ECR image audit command line entry point.

#![forbid(unsafe_code)]

mod config;

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use ecr_audit_application::{ComplianceEvaluator, ReportService};
use ecr_audit_core::AppError;
use ecr_audit_infrastructure::{
    AwsClients, EcrRegistryGateway, EcsOrchestrationGateway, InspectorVulnerabilityGateway,
    SystemClock,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AuditConfig;

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AuditConfig::load()?;
    if config.clusters.is_empty() {
        warn!("no clusters configured; the report will be empty");
    }

    info!(
        clusters = config.clusters.len(),
        max_concurrency = config.max_concurrency,
        call_timeout_ms = u64::try_from(config.call_timeout.as_millis()).unwrap_or(u64::MAX),
        max_image_age_days = config.max_image_age_days,
        "ecr-audit started"
    );

    let report_service = build_report_service(&config).await;
    let report = report_service.build_report(&config.clusters).await;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.render_markdown().as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|error| AppError::Internal(format!("failed to write report: {error}")))?;

    info!(
        rows = report.row_count(),
        skipped = report.skipped_count(),
        "ecr-audit finished"
    );

    if report.has_unavailable_clusters() {
        warn!("one or more clusters could not be audited");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

async fn build_report_service(config: &AuditConfig) -> ReportService {
    let clients = Arc::new(AwsClients::load(config.regions()).await);
    let orchestration = Arc::new(EcsOrchestrationGateway::new(
        clients.clone(),
        config.team_tag_key.as_str(),
    ));
    let registry = Arc::new(EcrRegistryGateway::new(clients.clone()));
    let vulnerabilities = Arc::new(InspectorVulnerabilityGateway::new(clients));

    let evaluator = ComplianceEvaluator::new(registry, vulnerabilities, Arc::new(SystemClock))
        .with_max_image_age_days(config.max_image_age_days)
        .with_call_timeout(config.call_timeout);

    ReportService::new(orchestration, evaluator)
        .with_call_timeout(config.call_timeout)
        .with_max_concurrency(config.max_concurrency)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
