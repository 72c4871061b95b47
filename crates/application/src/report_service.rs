//! Cluster → service → image audit traversal and report assembly.
//!
//! Rows are emitted in strict (cluster, service, image) listing order. Lookup
//! failures scoped to a service or image skip the affected rows and are logged
//! as warnings; a cluster whose services cannot be listed becomes an
//! unavailable section while the remaining clusters are still audited.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use ecr_audit_core::{AppError, AppResult};
use ecr_audit_domain::{AuditRow, ClusterTarget, ImageRef, OwningTeam, ServiceId};

use crate::audit_ports::OrchestrationGateway;
use crate::compliance_service::ComplianceEvaluator;
use crate::gateway_call::{DEFAULT_CALL_TIMEOUT, bounded};

mod markdown;
mod report;

pub use markdown::REPORT_TITLE;
pub use report::{AuditReport, ClusterSection, ClusterSectionOutcome, SkippedRow};

/// Builds the image audit report for a list of clusters.
#[derive(Clone)]
pub struct ReportService {
    orchestration: Arc<dyn OrchestrationGateway>,
    evaluator: ComplianceEvaluator,
    call_timeout: Duration,
    max_concurrency: usize,
}

#[derive(Default)]
struct ServiceAudit {
    rows: Vec<AuditRow>,
    skipped: Vec<SkippedRow>,
}

impl ServiceAudit {
    fn skip(
        &mut self,
        cluster: &ClusterTarget,
        service: &ServiceId,
        image: Option<&str>,
        error: &AppError,
    ) {
        warn!(
            cluster = %cluster.name(),
            service = %service,
            image = image.unwrap_or("-"),
            error = %error,
            "skipping audit row"
        );
        self.skipped.push(SkippedRow {
            service: service.clone(),
            image: image.map(str::to_owned),
            reason: error.to_string(),
        });
    }
}

impl ReportService {
    /// Creates a sequential report service.
    #[must_use]
    pub fn new(
        orchestration: Arc<dyn OrchestrationGateway>,
        evaluator: ComplianceEvaluator,
    ) -> Self {
        Self {
            orchestration,
            evaluator,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            max_concurrency: 1,
        }
    }

    /// Overrides the per-call timeout for orchestration lookups.
    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Audits up to `max_concurrency` services of a cluster at once.
    ///
    /// Row order in the report is unaffected.
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Audits every cluster in order and collects one section per cluster.
    pub async fn build_report(&self, clusters: &[ClusterTarget]) -> AuditReport {
        let mut sections = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            sections.push(self.audit_cluster(cluster).await);
        }

        AuditReport::new(sections)
    }

    async fn audit_cluster(&self, cluster: &ClusterTarget) -> ClusterSection {
        let services = match bounded(
            self.call_timeout,
            "service listing",
            self.orchestration.list_services(cluster),
        )
        .await
        {
            Ok(services) => services,
            Err(error) => {
                error!(
                    cluster = %cluster.name(),
                    region = %cluster.region(),
                    error = %error,
                    "failed to list cluster services"
                );
                return ClusterSection::new(
                    cluster.name(),
                    ClusterSectionOutcome::Unavailable {
                        reason: error.to_string(),
                    },
                );
            }
        };

        let service_audits = if self.max_concurrency > 1 && services.len() > 1 {
            self.audit_services_concurrently(cluster, services).await
        } else {
            let mut audits = Vec::with_capacity(services.len());
            for service in &services {
                audits.push(self.audit_service(cluster, service).await);
            }
            audits
        };

        let mut rows = Vec::new();
        let mut skipped = Vec::new();
        for audit in service_audits {
            rows.extend(audit.rows);
            skipped.extend(audit.skipped);
        }

        info!(
            cluster = %cluster.name(),
            region = %cluster.region(),
            policy = cluster.policy().as_str(),
            rows = rows.len(),
            skipped = skipped.len(),
            "cluster audited"
        );

        ClusterSection::new(
            cluster.name(),
            ClusterSectionOutcome::Audited { rows, skipped },
        )
    }

    async fn audit_services_concurrently(
        &self,
        cluster: &ClusterTarget,
        services: Vec<ServiceId>,
    ) -> Vec<ServiceAudit> {
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(services.len());

        for service in services {
            let report_service = self.clone();
            let cluster = cluster.clone();
            let permits = permits.clone();
            let task_service = service.clone();
            let handle = tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    let mut audit = ServiceAudit::default();
                    audit.skip(
                        &cluster,
                        &task_service,
                        None,
                        &AppError::Internal("audit permits closed".to_owned()),
                    );
                    return audit;
                };
                report_service.audit_service(&cluster, &task_service).await
            });
            handles.push((service, handle));
        }

        // Awaiting handles in spawn order keeps listing order regardless of
        // completion order.
        let mut audits = Vec::with_capacity(handles.len());
        for (service, handle) in handles {
            match handle.await {
                Ok(audit) => audits.push(audit),
                Err(join_error) => {
                    let mut audit = ServiceAudit::default();
                    audit.skip(
                        cluster,
                        &service,
                        None,
                        &AppError::Internal(format!("service audit task failed: {join_error}")),
                    );
                    audits.push(audit);
                }
            }
        }

        audits
    }

    async fn audit_service(&self, cluster: &ClusterTarget, service: &ServiceId) -> ServiceAudit {
        let mut audit = ServiceAudit::default();

        let images = match bounded(
            self.call_timeout,
            "task definition lookup",
            self.orchestration.container_images(cluster, service),
        )
        .await
        {
            Ok(images) => images,
            Err(error) => {
                let error = AppError::lookup_failure(service.as_str(), error);
                audit.skip(cluster, service, None, &error);
                return audit;
            }
        };

        if images.is_empty() {
            return audit;
        }

        let team = match self.owning_team(cluster, service).await {
            Ok(team) => team,
            Err(error) => {
                for image in &images {
                    audit.skip(cluster, service, Some(image.as_str()), &error);
                }
                return audit;
            }
        };

        for raw_image in &images {
            match self.audit_image(cluster, service, &team, raw_image).await {
                Ok(row) => audit.rows.push(row),
                Err(error) => audit.skip(cluster, service, Some(raw_image.as_str()), &error),
            }
        }

        audit
    }

    async fn owning_team(
        &self,
        cluster: &ClusterTarget,
        service: &ServiceId,
    ) -> AppResult<OwningTeam> {
        bounded(
            self.call_timeout,
            "service tag lookup",
            self.orchestration.owning_team(cluster, service),
        )
        .await
        .map_err(|error| AppError::lookup_failure(service.as_str(), error))
    }

    async fn audit_image(
        &self,
        cluster: &ClusterTarget,
        service: &ServiceId,
        team: &OwningTeam,
        raw_image: &str,
    ) -> AppResult<AuditRow> {
        let image = ImageRef::parse(raw_image)?;
        let pushed_at = self.evaluator.push_instant(&image, cluster).await?;
        let status = self
            .evaluator
            .evaluate_with_push_instant(&image, cluster, pushed_at)
            .await?;

        debug!(
            cluster = %cluster.name(),
            service = %service,
            image = %image,
            policy = cluster.policy().as_str(),
            status = status.symbol(),
            "image evaluated"
        );

        Ok(AuditRow::new(
            image,
            pushed_at,
            service.clone(),
            team.clone(),
            status,
        ))
    }
}
