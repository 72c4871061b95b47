use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use ecr_audit_core::{AppError, AppResult};
use ecr_audit_domain::{
    ClusterTarget, ComplianceStatus, DEFAULT_MAX_IMAGE_AGE_DAYS, FindingsScope, ImageRef,
    PolicyMode,
};

use crate::audit_ports::{Clock, RegistryGateway, VulnerabilityGateway};
use crate::gateway_call::{DEFAULT_CALL_TIMEOUT, bounded};

/// Classifies images as passing or failing their cluster's compliance policy.
#[derive(Clone)]
pub struct ComplianceEvaluator {
    registry: Arc<dyn RegistryGateway>,
    vulnerabilities: Arc<dyn VulnerabilityGateway>,
    clock: Arc<dyn Clock>,
    max_image_age_days: i64,
    call_timeout: Duration,
}

impl ComplianceEvaluator {
    /// Creates an evaluator with the default 90-day recency window.
    #[must_use]
    pub fn new(
        registry: Arc<dyn RegistryGateway>,
        vulnerabilities: Arc<dyn VulnerabilityGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            vulnerabilities,
            clock,
            max_image_age_days: DEFAULT_MAX_IMAGE_AGE_DAYS,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Overrides the number of whole days an image may age before it fails.
    #[must_use]
    pub fn with_max_image_age_days(mut self, max_image_age_days: i64) -> Self {
        self.max_image_age_days = max_image_age_days;
        self
    }

    /// Overrides the per-call gateway timeout.
    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Evaluates one image under its cluster's policy.
    ///
    /// Any registry or scanner failure is returned as `LookupFailure`.
    pub async fn evaluate(
        &self,
        image: &ImageRef,
        cluster: &ClusterTarget,
    ) -> AppResult<ComplianceStatus> {
        match cluster.policy() {
            PolicyMode::Scan => self.evaluate_scan(image, cluster).await,
            PolicyMode::Recency => {
                let pushed_at = self.push_instant(image, cluster).await?;
                Ok(self.evaluate_recency(pushed_at))
            }
        }
    }

    /// Evaluates one image whose push instant is already known, so the recency
    /// policy does not query the registry a second time.
    pub async fn evaluate_with_push_instant(
        &self,
        image: &ImageRef,
        cluster: &ClusterTarget,
        pushed_at: DateTime<Utc>,
    ) -> AppResult<ComplianceStatus> {
        match cluster.policy() {
            PolicyMode::Scan => self.evaluate_scan(image, cluster).await,
            PolicyMode::Recency => Ok(self.evaluate_recency(pushed_at)),
        }
    }

    /// Fetches the push instant of an image in the cluster's region.
    pub async fn push_instant(
        &self,
        image: &ImageRef,
        cluster: &ClusterTarget,
    ) -> AppResult<DateTime<Utc>> {
        bounded(
            self.call_timeout,
            "registry image lookup",
            self.registry.push_instant(image, cluster.region()),
        )
        .await
        .map_err(|error| AppError::lookup_failure(image.to_string(), error))
    }

    async fn evaluate_scan(
        &self,
        image: &ImageRef,
        cluster: &ClusterTarget,
    ) -> AppResult<ComplianceStatus> {
        let scoped_image = match cluster.findings_scope() {
            FindingsScope::Cluster => None,
            FindingsScope::Image => Some(image),
        };

        let findings = bounded(
            self.call_timeout,
            "vulnerability findings lookup",
            self.vulnerabilities.list_findings(cluster, scoped_image),
        )
        .await
        .map_err(|error| AppError::lookup_failure(image.to_string(), error))?;

        Ok(ComplianceStatus::from_findings(&findings))
    }

    fn evaluate_recency(&self, pushed_at: DateTime<Utc>) -> ComplianceStatus {
        ComplianceStatus::from_image_age(pushed_at, self.clock.now(), self.max_image_age_days)
    }
}
