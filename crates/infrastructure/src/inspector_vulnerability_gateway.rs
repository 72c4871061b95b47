use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_inspector2::error::DisplayErrorContext;
use aws_sdk_inspector2::types::{FilterCriteria, StringComparison, StringFilter};
use ecr_audit_application::VulnerabilityGateway;
use ecr_audit_core::{AppError, AppResult};
use ecr_audit_domain::{ClusterTarget, Finding, ImageRef, Severity};
use tracing::debug;

use crate::AwsClients;

const ACTIVE_FINDING_STATUS: &str = "ACTIVE";

/// Inspector implementation of the vulnerability gateway.
///
/// Inspector has no notion of an ECS cluster, so cluster-scoped lookups return
/// every active finding of the cluster's region. Only the first result page is
/// read.
pub struct InspectorVulnerabilityGateway {
    clients: Arc<AwsClients>,
}

impl InspectorVulnerabilityGateway {
    /// Creates a vulnerability gateway over shared clients.
    #[must_use]
    pub fn new(clients: Arc<AwsClients>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl VulnerabilityGateway for InspectorVulnerabilityGateway {
    async fn list_findings(
        &self,
        cluster: &ClusterTarget,
        image: Option<&ImageRef>,
    ) -> AppResult<Vec<Finding>> {
        let client = self.clients.inspector(cluster.region())?;
        let output = client
            .list_findings()
            .filter_criteria(filter_criteria(image)?)
            .send()
            .await
            .map_err(|error| {
                AppError::GatewayUnavailable(format!(
                    "failed to list findings for cluster '{}': {}",
                    cluster.name(),
                    DisplayErrorContext(&error)
                ))
            })?;

        let findings: Vec<Finding> = output
            .findings()
            .iter()
            .map(|finding| Finding::new(Severity::from_label(finding.severity().as_str())))
            .collect();

        debug!(
            cluster = %cluster.name(),
            image = image.map(ToString::to_string).unwrap_or_default(),
            findings = findings.len(),
            "vulnerability findings listed"
        );

        Ok(findings)
    }
}

fn filter_criteria(image: Option<&ImageRef>) -> AppResult<FilterCriteria> {
    let mut criteria = FilterCriteria::builder().finding_status(equals(ACTIVE_FINDING_STATUS)?);

    if let Some(image) = image {
        criteria = criteria
            .ecr_image_repository_name(equals(image.repository_name())?)
            .ecr_image_tags(equals(image.tag())?);
    }

    Ok(criteria.build())
}

fn equals(value: &str) -> AppResult<StringFilter> {
    StringFilter::builder()
        .comparison(StringComparison::Equals)
        .value(value)
        .build()
        .map_err(|error| AppError::Internal(format!("invalid findings filter: {error}")))
}
