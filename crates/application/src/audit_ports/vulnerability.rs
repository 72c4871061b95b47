use async_trait::async_trait;

use ecr_audit_core::AppResult;
use ecr_audit_domain::{ClusterTarget, Finding, ImageRef};

/// Port for the vulnerability scanner.
#[async_trait]
pub trait VulnerabilityGateway: Send + Sync {
    /// Lists the current findings visible for the cluster's region.
    ///
    /// With `image` set, only findings reported against that image are returned.
    async fn list_findings(
        &self,
        cluster: &ClusterTarget,
        image: Option<&ImageRef>,
    ) -> AppResult<Vec<Finding>>;
}
