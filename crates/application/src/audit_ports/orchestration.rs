use async_trait::async_trait;

use ecr_audit_core::AppResult;
use ecr_audit_domain::{ClusterTarget, OwningTeam, ServiceId};

/// Port for the container orchestration service (services, task definitions, tags).
#[async_trait]
pub trait OrchestrationGateway: Send + Sync {
    /// Lists the services of a cluster in listing order.
    ///
    /// Fails with `NotFound` when the cluster does not exist.
    async fn list_services(&self, cluster: &ClusterTarget) -> AppResult<Vec<ServiceId>>;

    /// Returns the raw image strings of the service's active task definition,
    /// in container definition order.
    async fn container_images(
        &self,
        cluster: &ClusterTarget,
        service: &ServiceId,
    ) -> AppResult<Vec<String>>;

    /// Resolves the owning team from the service's tags, `Unknown` when untagged.
    async fn owning_team(
        &self,
        cluster: &ClusterTarget,
        service: &ServiceId,
    ) -> AppResult<OwningTeam>;
}
