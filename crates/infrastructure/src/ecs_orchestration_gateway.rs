use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_ecs::error::DisplayErrorContext;
use ecr_audit_application::OrchestrationGateway;
use ecr_audit_core::{AppError, AppResult};
use ecr_audit_domain::{ClusterTarget, OwningTeam, ServiceId};

use crate::AwsClients;

/// Tag key that names the owning team unless configured otherwise.
pub const DEFAULT_TEAM_TAG_KEY: &str = "Team";

/// ECS implementation of the orchestration gateway.
pub struct EcsOrchestrationGateway {
    clients: Arc<AwsClients>,
    team_tag_key: String,
}

impl EcsOrchestrationGateway {
    /// Creates a gateway reading team ownership from `team_tag_key`.
    #[must_use]
    pub fn new(clients: Arc<AwsClients>, team_tag_key: impl Into<String>) -> Self {
        Self {
            clients,
            team_tag_key: team_tag_key.into(),
        }
    }
}

#[async_trait]
impl OrchestrationGateway for EcsOrchestrationGateway {
    async fn list_services(&self, cluster: &ClusterTarget) -> AppResult<Vec<ServiceId>> {
        let client = self.clients.ecs(cluster.region())?;
        let mut services = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = client
                .list_services()
                .cluster(cluster.name())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|error| match error.as_service_error() {
                    Some(service_error) if service_error.is_cluster_not_found_exception() => {
                        AppError::NotFound(format!(
                            "cluster '{}' in {}",
                            cluster.name(),
                            cluster.region()
                        ))
                    }
                    _ => AppError::GatewayUnavailable(format!(
                        "failed to list services of cluster '{}': {}",
                        cluster.name(),
                        DisplayErrorContext(&error)
                    )),
                })?;

            services.extend(output.service_arns().iter().map(ServiceId::new));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_owned()),
                _ => break,
            }
        }

        Ok(services)
    }

    async fn container_images(
        &self,
        cluster: &ClusterTarget,
        service: &ServiceId,
    ) -> AppResult<Vec<String>> {
        let client = self.clients.ecs(cluster.region())?;
        let described = client
            .describe_services()
            .cluster(cluster.name())
            .services(service.as_str())
            .send()
            .await
            .map_err(|error| match error.as_service_error() {
                Some(service_error) if service_error.is_cluster_not_found_exception() => {
                    AppError::NotFound(format!("cluster '{}'", cluster.name()))
                }
                _ => AppError::GatewayUnavailable(format!(
                    "failed to describe service '{service}': {}",
                    DisplayErrorContext(&error)
                )),
            })?;

        let task_definition_arn = described
            .services()
            .first()
            .and_then(|described_service| described_service.task_definition())
            .ok_or_else(|| {
                AppError::NotFound(format!("task definition of service '{service}'"))
            })?;

        let task_definition = client
            .describe_task_definition()
            .task_definition(task_definition_arn)
            .send()
            .await
            .map_err(|error| {
                AppError::GatewayUnavailable(format!(
                    "failed to describe task definition '{task_definition_arn}': {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        Ok(task_definition
            .task_definition()
            .map(|definition| {
                definition
                    .container_definitions()
                    .iter()
                    .filter_map(|container| container.image().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn owning_team(
        &self,
        cluster: &ClusterTarget,
        service: &ServiceId,
    ) -> AppResult<OwningTeam> {
        let client = self.clients.ecs(cluster.region())?;
        let output = client
            .list_tags_for_resource()
            .resource_arn(service.as_str())
            .send()
            .await
            .map_err(|error| {
                AppError::GatewayUnavailable(format!(
                    "failed to list tags of service '{service}': {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        let team = output
            .tags()
            .iter()
            .find(|tag| tag.key() == Some(self.team_tag_key.as_str()))
            .and_then(|tag| tag.value());

        Ok(OwningTeam::from_tag(team))
    }
}
