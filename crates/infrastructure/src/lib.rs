//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod aws_clients;
mod ecr_registry_gateway;
mod ecs_orchestration_gateway;
mod inspector_vulnerability_gateway;
mod system_clock;

pub use aws_clients::AwsClients;
pub use ecr_registry_gateway::EcrRegistryGateway;
pub use ecs_orchestration_gateway::{DEFAULT_TEAM_TAG_KEY, EcsOrchestrationGateway};
pub use inspector_vulnerability_gateway::InspectorVulnerabilityGateway;
pub use system_clock::SystemClock;
