mod clock;
mod orchestration;
mod registry;
mod vulnerability;

pub use clock::Clock;
pub use orchestration::OrchestrationGateway;
pub use registry::RegistryGateway;
pub use vulnerability::VulnerabilityGateway;
