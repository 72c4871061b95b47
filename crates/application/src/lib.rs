//! Application services and ports for the image audit.

#![forbid(unsafe_code)]

mod audit_ports;
mod compliance_service;
mod gateway_call;
mod report_service;

#[cfg(test)]
mod test_support;

pub use audit_ports::{Clock, OrchestrationGateway, RegistryGateway, VulnerabilityGateway};
pub use compliance_service::ComplianceEvaluator;
pub use gateway_call::DEFAULT_CALL_TIMEOUT;
pub use report_service::{
    AuditReport, ClusterSection, ClusterSectionOutcome, REPORT_TITLE, ReportService, SkippedRow,
};
