//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod cluster;
mod compliance;
mod finding;
mod image;

pub use audit::{AuditRow, OwningTeam, ServiceId, UNKNOWN_TEAM};
pub use cluster::{ClusterTarget, FindingsScope, PolicyMode, SCAN_CLUSTER_NAME_MARKER};
pub use compliance::{ComplianceStatus, DEFAULT_MAX_IMAGE_AGE_DAYS};
pub use finding::{Finding, Severity};
pub use image::ImageRef;
