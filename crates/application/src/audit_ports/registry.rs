use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ecr_audit_core::AppResult;
use ecr_audit_domain::ImageRef;

/// Port for the image registry.
#[async_trait]
pub trait RegistryGateway: Send + Sync {
    /// Returns when the image was pushed.
    ///
    /// Fails with `NotFound` when the repository or tag does not exist.
    async fn push_instant(&self, image: &ImageRef, region: &str) -> AppResult<DateTime<Utc>>;
}
