use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_ecr::error::DisplayErrorContext;
use aws_sdk_ecr::types::ImageIdentifier;
use chrono::{DateTime, Utc};
use ecr_audit_application::RegistryGateway;
use ecr_audit_core::{AppError, AppResult};
use ecr_audit_domain::ImageRef;

use crate::AwsClients;

/// ECR implementation of the registry gateway.
pub struct EcrRegistryGateway {
    clients: Arc<AwsClients>,
}

impl EcrRegistryGateway {
    /// Creates a registry gateway over shared clients.
    #[must_use]
    pub fn new(clients: Arc<AwsClients>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl RegistryGateway for EcrRegistryGateway {
    async fn push_instant(&self, image: &ImageRef, region: &str) -> AppResult<DateTime<Utc>> {
        let client = self.clients.ecr(region)?;
        let output = client
            .describe_images()
            .repository_name(image.repository_name())
            .image_ids(ImageIdentifier::builder().image_tag(image.tag()).build())
            .send()
            .await
            .map_err(|error| match error.as_service_error() {
                Some(service_error)
                    if service_error.is_repository_not_found_exception()
                        || service_error.is_image_not_found_exception() =>
                {
                    AppError::NotFound(format!("image '{image}' in {region}"))
                }
                _ => AppError::GatewayUnavailable(format!(
                    "failed to describe image '{image}': {}",
                    DisplayErrorContext(&error)
                )),
            })?;

        let pushed_at = output
            .image_details()
            .first()
            .and_then(|detail| detail.image_pushed_at())
            .ok_or_else(|| AppError::NotFound(format!("push time of image '{image}'")))?;

        utc_from_epoch(pushed_at.secs(), pushed_at.subsec_nanos())
    }
}

fn utc_from_epoch(seconds: i64, nanos: u32) -> AppResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(seconds, nanos).ok_or_else(|| {
        AppError::Internal(format!("registry returned out-of-range timestamp {seconds}"))
    })
}
