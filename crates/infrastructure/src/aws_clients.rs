//! Long-lived AWS service clients, one set per configured region.

use std::collections::HashMap;

use aws_config::{BehaviorVersion, Region};
use ecr_audit_core::{AppError, AppResult};
use tracing::debug;

struct RegionalClients {
    ecs: aws_sdk_ecs::Client,
    ecr: aws_sdk_ecr::Client,
    inspector: aws_sdk_inspector2::Client,
}

/// AWS clients built once per run and shared by every gateway.
pub struct AwsClients {
    regions: HashMap<String, RegionalClients>,
}

impl AwsClients {
    /// Loads the default credential chain once per distinct region.
    pub async fn load<'a>(regions: impl IntoIterator<Item = &'a str>) -> Self {
        let mut loaded = HashMap::new();
        for region in regions {
            if loaded.contains_key(region) {
                continue;
            }

            let shared_config = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_owned()))
                .load()
                .await;
            debug!(region = region, "aws clients configured");

            loaded.insert(
                region.to_owned(),
                RegionalClients {
                    ecs: aws_sdk_ecs::Client::new(&shared_config),
                    ecr: aws_sdk_ecr::Client::new(&shared_config),
                    inspector: aws_sdk_inspector2::Client::new(&shared_config),
                },
            );
        }

        Self { regions: loaded }
    }

    /// Returns the ECS client for a region.
    pub fn ecs(&self, region: &str) -> AppResult<&aws_sdk_ecs::Client> {
        self.regional(region).map(|clients| &clients.ecs)
    }

    /// Returns the ECR client for a region.
    pub fn ecr(&self, region: &str) -> AppResult<&aws_sdk_ecr::Client> {
        self.regional(region).map(|clients| &clients.ecr)
    }

    /// Returns the Inspector client for a region.
    pub fn inspector(&self, region: &str) -> AppResult<&aws_sdk_inspector2::Client> {
        self.regional(region).map(|clients| &clients.inspector)
    }

    fn regional(&self, region: &str) -> AppResult<&RegionalClients> {
        self.regions.get(region).ok_or_else(|| {
            AppError::Internal(format!("no AWS clients were configured for region '{region}'"))
        })
    }
}
