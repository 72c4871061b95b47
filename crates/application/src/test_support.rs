use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use ecr_audit_core::{AppError, AppResult};
use ecr_audit_domain::{ClusterTarget, Finding, ImageRef, OwningTeam, ServiceId};

use crate::audit_ports::{Clock, OrchestrationGateway, RegistryGateway, VulnerabilityGateway};

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
        .single()
        .unwrap_or_else(|| unreachable!())
}

pub(crate) fn cluster(name: &str) -> ClusterTarget {
    ClusterTarget::new(name, "us-east-1").unwrap_or_else(|_| unreachable!())
}

pub(crate) fn image(value: &str) -> ImageRef {
    ImageRef::parse(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
pub(crate) struct FakeOrchestrationGateway {
    pub(crate) services: HashMap<String, Vec<ServiceId>>,
    pub(crate) images: HashMap<String, Vec<String>>,
    pub(crate) teams: HashMap<String, String>,
    pub(crate) unavailable_clusters: HashSet<String>,
    pub(crate) failing_team_lookups: HashSet<String>,
    pub(crate) image_delays: HashMap<String, Duration>,
    pub(crate) team_lookups: Mutex<Vec<String>>,
}

impl FakeOrchestrationGateway {
    pub(crate) fn with_service(
        mut self,
        cluster_name: &str,
        service_id: &str,
        images: &[&str],
    ) -> Self {
        self.services
            .entry(cluster_name.to_owned())
            .or_default()
            .push(ServiceId::new(service_id));
        self.images.insert(
            service_id.to_owned(),
            images.iter().map(|value| (*value).to_owned()).collect(),
        );
        self
    }

    pub(crate) fn with_team(mut self, service_id: &str, team: &str) -> Self {
        self.teams.insert(service_id.to_owned(), team.to_owned());
        self
    }
}

#[async_trait]
impl OrchestrationGateway for FakeOrchestrationGateway {
    async fn list_services(&self, cluster: &ClusterTarget) -> AppResult<Vec<ServiceId>> {
        if self.unavailable_clusters.contains(cluster.name()) {
            return Err(AppError::GatewayUnavailable(format!(
                "cluster '{}' unreachable",
                cluster.name()
            )));
        }

        self.services
            .get(cluster.name())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("cluster '{}'", cluster.name())))
    }

    async fn container_images(
        &self,
        _cluster: &ClusterTarget,
        service: &ServiceId,
    ) -> AppResult<Vec<String>> {
        if let Some(delay) = self.image_delays.get(service.as_str()) {
            tokio::time::sleep(*delay).await;
        }

        self.images
            .get(service.as_str())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("service '{service}'")))
    }

    async fn owning_team(
        &self,
        _cluster: &ClusterTarget,
        service: &ServiceId,
    ) -> AppResult<OwningTeam> {
        self.team_lookups
            .lock()
            .await
            .push(service.as_str().to_owned());

        if self.failing_team_lookups.contains(service.as_str()) {
            return Err(AppError::GatewayUnavailable("tag lookup throttled".to_owned()));
        }

        Ok(OwningTeam::from_tag(
            self.teams.get(service.as_str()).map(String::as_str),
        ))
    }
}

#[derive(Default)]
pub(crate) struct FakeRegistryGateway {
    pub(crate) pushed_at: HashMap<String, DateTime<Utc>>,
    pub(crate) delay: Option<Duration>,
    pub(crate) lookups: Mutex<Vec<(String, String)>>,
}

impl FakeRegistryGateway {
    pub(crate) fn with_image(mut self, image: &str, pushed_at: DateTime<Utc>) -> Self {
        self.pushed_at.insert(image.to_owned(), pushed_at);
        self
    }
}

#[async_trait]
impl RegistryGateway for FakeRegistryGateway {
    async fn push_instant(&self, image: &ImageRef, region: &str) -> AppResult<DateTime<Utc>> {
        self.lookups
            .lock()
            .await
            .push((image.to_string(), region.to_owned()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.pushed_at
            .get(image.to_string().as_str())
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("image '{image}'")))
    }
}

#[derive(Default)]
pub(crate) struct FakeVulnerabilityGateway {
    pub(crate) cluster_findings: HashMap<String, Vec<Finding>>,
    pub(crate) image_findings: HashMap<String, Vec<Finding>>,
    pub(crate) unavailable: bool,
    pub(crate) queries: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeVulnerabilityGateway {
    pub(crate) fn with_cluster_findings(
        mut self,
        cluster_name: &str,
        findings: Vec<Finding>,
    ) -> Self {
        self.cluster_findings
            .insert(cluster_name.to_owned(), findings);
        self
    }

    pub(crate) fn with_image_findings(mut self, image: &str, findings: Vec<Finding>) -> Self {
        self.image_findings.insert(image.to_owned(), findings);
        self
    }
}

#[async_trait]
impl VulnerabilityGateway for FakeVulnerabilityGateway {
    async fn list_findings(
        &self,
        cluster: &ClusterTarget,
        image: Option<&ImageRef>,
    ) -> AppResult<Vec<Finding>> {
        self.queries
            .lock()
            .await
            .push((cluster.name().to_owned(), image.map(ToString::to_string)));

        if self.unavailable {
            return Err(AppError::GatewayUnavailable("scanner unreachable".to_owned()));
        }

        let findings = match image {
            Some(image) => self.image_findings.get(image.to_string().as_str()),
            None => self.cluster_findings.get(cluster.name()),
        };

        Ok(findings.cloned().unwrap_or_default())
    }
}
