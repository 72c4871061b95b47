use std::str::FromStr;

use ecr_audit_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Name fragment that selects the scan policy when no policy is configured.
pub const SCAN_CLUSTER_NAME_MARKER: &str = "linux";

/// Compliance policy applied to every image of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Fails when the vulnerability scanner reports HIGH or CRITICAL findings.
    Scan,
    /// Fails when the image was pushed too long ago.
    Recency,
}

impl PolicyMode {
    /// Derives the policy from the cluster naming convention.
    ///
    /// Cluster names containing `linux` (any case) are scanned, all others are
    /// checked for recency.
    #[must_use]
    pub fn from_cluster_name(cluster_name: &str) -> Self {
        if cluster_name
            .to_lowercase()
            .contains(SCAN_CLUSTER_NAME_MARKER)
        {
            Self::Scan
        } else {
            Self::Recency
        }
    }

    /// Returns a stable label for this policy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Recency => "recency",
        }
    }
}

impl FromStr for PolicyMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "scan" => Ok(Self::Scan),
            "recency" => Ok(Self::Recency),
            _ => Err(AppError::Validation(format!(
                "unknown policy value '{value}'"
            ))),
        }
    }
}

/// How far a vulnerability findings lookup reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingsScope {
    /// Every finding visible for the cluster's environment. All images of the
    /// cluster share one verdict.
    #[default]
    Cluster,
    /// Only findings reported against the image being evaluated.
    Image,
}

/// One configured cluster to audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTarget {
    name: NonEmptyString,
    region: NonEmptyString,
    policy: PolicyMode,
    policy_overridden: bool,
    findings_scope: FindingsScope,
}

impl ClusterTarget {
    /// Creates a cluster target using the naming-convention policy.
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> AppResult<Self> {
        let name = NonEmptyString::new(name)
            .map_err(|_| AppError::Validation("cluster name must not be empty".to_owned()))?;
        let region = NonEmptyString::new(region).map_err(|_| {
            AppError::Validation(format!("cluster '{name}' requires a region"))
        })?;
        let policy = PolicyMode::from_cluster_name(name.as_str());

        Ok(Self {
            name,
            region,
            policy,
            policy_overridden: false,
            findings_scope: FindingsScope::default(),
        })
    }

    /// Replaces the inferred policy with an explicit one.
    #[must_use]
    pub fn with_policy(mut self, policy: PolicyMode) -> Self {
        self.policy = policy;
        self.policy_overridden = true;
        self
    }

    /// Sets the findings lookup scope used by the scan policy.
    #[must_use]
    pub fn with_findings_scope(mut self, findings_scope: FindingsScope) -> Self {
        self.findings_scope = findings_scope;
        self
    }

    /// Returns the cluster name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the cloud region hosting the cluster.
    #[must_use]
    pub fn region(&self) -> &str {
        self.region.as_str()
    }

    /// Returns the effective compliance policy.
    #[must_use]
    pub fn policy(&self) -> PolicyMode {
        self.policy
    }

    /// Returns whether the policy came from configuration rather than the name.
    #[must_use]
    pub fn policy_overridden(&self) -> bool {
        self.policy_overridden
    }

    /// Returns the findings lookup scope.
    #[must_use]
    pub fn findings_scope(&self) -> FindingsScope {
        self.findings_scope
    }
}
