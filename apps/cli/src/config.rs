use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ecr_audit_core::{AppError, AppResult, NonEmptyString};
use ecr_audit_domain::{ClusterTarget, DEFAULT_MAX_IMAGE_AGE_DAYS, FindingsScope, PolicyMode};
use ecr_audit_infrastructure::DEFAULT_TEAM_TAG_KEY;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "ecr-audit.toml";
const DEFAULT_CALL_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAX_CONCURRENCY: usize = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    call_timeout_ms: Option<u64>,
    max_concurrency: Option<usize>,
    max_image_age_days: Option<i64>,
    team_tag_key: Option<NonEmptyString>,
    #[serde(default)]
    clusters: Vec<ClusterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClusterEntry {
    name: String,
    region: String,
    policy: Option<PolicyMode>,
    findings_scope: Option<FindingsScope>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub clusters: Vec<ClusterTarget>,
    pub call_timeout: Duration,
    pub max_concurrency: usize,
    pub max_image_age_days: i64,
    pub team_tag_key: String,
}

impl AuditConfig {
    /// Loads the config file named by the first argument, `ECR_AUDIT_CONFIG`,
    /// or `ecr-audit.toml`, then applies `ECR_AUDIT_*` overrides.
    pub fn load() -> AppResult<Self> {
        let path = env::args()
            .nth(1)
            .or_else(|| env::var("ECR_AUDIT_CONFIG").ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::load_from_path(&path)
    }

    fn load_from_path(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|error| {
            AppError::Validation(format!(
                "failed to read config file '{}': {error}",
                path.display()
            ))
        })?;

        Self::from_toml_str(&text, |name| env::var(name).ok()).map_err(|error| match error {
            AppError::Validation(message) => {
                AppError::Validation(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    fn from_toml_str(text: &str, lookup_env: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|error| AppError::Validation(format!("invalid config: {error}")))?;

        let clusters = file
            .clusters
            .into_iter()
            .map(ClusterEntry::into_target)
            .collect::<AppResult<Vec<_>>>()?;

        let call_timeout_ms = parse_env_u64(
            &lookup_env,
            "ECR_AUDIT_CALL_TIMEOUT_MS",
            file.call_timeout_ms.unwrap_or(DEFAULT_CALL_TIMEOUT_MS),
        )?;
        let max_concurrency = parse_env_usize(
            &lookup_env,
            "ECR_AUDIT_MAX_CONCURRENCY",
            file.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
        )?;
        let max_image_age_days = parse_env_i64(
            &lookup_env,
            "ECR_AUDIT_MAX_IMAGE_AGE_DAYS",
            file.max_image_age_days.unwrap_or(DEFAULT_MAX_IMAGE_AGE_DAYS),
        )?;
        let team_tag_key = lookup_env("ECR_AUDIT_TEAM_TAG_KEY")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .or_else(|| file.team_tag_key.map(String::from))
            .unwrap_or_else(|| DEFAULT_TEAM_TAG_KEY.to_owned());

        if call_timeout_ms == 0 {
            return Err(AppError::Validation(
                "call_timeout_ms must be greater than zero".to_owned(),
            ));
        }

        if max_concurrency == 0 {
            return Err(AppError::Validation(
                "max_concurrency must be greater than zero".to_owned(),
            ));
        }

        if max_image_age_days < 0 {
            return Err(AppError::Validation(
                "max_image_age_days must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            clusters,
            call_timeout: Duration::from_millis(call_timeout_ms),
            max_concurrency,
            max_image_age_days,
            team_tag_key,
        })
    }

    /// Returns the distinct regions in configured order.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = Vec::new();
        for cluster in &self.clusters {
            if !regions.contains(&cluster.region()) {
                regions.push(cluster.region());
            }
        }
        regions
    }
}

impl ClusterEntry {
    fn into_target(self) -> AppResult<ClusterTarget> {
        let mut target = ClusterTarget::new(self.name, self.region)?;
        if let Some(policy) = self.policy {
            target = target.with_policy(policy);
        }
        if let Some(findings_scope) = self.findings_scope {
            target = target.with_findings_scope(findings_scope);
        }
        Ok(target)
    }
}

fn parse_env_u64(
    lookup_env: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> AppResult<u64> {
    match lookup_env(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn parse_env_usize(
    lookup_env: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: usize,
) -> AppResult<usize> {
    match lookup_env(name) {
        Some(value) => value.trim().parse::<usize>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn parse_env_i64(
    lookup_env: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: i64,
) -> AppResult<i64> {
    match lookup_env(name) {
        Some(value) => value.trim().parse::<i64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use ecr_audit_core::AppError;
    use ecr_audit_domain::{FindingsScope, PolicyMode};

    use super::AuditConfig;

    const SAMPLE: &str = r#"
        max_concurrency = 4

        [[clusters]]
        name = "PROD"
        region = "us-east-1"

        [[clusters]]
        name = "PROD-LINUX"
        region = "us-east-1"
        findings_scope = "image"

        [[clusters]]
        name = "eu-linux-legacy"
        region = "eu-west-1"
        policy = "recency"
    "#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn loads_clusters_in_order_with_defaults() {
        let config = AuditConfig::from_toml_str(SAMPLE, no_env).unwrap_or_else(|_| unreachable!());

        let names: Vec<&str> = config.clusters.iter().map(|cluster| cluster.name()).collect();
        assert_eq!(names, vec!["PROD", "PROD-LINUX", "eu-linux-legacy"]);
        assert_eq!(config.clusters[0].policy(), PolicyMode::Recency);
        assert_eq!(config.clusters[1].policy(), PolicyMode::Scan);
        assert_eq!(config.clusters[1].findings_scope(), FindingsScope::Image);
        assert_eq!(config.clusters[2].policy(), PolicyMode::Recency);
        assert!(config.clusters[2].policy_overridden());

        assert_eq!(config.call_timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.max_image_age_days, 90);
        assert_eq!(config.team_tag_key, "Team");
        assert_eq!(config.regions(), vec!["us-east-1", "eu-west-1"]);
    }

    #[test]
    fn environment_overrides_file_values() {
        let env = HashMap::from([
            ("ECR_AUDIT_MAX_CONCURRENCY", "2"),
            ("ECR_AUDIT_CALL_TIMEOUT_MS", "2500"),
            ("ECR_AUDIT_TEAM_TAG_KEY", "owner"),
        ]);
        let config = AuditConfig::from_toml_str(SAMPLE, |name| {
            env.get(name).map(|value| (*value).to_owned())
        })
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.call_timeout, Duration::from_millis(2500));
        assert_eq!(config.team_tag_key, "owner");
    }

    #[test]
    fn rejects_invalid_values() {
        let zero_concurrency = AuditConfig::from_toml_str("max_concurrency = 0", no_env);
        assert!(matches!(zero_concurrency, Err(AppError::Validation(_))));

        let blank_region = AuditConfig::from_toml_str(
            "[[clusters]]\nname = \"PROD\"\nregion = \" \"\n",
            no_env,
        );
        assert!(matches!(blank_region, Err(AppError::Validation(_))));

        let unknown_policy = AuditConfig::from_toml_str(
            "[[clusters]]\nname = \"PROD\"\nregion = \"us-east-1\"\npolicy = \"linux\"\n",
            no_env,
        );
        assert!(matches!(unknown_policy, Err(AppError::Validation(_))));

        let bad_env = AuditConfig::from_toml_str("", |name| {
            (name == "ECR_AUDIT_CALL_TIMEOUT_MS").then(|| "soon".to_owned())
        });
        assert!(matches!(bad_env, Err(AppError::Validation(_))));
    }

    #[test]
    fn empty_config_audits_no_clusters() {
        let config = AuditConfig::from_toml_str("", no_env).unwrap_or_else(|_| unreachable!());
        assert!(config.clusters.is_empty());
        assert!(config.regions().is_empty());
    }
}
