use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};

use crate::{ComplianceStatus, ImageRef};

/// Owning-team value used when a service carries no team tag.
pub const UNKNOWN_TEAM: &str = "Unknown";

/// Opaque service identifier, usually a service ARN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a service identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the underlying identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ServiceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Team attributed with ownership of a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwningTeam(String);

impl OwningTeam {
    /// Resolves a team from an optional tag value, falling back to `Unknown`
    /// for missing or blank tags.
    #[must_use]
    pub fn from_tag(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(team) if !team.is_empty() => Self(team.to_owned()),
            _ => Self::unknown(),
        }
    }

    /// Returns the placeholder team for untagged services.
    #[must_use]
    pub fn unknown() -> Self {
        Self(UNKNOWN_TEAM.to_owned())
    }

    /// Returns the team name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// One rendered line of the audit report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    image: ImageRef,
    created_at: DateTime<Utc>,
    service: ServiceId,
    team: OwningTeam,
    status: ComplianceStatus,
}

impl AuditRow {
    /// Creates an immutable audit row.
    #[must_use]
    pub fn new(
        image: ImageRef,
        created_at: DateTime<Utc>,
        service: ServiceId,
        team: OwningTeam,
        status: ComplianceStatus,
    ) -> Self {
        Self {
            image,
            created_at,
            service,
            team,
            status,
        }
    }

    /// Returns the audited image.
    #[must_use]
    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// Returns when the image was pushed to the registry.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the service running the image.
    #[must_use]
    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    /// Returns the owning team.
    #[must_use]
    pub fn team(&self) -> &OwningTeam {
        &self.team
    }

    /// Returns the compliance verdict.
    #[must_use]
    pub fn status(&self) -> ComplianceStatus {
        self.status
    }
}
