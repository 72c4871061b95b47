use ecr_audit_domain::{AuditRow, ServiceId};

/// A (service, image) pair that produced no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Service whose row was skipped.
    pub service: ServiceId,
    /// Raw image string, if the service's images could be resolved.
    pub image: Option<String>,
    /// Rendered error explaining the skip.
    pub reason: String,
}

/// What the audit of one cluster produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterSectionOutcome {
    /// Services were listed; rows are in (service, image) listing order.
    Audited {
        /// Rows emitted for the cluster.
        rows: Vec<AuditRow>,
        /// Rows that were skipped because of lookup failures.
        skipped: Vec<SkippedRow>,
    },
    /// The cluster's services could not be listed at all.
    Unavailable {
        /// Rendered error from the service listing.
        reason: String,
    },
}

/// Report section for one configured cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSection {
    cluster_name: String,
    outcome: ClusterSectionOutcome,
}

impl ClusterSection {
    /// Creates a report section.
    #[must_use]
    pub fn new(cluster_name: impl Into<String>, outcome: ClusterSectionOutcome) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            outcome,
        }
    }

    /// Returns the cluster name.
    #[must_use]
    pub fn cluster_name(&self) -> &str {
        self.cluster_name.as_str()
    }

    /// Returns the section outcome.
    #[must_use]
    pub fn outcome(&self) -> &ClusterSectionOutcome {
        &self.outcome
    }

    /// Returns the emitted rows, empty for unavailable clusters.
    #[must_use]
    pub fn rows(&self) -> &[AuditRow] {
        match &self.outcome {
            ClusterSectionOutcome::Audited { rows, .. } => rows.as_slice(),
            ClusterSectionOutcome::Unavailable { .. } => &[],
        }
    }

    /// Returns the skipped rows, empty for unavailable clusters.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedRow] {
        match &self.outcome {
            ClusterSectionOutcome::Audited { skipped, .. } => skipped.as_slice(),
            ClusterSectionOutcome::Unavailable { .. } => &[],
        }
    }
}

/// Full audit result in configured cluster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    sections: Vec<ClusterSection>,
}

impl AuditReport {
    /// Creates a report from ordered sections.
    #[must_use]
    pub fn new(sections: Vec<ClusterSection>) -> Self {
        Self { sections }
    }

    /// Returns the sections in configured order.
    #[must_use]
    pub fn sections(&self) -> &[ClusterSection] {
        self.sections.as_slice()
    }

    /// Returns whether any cluster failed to list its services.
    #[must_use]
    pub fn has_unavailable_clusters(&self) -> bool {
        self.sections.iter().any(|section| {
            matches!(section.outcome(), ClusterSectionOutcome::Unavailable { .. })
        })
    }

    /// Returns the number of emitted rows across all clusters.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|section| section.rows().len()).sum()
    }

    /// Returns the number of skipped rows across all clusters.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.skipped().len())
            .sum()
    }
}
