use serde::{Deserialize, Serialize};

/// Severity label reported by the vulnerability scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// `LOW`
    Low,
    /// `MEDIUM`
    Medium,
    /// `HIGH`
    High,
    /// `CRITICAL`
    Critical,
    /// Any other scanner label, e.g. `INFORMATIONAL` or `UNTRIAGED`.
    Other(String),
}

impl Severity {
    /// Maps a scanner label onto a severity. Matching ignores case.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            "CRITICAL" => Self::Critical,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the scanner label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
            Self::Other(label) => label.as_str(),
        }
    }

    /// Returns whether this severity fails the scan policy.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

/// A vulnerability finding. Only its severity matters to the audit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    severity: Severity,
}

impl Finding {
    /// Creates a finding with the given severity.
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self { severity }
    }

    /// Returns the finding severity.
    #[must_use]
    pub fn severity(&self) -> &Severity {
        &self.severity
    }
}
