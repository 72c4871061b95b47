//! Pass/fail decisions for the two compliance policies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Finding;

/// Default age in whole days after which an image is considered stale.
pub const DEFAULT_MAX_IMAGE_AGE_DAYS: i64 = 90;

/// Compliance verdict for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// The image satisfies its cluster's policy.
    Pass,
    /// The image violates its cluster's policy.
    Fail,
}

impl ComplianceStatus {
    /// Returns the report symbol for this status.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pass => "✅",
            Self::Fail => "❌",
        }
    }

    /// Parses a report symbol back into a status.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "✅" => Some(Self::Pass),
            "❌" => Some(Self::Fail),
            _ => None,
        }
    }

    /// Scan policy: any HIGH or CRITICAL finding fails.
    #[must_use]
    pub fn from_findings<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        if findings
            .into_iter()
            .any(|finding| finding.severity().is_blocking())
        {
            Self::Fail
        } else {
            Self::Pass
        }
    }

    /// Recency policy: fails when more than `max_age_days` whole days passed
    /// between the push and `now`.
    #[must_use]
    pub fn from_image_age(
        pushed_at: DateTime<Utc>,
        now: DateTime<Utc>,
        max_age_days: i64,
    ) -> Self {
        if (now - pushed_at).num_days() > max_age_days {
            Self::Fail
        } else {
            Self::Pass
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    use super::{ComplianceStatus, DEFAULT_MAX_IMAGE_AGE_DAYS};
    use crate::{Finding, Severity};

    #[test]
    fn recency_boundary_is_inclusive_at_ninety_days() {
        let now = Utc
            .with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!());

        let exactly_ninety = now - Duration::days(90);
        let ninety_one = now - Duration::days(91);
        let almost_ninety_one = now - Duration::days(91) + Duration::seconds(1);

        assert_eq!(
            ComplianceStatus::from_image_age(exactly_ninety, now, DEFAULT_MAX_IMAGE_AGE_DAYS),
            ComplianceStatus::Pass
        );
        assert_eq!(
            ComplianceStatus::from_image_age(almost_ninety_one, now, DEFAULT_MAX_IMAGE_AGE_DAYS),
            ComplianceStatus::Pass
        );
        assert_eq!(
            ComplianceStatus::from_image_age(ninety_one, now, DEFAULT_MAX_IMAGE_AGE_DAYS),
            ComplianceStatus::Fail
        );
    }

    #[test]
    fn images_pushed_in_the_future_pass() {
        let now = Utc::now();
        assert_eq!(
            ComplianceStatus::from_image_age(now + Duration::days(3), now, 90),
            ComplianceStatus::Pass
        );
    }

    #[test]
    fn findings_fail_only_on_high_or_critical() {
        let benign = [
            Finding::new(Severity::Low),
            Finding::new(Severity::Medium),
            Finding::new(Severity::Other("INFORMATIONAL".to_owned())),
        ];
        assert_eq!(ComplianceStatus::from_findings(&benign), ComplianceStatus::Pass);
        assert_eq!(
            ComplianceStatus::from_findings(std::iter::empty::<&Finding>()),
            ComplianceStatus::Pass
        );

        let critical = [Finding::new(Severity::Low), Finding::new(Severity::Critical)];
        assert_eq!(ComplianceStatus::from_findings(&critical), ComplianceStatus::Fail);
        assert_eq!(
            ComplianceStatus::from_findings(&[Finding::new(Severity::High)]),
            ComplianceStatus::Fail
        );
    }

    #[test]
    fn symbols_round_trip() {
        for status in [ComplianceStatus::Pass, ComplianceStatus::Fail] {
            assert_eq!(ComplianceStatus::from_symbol(status.symbol()), Some(status));
        }
        assert_eq!(ComplianceStatus::from_symbol("?"), None);
    }

    proptest! {
        #[test]
        fn recency_fails_iff_age_exceeds_limit(age_seconds in 0_i64..(400 * 86_400)) {
            let now = Utc::now();
            let pushed_at = now - Duration::seconds(age_seconds);
            let status = ComplianceStatus::from_image_age(pushed_at, now, 90);
            let whole_days = age_seconds / 86_400;
            prop_assert_eq!(status == ComplianceStatus::Fail, whole_days > 90);
        }
    }
}
