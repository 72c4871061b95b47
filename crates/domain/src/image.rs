use std::fmt::{Display, Formatter};

use ecr_audit_core::{AppError, AppResult};

/// Container image reference in `repository:tag` form.
///
/// The repository part may carry a registry host prefix
/// (`<account>.dkr.ecr.<region>.amazonaws.com/web`); it is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    repository: String,
    tag: String,
}

impl ImageRef {
    /// Parses an image string that must contain exactly one `:` separator with
    /// a non-empty repository and tag.
    pub fn parse(value: &str) -> AppResult<Self> {
        let mut parts = value.split(':');
        let (Some(repository), Some(tag), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::MalformedImageRef(value.to_owned()));
        };

        if repository.trim().is_empty() || tag.trim().is_empty() {
            return Err(AppError::MalformedImageRef(value.to_owned()));
        }

        Ok(Self {
            repository: repository.to_owned(),
            tag: tag.to_owned(),
        })
    }

    /// Returns the repository part, including any registry host prefix.
    #[must_use]
    pub fn repository(&self) -> &str {
        self.repository.as_str()
    }

    /// Returns the repository name without a registry host prefix.
    #[must_use]
    pub fn repository_name(&self) -> &str {
        match self.repository.split_once('/') {
            Some((host, rest)) if host.contains('.') => rest,
            _ => self.repository.as_str(),
        }
    }

    /// Returns the tag part.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.tag.as_str()
    }
}

impl Display for ImageRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.repository, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use ecr_audit_core::AppError;
    use proptest::prelude::*;

    use super::ImageRef;

    #[test]
    fn parses_repository_and_tag() {
        let image = ImageRef::parse("payments-api:2024.06.1").unwrap_or_else(|_| unreachable!());
        assert_eq!(image.repository(), "payments-api");
        assert_eq!(image.tag(), "2024.06.1");
        assert_eq!(image.to_string(), "payments-api:2024.06.1");
    }

    #[test]
    fn strips_registry_host_for_repository_name() {
        let image = ImageRef::parse("123456789012.dkr.ecr.us-east-1.amazonaws.com/team/web:v3")
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(image.repository_name(), "team/web");

        let plain = ImageRef::parse("team/web:v3").unwrap_or_else(|_| unreachable!());
        assert_eq!(plain.repository_name(), "team/web");
    }

    #[test]
    fn rejects_missing_or_extra_separators() {
        for value in ["nginx", "registry:5000/web:v1", "web:", ":v1", "a:b:c", ""] {
            let result = ImageRef::parse(value);
            assert!(
                matches!(result, Err(AppError::MalformedImageRef(_))),
                "{value} should be malformed"
            );
        }
    }

    proptest! {
        #[test]
        fn display_reproduces_parsed_input(
            repository in "[a-z0-9][a-z0-9./_-]{0,30}",
            tag in "[A-Za-z0-9_.-]{1,20}"
        ) {
            let raw = format!("{repository}:{tag}");
            let image = ImageRef::parse(&raw);
            prop_assert!(image.is_ok());
            let image = image.unwrap_or_else(|_| unreachable!());
            prop_assert_eq!(image.to_string(), raw);
            prop_assert_eq!(image.tag(), tag.as_str());
        }

        #[test]
        fn strings_without_exactly_one_colon_are_rejected(value in "[a-z:]{0,12}") {
            let colons = value.matches(':').count();
            prop_assume!(colons != 1);
            prop_assert!(ImageRef::parse(&value).is_err());
        }
    }
}
