//! Release identity: a `major.minor[-prerelease][.build]` version value,
//! its canonical string form and the ordering used by update checks.

mod canonical;
mod error;
mod ordering;

pub use canonical::parse_version_string;
pub use error::VersionError;
pub use ordering::{compare_optional, newest, sort_versions, try_structured_compare};

/// Immutable release identifier.
///
/// The pre-release and nightly flags are derived from the presence of their
/// ids, so a flag can never disagree with its id. Equality and hashing go
/// through the canonical string form (see [`std::fmt::Display`]).
#[derive(Debug, Clone)]
pub struct Version {
    major: u32,
    minor: u32,
    pre_release: Option<String>,
    nightly: Option<String>,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            pre_release: None,
            nightly: None,
        }
    }

    /// Builds a version from loosely typed parts, rejecting negative numbers
    /// and ids that would not round-trip through the canonical form.
    pub fn from_parts(
        major: i64,
        minor: i64,
        pre_release: Option<&str>,
        nightly: Option<&str>,
    ) -> Result<Self, VersionError> {
        let mut version = Self::new(check_number("major", major)?, check_number("minor", minor)?);

        if let Some(id) = pre_release {
            version = version.with_pre_release(id)?;
        }
        if let Some(build_id) = nightly {
            version = version.with_nightly(build_id)?;
        }

        Ok(version)
    }

    /// Returns a copy marked as a pre-release with the given id.
    pub fn with_pre_release(&self, id: &str) -> Result<Self, VersionError> {
        if id.is_empty() {
            return Err(VersionError::invalid("pre-release id", "must not be empty"));
        }
        // The first '.' after the pre-release id starts the nightly build id.
        if id.contains('.') {
            return Err(VersionError::invalid(
                "pre-release id",
                format!("{:?} must not contain '.'", id),
            ));
        }

        Ok(Self {
            pre_release: Some(id.to_string()),
            ..self.clone()
        })
    }

    /// Returns a copy marked as a nightly build with the given build id.
    pub fn with_nightly(&self, build_id: &str) -> Result<Self, VersionError> {
        if build_id.is_empty() {
            return Err(VersionError::invalid("nightly build id", "must not be empty"));
        }

        Ok(Self {
            nightly: Some(build_id.to_string()),
            ..self.clone()
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }

    pub fn pre_release_id(&self) -> Option<&str> {
        self.pre_release.as_deref()
    }

    pub fn is_nightly(&self) -> bool {
        self.nightly.is_some()
    }

    pub fn nightly_build_id(&self) -> Option<&str> {
        self.nightly.as_deref()
    }
}

fn check_number(field: &'static str, value: i64) -> Result<u32, VersionError> {
    if value < 0 {
        return Err(VersionError::invalid(field, format!("{} is negative", value)));
    }
    u32::try_from(value)
        .map_err(|_| VersionError::invalid(field, format!("{} does not fit in 32 bits", value)))
}
