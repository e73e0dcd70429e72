use crate::config::{ConfigurationStore, PNAME_APPLICATION_NAME, PNAME_APPLICATION_VERSION};
use crate::version::{Version, VersionError};

const BUILD_NAME: &str = env!("CARGO_PKG_NAME");
const BUILD_MAJOR: &str = env!("CARGO_PKG_VERSION_MAJOR");
const BUILD_MINOR: &str = env!("CARGO_PKG_VERSION_MINOR");
const BUILD_PRE: &str = env!("CARGO_PKG_VERSION_PRE");
const BUILD_NIGHTLY_ID: Option<&str> = option_env!("RELEASE_IDENT_NIGHTLY_BUILD_ID");

/// Supplies the running application's identity.
pub trait VersionProvider {
    fn current_version(&self) -> Version;

    fn application_name(&self) -> String;

    fn parse_version_string(&self, text: &str) -> Result<Version, VersionError> {
        text.parse()
    }
}

/// Reports the version baked in at compile time, unless configuration
/// overrides it.
pub struct BuildVersionProvider<C> {
    config: C,
}

impl<C: ConfigurationStore> BuildVersionProvider<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

impl<C: ConfigurationStore> VersionProvider for BuildVersionProvider<C> {
    fn current_version(&self) -> Version {
        let Some(text) = self.config.get_property(PNAME_APPLICATION_VERSION) else {
            return build_version();
        };

        match self.parse_version_string(&text) {
            Ok(version) => {
                log::debug!("Using configured version {}", version);
                version
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", PNAME_APPLICATION_VERSION, e);
                build_version()
            }
        }
    }

    fn application_name(&self) -> String {
        self.config.get_string_or(PNAME_APPLICATION_NAME, BUILD_NAME)
    }
}

/// The version Cargo compiled this crate as. The patch number has no place in
/// the release identity; a nightly build id comes from
/// `RELEASE_IDENT_NIGHTLY_BUILD_ID` at build time.
pub fn build_version() -> Version {
    let major = BUILD_MAJOR.parse().unwrap_or(0);
    let minor = BUILD_MINOR.parse().unwrap_or(0);
    let version = Version::new(major, minor);
    let version = with_build_field(&version, "pre-release", non_empty(BUILD_PRE), Version::with_pre_release);
    with_build_field(&version, "nightly build id", BUILD_NIGHTLY_ID.and_then(non_empty), Version::with_nightly)
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.is_empty())
}

fn with_build_field(
    version: &Version,
    label: &str,
    value: Option<&str>,
    apply: fn(&Version, &str) -> Result<Version, VersionError>,
) -> Version {
    let Some(value) = value else {
        return version.clone();
    };

    apply(version, value).unwrap_or_else(|e| {
        log::warn!("Dropping build {} {:?}: {}", label, value, e);
        version.clone()
    })
}

/// One-line identity for diagnostics and "about" output.
pub fn about_text(provider: &impl VersionProvider) -> String {
    format!("{} {}", provider.application_name(), provider.current_version())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    fn provider_with(properties: &[(&str, &str)]) -> BuildVersionProvider<MemoryConfigStore> {
        let mut config = MemoryConfigStore::new();
        for (name, value) in properties {
            config.set_property(name, value);
        }
        BuildVersionProvider::new(config)
    }

    #[test]
    fn build_version_matches_cargo_metadata() {
        // Arrange & Act
        let version = build_version();

        // Assert
        assert_eq!(version.major().to_string(), env!("CARGO_PKG_VERSION_MAJOR"));
        assert_eq!(version.minor().to_string(), env!("CARGO_PKG_VERSION_MINOR"));
        assert_eq!(version.pre_release_id().unwrap_or(""), env!("CARGO_PKG_VERSION_PRE"));
    }

    #[test]
    fn current_version_defaults_to_build_version() {
        // Arrange
        let provider = provider_with(&[]);

        // Act
        let version = provider.current_version();

        // Assert
        assert_eq!(version, build_version());
    }

    #[test]
    fn current_version_prefers_configured_version() {
        // Arrange
        let provider = provider_with(&[(PNAME_APPLICATION_VERSION, "7.1-rc.20240102")]);

        // Act
        let version = provider.current_version();

        // Assert
        assert_eq!(version.to_string(), "7.1-rc.20240102");
    }

    #[test]
    fn current_version_ignores_malformed_override() {
        // Arrange
        let provider = provider_with(&[(PNAME_APPLICATION_VERSION, "not-a-version")]);

        // Act
        let version = provider.current_version();

        // Assert
        assert_eq!(version, build_version());
    }

    #[test]
    fn application_name_can_be_overridden() {
        let cases = [
            (vec![], BUILD_NAME),
            (vec![(PNAME_APPLICATION_NAME, "Example")], "Example"),
        ];

        for (properties, expected) in cases {
            assert_eq!(provider_with(&properties).application_name(), expected);
        }
    }

    #[test]
    fn parse_version_string_reports_malformed_input() {
        // Arrange
        let provider = provider_with(&[]);

        // Act
        let parsed = provider.parse_version_string("2.3").unwrap();
        let failed = provider.parse_version_string("not-a-version");

        // Assert
        assert_eq!(parsed, Version::new(2, 3));
        assert!(!parsed.is_pre_release());
        assert!(!parsed.is_nightly());
        assert!(matches!(failed, Err(VersionError::MalformedString { .. })));
    }

    #[test]
    fn about_text_joins_name_and_canonical_version() {
        // Arrange
        let provider = provider_with(&[
            (PNAME_APPLICATION_NAME, "Example"),
            (PNAME_APPLICATION_VERSION, "2.3-beta.42"),
        ]);

        // Act
        let text = about_text(&provider);

        // Assert
        assert_eq!(text, "Example 2.3-beta.42");
    }
}
