pub mod config;
pub mod paths;
pub mod provider;
pub mod updates;
pub mod version;

pub use provider::{about_text, BuildVersionProvider, VersionProvider};
pub use version::{parse_version_string, Version, VersionError};
