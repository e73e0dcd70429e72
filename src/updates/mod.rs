use crate::version::Version;
use anyhow::{bail, Result};
use serde::Deserialize;
use std::sync::OnceLock;

static LATEST_VERSION: OnceLock<Version> = OnceLock::new();

pub const DEFAULT_REPOSITORY: &str = "release-ident/release-ident";

/// Outcome of an update check as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Available(Version),
    UpToDate,
    /// The check failed; the reason is kept for display.
    Unknown(String),
}

impl UpdateStatus {
    pub fn describe(&self, current: &Version) -> String {
        match self {
            Self::Available(latest) => format!("{} -> {}", current, latest),
            Self::UpToDate => format!("{} is up to date", current),
            Self::Unknown(reason) => format!("Could not check for updates (current: {}): {}", current, reason),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
}

/// The newer release found by the last successful [`check_for_updates`].
pub fn latest_version() -> Option<&'static Version> {
    LATEST_VERSION.get()
}

pub async fn check_for_updates(repository: &str, current: &Version) -> Result<bool> {
    let url = format!(
        "https://api.github.com/repos/{}/releases/latest",
        repository
    );

    let client = reqwest::Client::builder()
        .user_agent("release-ident")
        .build()?;

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        bail!("Release lookup for {} returned {}", repository, response.status());
    }

    let release: GitHubRelease = response.json().await?;

    if let Some(latest) = newer_release(&release.tag_name, current) {
        log::info!("Update available: {} -> {}", current, latest);
        let _ = LATEST_VERSION.set(latest);
        return Ok(true);
    }

    log::info!("No updates available (current: {})", current);
    Ok(false)
}

/// Parses a release tag such as `v2.3-beta.42`.
pub fn parse_release_tag(tag: &str) -> Option<Version> {
    match tag.trim_start_matches('v').parse() {
        Ok(version) => Some(version),
        Err(e) => {
            log::debug!("Ignoring release tag {:?}: {}", tag, e);
            None
        }
    }
}

pub fn is_update_available(latest_tag: &str, current: &Version) -> bool {
    newer_release(latest_tag, current).is_some()
}

fn newer_release(latest_tag: &str, current: &Version) -> Option<Version> {
    parse_release_tag(latest_tag).filter(|latest| latest.is_newer_than(current))
}

pub fn releases_page_url(repository: &str) -> String {
    format!("https://github.com/{}/releases/latest", repository)
}
