use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use release_ident::config::{ConfigurationStore, FileConfigStore, PNAME_UPDATE_CHECK_ENABLED, PNAME_UPDATE_REPOSITORY};
use release_ident::updates::UpdateStatus;
use release_ident::{about_text, paths, updates, version, BuildVersionProvider, Version, VersionProvider};
use std::cmp::Ordering;
use std::time::Duration;

const UPDATE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Parse, compare and sort application release identifiers.
#[derive(Parser)]
#[command(name = "release-ident", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the name and version of this build.
    Current,

    /// Break a version string into its fields.
    Parse { text: String },

    /// Print `<`, `=` or `>` for two versions.
    Compare { a: String, b: String },

    /// Print versions oldest first.
    Sort {
        /// Print only the newest version.
        #[arg(long)]
        newest: bool,

        #[arg(required = true)]
        versions: Vec<String>,
    },

    /// Look up the latest published release.
    CheckUpdates {
        /// GitHub `owner/name`; defaults to the configured repository.
        #[arg(long)]
        repository: Option<String>,

        /// Open the releases page when an update is available.
        #[arg(long)]
        open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Current => {
            let provider = load_provider()?;
            println!("{}", about_text(&provider));
        }
        Command::Parse { text } => print_fields(&version::parse_version_string(&text)?),
        Command::Compare { a, b } => {
            let a = version::parse_version_string(&a)?;
            let b = version::parse_version_string(&b)?;
            println!("{} {} {}", a, ordering_symbol(a.compare(&b)), b);
        }
        Command::Sort { newest, versions } => {
            let mut versions = versions
                .iter()
                .map(|text| version::parse_version_string(text))
                .collect::<Result<Vec<_>, _>>()?;

            if newest {
                if let Some(latest) = version::newest(&versions) {
                    println!("{}", latest);
                }
                return Ok(());
            }

            version::sort_versions(&mut versions);
            for v in &versions {
                println!("{}", v);
            }
        }
        Command::CheckUpdates { repository, open } => check_updates(repository, open).await?,
    }

    Ok(())
}

fn load_provider() -> Result<BuildVersionProvider<FileConfigStore>> {
    let config = FileConfigStore::open().context("Could not load configuration")?;
    Ok(BuildVersionProvider::new(config))
}

async fn check_updates(repository: Option<String>, open: bool) -> Result<()> {
    let provider = load_provider()?;
    let config = provider.config();

    if !config.get_bool(PNAME_UPDATE_CHECK_ENABLED, true) {
        log::info!("Update checks disabled by {}", PNAME_UPDATE_CHECK_ENABLED);
        return Ok(());
    }

    let repository = repository
        .unwrap_or_else(|| config.get_string_or(PNAME_UPDATE_REPOSITORY, updates::DEFAULT_REPOSITORY));
    let current = provider.current_version();

    let status = match tokio::time::timeout(
        UPDATE_CHECK_TIMEOUT,
        updates::check_for_updates(&repository, &current)
    ).await {
        Ok(Ok(true)) => match updates::latest_version() {
            Some(latest) => UpdateStatus::Available(latest.clone()),
            None => UpdateStatus::Unknown("latest release was not recorded".to_string()),
        },
        Ok(Ok(false)) => UpdateStatus::UpToDate,
        Ok(Err(e)) => {
            log::warn!("Update check failed: {}", e);
            UpdateStatus::Unknown(e.to_string())
        }
        Err(_) => {
            log::warn!("Update check timed out");
            UpdateStatus::Unknown(format!("timed out after {}s", UPDATE_CHECK_TIMEOUT.as_secs()))
        }
    };

    println!("{}", status.describe(&current));

    if open && matches!(status, UpdateStatus::Available(_)) {
        paths::open_url(&updates::releases_page_url(&repository))?;
    }

    Ok(())
}

fn print_fields(version: &Version) {
    println!("major: {}", version.major());
    println!("minor: {}", version.minor());
    println!("pre-release: {}", version.pre_release_id().unwrap_or("-"));
    println!("nightly: {}", version.nightly_build_id().unwrap_or("-"));
}

fn ordering_symbol(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    }
}
