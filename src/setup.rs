//! Top-level run: resolve, install, and configure the HCP CLI

use anyhow::Context;
use semver::{Version, VersionReq};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::Inputs;
use crate::install::cache::ToolCache;
use crate::install::path::add_path;
use crate::release::catalog::HttpReleaseCatalog;
use crate::release::resolver::{Resolution, resolve};

/// Ensures the requested hcp version is installed and on PATH, then runs the
/// post-install conveniences.
pub async fn run(inputs: Inputs) -> anyhow::Result<()> {
    let tool_cache = ToolCache::default();
    let catalog = HttpReleaseCatalog::default();

    // The short-circuit only applies to an unset specifier: any cached
    // version satisfies it.
    let cached_any = tool_cache.find("hcp", &VersionReq::STAR);
    let has_cached_installation = cached_any.is_some();

    let release = match resolve(&inputs.version, has_cached_installation, &catalog).await? {
        Resolution::AlreadyInstalled => {
            let dir = cached_any.expect("short-circuit implies a cache hit");
            add_path(&dir);
            return Ok(());
        }
        Resolution::Release(release) => release,
    };

    info!("resolved hcp version {}", release.version);

    let dir = match exact_cached(&tool_cache, &release.version) {
        Some(dir) => {
            debug!("cached installation found");
            dir
        }
        None => crate::install::install(&release, &tool_cache).await?,
    };
    add_path(&dir);

    check_authentication().await?;
    configure_quiet_profile().await?;
    if !inputs.project_id.is_empty() {
        configure_project(&inputs.project_id).await?;
    }

    Ok(())
}

fn exact_cached(tool_cache: &ToolCache, version: &str) -> Option<std::path::PathBuf> {
    let version = Version::parse(version).ok()?;
    let exact = VersionReq::parse(&format!("={version}")).ok()?;
    tool_cache.find("hcp", &exact)
}

/// Warns when the freshly installed CLI is not authenticated. Never fails the
/// run; authentication is a separate workflow step.
async fn check_authentication() -> anyhow::Result<()> {
    let status = Command::new("hcp")
        .args(["auth", "print-access-token"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .context("failed to execute hcp")?;

    if !status.success() {
        warn!(
            "The hcp CLI is not authenticated. \
             Authenticate by adding the \"hashicorp/hcp-auth-action\" step prior to this one."
        );
    }

    Ok(())
}

/// Disables interactive prompting. Not supported before 0.4.0, so a failure
/// only warns.
async fn configure_quiet_profile() -> anyhow::Result<()> {
    let result = Command::new("hcp")
        .args(["profile", "set", "core/quiet", "true"])
        .status()
        .await;

    match result {
        Ok(status) if status.success() => {}
        _ => {
            warn!(
                "Failed to configure the profile to be quiet. \
                 This is not supported in versions < 0.4.0."
            );
        }
    }

    Ok(())
}

async fn configure_project(project_id: &str) -> anyhow::Result<()> {
    let status = Command::new("hcp")
        .args(["profile", "set", "--quiet", "project_id", project_id])
        .status()
        .await
        .context("failed to execute hcp")?;

    anyhow::ensure!(
        status.success(),
        "failed to set project_id on the hcp profile"
    );

    Ok(())
}
