//! Download, cache, and PATH wiring for a resolved release
//!
//! Everything here is deliberately thin: pick the build for the running
//! platform, download its zip, extract the single binary, store it in the
//! tool cache, and put the cached directory on PATH.

pub mod archive;
pub mod cache;
pub mod path;

use semver::Version;
use thiserror::Error;
use tracing::debug;

use crate::release::types::ProductRelease;
use cache::ToolCache;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("unsupported architecture: {0}")]
    UnsupportedArch(String),

    #[error("unsupported platform: {0}")]
    UnsupportedOs(String),

    #[error("no build found for {os} {arch}")]
    NoBuild { os: String, arch: String },

    #[error("release version {0} is not a valid semantic version")]
    InvalidVersion(String),

    #[error("failed to download {0}")]
    Download(String, #[source] reqwest::Error),

    #[error("download of {url} returned status {status}")]
    DownloadStatus { url: String, status: u16 },

    #[error("binary {0} not found in archive")]
    BinaryNotFound(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Release artifact identifiers for the running platform, using the naming
/// scheme of the releases API.
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
}

impl Platform {
    /// Detects the current platform.
    pub fn current() -> Result<Self, InstallError> {
        Self::from_identifiers(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn from_identifiers(os: &str, arch: &str) -> Result<Self, InstallError> {
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "arm" => "arm",
            "x86" => "386",
            other => return Err(InstallError::UnsupportedArch(other.to_string())),
        };

        let os = match os {
            "linux" => "linux",
            "macos" => "darwin",
            "windows" => "windows",
            other => return Err(InstallError::UnsupportedOs(other.to_string())),
        };

        Ok(Self { os, arch })
    }

    /// Name of the executable inside the release archive.
    pub fn binary_name(&self) -> &'static str {
        if self.os == "windows" { "hcp.exe" } else { "hcp" }
    }
}

/// Downloads the release build for the current platform, extracts the binary,
/// and stores it in the tool cache. Returns the cached directory.
pub async fn install(
    release: &ProductRelease,
    tool_cache: &ToolCache,
) -> Result<std::path::PathBuf, InstallError> {
    let platform = Platform::current()?;

    let build =
        release
            .build_for(platform.os, platform.arch)
            .ok_or_else(|| InstallError::NoBuild {
                os: platform.os.to_string(),
                arch: platform.arch.to_string(),
            })?;

    let version = Version::parse(&release.version)
        .map_err(|_| InstallError::InvalidVersion(release.version.clone()))?;

    debug!(
        "downloading and installing hcp: {}, {}, {}",
        release.version, platform.os, platform.arch
    );

    let archive = download(&build.url).await?;
    let binary = archive::extract_binary(&archive, platform.binary_name())?;

    tool_cache.store("hcp", &version, platform.binary_name(), &binary)
}

async fn download(url: &str) -> Result<Vec<u8>, InstallError> {
    let client = reqwest::Client::builder()
        .user_agent("setup-hcp")
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .expect("Failed to create HTTP client");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| InstallError::Download(url.to_string(), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(InstallError::DownloadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| InstallError::Download(url.to_string(), e))?;

    debug!("downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
