//! Directory-based tool cache
//!
//! Cached binaries live under `<root>/<tool>/<version>/`, one directory per
//! installed version. Lookup matches cached version directories against a
//! semver constraint.

use std::fs;
use std::path::{Path, PathBuf};

use semver::{Version, VersionReq};
use tracing::debug;

use super::InstallError;

pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cached directory for the highest cached version of `tool`
    /// satisfying `constraint`, or None on a miss.
    pub fn find(&self, tool: &str, constraint: &VersionReq) -> Option<PathBuf> {
        let tool_dir = self.root.join(tool);
        let entries = fs::read_dir(&tool_dir).ok()?;

        let best = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| Version::parse(&entry.file_name().to_string_lossy()).ok())
            .filter(|version| constraint.matches(version))
            .max()?;

        Some(tool_dir.join(best.to_string()))
    }

    /// Writes `content` as `binary_name` under `<root>/<tool>/<version>/` and
    /// returns that directory. The binary is marked executable on unix.
    pub fn store(
        &self,
        tool: &str,
        version: &Version,
        binary_name: &str,
        content: &[u8],
    ) -> Result<PathBuf, InstallError> {
        let dir = self.root.join(tool).join(version.to_string());
        fs::create_dir_all(&dir)?;

        let binary_path = dir.join(binary_name);
        fs::write(&binary_path, content)?;
        mark_executable(&binary_path)?;

        debug!("cached {tool} {version} at {}", dir.display());
        Ok(dir)
    }
}

impl Default for ToolCache {
    fn default() -> Self {
        Self::new(crate::config::cache_dir())
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
