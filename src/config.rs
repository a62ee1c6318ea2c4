use std::path::PathBuf;

// =============================================================================
// Release catalog constants
// =============================================================================

/// Base URL of the HashiCorp releases API
pub const DEFAULT_BASE_URL: &str = "https://api.releases.hashicorp.com";

/// Product slug in the releases API
pub const PRODUCT: &str = "hcp";

/// Number of releases requested per catalog page
pub const PAGE_LIMIT: usize = 20;

/// Inputs consumed by a single run.
///
/// On a GitHub Actions runner these arrive as `INPUT_VERSION` and
/// `INPUT_PROJECT_ID` environment variables; the CLI exposes them as flags
/// with those env fallbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    /// Version specifier: empty, "latest", an exact version, or a range
    pub version: String,
    /// Optional HCP project id to configure on the installed CLI
    pub project_id: String,
}

/// Returns the root directory of the tool cache.
/// Uses $XDG_CACHE_HOME/setup-hcp if XDG_CACHE_HOME is set,
/// otherwise falls back to ~/.cache/setup-hcp,
/// or ./setup-hcp if neither is available.
pub fn cache_dir() -> PathBuf {
    cache_dir_with_env(std::env::var("XDG_CACHE_HOME").ok(), dirs::home_dir())
}

fn cache_dir_with_env(xdg_cache_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let cache_dir = xdg_cache_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));

    cache_dir.join("setup-hcp")
}
