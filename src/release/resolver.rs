//! Version specifier parsing and resolution strategy selection
//!
//! A raw specifier picks one of three strategies: wildcard search (empty or
//! "latest"), direct lookup (exact version), or range search (anything else
//! that parses as a constraint).

use semver::{Version, VersionReq};
use tracing::debug;

use crate::release::catalog::ReleaseCatalog;
use crate::release::error::ResolveError;
use crate::release::types::ProductRelease;

/// Parsed form of the raw version specifier
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSpec {
    /// Empty or "latest": any version is acceptable
    Any,
    /// An exact semantic version, looked up directly
    Exact(Version),
    /// A range constraint, searched across the catalog
    Constraint(VersionReq),
}

impl VersionSpec {
    /// Parses a raw specifier from configuration.
    ///
    /// Space-separated comparator lists (`>=1.0.0 <2.0.0`) are accepted by
    /// normalizing to the comma-separated form `VersionReq` expects.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let raw = raw.trim();

        if raw.is_empty() || raw == "latest" {
            return Ok(Self::Any);
        }

        if let Ok(version) = Version::parse(raw) {
            return Ok(Self::Exact(version));
        }

        parse_constraint(raw).map(Self::Constraint)
    }
}

fn parse_constraint(raw: &str) -> Result<VersionReq, ResolveError> {
    VersionReq::parse(raw)
        .or_else(|_| {
            let normalized = raw.split_whitespace().collect::<Vec<_>>().join(", ");
            VersionReq::parse(&normalized)
        })
        .map_err(|source| ResolveError::InvalidConstraint {
            constraint: raw.to_string(),
            source,
        })
}

/// Outcome of one resolution attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A cached installation already satisfies the request; nothing was
    /// fetched
    AlreadyInstalled,
    /// The single release the specifier resolved to
    Release(ProductRelease),
}

/// Resolves a raw version specifier to a single release.
///
/// `has_cached_installation` is the external cache check: when the specifier
/// is empty and some version is already installed, resolution short-circuits
/// without touching the catalog.
pub async fn resolve(
    raw: &str,
    has_cached_installation: bool,
    catalog: &dyn ReleaseCatalog,
) -> Result<Resolution, ResolveError> {
    let spec = VersionSpec::parse(raw)?;

    if raw.trim().is_empty() && has_cached_installation {
        debug!("cached installation found");
        return Ok(Resolution::AlreadyInstalled);
    }

    let release = match &spec {
        VersionSpec::Any => catalog.newest_compliant(&VersionReq::STAR).await?,
        VersionSpec::Exact(version) => catalog.release_version(version).await?,
        VersionSpec::Constraint(constraint) => catalog.newest_compliant(constraint).await?,
    };

    Ok(Resolution::Release(release))
}
