use thiserror::Error;

/// Failures raised while talking to the releases catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no release found for version {0}")]
    NotFound(String),

    #[error("no releases found{}", .after.as_ref().map(|a| format!(" after {a}")).unwrap_or_default())]
    NoReleases { after: Option<String> },

    #[error("no releases satisfy version constraint {0}")]
    NoCompliantVersion(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// One outer error per top-level resolution attempt.
///
/// Every catalog failure is wrapped at the operation boundary with the
/// requested version or constraint, so call sites report uniformly while the
/// original cause stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to retrieve hcp release for version {version}")]
    Lookup {
        version: String,
        #[source]
        source: CatalogError,
    },

    #[error("failed to discover compatible hcp release matching {constraint}")]
    Discovery {
        constraint: String,
        #[source]
        source: CatalogError,
    },

    #[error("invalid version constraint {constraint}")]
    InvalidConstraint {
        constraint: String,
        #[source]
        source: semver::Error,
    },
}
