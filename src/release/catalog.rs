//! Release catalog client for the HashiCorp releases API

#[cfg(test)]
use mockall::automock;

use chrono::{DateTime, FixedOffset};
use semver::{Version, VersionReq};
use tracing::{debug, warn};

use crate::config::{DEFAULT_BASE_URL, PAGE_LIMIT, PRODUCT};
use crate::release::error::{CatalogError, ResolveError};
use crate::release::types::ProductRelease;

/// Trait for resolving releases against a catalog
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseCatalog: Send + Sync {
    /// Fetches the release record for one exact version
    async fn release_version(&self, version: &Version) -> Result<ProductRelease, ResolveError>;

    /// Scans the catalog newest-first and returns the first release whose
    /// version satisfies the constraint
    async fn newest_compliant(
        &self,
        constraint: &VersionReq,
    ) -> Result<ProductRelease, ResolveError>;
}

/// HTTP implementation over the releases API
pub struct HttpReleaseCatalog {
    client: reqwest::Client,
    base_url: String,
    product: String,
}

impl HttpReleaseCatalog {
    /// Creates a catalog client with a custom base URL and product slug
    pub fn new(base_url: &str, product: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("setup-hcp")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            product: product.to_string(),
        }
    }

    async fn fetch_version(&self, version: &Version) -> Result<ProductRelease, CatalogError> {
        let url = format!("{}/v1/releases/{}/{}", self.base_url, self.product, version);
        debug!("fetching release version from {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(version.to_string()));
        }

        if !status.is_success() {
            warn!("releases API returned status {status}: {url}");
            return Err(CatalogError::InvalidResponse(format!(
                "Unexpected status: {status}"
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse release response: {e}");
            CatalogError::InvalidResponse(e.to_string())
        })
    }

    /// Pages through the catalog, newest-first, until a release satisfies the
    /// constraint.
    ///
    /// The API exposes no next-page token; the cursor is the creation
    /// timestamp of the oldest release seen so far across all pages. Pages are
    /// not guaranteed strictly sorted, so the minimum may re-fetch a few
    /// already-seen releases rather than skip any. The first satisfying
    /// release in delivery order wins; matches are never compared against each
    /// other.
    async fn scan_pages(&self, constraint: &VersionReq) -> Result<ProductRelease, CatalogError> {
        let mut cursor: Option<String> = None;
        let mut oldest: Option<DateTime<FixedOffset>> = None;

        loop {
            let url = match &cursor {
                Some(after) => format!(
                    "{}/v1/releases/{}?limit={}&after={}",
                    self.base_url, self.product, PAGE_LIMIT, after
                ),
                None => format!(
                    "{}/v1/releases/{}?limit={}",
                    self.base_url, self.product, PAGE_LIMIT
                ),
            };
            debug!("fetching releases from {url}");

            let response = self.client.get(&url).send().await?;
            let status = response.status();

            if !status.is_success() {
                warn!("releases API returned status {status}: {url}");
                return Err(CatalogError::InvalidResponse(format!(
                    "Unexpected status: {status}"
                )));
            }

            let page: Vec<ProductRelease> = response.json().await.map_err(|e| {
                warn!("Failed to parse releases page: {e}");
                CatalogError::InvalidResponse(e.to_string())
            })?;

            if page.is_empty() {
                return Err(CatalogError::NoReleases { after: cursor });
            }

            for release in page {
                if let Ok(version) = Version::parse(&release.version)
                    && constraint.matches(&version)
                {
                    return Ok(release);
                }

                // Track the oldest release seen so far as the next cursor.
                if let Ok(timestamp) = DateTime::parse_from_rfc3339(&release.timestamp_created)
                    && oldest.is_none_or(|o| timestamp < o)
                {
                    oldest = Some(timestamp);
                    cursor = Some(release.timestamp_created.clone());
                }
            }

            // No parseable timestamp was ever seen, so no further page can be
            // requested.
            if cursor.is_none() {
                return Err(CatalogError::NoCompliantVersion(constraint.to_string()));
            }
        }
    }
}

impl Default for HttpReleaseCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, PRODUCT)
    }
}

#[async_trait::async_trait]
impl ReleaseCatalog for HttpReleaseCatalog {
    async fn release_version(&self, version: &Version) -> Result<ProductRelease, ResolveError> {
        self.fetch_version(version)
            .await
            .map_err(|source| ResolveError::Lookup {
                version: version.to_string(),
                source,
            })
    }

    async fn newest_compliant(
        &self,
        constraint: &VersionReq,
    ) -> Result<ProductRelease, ResolveError> {
        self.scan_pages(constraint)
            .await
            .map_err(|source| ResolveError::Discovery {
                constraint: constraint.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn release_json(version: &str, created: &str) -> String {
        format!(
            r#"{{
                "version": "{version}",
                "name": "hcp",
                "is_prerelease": false,
                "timestamp_created": "{created}",
                "builds": [
                    {{"arch": "amd64", "os": "linux", "url": "https://example.com/hcp_{version}_linux_amd64.zip"}}
                ]
            }}"#
        )
    }

    #[tokio::test]
    async fn release_version_returns_release_for_exact_version() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/v1/releases/hcp/1.2.3")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(release_json("1.2.3", "2024-02-01T00:00:00.000Z"))
            .create_async()
            .await;

        let catalog = HttpReleaseCatalog::new(&server.url(), "hcp");
        let release = catalog
            .release_version(&Version::new(1, 2, 3))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(release.version, "1.2.3");
    }

    #[tokio::test]
    async fn release_version_wraps_not_found_with_requested_version() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/v1/releases/hcp/9.9.9")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let catalog = HttpReleaseCatalog::new(&server.url(), "hcp");
        let result = catalog.release_version(&Version::new(9, 9, 9)).await;

        mock.assert_async().await;
        match result {
            Err(ResolveError::Lookup { version, source }) => {
                assert_eq!(version, "9.9.9");
                assert!(matches!(source, CatalogError::NotFound(v) if v == "9.9.9"));
            }
            other => panic!("expected Lookup error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn newest_compliant_returns_first_match_on_first_page() {
        let mut server = Server::new_async().await;

        let body = format!(
            "[{},{}]",
            release_json("0.6.0", "2024-03-01T00:00:00.000Z"),
            release_json("0.5.0", "2024-02-01T00:00:00.000Z"),
        );
        let mock = server
            .mock("GET", "/v1/releases/hcp")
            .match_query(Matcher::Exact("limit=20".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let catalog = HttpReleaseCatalog::new(&server.url(), "hcp");
        let release = catalog
            .newest_compliant(&VersionReq::STAR)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(release.version, "0.6.0");
    }

    #[tokio::test]
    async fn newest_compliant_uses_minimum_timestamp_as_cursor() {
        let mut server = Server::new_async().await;

        // Out-of-order page: timestamps 05:00, 03:00, 08:00. The cursor for
        // the next page must be the minimum (03:00), not the last element.
        let page1 = format!(
            "[{},{},{}]",
            release_json("0.3.0", "2024-01-05T00:00:00.000Z"),
            release_json("0.1.0", "2024-01-03T00:00:00.000Z"),
            release_json("0.4.0", "2024-01-08T00:00:00.000Z"),
        );
        let page2 = format!("[{}]", release_json("1.0.0", "2024-01-01T00:00:00.000Z"));

        let first = server
            .mock("GET", "/v1/releases/hcp")
            .match_query(Matcher::Exact("limit=20".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/v1/releases/hcp")
            .match_query(Matcher::Exact(
                "limit=20&after=2024-01-03T00:00:00.000Z".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page2)
            .create_async()
            .await;

        let catalog = HttpReleaseCatalog::new(&server.url(), "hcp");
        let constraint = VersionReq::parse(">=1.0.0").unwrap();
        let release = catalog.newest_compliant(&constraint).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(release.version, "1.0.0");
    }

    #[tokio::test]
    async fn newest_compliant_fails_with_no_releases_on_empty_first_page() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/v1/releases/hcp")
            .match_query(Matcher::Exact("limit=20".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let catalog = HttpReleaseCatalog::new(&server.url(), "hcp");
        let result = catalog.newest_compliant(&VersionReq::STAR).await;

        mock.assert_async().await;
        match result {
            Err(ResolveError::Discovery { source, .. }) => {
                assert!(matches!(source, CatalogError::NoReleases { after: None }));
            }
            other => panic!("expected Discovery error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn newest_compliant_fails_after_exhausting_pages() {
        let mut server = Server::new_async().await;

        let page1 = format!("[{}]", release_json("0.2.0", "2024-01-02T00:00:00.000Z"));

        let first = server
            .mock("GET", "/v1/releases/hcp")
            .match_query(Matcher::Exact("limit=20".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page1)
            .create_async()
            .await;
        // The page after the oldest seen release is empty: catalog exhausted.
        let second = server
            .mock("GET", "/v1/releases/hcp")
            .match_query(Matcher::Exact(
                "limit=20&after=2024-01-02T00:00:00.000Z".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let catalog = HttpReleaseCatalog::new(&server.url(), "hcp");
        let constraint = VersionReq::parse(">=5.0.0").unwrap();
        let result = catalog.newest_compliant(&constraint).await;

        first.assert_async().await;
        second.assert_async().await;
        match result {
            Err(ResolveError::Discovery { constraint, source }) => {
                assert_eq!(constraint, ">=5.0.0");
                assert!(matches!(
                    source,
                    CatalogError::NoReleases { after: Some(a) } if a == "2024-01-02T00:00:00.000Z"
                ));
            }
            other => panic!("expected Discovery error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn newest_compliant_stops_when_no_timestamp_is_parseable() {
        let mut server = Server::new_async().await;

        let page = format!("[{}]", release_json("0.2.0", "not-a-timestamp"));
        let mock = server
            .mock("GET", "/v1/releases/hcp")
            .match_query(Matcher::Exact("limit=20".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page)
            .create_async()
            .await;

        let catalog = HttpReleaseCatalog::new(&server.url(), "hcp");
        let constraint = VersionReq::parse(">=5.0.0").unwrap();
        let result = catalog.newest_compliant(&constraint).await;

        mock.assert_async().await;
        match result {
            Err(ResolveError::Discovery { source, .. }) => {
                assert!(matches!(source, CatalogError::NoCompliantVersion(_)));
            }
            other => panic!("expected Discovery error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn newest_compliant_skips_releases_with_invalid_versions() {
        let mut server = Server::new_async().await;

        let page = format!(
            "[{},{}]",
            release_json("not.semver", "2024-01-05T00:00:00.000Z"),
            release_json("0.5.0", "2024-01-04T00:00:00.000Z"),
        );
        let mock = server
            .mock("GET", "/v1/releases/hcp")
            .match_query(Matcher::Exact("limit=20".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page)
            .create_async()
            .await;

        let catalog = HttpReleaseCatalog::new(&server.url(), "hcp");
        let release = catalog
            .newest_compliant(&VersionReq::STAR)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(release.version, "0.5.0");
    }
}
