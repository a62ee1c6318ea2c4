//! Wire types for the releases API

use serde::Deserialize;

/// One platform/architecture-specific artifact of a release
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Build {
    pub arch: String,
    pub os: String,
    pub url: String,
}

/// One published version of the product
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProductRelease {
    pub version: String,
    pub name: String,
    pub is_prerelease: bool,
    /// ISO-8601 creation timestamp, used only for pagination ordering
    pub timestamp_created: String,
    pub builds: Vec<Build>,
}

impl ProductRelease {
    /// Returns the first build matching the given os and arch identifiers.
    pub fn build_for(&self, os: &str, arch: &str) -> Option<&Build> {
        self.builds.iter().find(|b| b.os == os && b.arch == arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_release_deserializes_from_api_payload() {
        let release: ProductRelease = serde_json::from_value(json!({
            "version": "0.5.0",
            "name": "hcp",
            "is_prerelease": false,
            "timestamp_created": "2024-03-01T10:00:00.000Z",
            "builds": [
                {"arch": "amd64", "os": "linux", "url": "https://example.com/hcp_linux_amd64.zip"},
                {"arch": "arm64", "os": "darwin", "url": "https://example.com/hcp_darwin_arm64.zip"}
            ]
        }))
        .unwrap();

        assert_eq!(release.version, "0.5.0");
        assert!(!release.is_prerelease);
        assert_eq!(release.builds.len(), 2);
    }

    #[test]
    fn build_for_returns_first_matching_build() {
        let release = ProductRelease {
            version: "0.5.0".to_string(),
            name: "hcp".to_string(),
            is_prerelease: false,
            timestamp_created: "2024-03-01T10:00:00.000Z".to_string(),
            builds: vec![
                Build {
                    arch: "amd64".to_string(),
                    os: "linux".to_string(),
                    url: "https://example.com/a.zip".to_string(),
                },
                Build {
                    arch: "amd64".to_string(),
                    os: "linux".to_string(),
                    url: "https://example.com/b.zip".to_string(),
                },
            ],
        };

        assert_eq!(
            release.build_for("linux", "amd64").map(|b| b.url.as_str()),
            Some("https://example.com/a.zip")
        );
        assert!(release.build_for("windows", "386").is_none());
    }
}
