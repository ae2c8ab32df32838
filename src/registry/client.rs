//! Packagist API client
//!
//! Minimal client for the package listing and per-package metadata endpoints.

use crate::Result;
use crate::registry::PackageName;
use core::time::Duration;
use ohno::IntoAppError;
use serde::Deserialize;

const LOG_TARGET: &str = "  registry";

/// Response body of the listing endpoint, reduced to the field we need.
#[derive(Debug, Deserialize)]
struct PackageList {
    #[serde(rename = "packageNames")]
    package_names: Vec<String>,
}

/// Response body of the metadata endpoint, reduced to the fields we need.
#[derive(Debug, Deserialize)]
struct PackageEnvelope {
    #[serde(default)]
    package: PackageMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct PackageMetadata {
    #[serde(default)]
    repository: Option<String>,
}

/// Registry API client
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a new registry client against the given base URL.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent("packagist-survey")
                .timeout(request_timeout)
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the full ordered list of package names known to the registry.
    ///
    /// A non-success response or transport failure is fatal for the run and
    /// propagates. Malformed names in the listing are dropped.
    pub async fn list_packages(&self) -> Result<Vec<PackageName>> {
        let url = format!("{}/packages/list.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .into_app_err("fetching package listing")?
            .error_for_status()
            .into_app_err("package listing request was rejected")?;

        let listing: PackageList = response.json().await.into_app_err("decoding package listing")?;

        let mut packages = Vec::with_capacity(listing.package_names.len());
        for raw in &listing.package_names {
            match PackageName::parse(raw) {
                Ok(package) => packages.push(package),
                Err(e) => log::debug!(target: LOG_TARGET, "Ignoring malformed package name '{raw}': {e:#}"),
            }
        }

        Ok(packages)
    }

    /// Resolve the source-repository URL declared for a package.
    ///
    /// Returns `None` when the metadata endpoint answers with a non-success
    /// status or the record carries no repository field. Transport failures
    /// propagate to the caller.
    pub async fn resolve_repository(&self, package: &PackageName) -> Result<Option<String>> {
        let url = format!("{}/packages/{}/{}.json", self.base_url, package.vendor(), package.name());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .into_app_err_with(|| format!("fetching metadata for {package}"))?;

        if !response.status().is_success() {
            log::debug!(target: LOG_TARGET, "No metadata for {package} (status {})", response.status());
            return Ok(None);
        }

        let envelope: PackageEnvelope = response.json().await.into_app_err_with(|| format!("decoding metadata for {package}"))?;

        Ok(envelope.package.repository.filter(|repository| !repository.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = RegistryClient::new("https://packagist.org/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "https://packagist.org");
    }

    #[test]
    fn test_metadata_without_repository_deserializes() {
        let envelope: PackageEnvelope = serde_json::from_str(r#"{"package":{"name":"acme/foo"}}"#).unwrap();
        assert_eq!(envelope.package.repository, None);
    }

    #[test]
    fn test_metadata_with_repository_deserializes() {
        let envelope: PackageEnvelope = serde_json::from_str(r#"{"package":{"repository":"https://github.com/acme/foo"}}"#).unwrap();
        assert_eq!(envelope.package.repository.as_deref(), Some("https://github.com/acme/foo"));
    }

    #[test]
    fn test_listing_deserializes() {
        let listing: PackageList = serde_json::from_str(r#"{"packageNames":["acme/foo","acme/bar"]}"#).unwrap();
        assert_eq!(listing.package_names, vec!["acme/foo", "acme/bar"]);
    }
}
