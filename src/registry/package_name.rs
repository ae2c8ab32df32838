use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::bail;

/// A registry package identifier of the form `vendor/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName {
    vendor: String,
    name: String,
}

impl PackageName {
    /// Parse a `vendor/name` identifier as served by the registry listing.
    pub fn parse(s: &str) -> Result<Self> {
        let Some((vendor, name)) = s.split_once('/') else {
            bail!("invalid package name '{s}': expected 'vendor/name'");
        };

        if vendor.is_empty() || name.is_empty() {
            bail!("invalid package name '{s}': empty vendor or package");
        }

        if name.contains('/') {
            bail!("invalid package name '{s}': too many path segments");
        }

        Ok(Self {
            vendor: vendor.to_string(),
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory name for the local clone: a single flat path component with
    /// the separating slash and any dangerous characters replaced.
    #[must_use]
    pub fn dir_name(&self) -> String {
        format!("{}_{}", sanitize_path_component(&self.vendor), sanitize_path_component(&self.name))
    }
}

impl Display for PackageName {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.vendor, self.name)
    }
}

/// Sanitize a string for use as a path component
///
/// Removes path traversal sequences and dangerous characters to prevent
/// directory traversal attacks and filesystem issues.
#[must_use]
fn sanitize_path_component(s: &str) -> String {
    // First remove path traversal sequences (replace ".." but allow single ".")
    // This preserves names like "my.package" while preventing "../" attacks
    let s = s.replace("..", "__");
    // Then remove other dangerous filesystem characters
    s.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_")
}
