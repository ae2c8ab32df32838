//! Package registry access
//!
//! Talks to a Packagist-shaped registry: one endpoint listing every package
//! name, and one per-package metadata endpoint carrying the declared source
//! repository. Everything else the registry serves is ignored.

mod client;
mod package_name;

pub use client::RegistryClient;
pub use package_name::PackageName;
