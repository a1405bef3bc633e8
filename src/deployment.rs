//! Deployment-package descriptors.
//!
//! A deployment package names a set of bundles shipped together. The
//! descriptor is plain data; the only behavior here is decoding it, and a
//! malformed document is reported as [`ErrorCode::DecodeError`].
//!
//! ```toml
//! name = "edge-gateway"
//! version = "2.1.0"
//!
//! [[bundles]]
//! name = "modem-manager"
//! version = "1.4.2"
//! ```

use crate::{ErrorCode, PlatformError, Result};
use serde::Deserialize;

/// A package and the bundles it contains.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentPackage {
    name: String,
    version: String,
    #[serde(default)]
    bundles: Vec<BundleInfo>,
}

/// One bundle inside a [`DeploymentPackage`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleInfo {
    name: String,
    version: String,
}

impl DeploymentPackage {
    /// Package with no bundles.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            bundles: Vec::new(),
        }
    }

    /// Append a bundle.
    #[must_use]
    pub fn with_bundle(mut self, bundle: BundleInfo) -> Self {
        self.bundles.push(bundle);
        self
    }

    /// Decode a TOML descriptor.
    ///
    /// Fails with [`ErrorCode::DecodeError`], the parser error as cause.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| {
            PlatformError::with_cause(ErrorCode::DecodeError, err, ["deployment package descriptor"])
        })
    }

    /// Package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package version, as written in the descriptor.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Bundles in descriptor order.
    pub fn bundles(&self) -> &[BundleInfo] {
        &self.bundles
    }

    /// Look up a bundle by name.
    pub fn bundle(&self, name: &str) -> Option<&BundleInfo> {
        self.bundles.iter().find(|bundle| bundle.name == name)
    }
}

impl BundleInfo {
    /// Bundle descriptor.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Bundle name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bundle version.
    pub fn version(&self) -> &str {
        &self.version
    }
}
