//! Targets document loading.
//!
//! The targets document groups name/address pairs into sections:
//!
//! ```json
//! {
//!     "internal": { "vps_soul23": "https://vps.example.com/health" },
//!     "company": { "website": "https://example.com" },
//!     "external": { "openai": "https://status.openai.com" },
//!     "strategies": { "website": "reachability" }
//! }
//! ```
//!
//! The Spanish section names (`internos`, `sitios_empresa`,
//! `externos`) are accepted as aliases. Targets keep document order.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error_handling::ConfigError;
use crate::providers::StrategyKind;

/// One named thing being health-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Name used for strategy selection and as the report key prefix
    pub name: String,
    /// URL or bare IP address
    pub address: String,
}

impl Target {
    /// Creates a target from a name and address.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// An ordered dictionary of targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetGroup(pub Vec<Target>);

impl TargetGroup {
    /// Iterates targets in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.0.iter()
    }

    /// Number of targets in the group.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the group has no targets.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Target> for TargetGroup {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        TargetGroup(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for TargetGroup {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GroupVisitor;

        impl<'de> Visitor<'de> for GroupVisitor {
            type Value = TargetGroup;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping target names to addresses")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut targets = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, address)) = access.next_entry::<String, String>()? {
                    targets.push(Target { name, address });
                }
                Ok(TargetGroup(targets))
            }
        }

        deserializer.deserialize_map(GroupVisitor)
    }
}

/// The parsed targets document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitesDocument {
    /// Internal services
    #[serde(default, alias = "internos")]
    pub internal: TargetGroup,
    /// Company sites
    #[serde(default, alias = "sitios_empresa")]
    pub company: TargetGroup,
    /// External providers
    #[serde(default, alias = "externos")]
    pub external: TargetGroup,
    /// Exact-name strategy overrides
    #[serde(default)]
    pub strategies: HashMap<String, StrategyKind>,
}

impl SitesDocument {
    /// Report sections in output order.
    pub fn groups(&self) -> [(&'static str, &TargetGroup); 3] {
        [
            ("internal", &self.internal),
            ("company", &self.company),
            ("external", &self.external),
        ]
    }

    /// Parses a targets document from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }
}

/// Reads and parses the targets document.
///
/// The document is read fresh on every run.
///
/// # Errors
///
/// Returns `ConfigError::Read` if the file cannot be read, or
/// `ConfigError::Parse` if it is not valid JSON of the expected shape.
pub async fn load_sites(path: &Path) -> Result<SitesDocument, ConfigError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let document = SitesDocument::from_json(&raw)?;
    log::debug!(
        "Loaded {} internal, {} company, {} external targets from {}",
        document.internal.len(),
        document.company.len(),
        document.external.len(),
        path.display()
    );
    Ok(document)
}
