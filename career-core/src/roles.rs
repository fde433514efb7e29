//! Role catalog: static reference text per role name.
//!
//! The catalog ships embedded in the binary (`roles.toml`) and can be
//! replaced by a file of the same shape. Lookups never fail; a role the
//! catalog does not know gets [`RoleInfo::placeholder`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{CareerError, Result};

const EMBEDDED_ROLES: &str = include_str!("roles.toml");

pub const PLACEHOLDER_DESCRIPTION: &str = "Details not available";
pub const PLACEHOLDER_TEXT: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub description: String,
    pub skills: String,
    pub potential_companies: String,
}

impl RoleInfo {
    pub fn placeholder() -> Self {
        Self {
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            skills: PLACEHOLDER_TEXT.to_string(),
            potential_companies: PLACEHOLDER_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RoleEntry {
    name: String,
    #[serde(flatten)]
    info: RoleInfo,
}

#[derive(Debug, Deserialize)]
struct RoleFile {
    #[serde(default)]
    role: Vec<RoleEntry>,
}

/// Immutable role name → [`RoleInfo`] map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleCatalog {
    roles: BTreeMap<String, RoleInfo>,
}

impl RoleCatalog {
    /// The catalog compiled into the crate, parsed once.
    pub fn embedded() -> &'static RoleCatalog {
        static CATALOG: OnceLock<RoleCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            Self::from_toml(EMBEDDED_ROLES).unwrap_or_else(|e| {
                tracing::error!(error = %e, "embedded role catalog is invalid");
                RoleCatalog::default()
            })
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: RoleFile = toml::from_str(content)?;
        let mut roles = BTreeMap::new();
        for entry in file.role {
            if roles.insert(entry.name.clone(), entry.info).is_some() {
                return Err(CareerError::Config(format!(
                    "duplicate role '{}' in catalog",
                    entry.name
                )));
            }
        }
        Ok(Self { roles })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CareerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), roles = catalog.len(), "role catalog loaded");
        Ok(catalog)
    }

    /// Override file if given, else the embedded catalog.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::embedded().clone()),
        }
    }

    pub fn get(&self, role: &str) -> Option<&RoleInfo> {
        self.roles.get(role)
    }

    /// Info for `role`, or the placeholder when the catalog has no entry.
    pub fn lookup(&self, role: &str) -> RoleInfo {
        match self.get(role) {
            Some(info) => info.clone(),
            None => {
                tracing::debug!(role, "no catalog entry, using placeholder");
                RoleInfo::placeholder()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Entries in role-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleInfo)> {
        self.roles.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog() {
        let catalog = RoleCatalog::embedded();
        assert_eq!(catalog.len(), 34);
        let web = catalog.get("Web Developer").unwrap();
        assert!(web.skills.contains("JavaScript"));
        assert!(catalog.get("Technical Services/Help Desk/Tech Support").is_some());
        assert!(catalog.get("Software Quality Assurance (QA) / Testing").is_some());
    }

    #[test]
    fn test_placeholder_fallback() {
        let info = RoleCatalog::embedded().lookup("Astronaut");
        assert_eq!(info.description, "Details not available");
        assert_eq!(info.skills, "N/A");
        assert_eq!(info.potential_companies, "N/A");
    }

    #[test]
    fn test_override_catalog() {
        let catalog = RoleCatalog::from_toml(
            r#"
[[role]]
name = "Astronaut"
description = "Flies."
skills = "Orbital mechanics"
potential_companies = "ISRO"
"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("Astronaut").skills, "Orbital mechanics");
        assert_eq!(catalog.lookup("Web Developer"), RoleInfo::placeholder());
    }

    #[test]
    fn test_duplicate_rejected() {
        let entry = "[[role]]\nname = \"A\"\ndescription = \"d\"\nskills = \"s\"\npotential_companies = \"p\"\n";
        assert!(RoleCatalog::from_toml(&format!("{entry}{entry}")).is_err());
    }
}
