//! Manifest - the declarative desired-state document
//!
//! A manifest names a component, describes what it should do, and carries a
//! mutable status block that the reconciliation engine rewrites while it runs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::Phase;
use crate::error::{Result, VibeError};

/// Desired-state declaration driving one reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub metadata: ManifestMetadata,
    pub spec: ManifestSpec,
    #[serde(default)]
    pub status: ManifestStatus,
}

/// Identity of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,
    pub version: String,
}

/// What the component is supposed to be
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSpec {
    /// Free-text intent
    pub intent: String,
    pub constraints: TechConstraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_spec: Option<VisualSpec>,
    pub functional_spec: FunctionalSpec,
}

/// Tech stack the implementation must use
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TechConstraints {
    pub framework: String,
    pub language: String,
    #[serde(default)]
    pub testing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisualSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub elements: Vec<String>,
}

/// States, behaviors and inputs the component must exhibit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionalSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<String>>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub behaviors: Vec<String>,
}

/// Mutable status block, owned by the engine during a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestStatus {
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub current_loop: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default, rename = "diff", skip_serializing_if = "Option::is_none")]
    pub divergence: Option<i64>,
}

impl Manifest {
    /// Create a manifest in the `Pending` phase
    pub fn new(name: impl Into<String>, version: impl Into<String>, spec: ManifestSpec) -> Self {
        Self {
            metadata: ManifestMetadata {
                name: name.into(),
                version: version.into(),
            },
            spec,
            status: ManifestStatus::default(),
        }
    }

    /// Load a manifest from disk.
    ///
    /// `.yml` / `.yaml` files are read as YAML, everything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yml") || e.eq_ignore_ascii_case("yaml"));

        let manifest: Self = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        log::info!(
            "Loaded manifest {} v{} from {}",
            manifest.metadata.name,
            manifest.metadata.version,
            path.display()
        );
        Ok(manifest)
    }

    /// Check that the specification block is well formed
    pub fn validate(&self) -> Result<()> {
        if self.metadata.name.trim().is_empty() {
            return Err(VibeError::InvalidManifest("metadata.name is empty".to_string()));
        }
        if self.metadata.version.trim().is_empty() {
            return Err(VibeError::InvalidManifest("metadata.version is empty".to_string()));
        }
        if self.spec.intent.trim().is_empty() {
            return Err(VibeError::InvalidManifest("spec.intent is empty".to_string()));
        }
        let functional = &self.spec.functional_spec;
        if functional.states.is_empty() && functional.behaviors.is_empty() {
            return Err(VibeError::InvalidManifest(
                "spec.functionalSpec must list at least one state or behavior".to_string(),
            ));
        }
        Ok(())
    }
}
