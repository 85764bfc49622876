//! Engine configuration
//!
//! Connectivity policy and layout spacing, loaded from a JSON file. Every
//! field is optional; anything left out falls back to the built-in default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::lineage::LayoutOptions;
use crate::policy::ValidationPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-category connectivity overrides
    pub policy: ValidationPolicy,
    /// Lineage layout spacing and direction
    pub layout: LayoutOptions,
}

impl EngineConfig {
    /// Parse and check a config from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Load a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded engine config from {:?} ({} category override(s))",
            path,
            config.policy.categories.len()
        );
        Ok(config)
    }

    /// Load a config file if one was given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn check(&self) -> Result<()> {
        let layout = &self.layout;
        for (name, value) in [
            ("levelSpacing", layout.level_spacing),
            ("columnSpacing", layout.column_spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GraphError::invalid_config(format!(
                    "layout.{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
