//! Shading Settings
//!
//! Configuration for the material/shader system.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use texel::settings::ShadingSettings;
//!
//! // Defaults: data/ as data directory, gbuffer.wgsl as G-buffer source
//! let settings = ShadingSettings::default();
//!
//! // Or from a JSON file; missing keys keep their defaults
//! let settings = ShadingSettings::from_json_file("shading.json")?;
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingSettings {
    /// Root of the engine data directory.
    pub data_directory: PathBuf,
    /// G-buffer template every variant is generated from, relative to
    /// [`ShadingSettings::shader_directory`].
    pub gbuffer_shader: PathBuf,
}

impl Default for ShadingSettings {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("data"),
            gbuffer_shader: PathBuf::from("gbuffer.wgsl"),
        }
    }
}

impl ShadingSettings {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Directory searched for shader templates before the embedded set.
    #[must_use]
    pub fn shader_directory(&self) -> PathBuf {
        self.data_directory.join("shaders")
    }
}
