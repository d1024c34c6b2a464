//! Functions for loading context settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::*;

/// A structure containing configuration data which are applied once the GL function
/// pointers have been loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Installs the driver debug message callback if the context supports it.
    pub debug_output: bool,
    /// Makes debug messages being reported from the call which raised them.
    pub synchronous_debug_output: bool,
    /// Global switch of shader hot reload. `Shader::enable_auto_reload` is a no-op
    /// when this is disabled.
    pub hot_reload: bool,
    /// Alignment requirements for the start of each pixel row when reading pixels back.
    pub pack_alignment: i32,
    /// Alignment requirements for the start of each pixel row when uploading pixels.
    pub unpack_alignment: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug_output: false,
            synchronous_debug_output: true,
            hot_reload: true,
            pack_alignment: 1,
            unpack_alignment: 1,
        }
    }
}

impl Settings {
    /// Parses settings from a JSON string. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Settings> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let json = fs::read_to_string(path.as_ref()).map_err(|err| {
            Error::Io(format!("{}: {}", path.as_ref().display(), err))
        })?;

        Settings::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        for &(name, v) in &[
            ("pack_alignment", self.pack_alignment),
            ("unpack_alignment", self.unpack_alignment),
        ] {
            match v {
                1 | 2 | 4 | 8 => {}
                _ => {
                    return Err(Error::Settings(format!(
                        "{} must be one of 1, 2, 4 or 8, but got {}",
                        name, v
                    )));
                }
            }
        }

        Ok(())
    }
}
