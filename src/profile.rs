// src/profile.rs

//! Build profiles
//!
//! A profile captures the platform/compiler/arch/build-type context supplied
//! by the invoker. It is read-only input to resolution: recipes branch on it
//! through `[[when]]` rules, never the other way around.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};

/// Build type handed to the external build system
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum BuildType {
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

/// Externally supplied build context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub os: String,
    pub compiler: String,
    pub compiler_version: String,
    pub build_type: BuildType,
    pub arch: String,
}

impl Profile {
    /// Create a profile with every field given
    pub fn new(
        os: impl Into<String>,
        compiler: impl Into<String>,
        compiler_version: impl Into<String>,
        build_type: BuildType,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            os: os.into(),
            compiler: compiler.into(),
            compiler_version: compiler_version.into(),
            build_type,
            arch: arch.into(),
        }
    }

    /// Detect a default profile from the host environment
    ///
    /// The invoker normally overrides some of these via `-s` settings.
    pub fn detect() -> Self {
        let os = match std::env::consts::OS {
            "linux" => "Linux",
            "macos" => "Macos",
            "windows" => "Windows",
            other => other,
        };

        let compiler = if os == "Macos" { "apple-clang" } else { "gcc" };

        Self {
            os: os.to_string(),
            compiler: compiler.to_string(),
            compiler_version: String::new(),
            build_type: BuildType::Release,
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// Apply one `key=value` setting from the command line
    ///
    /// Recognized keys: os, compiler, compiler_version, build_type, arch.
    pub fn apply_setting(&mut self, setting: &str) -> Result<()> {
        let (key, value) = setting
            .split_once('=')
            .ok_or_else(|| Error::Parse(format!("Invalid setting '{}', expected key=value", setting)))?;

        match key.trim() {
            "os" => self.os = value.trim().to_string(),
            "compiler" => self.compiler = value.trim().to_string(),
            "compiler_version" => self.compiler_version = value.trim().to_string(),
            "arch" => self.arch = value.trim().to_string(),
            "build_type" => {
                self.build_type = BuildType::from_str(value.trim()).map_err(|_| {
                    Error::Parse(format!(
                        "Unknown build_type '{}' (expected Debug, Release, RelWithDebInfo, or MinSizeRel)",
                        value.trim()
                    ))
                })?;
            }
            other => {
                return Err(Error::Parse(format!(
                    "Unknown setting '{}' (expected os, compiler, compiler_version, build_type, or arch)",
                    other
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}-{}/{}/{}",
            self.os, self.compiler, self.compiler_version, self.build_type, self.arch
        )
    }
}
