// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that declare a package's identity, its tunable
//! options, its external dependencies, and profile-conditional overrides.

use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A complete recipe describing one native package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Declared options, keyed by option name
    #[serde(default)]
    pub options: BTreeMap<String, OptionDecl>,

    /// External dependencies, in declaration order
    #[serde(default)]
    pub requires: Vec<Requirement>,

    /// Profile-conditional overrides, evaluated in declaration order
    #[serde(default, rename = "when")]
    pub rules: Vec<WhenRule>,
}

impl Recipe {
    /// Look up a dependency by name
    pub fn requirement(&self, name: &str) -> Option<&Requirement> {
        self.requires.iter().find(|r| r.name == name)
    }

    /// Look up an option declaration by name
    pub fn option(&self, name: &str) -> Option<&OptionDecl> {
        self.options.get(name)
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// License identifier (SPDX)
    #[serde(default)]
    pub license: Option<String>,

    /// Author list
    #[serde(default)]
    pub author: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Source globs shipped to the build system
    #[serde(default)]
    pub exports_sources: Vec<String>,
}

/// A single declared option
///
/// An option without `values` ranges over the boolean domain. `export`
/// marks the option for projection into the toolchain file, under `var`
/// when given, otherwise under the option's own name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Allowed values for string-typed options
    #[serde(default)]
    pub values: Option<Vec<String>>,

    /// Declared default; an option without one must be set by a rule
    /// or an explicit override
    #[serde(default)]
    pub default: Option<OptionValue>,

    /// Project this option into the generated toolchain file
    #[serde(default)]
    pub export: bool,

    /// Toolchain variable name override (e.g. shared -> BUILD_SHARED_LIBS)
    #[serde(default)]
    pub var: Option<String>,
}

impl OptionDecl {
    /// Check a value against this option's domain
    pub fn domain_contains(&self, value: &OptionValue) -> bool {
        match (&self.values, value) {
            (None, OptionValue::Bool(_)) => true,
            (None, OptionValue::Str(_)) => false,
            (Some(allowed), OptionValue::Str(s)) => allowed.iter().any(|a| a == s),
            (Some(_), OptionValue::Bool(_)) => false,
        }
    }

    /// Human-readable rendering of the domain, for diagnostics
    pub fn allowed(&self) -> String {
        match &self.values {
            None => "True, False".to_string(),
            Some(values) => values.join(", "),
        }
    }
}

/// A single option value: boolean or enumerated string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    /// Parse override text. `True`/`False` (either case) become booleans,
    /// anything else stays a string.
    pub fn parse_text(raw: &str) -> Self {
        match raw {
            "True" | "true" => Self::Bool(true),
            "False" | "false" => Self::Bool(false),
            other => Self::Str(other.to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

/// One external dependency with optional per-dependency option overrides
///
/// Overrides live in the dependency's own option namespace and never touch
/// an option of the same name on the owning package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    /// Dependency name
    pub name: String,

    /// Semver version constraint (e.g. "^1.82", "~2.16")
    pub version: String,

    /// Option overrides applied to this dependency
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// A profile-conditional override rule
///
/// Present predicate fields must all match the profile. Rules are applied
/// in declaration order; when several match the same option, the last wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhenRule {
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub compiler: Option<String>,
    #[serde(default)]
    pub compiler_version: Option<String>,
    #[serde(default)]
    pub build_type: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,

    /// Target option: `name` for the package, `dep:name` for a dependency
    pub option: String,

    /// Value to assign when the predicate matches
    pub value: OptionValue,
}

impl WhenRule {
    /// Evaluate this rule's predicate against a profile
    pub fn matches(&self, profile: &Profile) -> bool {
        let field = |want: &Option<String>, have: &str| match want {
            Some(w) => w == have,
            None => true,
        };

        field(&self.os, &profile.os)
            && field(&self.compiler, &profile.compiler)
            && field(&self.compiler_version, &profile.compiler_version)
            && field(&self.build_type, profile.build_type.as_ref())
            && field(&self.arch, &profile.arch)
    }
}
