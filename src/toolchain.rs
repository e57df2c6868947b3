// src/toolchain.rs

//! Toolchain variable generation
//!
//! Projects a resolved configuration into the flat key/value artifact the
//! external build system consumes at its configure step, plus the
//! wildcard-qualified option strings handed to its dependency-declaration
//! layer. Output is deterministic: identical input renders byte-identical
//! text, so the external system can cache on file content.

use crate::recipe::OptionValue;
use crate::resolver::ResolvedConfiguration;

const VARS_HEADER: &str = "# Toolchain variables generated by galley; do not edit\n";
const DEPS_HEADER: &str = "# Dependency options generated by galley; do not edit\n";

/// The generated toolchain variables for one build invocation
///
/// Written once, consumed by the external build system, never read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainVariables {
    vars: Vec<(String, String)>,
    dependency_options: Vec<String>,
}

impl ToolchainVariables {
    /// Exported variables in render order
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    /// Wildcard-qualified dependency option strings (`dep/*:opt=value`)
    pub fn dependency_options(&self) -> &[String] {
        &self.dependency_options
    }

    /// Render the toolchain file
    pub fn render(&self) -> String {
        let mut out = String::from(VARS_HEADER);
        for (key, value) in &self.vars {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    /// Render the dependency-options file
    pub fn render_dependency_options(&self) -> String {
        let mut out = String::from(DEPS_HEADER);
        for line in &self.dependency_options {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Generate toolchain variables from a resolved configuration
///
/// Every exported option appears exactly once under its toolchain variable
/// name. Booleans render ON/OFF for the build system; dependency strings
/// keep the True/False form of the dependency-declaration layer.
pub fn generate(config: &ResolvedConfiguration) -> ToolchainVariables {
    let vars = config
        .exports()
        .iter()
        .filter_map(|export| {
            config
                .option(&export.option)
                .map(|value| (export.var.clone(), build_system_value(value)))
        })
        .collect();

    let dependency_options = config
        .dependency_options()
        .iter()
        .flat_map(|(dep, opts)| {
            opts.iter()
                .map(move |(name, value)| format!("{}/*:{}={}", dep, name, value))
        })
        .collect();

    ToolchainVariables {
        vars,
        dependency_options,
    }
}

fn build_system_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(true) => "ON".to_string(),
        OptionValue::Bool(false) => "OFF".to_string(),
        OptionValue::Str(s) => s.clone(),
    }
}
