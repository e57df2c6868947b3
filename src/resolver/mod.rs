// src/resolver/mod.rs

//! Option resolution
//!
//! Merges a recipe's declared defaults, its profile-conditional rules, and
//! the invoker's explicit overrides into one immutable resolved
//! configuration. Later tiers win: default, then matching `[[when]]` rules
//! in declaration order (last match wins), then explicit overrides.
//!
//! Package options and per-dependency options are disjoint namespaces. A
//! dependency override like `grpc:shared=False` never touches the owning
//! package's own `shared` option.

use crate::error::{Error, Result};
use crate::profile::Profile;
use crate::recipe::{OptionDecl, OptionValue, Recipe};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Split an option reference into its dependency qualifier and option name.
///
/// `shared` -> (None, "shared"); `grpc:shared` -> (Some("grpc"), "shared").
pub fn split_option_ref(reference: &str) -> (Option<&str>, &str) {
    match reference.split_once(':') {
        Some((dep, name)) => (Some(dep), name),
        None => (None, reference),
    }
}

/// Where an explicit override lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideScope {
    /// The owning package's own option namespace
    Package,
    /// A named dependency's option namespace
    Dependency(String),
}

/// One explicit override supplied by the invoker (`-o name=value` or
/// `-o dep:name=value`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideSpec {
    pub scope: OverrideScope,
    pub option: String,
    pub value: String,
}

impl FromStr for OverrideSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (reference, value) = s
            .split_once('=')
            .ok_or_else(|| Error::Parse(format!("Invalid override '{}', expected name=value", s)))?;

        let (dep, name) = split_option_ref(reference.trim());
        if name.is_empty() {
            return Err(Error::Parse(format!("Invalid override '{}', missing option name", s)));
        }

        Ok(Self {
            scope: match dep {
                Some(d) => OverrideScope::Dependency(d.to_string()),
                None => OverrideScope::Package,
            },
            option: name.to_string(),
            value: value.trim().to_string(),
        })
    }
}

/// An exported option and the toolchain variable it maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedVar {
    pub option: String,
    pub var: String,
}

/// The fully merged option values for one build invocation
///
/// Produced once by [`resolve`] and immutable thereafter; layout planning
/// and toolchain generation borrow it, never mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    package_options: BTreeMap<String, OptionValue>,
    dependency_options: BTreeMap<String, BTreeMap<String, OptionValue>>,
    feature_flags: BTreeSet<String>,
    exports: Vec<ExportedVar>,
}

impl ResolvedConfiguration {
    /// Resolved value of a package option
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.package_options.get(name)
    }

    /// True when a boolean package option resolved to true
    pub fn is_enabled(&self, name: &str) -> bool {
        self.feature_flags.contains(name)
    }

    /// Resolved value of a dependency's option
    pub fn dependency_option(&self, dependency: &str, name: &str) -> Option<&OptionValue> {
        self.dependency_options.get(dependency).and_then(|m| m.get(name))
    }

    pub fn package_options(&self) -> &BTreeMap<String, OptionValue> {
        &self.package_options
    }

    pub fn dependency_options(&self) -> &BTreeMap<String, BTreeMap<String, OptionValue>> {
        &self.dependency_options
    }

    /// Names of boolean options that resolved true
    pub fn feature_flags(&self) -> &BTreeSet<String> {
        &self.feature_flags
    }

    /// Exported options in stable option-name order
    pub fn exports(&self) -> &[ExportedVar] {
        &self.exports
    }
}

/// Resolve a recipe against a profile and explicit overrides
///
/// Fails with a configuration error when an override value falls outside
/// the option's domain, an override names an undeclared option or unknown
/// dependency, or a defaultless option is left unset.
pub fn resolve(
    recipe: &Recipe,
    profile: &Profile,
    overrides: &[OverrideSpec],
) -> Result<ResolvedConfiguration> {
    let mut package_options: BTreeMap<String, OptionValue> = BTreeMap::new();
    let mut dependency_options: BTreeMap<String, BTreeMap<String, OptionValue>> = BTreeMap::new();

    // Tier 1: declared defaults
    for (name, decl) in &recipe.options {
        if let Some(default) = &decl.default {
            package_options.insert(name.clone(), default.clone());
        }
    }
    for req in &recipe.requires {
        if !req.options.is_empty() {
            dependency_options.insert(req.name.clone(), req.options.clone());
        }
    }

    // Tier 2: conditional rules, declaration order. Sequential assignment
    // makes the last matching rule for an option win.
    for rule in &recipe.rules {
        if !rule.matches(profile) {
            continue;
        }
        match split_option_ref(&rule.option) {
            (Some(dep), name) => {
                if recipe.requirement(dep).is_none() {
                    return Err(Error::UnknownDependency {
                        dependency: dep.to_string(),
                        option: rule.option.clone(),
                    });
                }
                dependency_options
                    .entry(dep.to_string())
                    .or_default()
                    .insert(name.to_string(), rule.value.clone());
            }
            (None, name) => {
                let decl = declared(recipe, name)?;
                check_domain(decl, name, &rule.value)?;
                package_options.insert(name.to_string(), rule.value.clone());
            }
        }
    }

    // Tier 3: explicit overrides
    for spec in overrides {
        let value = OptionValue::parse_text(&spec.value);
        match &spec.scope {
            OverrideScope::Dependency(dep) => {
                if recipe.requirement(dep).is_none() {
                    return Err(Error::UnknownDependency {
                        dependency: dep.clone(),
                        option: spec.option.clone(),
                    });
                }
                dependency_options
                    .entry(dep.clone())
                    .or_default()
                    .insert(spec.option.clone(), value);
            }
            OverrideScope::Package => {
                let decl = declared(recipe, &spec.option)?;
                check_domain(decl, &spec.option, &value)?;
                package_options.insert(spec.option.clone(), value);
            }
        }
    }

    // Every declared option must have ended up with a value
    for name in recipe.options.keys() {
        if !package_options.contains_key(name) {
            return Err(Error::UnresolvedOption(name.clone()));
        }
    }

    let feature_flags = package_options
        .iter()
        .filter(|(_, v)| v.as_bool() == Some(true))
        .map(|(name, _)| name.clone())
        .collect();

    let exports = recipe
        .options
        .iter()
        .filter(|(_, decl)| decl.export)
        .map(|(name, decl)| ExportedVar {
            option: name.clone(),
            var: decl.var.clone().unwrap_or_else(|| name.clone()),
        })
        .collect();

    Ok(ResolvedConfiguration {
        package_options,
        dependency_options,
        feature_flags,
        exports,
    })
}

fn declared<'a>(recipe: &'a Recipe, name: &str) -> Result<&'a OptionDecl> {
    recipe
        .option(name)
        .ok_or_else(|| Error::UnknownOption(name.to_string()))
}

fn check_domain(decl: &OptionDecl, name: &str, value: &OptionValue) -> Result<()> {
    if decl.domain_contains(value) {
        Ok(())
    } else {
        Err(Error::InvalidOptionValue {
            option: name.to_string(),
            value: value.to_string(),
            allowed: decl.allowed(),
        })
    }
}
