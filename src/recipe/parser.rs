// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::resolver::split_option_ref;
use std::collections::BTreeSet;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::Parse(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)?;
    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Structural problems are errors; advisory findings come back as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::Parse("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::Parse("Recipe package version cannot be empty".to_string()));
    }

    // Version constraints must parse as semver requirements
    for req in &recipe.requires {
        if semver::VersionReq::parse(&req.version).is_err() {
            return Err(Error::Parse(format!(
                "Invalid version constraint '{}' for dependency '{}'",
                req.version, req.name
            )));
        }
    }

    // Duplicate dependency names make overrides ambiguous
    let mut seen = BTreeSet::new();
    for req in &recipe.requires {
        if !seen.insert(req.name.as_str()) {
            return Err(Error::Parse(format!(
                "Dependency '{}' declared more than once",
                req.name
            )));
        }
    }

    // Conditional rules must target a declared option or a known dependency
    for rule in &recipe.rules {
        match split_option_ref(&rule.option) {
            (Some(dep), _) => {
                if recipe.requirement(dep).is_none() {
                    return Err(Error::UnknownDependency {
                        dependency: dep.to_string(),
                        option: rule.option.clone(),
                    });
                }
            }
            (None, name) => {
                if recipe.option(name).is_none() {
                    return Err(Error::UnknownOption(name.to_string()));
                }
            }
        }
    }

    // Exported variable names must be unambiguous
    let mut vars = BTreeSet::new();
    for (name, decl) in &recipe.options {
        if !decl.export {
            continue;
        }
        let var = decl.var.as_deref().unwrap_or(name);
        if !vars.insert(var.to_string()) {
            return Err(Error::Parse(format!(
                "Exported toolchain variable '{}' declared more than once",
                var
            )));
        }
    }

    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    for (name, decl) in &recipe.options {
        if decl.default.is_none() {
            warnings.push(format!(
                "Option '{}' has no default and must be set by a rule or override",
                name
            ));
        }
    }

    Ok(warnings)
}
