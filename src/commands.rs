// src/commands.rs
//! Command implementations for the galley CLI

use anyhow::Result;
use galley::{
    ExecBackend, OverrideSpec, PhaseDriver, Profile, Recipe, ResolvedConfiguration, layout,
    parse_recipe_file, resolve, validate_recipe,
};
use std::path::Path;
use tracing::{info, warn};

/// Load a recipe, build the profile, and resolve the configuration
fn load(
    recipe_path: &Path,
    settings: &[String],
    options: &[String],
) -> Result<(Recipe, Profile, ResolvedConfiguration)> {
    let recipe = parse_recipe_file(recipe_path)?;
    for warning in validate_recipe(&recipe)? {
        warn!("{}: {}", recipe_path.display(), warning);
    }

    let mut profile = Profile::detect();
    for setting in settings {
        profile.apply_setting(setting)?;
    }

    let overrides: Vec<OverrideSpec> = options
        .iter()
        .map(|o| o.parse())
        .collect::<galley::Result<_>>()?;

    let config = resolve(&recipe, &profile, &overrides)?;
    info!(
        "Resolved {}/{} for {}",
        recipe.package.name, recipe.package.version, profile
    );

    Ok((recipe, profile, config))
}

pub fn cmd_resolve(recipe_path: &Path, settings: &[String], options: &[String]) -> Result<()> {
    let (recipe, profile, config) = load(recipe_path, settings, options)?;

    println!("{}/{} ({})", recipe.package.name, recipe.package.version, profile);
    println!("options:");
    for (name, value) in config.package_options() {
        println!("  {} = {}", name, value);
    }
    if !config.dependency_options().is_empty() {
        println!("dependency options:");
        for (dep, opts) in config.dependency_options() {
            for (name, value) in opts {
                println!("  {}/*:{} = {}", dep, name, value);
            }
        }
    }
    if !config.feature_flags().is_empty() {
        let flags: Vec<&str> = config.feature_flags().iter().map(String::as_str).collect();
        println!("features: {}", flags.join(", "));
    }

    Ok(())
}

pub fn cmd_generate(
    recipe_path: &Path,
    settings: &[String],
    options: &[String],
    base: &Path,
) -> Result<()> {
    let (recipe, profile, config) = load(recipe_path, settings, options)?;
    let plan = layout::plan(&config, &profile, base);

    let mut driver = PhaseDriver::new(&recipe, &config, plan, ExecBackend::default());
    driver.configure()?;
    driver.generate()?;

    println!(
        "Generated toolchain files in {}",
        driver.layout().generators_dir.display()
    );
    Ok(())
}

pub fn cmd_build(
    recipe_path: &Path,
    settings: &[String],
    options: &[String],
    base: &Path,
    build_driver: &str,
) -> Result<()> {
    let (recipe, profile, config) = load(recipe_path, settings, options)?;
    let plan = layout::plan(&config, &profile, base);

    let mut driver = PhaseDriver::new(&recipe, &config, plan, ExecBackend::new(build_driver));
    driver.run_all()?;

    println!(
        "Packaged {}/{} into {}",
        recipe.package.name,
        recipe.package.version,
        driver.layout().staging_dir.display()
    );
    Ok(())
}
