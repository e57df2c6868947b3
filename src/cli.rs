// src/cli.rs
//! CLI definitions for galley
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "galley")]
#[command(author = "Galley Project")]
#[command(version)]
#[command(about = "Recipe-driven build orchestration for native packages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a recipe and print the merged configuration
    Resolve {
        /// Path to the recipe file
        recipe: PathBuf,

        /// Profile setting, key=value (os, compiler, compiler_version,
        /// build_type, arch); repeatable
        #[arg(short = 's', long = "setting")]
        settings: Vec<String>,

        /// Option override, name=value or dep:name=value; repeatable
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
    },

    /// Run the configure and generate phases only
    Generate {
        /// Path to the recipe file
        recipe: PathBuf,

        /// Profile setting, key=value; repeatable
        #[arg(short = 's', long = "setting")]
        settings: Vec<String>,

        /// Option override, name=value or dep:name=value; repeatable
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,

        /// Directory the build tree is planned under
        #[arg(long, default_value = ".")]
        base: PathBuf,
    },

    /// Run the full lifecycle: configure, generate, build, package
    Build {
        /// Path to the recipe file
        recipe: PathBuf,

        /// Profile setting, key=value; repeatable
        #[arg(short = 's', long = "setting")]
        settings: Vec<String>,

        /// Option override, name=value or dep:name=value; repeatable
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,

        /// Directory the build tree is planned under
        #[arg(long, default_value = ".")]
        base: PathBuf,

        /// External build driver to invoke
        #[arg(long, default_value = "cmake")]
        driver: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}
