// src/lib.rs

//! Galley build orchestrator
//!
//! Galley reads a declarative TOML recipe describing a native package
//! (identity, tunable options, external dependencies), resolves it against a
//! build profile and command-line overrides, and drives the build lifecycle
//! against an external build system.
//!
//! # Architecture
//!
//! - Recipes: immutable TOML descriptors of options and requirements
//! - Profiles: os/compiler/build_type/arch supplied by the invoker
//! - Resolution: layered defaults, conditional rules, explicit overrides
//! - Phases: configure -> generate -> build -> package, one external
//!   side effect per transition

mod error;
pub mod layout;
pub mod phase;
pub mod profile;
pub mod recipe;
pub mod resolver;
pub mod toolchain;

pub use error::{Error, Result};
pub use layout::{LayoutPlan, plan};
pub use phase::{BuildBackend, ExecBackend, PhaseDriver, PhaseState};
pub use profile::{BuildType, Profile};
pub use recipe::{OptionDecl, OptionValue, Recipe, Requirement, WhenRule};
pub use recipe::{parse_recipe, parse_recipe_file, validate_recipe};
pub use resolver::{OverrideScope, OverrideSpec, ResolvedConfiguration, resolve};
pub use toolchain::{ToolchainVariables, generate};
