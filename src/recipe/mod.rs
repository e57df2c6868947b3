// src/recipe/mod.rs

//! Recipe system: declarative build descriptors
//!
//! A recipe declares everything the orchestrator needs to know about a
//! package before building it:
//! - Identity and metadata
//! - Tunable options with their allowed domains and defaults
//! - External dependencies with per-dependency option overrides
//! - Profile-conditional overrides (`[[when]]` rules)
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "relay"
//! version = "2.1.0"
//! license = "ISC"
//!
//! [options.shared]
//! default = false
//! export = true
//! var = "BUILD_SHARED_LIBS"
//!
//! [[requires]]
//! name = "boost"
//! version = "^1.82"
//!
//! [[requires]]
//! name = "grpc"
//! version = "^1.50"
//! options = { shared = false, secure = true }
//!
//! [[when]]
//! compiler = "apple-clang"
//! option = "boost:visibility"
//! value = "global"
//! ```

mod format;
pub mod parser;

pub use format::{OptionDecl, OptionValue, PackageSection, Recipe, Requirement, WhenRule};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
