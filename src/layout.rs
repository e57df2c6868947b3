// src/layout.rs

//! Layout planning
//!
//! Derives the on-disk folder structure for one build invocation. Planning
//! is pure; directory creation happens in the phase driver's configure step.

use crate::profile::Profile;
use crate::resolver::ResolvedConfiguration;
use std::path::{Path, PathBuf};

/// The directories one build invocation works in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Build intermediates, one tree per build flavor
    pub build_dir: PathBuf,

    /// Generated files (toolchain, dependency graph). Pinned to
    /// `build/generators`; the orchestration tool's own default for this
    /// folder moved between versions, so galley always uses one location.
    pub generators_dir: PathBuf,

    /// Install staging tree for packaging
    pub staging_dir: PathBuf,
}

impl LayoutPlan {
    /// All planned directories, for creation in one pass
    pub fn directories(&self) -> [&Path; 3] {
        [&self.build_dir, &self.generators_dir, &self.staging_dir]
    }
}

/// Plan the layout for a resolved configuration under `base`
///
/// A coverage build gets its own tree so instrumented objects never mix
/// with a plain build of the same build type.
pub fn plan(config: &ResolvedConfiguration, profile: &Profile, base: &Path) -> LayoutPlan {
    let flavor = if config.is_enabled("coverage") {
        format!("{}-coverage", profile.build_type)
    } else {
        profile.build_type.to_string()
    };

    let build_dir = base.join("build").join(flavor);
    let generators_dir = base.join("build").join("generators");
    let staging_dir = build_dir.join("package");

    LayoutPlan {
        build_dir,
        generators_dir,
        staging_dir,
    }
}
