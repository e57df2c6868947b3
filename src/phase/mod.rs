// src/phase/mod.rs

//! Phase driver: the build lifecycle state machine
//!
//! One invocation walks `New -> Configured -> Generated -> Built ->
//! Packaged`, with `Failed` terminal. Each transition performs exactly one
//! side effect:
//!
//! - `configure` creates the planned directories and writes the dependency
//!   graph file
//! - `generate` writes the toolchain and dependency-options files
//! - `build` invokes the external build driver
//! - `package` invokes the external install step
//!
//! Out-of-order transitions are driver defects and fail fast without
//! touching anything external. External failures are surfaced verbatim and
//! never retried.

mod backend;

pub use backend::ExecBackend;

use crate::error::{Error, Result};
use crate::layout::LayoutPlan;
use crate::recipe::{OptionValue, Recipe};
use crate::resolver::ResolvedConfiguration;
use crate::toolchain;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use strum_macros::Display;

/// Names of the generated files under the generators directory
pub const GRAPH_FILE: &str = "graph.json";
pub const TOOLCHAIN_FILE: &str = "galley_toolchain.txt";
pub const DEPENDENCY_OPTIONS_FILE: &str = "galley_deps.txt";

/// The external build system seam
///
/// The real implementation shells out to the build driver; tests substitute
/// a recording fake so phase ordering and failure paths run without any
/// external tool.
pub trait BuildBackend {
    /// Invoke the external build step
    fn build(&mut self, plan: &LayoutPlan, config: &ResolvedConfiguration) -> Result<()>;

    /// Invoke the external install step, staging artifacts for packaging
    fn install(&mut self, plan: &LayoutPlan, config: &ResolvedConfiguration) -> Result<()>;
}

/// Driver states, in lifecycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PhaseState {
    New,
    Configured,
    Generated,
    Built,
    Packaged,
    Failed,
}

/// Sequences the build lifecycle for one resolved configuration
pub struct PhaseDriver<'a, B: BuildBackend> {
    recipe: &'a Recipe,
    config: &'a ResolvedConfiguration,
    plan: LayoutPlan,
    backend: B,
    state: PhaseState,
}

#[derive(Serialize)]
struct GraphFile<'a> {
    name: &'a str,
    version: &'a str,
    requires: Vec<GraphNode<'a>>,
}

#[derive(Serialize)]
struct GraphNode<'a> {
    name: &'a str,
    version: &'a str,
    options: &'a BTreeMap<String, OptionValue>,
}

impl<'a, B: BuildBackend> PhaseDriver<'a, B> {
    pub fn new(
        recipe: &'a Recipe,
        config: &'a ResolvedConfiguration,
        plan: LayoutPlan,
        backend: B,
    ) -> Self {
        Self {
            recipe,
            config,
            plan,
            backend,
            state: PhaseState::New,
        }
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn layout(&self) -> &LayoutPlan {
        &self.plan
    }

    /// Create the planned directories and write the dependency graph file
    pub fn configure(&mut self) -> Result<()> {
        self.expect(PhaseState::New, "configure")?;
        let result = self.do_configure();
        self.advance(PhaseState::Configured, result)
    }

    /// Write the toolchain and dependency-options files
    pub fn generate(&mut self) -> Result<()> {
        self.expect(PhaseState::Configured, "generate")?;
        let result = self.do_generate();
        self.advance(PhaseState::Generated, result)
    }

    /// Invoke the external build driver
    pub fn build(&mut self) -> Result<()> {
        self.expect(PhaseState::Generated, "build")?;
        tracing::info!("Building in {}", self.plan.build_dir.display());
        let result = self.backend.build(&self.plan, self.config);
        self.advance(PhaseState::Built, result)
    }

    /// Invoke the external install step
    pub fn package(&mut self) -> Result<()> {
        self.expect(PhaseState::Built, "package")?;
        tracing::info!("Staging install into {}", self.plan.staging_dir.display());
        let result = self.backend.install(&self.plan, self.config);
        self.advance(PhaseState::Packaged, result)
    }

    /// Run the full lifecycle in order
    pub fn run_all(&mut self) -> Result<()> {
        self.configure()?;
        self.generate()?;
        self.build()?;
        self.package()?;
        Ok(())
    }

    fn expect(&self, wanted: PhaseState, attempted: &str) -> Result<()> {
        if self.state == wanted {
            Ok(())
        } else {
            Err(Error::PhaseOrder {
                attempted: attempted.to_string(),
                state: self.state.to_string(),
            })
        }
    }

    fn advance(&mut self, next: PhaseState, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                self.state = next;
                tracing::debug!("Phase complete: {}", next);
                Ok(())
            }
            Err(e) => {
                self.state = PhaseState::Failed;
                Err(e)
            }
        }
    }

    fn do_configure(&self) -> Result<()> {
        for dir in self.plan.directories() {
            fs::create_dir_all(dir)?;
        }

        let graph = GraphFile {
            name: &self.recipe.package.name,
            version: &self.recipe.package.version,
            requires: self
                .recipe
                .requires
                .iter()
                .map(|req| GraphNode {
                    name: &req.name,
                    version: &req.version,
                    options: self
                        .config
                        .dependency_options()
                        .get(&req.name)
                        .unwrap_or(&EMPTY_OPTIONS),
                })
                .collect(),
        };

        let rendered = serde_json::to_string_pretty(&graph)
            .map_err(|e| Error::Parse(format!("Failed to encode dependency graph: {}", e)))?;
        fs::write(self.plan.generators_dir.join(GRAPH_FILE), rendered)?;

        tracing::info!(
            "Configured layout under {}",
            self.plan.generators_dir.display()
        );
        Ok(())
    }

    fn do_generate(&self) -> Result<()> {
        let vars = toolchain::generate(self.config);
        fs::write(self.plan.generators_dir.join(TOOLCHAIN_FILE), vars.render())?;
        fs::write(
            self.plan.generators_dir.join(DEPENDENCY_OPTIONS_FILE),
            vars.render_dependency_options(),
        )?;
        tracing::info!("Generated toolchain file ({} variables)", vars.vars().len());
        Ok(())
    }
}

static EMPTY_OPTIONS: BTreeMap<String, OptionValue> = BTreeMap::new();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout;
    use crate::profile::{BuildType, Profile};
    use crate::recipe::parse_recipe;
    use crate::resolver::resolve;

    const RECIPE: &str = r#"
[package]
name = "relay"
version = "2.1.0"

[options.shared]
default = false
export = true
var = "BUILD_SHARED_LIBS"

[options.verbose]
default = false
export = true

[[requires]]
name = "grpc"
version = "^1.50"
options = { shared = false }
"#;

    /// Records backend invocations; optionally fails a named phase
    #[derive(Default)]
    struct FakeBackend {
        builds: usize,
        installs: usize,
        fail_phase: Option<&'static str>,
    }

    impl FakeBackend {
        fn failing(phase: &'static str) -> Self {
            Self {
                fail_phase: Some(phase),
                ..Self::default()
            }
        }

        fn fail_if(&self, phase: &str) -> Result<()> {
            if self.fail_phase == Some(phase) {
                Err(Error::ExternalTool {
                    tool: "fake".to_string(),
                    code: 2,
                    stderr: format!("{} blew up", phase),
                })
            } else {
                Ok(())
            }
        }
    }

    impl BuildBackend for FakeBackend {
        fn build(&mut self, _plan: &LayoutPlan, _config: &ResolvedConfiguration) -> Result<()> {
            self.builds += 1;
            self.fail_if("build")
        }

        fn install(&mut self, _plan: &LayoutPlan, _config: &ResolvedConfiguration) -> Result<()> {
            self.installs += 1;
            self.fail_if("install")
        }
    }

    fn fixture(base: &std::path::Path) -> (Recipe, ResolvedConfiguration, LayoutPlan) {
        let recipe = parse_recipe(RECIPE).unwrap();
        let profile = Profile::new("Linux", "gcc", "13", BuildType::Release, "x86_64");
        let config = resolve(&recipe, &profile, &[]).unwrap();
        let plan = layout::plan(&config, &profile, base);
        (recipe, config, plan)
    }

    #[test]
    fn test_full_lifecycle_reaches_packaged() {
        let dir = tempfile::tempdir().unwrap();
        let (recipe, config, plan) = fixture(dir.path());
        let mut driver = PhaseDriver::new(&recipe, &config, plan, FakeBackend::default());

        driver.run_all().unwrap();
        assert_eq!(driver.state(), PhaseState::Packaged);

        let generators = driver.layout().generators_dir.clone();
        assert!(generators.join(GRAPH_FILE).exists());
        assert!(generators.join(TOOLCHAIN_FILE).exists());
        assert!(generators.join(DEPENDENCY_OPTIONS_FILE).exists());
        assert_eq!(driver.backend.builds, 1);
        assert_eq!(driver.backend.installs, 1);
    }

    #[test]
    fn test_build_before_generate_is_a_phase_order_error() {
        let dir = tempfile::tempdir().unwrap();
        let (recipe, config, plan) = fixture(dir.path());
        let mut driver = PhaseDriver::new(&recipe, &config, plan, FakeBackend::default());

        driver.configure().unwrap();
        let err = driver.build().unwrap_err();
        assert!(matches!(err, Error::PhaseOrder { .. }));
        // No external invocation happened
        assert_eq!(driver.backend.builds, 0);
        // The driver did not move to Failed; the prerequisite is just unmet
        assert_eq!(driver.state(), PhaseState::Configured);
    }

    #[test]
    fn test_package_before_build_is_a_phase_order_error() {
        let dir = tempfile::tempdir().unwrap();
        let (recipe, config, plan) = fixture(dir.path());
        let mut driver = PhaseDriver::new(&recipe, &config, plan, FakeBackend::default());

        driver.configure().unwrap();
        driver.generate().unwrap();
        assert!(matches!(driver.package(), Err(Error::PhaseOrder { .. })));
        assert_eq!(driver.backend.installs, 0);
    }

    #[test]
    fn test_configure_twice_is_a_phase_order_error() {
        let dir = tempfile::tempdir().unwrap();
        let (recipe, config, plan) = fixture(dir.path());
        let mut driver = PhaseDriver::new(&recipe, &config, plan, FakeBackend::default());

        driver.configure().unwrap();
        assert!(matches!(driver.configure(), Err(Error::PhaseOrder { .. })));
    }

    #[test]
    fn test_external_failure_is_terminal_and_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let (recipe, config, plan) = fixture(dir.path());
        let mut driver = PhaseDriver::new(&recipe, &config, plan, FakeBackend::failing("build"));

        let err = driver.run_all().unwrap_err();
        match err {
            Error::ExternalTool { code, stderr, .. } => {
                assert_eq!(code, 2);
                assert_eq!(stderr, "build blew up");
            }
            other => panic!("expected ExternalTool, got {:?}", other),
        }
        assert_eq!(driver.state(), PhaseState::Failed);
        assert_eq!(driver.backend.builds, 1);

        // Failed is terminal: nothing further runs, nothing is retried
        assert!(matches!(driver.build(), Err(Error::PhaseOrder { .. })));
        assert!(matches!(driver.package(), Err(Error::PhaseOrder { .. })));
        assert_eq!(driver.backend.builds, 1);
        assert_eq!(driver.backend.installs, 0);
    }

    #[test]
    fn test_graph_file_lists_requirements_with_options() {
        let dir = tempfile::tempdir().unwrap();
        let (recipe, config, plan) = fixture(dir.path());
        let mut driver = PhaseDriver::new(&recipe, &config, plan, FakeBackend::default());
        driver.configure().unwrap();

        let graph = std::fs::read_to_string(driver.layout().generators_dir.join(GRAPH_FILE)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&graph).unwrap();
        assert_eq!(parsed["name"], "relay");
        assert_eq!(parsed["requires"][0]["name"], "grpc");
        assert_eq!(parsed["requires"][0]["options"]["shared"], false);
    }
}
