// tests/pipeline.rs

//! End-to-end pipeline tests against the demo recipe.

use galley::{
    BuildBackend, Error, LayoutPlan, OverrideSpec, PhaseDriver, PhaseState, Profile, Recipe,
    ResolvedConfiguration, layout, parse_recipe_file, resolve, validate_recipe,
};
use std::path::PathBuf;

fn demo_recipe() -> Recipe {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/rpc-server.toml");
    parse_recipe_file(&path).unwrap()
}

fn profile(settings: &[&str]) -> Profile {
    let mut profile = Profile::new(
        "Linux",
        "gcc",
        "13",
        galley::BuildType::Release,
        "x86_64",
    );
    for s in settings {
        profile.apply_setting(s).unwrap();
    }
    profile
}

fn overrides(specs: &[&str]) -> Vec<OverrideSpec> {
    specs.iter().map(|s| s.parse().unwrap()).collect()
}

/// Stages a fake artifact on install; fails the build step when asked
#[derive(Default)]
struct FakeBackend {
    fail_build: bool,
}

impl BuildBackend for FakeBackend {
    fn build(&mut self, _plan: &LayoutPlan, _config: &ResolvedConfiguration) -> galley::Result<()> {
        if self.fail_build {
            Err(Error::ExternalTool {
                tool: "cc".to_string(),
                code: 1,
                stderr: "undefined reference to `main'".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn install(
        &mut self,
        plan: &LayoutPlan,
        _config: &ResolvedConfiguration,
    ) -> galley::Result<()> {
        std::fs::write(plan.staging_dir.join("relay"), b"artifact")?;
        Ok(())
    }
}

#[test]
fn test_demo_recipe_validates_cleanly() {
    let recipe = demo_recipe();
    assert!(validate_recipe(&recipe).unwrap().is_empty());
    assert_eq!(recipe.package.name, "relay");
    assert_eq!(recipe.requires.len(), 7);
}

#[test]
fn test_full_pipeline_stages_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = demo_recipe();
    let profile = profile(&["build_type=Debug"]);
    let config = resolve(&recipe, &profile, &overrides(&["tests=True"])).unwrap();
    let plan = layout::plan(&config, &profile, dir.path());

    let mut driver = PhaseDriver::new(&recipe, &config, plan, FakeBackend::default());
    driver.run_all().unwrap();

    assert_eq!(driver.state(), PhaseState::Packaged);
    assert!(dir.path().join("build/Debug/package/relay").exists());

    let generators = dir.path().join("build/generators");
    let toolchain = std::fs::read_to_string(generators.join("galley_toolchain.txt")).unwrap();
    assert!(toolchain.contains("BUILD_SHARED_LIBS=OFF"));
    assert!(toolchain.contains("tests=ON"));
    assert!(toolchain.contains("verbose=ON"));
    assert!(toolchain.contains("coverage=OFF"));

    let deps = std::fs::read_to_string(generators.join("galley_deps.txt")).unwrap();
    assert!(deps.contains("grpc/*:shared=False"));
    assert!(deps.contains("grpc/*:secure=True"));
    assert!(deps.contains("gtest/*:no_main=True"));

    let graph: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(generators.join("graph.json")).unwrap())
            .unwrap();
    assert_eq!(graph["name"], "relay");
    assert_eq!(graph["requires"].as_array().unwrap().len(), 7);
    // Declaration order is preserved in the graph
    assert_eq!(graph["requires"][0]["name"], "boost");
    assert_eq!(graph["requires"][6]["name"], "xrpl");
}

#[test]
fn test_apple_clang_conditional_fires_without_explicit_override() {
    let recipe = demo_recipe();
    let macos = profile(&["os=Macos", "compiler=apple-clang", "arch=armv8"]);
    let config = resolve(&recipe, &macos, &[]).unwrap();
    assert_eq!(
        config.dependency_option("boost", "visibility").map(ToString::to_string),
        Some("global".to_string())
    );

    // Other profiles never see the override
    let linux = profile(&[]);
    let config = resolve(&recipe, &linux, &[]).unwrap();
    assert_eq!(config.dependency_option("boost", "visibility"), None);
}

#[test]
fn test_dependency_and_package_shared_are_independent() {
    let recipe = demo_recipe();
    let config = resolve(&recipe, &profile(&[]), &overrides(&["openssl:shared=True"])).unwrap();

    assert_eq!(
        config.dependency_option("openssl", "shared").map(ToString::to_string),
        Some("True".to_string())
    );
    // The package's own shared option keeps its default
    assert_eq!(config.option("shared").map(ToString::to_string), Some("False".to_string()));
}

#[test]
fn test_toolchain_output_is_reproducible_across_invocations() {
    let recipe = demo_recipe();
    let render = || {
        let config = resolve(&recipe, &profile(&[]), &overrides(&["coverage=True"])).unwrap();
        let vars = galley::generate(&config);
        (vars.render(), vars.render_dependency_options())
    };
    assert_eq!(render(), render());
}

#[test]
fn test_failed_build_surfaces_compiler_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = demo_recipe();
    let profile = profile(&[]);
    let config = resolve(&recipe, &profile, &[]).unwrap();
    let plan = layout::plan(&config, &profile, dir.path());

    let backend = FakeBackend { fail_build: true };
    let mut driver = PhaseDriver::new(&recipe, &config, plan, backend);

    let err = driver.run_all().unwrap_err();
    match err {
        Error::ExternalTool { tool, code, stderr } => {
            assert_eq!(tool, "cc");
            assert_eq!(code, 1);
            assert!(stderr.contains("undefined reference"));
        }
        other => panic!("expected ExternalTool, got {:?}", other),
    }
    assert_eq!(driver.state(), PhaseState::Failed);
    // Nothing was staged
    assert!(!driver.layout().staging_dir.join("relay").exists());
}

#[test]
fn test_build_without_generate_performs_no_external_work() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = demo_recipe();
    let profile = profile(&[]);
    let config = resolve(&recipe, &profile, &[]).unwrap();
    let plan = layout::plan(&config, &profile, dir.path());

    let mut driver = PhaseDriver::new(&recipe, &config, plan, FakeBackend::default());
    assert!(matches!(driver.build(), Err(Error::PhaseOrder { .. })));
    assert_eq!(driver.state(), PhaseState::New);
}
