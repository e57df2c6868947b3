// src/phase/backend.rs

//! Subprocess-backed build backend
//!
//! Invokes the external build driver through the shell, blocks on its
//! completion, and surfaces non-zero exit status with the tool's own
//! stderr attached. The driver may parallelize internally; galley neither
//! knows nor cares.

use crate::error::{Error, Result};
use crate::layout::LayoutPlan;
use crate::phase::BuildBackend;
use crate::resolver::ResolvedConfiguration;
use std::process::Command;
use tracing::{debug, info};

/// Shells out to a CMake-style build driver
#[derive(Debug, Clone)]
pub struct ExecBackend {
    driver: String,
}

impl ExecBackend {
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
        }
    }

    fn run(&self, phase: &str, command: &str) -> Result<()> {
        info!("Running {} phase", phase);
        debug!("Command: {}", command);

        let output = Command::new("sh").arg("-c").arg(command).output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.is_empty() {
            debug!("{} stdout:\n{}", phase, stdout);
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::ExternalTool {
                tool: self.driver.clone(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }
}

impl Default for ExecBackend {
    fn default() -> Self {
        Self::new("cmake")
    }
}

impl BuildBackend for ExecBackend {
    fn build(&mut self, plan: &LayoutPlan, config: &ResolvedConfiguration) -> Result<()> {
        let mut command = format!("{} --build {}", self.driver, plan.build_dir.display());
        if config.is_enabled("verbose") {
            command.push_str(" --verbose");
        }
        self.run("build", &command)
    }

    fn install(&mut self, plan: &LayoutPlan, _config: &ResolvedConfiguration) -> Result<()> {
        let command = format!(
            "{} --install {} --prefix {}",
            self.driver,
            plan.build_dir.display(),
            plan.staging_dir.display()
        );
        self.run("install", &command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BuildType, Profile};
    use crate::recipe::parse_recipe;
    use crate::resolver::resolve;
    use crate::{Recipe, layout};

    const RECIPE: &str = r#"
[package]
name = "relay"
version = "2.1.0"

[options.verbose]
default = false
"#;

    fn fixture() -> (Recipe, ResolvedConfiguration, LayoutPlan) {
        let recipe = parse_recipe(RECIPE).unwrap();
        let profile = Profile::new("Linux", "gcc", "13", BuildType::Release, "x86_64");
        let config = resolve(&recipe, &profile, &[]).unwrap();
        let plan = layout::plan(&config, &profile, std::path::Path::new("."));
        (recipe, config, plan)
    }

    #[test]
    fn test_successful_invocation() {
        let (_recipe, config, plan) = fixture();
        // `true` ignores its arguments and exits zero
        let mut backend = ExecBackend::new("true");
        backend.build(&plan, &config).unwrap();
        backend.install(&plan, &config).unwrap();
    }

    #[test]
    fn test_failure_surfaces_exit_status() {
        let (_recipe, config, plan) = fixture();
        let mut backend = ExecBackend::new("false");
        let err = backend.build(&plan, &config).unwrap_err();
        match err {
            Error::ExternalTool { tool, code, .. } => {
                assert_eq!(tool, "false");
                assert_eq!(code, 1);
            }
            other => panic!("expected ExternalTool, got {:?}", other),
        }
    }
}
