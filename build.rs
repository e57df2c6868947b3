// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: profile setting
fn setting_arg() -> Arg {
    Arg::new("setting")
        .short('s')
        .long("setting")
        .value_name("KEY=VALUE")
        .action(clap::ArgAction::Append)
        .help("Profile setting (os, compiler, compiler_version, build_type, arch)")
}

/// Common argument: option override
fn option_arg() -> Arg {
    Arg::new("option")
        .short('o')
        .long("option")
        .value_name("NAME=VALUE")
        .action(clap::ArgAction::Append)
        .help("Option override, name=value or dep:name=value")
}

/// Common argument: base directory for the build tree
fn base_arg() -> Arg {
    Arg::new("base")
        .long("base")
        .default_value(".")
        .help("Directory the build tree is planned under")
}

fn build_cli() -> Command {
    Command::new("galley")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Galley Contributors")
        .about("Recipe-driven build orchestration for native packages")
        .subcommand_required(false)
        .subcommand(
            Command::new("resolve")
                .about("Resolve a recipe and print the merged configuration")
                .arg(Arg::new("recipe").required(true).help("Path to the recipe file"))
                .arg(setting_arg())
                .arg(option_arg()),
        )
        .subcommand(
            Command::new("generate")
                .about("Run the configure and generate phases only")
                .arg(Arg::new("recipe").required(true).help("Path to the recipe file"))
                .arg(setting_arg())
                .arg(option_arg())
                .arg(base_arg()),
        )
        .subcommand(
            Command::new("build")
                .about("Run the full lifecycle: configure, generate, build, package")
                .arg(Arg::new("recipe").required(true).help("Path to the recipe file"))
                .arg(setting_arg())
                .arg(option_arg())
                .arg(base_arg())
                .arg(
                    Arg::new("driver")
                        .long("driver")
                        .default_value("cmake")
                        .help("External build driver to invoke"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("galley.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
