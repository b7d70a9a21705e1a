//! fs-buildcfg: build configuration CLI for the Foodshare Android project.
//!
//! Plans and applies the root build configuration (repositories, classpath,
//! output layout, evaluation ordering, clean task) against a module tree.

use buildcfg_cli::{render, Status};
use buildcfg_core::error::exit_codes;
use buildcfg_core::prelude::*;
use buildcfg_core::repository;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fs-buildcfg")]
#[command(about = "Build configuration for the Foodshare Android project")]
#[command(version)]
struct Cli {
    /// Settings file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Android project root directory
    #[arg(short, long, global = true, default_value = "android")]
    root: PathBuf,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration effects without applying them
    Plan {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply the configuration and print a report
    Apply,

    /// Apply the configuration and run the clean task
    Clean,

    /// List discovered sub-modules
    Modules,

    /// Check settings, module tree, and classpath resolution
    Verify,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }
    init_tracing(cli.verbose);

    let settings = match BuildSettings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            Status::error(&e.to_string());
            std::process::exit(exit_codes::SETTINGS_ERROR);
        }
    };

    let exit_code = match cli.command {
        Commands::Plan { json } => run_plan(&cli.root, &settings, json),
        Commands::Apply => run_apply(&cli.root, &settings),
        Commands::Clean => run_clean(&cli.root, &settings),
        Commands::Modules => run_modules(&cli.root),
        Commands::Verify => run_verify(&cli.root, &settings),
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code_for(error: &Error) -> i32 {
    match error.code.code() / 1000 {
        3 => exit_codes::SETTINGS_ERROR,
        4 => exit_codes::RESOLUTION_ERROR,
        5 => exit_codes::MODULE_ERROR,
        6 => exit_codes::TASK_ERROR,
        _ => exit_codes::FAILURE,
    }
}

fn fail(error: &Error) -> i32 {
    Status::error(&error.to_string());
    exit_code_for(error)
}

fn discover(root: &PathBuf) -> std::result::Result<ProjectTree, i32> {
    ProjectTree::discover(root).map_err(|e| fail(&e))
}

fn run_plan(root: &PathBuf, settings: &BuildSettings, json: bool) -> i32 {
    let tree = match discover(root) {
        Ok(tree) => tree,
        Err(code) => return code,
    };
    let config_plan = match plan(&tree, settings) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    if json {
        match serde_json::to_string_pretty(&config_plan) {
            Ok(out) => println!("{out}"),
            Err(e) => return fail(&Error::from(e)),
        }
    } else {
        Status::header("Configuration plan");
        for line in render::plan_lines(&config_plan) {
            println!("{line}");
        }
    }
    exit_codes::SUCCESS
}

fn run_apply(root: &PathBuf, settings: &BuildSettings) -> i32 {
    let mut tree = match discover(root) {
        Ok(tree) => tree,
        Err(code) => return code,
    };
    match configure(&mut tree, settings) {
        Ok(outcome) => {
            Status::success("Configuration applied");
            for (key, value) in render::report_details(&outcome.report) {
                Status::detail(&key, &value);
            }
            exit_codes::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_clean(root: &PathBuf, settings: &BuildSettings) -> i32 {
    let mut tree = match discover(root) {
        Ok(tree) => tree,
        Err(code) => return code,
    };
    let outcome = match configure(&mut tree, settings) {
        Ok(outcome) => outcome,
        Err(e) => return fail(&e),
    };
    match outcome.tasks.run("clean") {
        Ok(()) => {
            Status::success(&format!(
                "Cleaned {}",
                tree.root().output_dir().display()
            ));
            exit_codes::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_modules(root: &PathBuf) -> i32 {
    let tree = match discover(root) {
        Ok(tree) => tree,
        Err(code) => return code,
    };
    Status::info(&format!(
        "{} sub-modules under {}",
        tree.submodules().len(),
        tree.root().name()
    ));
    for sub in tree.submodules() {
        Status::detail(sub.name(), &sub.dir().display().to_string());
    }
    exit_codes::SUCCESS
}

fn run_verify(root: &PathBuf, settings: &BuildSettings) -> i32 {
    let mut failed = false;

    let tree = match ProjectTree::discover(root) {
        Ok(tree) => {
            Status::success(&format!(
                "Module tree: {} sub-modules",
                tree.submodules().len()
            ));
            Some(tree)
        }
        Err(e) => {
            Status::error(&e.to_string());
            failed = true;
            None
        }
    };

    if let Some(tree) = &tree {
        let target = settings.evaluation.depends_on.as_str();
        if tree.contains(target) {
            Status::success(&format!("Evaluation target {target} exists"));
        } else {
            Status::error(&format!("Evaluation target {target} not found"));
            failed = true;
        }
    }

    match settings.buildscript.coordinates() {
        Ok(coords) => {
            for coordinate in coords {
                match repository::resolve(&coordinate, &settings.buildscript.repositories) {
                    Ok(repo) => {
                        Status::success(&format!("{coordinate} resolves from {repo}"));
                    }
                    Err(e) => {
                        Status::error(&e.to_string());
                        failed = true;
                    }
                }
            }
        }
        Err(e) => {
            Status::error(&e.to_string());
            failed = true;
        }
    }

    if failed {
        exit_codes::FAILURE
    } else {
        Status::success("Configuration is consistent");
        exit_codes::SUCCESS
    }
}
