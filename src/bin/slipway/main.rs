//! Slipway CLI - orchestrates the build of one project.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use slipway::ops;
use slipway::util::fs::{ensure_dir, normalize_path};
use slipway::util::process::{find_executable, StreamingRunner};
use slipway::util::shell::{ColorChoice, Shell};
use slipway::{GlobalContext, Project};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("slipway=debug")
    } else {
        EnvFilter::new("slipway=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let project_root = normalize_path(&cli.project_root);
    let project = Project::open(&project_root)?;

    if find_executable("cmake").is_none() {
        bail!(
            "CMake not found\n\
             \n\
             CMake drives the generate/build/test cycle.\n\
             Install CMake and ensure it's in your PATH."
        );
    }

    let libraries_root = match cli.libraries_root {
        Some(root) => normalize_path(&root),
        None => project_root
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow!("project root has no parent to use as libraries root"))?,
    };

    // Building straight into the source tree would shadow it; use a `build`
    // subfolder instead.
    let mut working_dir = normalize_path(&cli.working_dir);
    if working_dir == project_root {
        working_dir = project_root.join("build");
    }
    ensure_dir(&working_dir)?;

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let shell = Arc::new(Shell::from_flags(cli.quiet, cli.verbose, color));

    let ctx = GlobalContext::new(libraries_root, cli.config)
        .with_org(cli.org)
        .with_token(cli.github_token)
        .with_shell(shell)
        .with_runner(Arc::new(StreamingRunner::new(cli.verbose)));

    ops::orchestrate(&ctx, &project, cli.platform, &working_dir)
}
