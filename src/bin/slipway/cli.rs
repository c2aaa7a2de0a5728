//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use slipway::core::platform::{BuildConfig, Platform};
use slipway::util::context::DEFAULT_REMOTE_ORG;

/// Slipway - a CMake build orchestrator for native and Emscripten targets
#[derive(Parser)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The project source root
    pub project_root: PathBuf,

    /// The target platform
    #[arg(long, default_value = "native", value_parser = parse_platform)]
    pub platform: Platform,

    /// The build configuration
    #[arg(long, default_value = "Release", value_parser = parse_config)]
    pub config: BuildConfig,

    /// GitHub authentication token for private library clones
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Shared libraries root (defaults to the project root's parent)
    #[arg(long)]
    pub libraries_root: Option<PathBuf>,

    /// Remote organisation library clones are fetched from
    #[arg(long, default_value = DEFAULT_REMOTE_ORG)]
    pub org: String,

    /// The working directory for build output
    #[arg(long, default_value = ".")]
    pub working_dir: PathBuf,

    /// Stream every command and its output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse()
}

fn parse_config(s: &str) -> Result<BuildConfig, String> {
    s.parse()
}
