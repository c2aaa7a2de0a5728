//! Target platform, host detection, and build configuration.

use std::fmt;
use std::str::FromStr;

/// Triplet suffix for packages installed on a Windows host.
pub const WINDOWS_TRIPLET: &str = "x64-windows";

/// Triplet suffix for packages cross-compiled to WASM.
pub const EMSCRIPTEN_TRIPLET: &str = "wasm32-emscripten";

/// Build target platform.
///
/// Drives the package triplet, the shape of the generate step, and whether
/// the Emscripten SDK must be provisioned. Tool sub-builds always force
/// `Native` — tools run on the host, they are never cross-compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Native,
    Emscripten,
}

impl Platform {
    /// Triplet appended to package identifiers before installation, if any.
    pub fn triplet(&self, host: HostOs) -> Option<&'static str> {
        match self {
            Platform::Native => match host {
                HostOs::Windows => Some(WINDOWS_TRIPLET),
                HostOs::Macos | HostOs::Linux => None,
            },
            Platform::Emscripten => Some(EMSCRIPTEN_TRIPLET),
        }
    }

    /// Whether this platform requires the Emscripten SDK.
    pub fn needs_emsdk(&self) -> bool {
        matches!(self, Platform::Emscripten)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(Platform::Native),
            "emscripten" => Ok(Platform::Emscripten),
            _ => Err(format!(
                "invalid platform '{}'; expected 'native' or 'emscripten'",
                s
            )),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Native => write!(f, "native"),
            Platform::Emscripten => write!(f, "emscripten"),
        }
    }
}

/// Host operating system family.
///
/// Detected once at startup; injectable in tests so triplet and script-name
/// selection stay deterministic across machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Macos,
    Linux,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else if cfg!(target_os = "macos") {
            HostOs::Macos
        } else {
            HostOs::Linux
        }
    }

    /// Folder name separating per-host toolchain installs.
    pub fn system_name(&self) -> &'static str {
        match self {
            HostOs::Windows => "windows",
            HostOs::Macos => "darwin",
            HostOs::Linux => "linux",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, HostOs::Windows)
    }
}

/// CMake build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildConfig {
    Debug,
    #[default]
    Release,
}

impl BuildConfig {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfig::Debug => "Debug",
            BuildConfig::Release => "Release",
        }
    }
}

impl FromStr for BuildConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildConfig::Debug),
            "release" => Ok(BuildConfig::Release),
            _ => Err(format!(
                "invalid config '{}'; expected 'Debug' or 'Release'",
                s
            )),
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
