//! Host platform detection.
//!
//! The operating system and the interpreter's pointer width are read once at
//! orchestration start; every platform-specific branch is taken from here.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::process::{Executor, ProcessBuilder};

/// Operating system family, as far as the build policy cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Windows,
    Unix,
}

impl HostOs {
    /// Detect the OS this binary is running on.
    pub fn host() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Unix
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOs::Windows => write!(f, "windows"),
            HostOs::Unix => write!(f, "unix"),
        }
    }
}

impl FromStr for HostOs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win32" | "win" => Ok(HostOs::Windows),
            "unix" | "linux" | "macos" | "darwin" => Ok(HostOs::Unix),
            _ => Err(format!(
                "invalid platform '{}'; expected 'windows' or 'unix'",
                s
            )),
        }
    }
}

/// Pointer width of the interpreter the extension is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerWidth {
    #[serde(rename = "32")]
    Bits32,
    #[serde(rename = "64")]
    Bits64,
}

impl PointerWidth {
    /// Pointer width of this binary.
    pub fn host() -> Self {
        if cfg!(target_pointer_width = "64") {
            PointerWidth::Bits64
        } else {
            PointerWidth::Bits32
        }
    }

    /// Ask the interpreter for its own pointer width.
    ///
    /// Falls back to [`PointerWidth::host`] when the interpreter cannot be run
    /// or prints something unexpected.
    pub fn probe(executor: &dyn Executor, interpreter: &Path) -> Self {
        let cmd = ProcessBuilder::new(interpreter)
            .arg("-c")
            .arg("import struct; print(struct.calcsize('P') * 8)");

        match executor.output(&cmd) {
            Ok(output) if output.success() => match output.stdout.trim().parse::<Self>() {
                Ok(width) => width,
                Err(e) => {
                    tracing::warn!("{}; assuming host pointer width", e);
                    Self::host()
                }
            },
            Ok(output) => {
                tracing::warn!(
                    "`{}` exited with {:?}; assuming host pointer width",
                    cmd.display_command(),
                    output.code
                );
                Self::host()
            }
            Err(e) => {
                tracing::warn!("{:#}; assuming host pointer width", e);
                Self::host()
            }
        }
    }

    pub fn is_64bit(self) -> bool {
        self == PointerWidth::Bits64
    }
}

impl fmt::Display for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerWidth::Bits32 => write!(f, "32-bit"),
            PointerWidth::Bits64 => write!(f, "64-bit"),
        }
    }
}

impl FromStr for PointerWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "32" => Ok(PointerWidth::Bits32),
            "64" => Ok(PointerWidth::Bits64),
            _ => Err(format!("invalid pointer width '{}'; expected 32 or 64", s)),
        }
    }
}

/// The platform identifier driving every build-policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub os: HostOs,
    pub pointer_width: PointerWidth,
}

impl Platform {
    pub fn new(os: HostOs, pointer_width: PointerWidth) -> Self {
        Platform { os, pointer_width }
    }

    pub fn is_windows(&self) -> bool {
        self.os == HostOs::Windows
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.os, self.pointer_width)
    }
}
