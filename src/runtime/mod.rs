use std::fmt;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

use crate::check::{Check, Outcome};
use crate::consts::STEP_PYTHON_VERSION;
use crate::errors::CheckError;

pub use process::{CommandOutput, CommandRunner, CommandSpec, Python, SystemRunner};
pub mod process;

/// `major.minor.patch`; missing components parse as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PythonVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extracts the version from `python --version` output, e.g.
    /// `Python 3.11.4` or `Python 3.13.0rc1`.
    pub fn from_banner(banner: &str) -> Option<Self> {
        banner
            .split_whitespace()
            .skip_while(|word| !word.eq_ignore_ascii_case("python"))
            .nth(1)
            .and_then(|word| word.parse().ok())
    }
}

impl FromStr for PythonVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, '.');
        let mut component = |name: &str| -> anyhow::Result<u32> {
            match parts.next() {
                None => Ok(0),
                Some(part) => {
                    // pre-release suffixes such as "0rc1" or "4+"
                    let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                    digits
                        .parse()
                        .with_context(|| format!("invalid {} component in version {:?}", name, s))
                }
            }
        };

        let major = component("major")?;
        let minor = component("minor")?;
        let patch = component("patch")?;
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Gate on the interpreter version.
pub struct RuntimeChecker {
    python: Python,
    minimum: PythonVersion,
}

impl RuntimeChecker {
    pub fn new(python: Python, minimum: PythonVersion) -> Self {
        Self { python, minimum }
    }

    pub fn detect_version(&self) -> Result<PythonVersion, CheckError> {
        let output = self.python.run(["--version"])?;
        if !output.success() {
            return Err(CheckError::Subprocess {
                command: format!("{} --version", self.python.program()),
                status: output.status(),
                detail: output.stderr.trim().to_string(),
            });
        }

        // Python 2 and some 3.x builds print the banner on stderr.
        PythonVersion::from_banner(&output.stdout)
            .or_else(|| PythonVersion::from_banner(&output.stderr))
            .ok_or_else(|| {
                CheckError::from(anyhow!(
                    "could not parse interpreter version from {:?}",
                    format!("{}{}", output.stdout, output.stderr).trim()
                ))
            })
    }
}

impl Check for RuntimeChecker {
    fn name(&self) -> &str {
        STEP_PYTHON_VERSION
    }

    fn run(&self) -> Result<Outcome, CheckError> {
        let found = self.detect_version()?;
        log::debug!("Detected Python {} (minimum {})", found, self.minimum);

        if found < self.minimum {
            return Err(CheckError::EnvironmentUnmet {
                found,
                required: self.minimum,
            });
        }

        log::info!("Python environment check passed");
        Ok(Outcome::passed().note(format!("Python {} detected", found)))
    }
}
