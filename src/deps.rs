use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::check::{Check, Outcome};
use crate::consts::{PINNED_REQUIREMENTS, STEP_DEPENDENCIES};
use crate::errors::CheckError;
use crate::runtime::Python;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestState {
    Created,
    Existing,
}

/// One `package==version` line per pinned dependency.
pub fn default_manifest() -> String {
    let mut manifest = String::new();
    for (package, version) in PINNED_REQUIREMENTS {
        manifest.push_str(&format!("{}=={}\n", package, version));
    }
    manifest
}

/// Writes the pinned manifest if nothing exists at `path`. An existing file
/// is left untouched, whatever it contains.
pub fn ensure_manifest(path: &Path) -> anyhow::Result<ManifestState> {
    if path.exists() {
        log::debug!("Using existing manifest {}", path.display());
        return Ok(ManifestState::Existing);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, default_manifest())
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Created {}", path.display());
    Ok(ManifestState::Created)
}

pub struct DependencyInstaller {
    python: Python,
    manifest: PathBuf,
}

impl DependencyInstaller {
    pub fn new(python: Python, manifest: PathBuf) -> Self {
        Self { python, manifest }
    }
}

impl Check for DependencyInstaller {
    fn name(&self) -> &str {
        STEP_DEPENDENCIES
    }

    fn run(&self) -> Result<Outcome, CheckError> {
        let state = ensure_manifest(&self.manifest)?;
        let manifest = self.manifest.display().to_string();

        let output = self
            .python
            .run_module("pip", ["install", "-r", manifest.as_str()])?;
        if !output.success() {
            return Err(CheckError::Subprocess {
                command: format!("{} -m pip install -r {}", self.python.program(), manifest),
                status: output.status(),
                detail: output.stderr.trim().to_string(),
            });
        }

        let note = match state {
            ManifestState::Created => format!("Created {}", manifest),
            ManifestState::Existing => format!("Using existing {}", manifest),
        };
        log::info!("Dependencies installed from {}", manifest);
        Ok(Outcome::passed()
            .note(note)
            .note("Dependencies installed successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_has_one_pinned_line_per_package() {
        let manifest = default_manifest();
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(lines.len(), PINNED_REQUIREMENTS.len());
        assert_eq!(lines[0], "torch==2.0.1");
        assert!(lines.contains(&"streamlit==1.25.0"));
        assert!(lines.iter().all(|line| line.split("==").count() == 2));
    }

    #[test]
    fn ensure_manifest_creates_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");

        assert_eq!(ensure_manifest(&path).unwrap(), ManifestState::Created);
        let first = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, default_manifest());

        assert_eq!(ensure_manifest(&path).unwrap(), ManifestState::Existing);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn ensure_manifest_keeps_custom_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        std::fs::write(&path, "numpy>=1.26\n").unwrap();

        assert_eq!(ensure_manifest(&path).unwrap(), ManifestState::Existing);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "numpy>=1.26\n");
    }
}
