use std::path::{Path, PathBuf};

use crate::check::{Check, Outcome};
use crate::consts::STEP_APP;
use crate::errors::CheckError;
use crate::runtime::Python;

/// Verifies the web front-end's entry points exist and that the main one
/// imports cleanly.
pub struct AppSmokeTester {
    python: Python,
    entry: PathBuf,
    launcher: PathBuf,
}

impl AppSmokeTester {
    pub fn new(python: Python, entry: PathBuf, launcher: PathBuf) -> Self {
        Self {
            python,
            entry,
            launcher,
        }
    }

    fn import_snippet(&self) -> Result<String, CheckError> {
        let module = self
            .entry
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                CheckError::collaborator(format!(
                    "cannot derive a module name from {}",
                    self.entry.display()
                ))
            })?;
        let dir = self.entry.parent().unwrap_or(Path::new("."));
        Ok(format!(
            "import sys; sys.path.insert(0, {:?}); import {}",
            dir.display().to_string(),
            module
        ))
    }
}

impl Check for AppSmokeTester {
    fn name(&self) -> &str {
        STEP_APP
    }

    fn run(&self) -> Result<Outcome, CheckError> {
        for path in [&self.entry, &self.launcher] {
            let on_disk = self.python.project_dir().join(path);
            if !on_disk.exists() {
                return Err(CheckError::MissingFile(path.clone()));
            }
        }
        let outcome = Outcome::passed().note("Application files present");

        let snippet = self.import_snippet()?;
        let output = self.python.eval(&snippet, Vec::<String>::new())?;
        if !output.success() {
            let reason = output.last_error_line().unwrap_or("import failed without a message");
            return Err(CheckError::collaborator(format!("App import failed: {}", reason)));
        }

        log::info!("{} imports cleanly", self.entry.display());
        Ok(outcome.note("App imports successfully"))
    }
}
