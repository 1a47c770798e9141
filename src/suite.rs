use std::path::PathBuf;

use crate::check::{Check, Outcome};
use crate::consts::STEP_TEST_SUITE;
use crate::errors::CheckError;
use crate::runtime::Python;

/// Runs the project's pytest suite.
pub struct TestRunner {
    python: Python,
    test_dir: PathBuf,
}

impl TestRunner {
    pub fn new(python: Python, test_dir: PathBuf) -> Self {
        Self { python, test_dir }
    }
}

impl Check for TestRunner {
    fn name(&self) -> &str {
        STEP_TEST_SUITE
    }

    fn run(&self) -> Result<Outcome, CheckError> {
        let test_dir = self.test_dir.display().to_string();
        let output = self
            .python
            .run_module("pytest", [test_dir.as_str(), "-v"])?;

        if !output.success() {
            return Err(CheckError::Subprocess {
                command: format!("{} -m pytest {} -v", self.python.program(), test_dir),
                status: output.status(),
                detail: format!(
                    "Some tests failed: {}\nErrors: {}",
                    output.stdout.trim(),
                    output.stderr.trim()
                ),
            });
        }

        log::info!("Test suite in {} passed", test_dir);
        Ok(Outcome::passed().note("All tests passed"))
    }
}
