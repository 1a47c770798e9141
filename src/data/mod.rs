use std::path::PathBuf;

use crate::check::{Check, Outcome};
use crate::consts::STEP_DEMO_DATA;
use crate::errors::CheckError;
use crate::runtime::Python;

// Prints the created path; the project's loader owns the dataset layout.
const CREATE_DEMO_DATA: &str = "\
import sys
sys.path.insert(0, '.')
from src.data.data_loader import create_demo_data
print(create_demo_data(sys.argv[1], num_samples=int(sys.argv[2])))
";

/// Populates a small sample dataset through the project's own generator.
pub struct DemoDataGenerator {
    python: Python,
    target_dir: PathBuf,
    samples: usize,
}

impl DemoDataGenerator {
    pub fn new(python: Python, target_dir: PathBuf, samples: usize) -> Self {
        Self {
            python,
            target_dir,
            samples,
        }
    }

    pub fn generate(&self) -> Result<PathBuf, CheckError> {
        let target = self.target_dir.display().to_string();
        log::debug!("Creating {} demo samples in {}", self.samples, target);

        let output = self
            .python
            .eval(CREATE_DEMO_DATA, [target.clone(), self.samples.to_string()])?;
        if !output.success() {
            let reason = output.last_error_line().unwrap_or("generator exited without a message");
            return Err(CheckError::collaborator(format!(
                "Failed to create demo data: {}",
                reason
            )));
        }

        // Fall back to the requested directory when the generator is silent.
        Ok(output
            .last_stdout_line()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.target_dir.clone()))
    }
}

impl Check for DemoDataGenerator {
    fn name(&self) -> &str {
        STEP_DEMO_DATA
    }

    fn run(&self) -> Result<Outcome, CheckError> {
        let created = self.generate()?;
        log::info!("Demo data created at {}", created.display());
        Ok(Outcome::passed().note(format!("Demo data created at {}", created.display())))
    }
}
