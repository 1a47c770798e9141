use anyhow::Context;

use super::{ProbeReport, SmokePlan};
use crate::errors::CheckError;
use crate::runtime::Python;

const PROBE_SCRIPT: &str = include_str!("probe.py");

/// Builds the models named in a plan, runs one forward pass each and
/// reports what came back.
pub trait ModelHarness {
    fn probe(&self, plan: &SmokePlan) -> Result<ProbeReport, CheckError>;
}

/// Runs the embedded probe script in the project interpreter. The plan
/// goes in as JSON on argv, the report comes back as the last stdout line.
pub struct PythonModelHarness {
    python: Python,
}

impl PythonModelHarness {
    pub fn new(python: Python) -> Self {
        Self { python }
    }
}

impl ModelHarness for PythonModelHarness {
    fn probe(&self, plan: &SmokePlan) -> Result<ProbeReport, CheckError> {
        let plan_json = serde_json::to_string(plan).context("failed to encode smoke plan")?;
        log::debug!("Model smoke plan: {}", plan_json);

        let output = self.python.eval(PROBE_SCRIPT, [plan_json])?;
        if !output.success() {
            return Err(CheckError::collaborator(
                output
                    .last_error_line()
                    .unwrap_or("model probe exited without a message")
                    .to_string(),
            ));
        }

        let line = output
            .last_stdout_line()
            .ok_or_else(|| CheckError::collaborator("model probe printed no report"))?;
        let report: ProbeReport = serde_json::from_str(line)
            .with_context(|| format!("unreadable model probe report: {}", line))?;
        log::debug!("Model probe report: {:?}", report);
        Ok(report)
    }
}

impl<M: ModelHarness + ?Sized> ModelHarness for &M {
    fn probe(&self, plan: &SmokePlan) -> Result<ProbeReport, CheckError> {
        (**self).probe(plan)
    }
}
