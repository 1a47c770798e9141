//! The unit every setup step is built from.

use crate::errors::CheckError;

/// What a passing check has to say: informational notes and advisory
/// warnings. Warnings are surfaced to the operator but never fail a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
}

impl Outcome {
    pub fn passed() -> Self {
        Self::default()
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A named, independently reported setup step.
pub trait Check {
    fn name(&self) -> &str;

    fn run(&self) -> Result<Outcome, CheckError>;
}

/// Final state of one step.
#[derive(Debug)]
pub enum Verdict {
    Passed(Outcome),
    Failed(CheckError),
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failed(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Verdict::Passed(outcome) => Some(outcome),
            Verdict::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CheckError> {
        match self {
            Verdict::Passed(_) => None,
            Verdict::Failed(err) => Some(err),
        }
    }
}

impl From<Result<Outcome, CheckError>> for Verdict {
    fn from(result: Result<Outcome, CheckError>) -> Self {
        match result {
            Ok(outcome) => Verdict::Passed(outcome),
            Err(err) => Verdict::Failed(err),
        }
    }
}
