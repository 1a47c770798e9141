use std::path::PathBuf;

use crate::runtime::PythonVersion;

/// Why a step failed. Every variant is caught at the step boundary and
/// recorded against the step name; none of them aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Python {required} or higher is required, found {found}")]
    EnvironmentUnmet {
        found: PythonVersion,
        required: PythonVersion,
    },
    #[error("`{command}` exited with {status}: {detail}")]
    Subprocess {
        command: String,
        status: String,
        detail: String,
    },
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("hardware introspection failed: {0}")]
    Introspection(String),
    #[error("{0}")]
    Collaborator(String),
    #[error("missing required file: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("check panicked: {0}")]
    Panicked(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CheckError {
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator(message.into())
    }
}
