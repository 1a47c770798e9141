use std::sync::Arc;

use sysinfo::System;

use crate::errors::CheckError;
use crate::runtime::{CommandRunner, CommandSpec};

/// Source of the two facts the hardware probe needs.
pub trait HardwareSource {
    /// Total physical memory in bytes.
    fn total_memory(&self) -> Result<u64, CheckError>;

    /// Name of the first accelerator, or `None` when there is none.
    fn accelerator(&self) -> Result<Option<String>, CheckError>;
}

/// Reads memory through `sysinfo` and asks `nvidia-smi` for the GPU.
pub struct HardwareCollector {
    runner: Arc<dyn CommandRunner>,
}

impl HardwareCollector {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl HardwareSource for HardwareCollector {
    fn total_memory(&self) -> Result<u64, CheckError> {
        let mut sys = System::new();
        sys.refresh_memory();

        match sys.total_memory() {
            0 => Err(CheckError::Introspection(
                "total memory is not reported on this platform".to_string(),
            )),
            bytes => Ok(bytes),
        }
    }

    fn accelerator(&self) -> Result<Option<String>, CheckError> {
        let spec = CommandSpec::new("nvidia-smi")
            .arg("--query-gpu=name")
            .arg("--format=csv,noheader");

        // No driver tooling means no usable accelerator, not a broken probe.
        let output = match self.runner.run(&spec) {
            Ok(output) => output,
            Err(CheckError::Launch { source, .. }) => {
                log::debug!("nvidia-smi unavailable: {}", source);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !output.success() {
            log::debug!("nvidia-smi finished with {}", output.status());
            return Ok(None);
        }
        Ok(parse_gpu_name(&output.stdout))
    }
}

fn parse_gpu_name(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
