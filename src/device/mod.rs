use crate::check::{Check, Outcome};
use crate::consts::{BYTES_PER_GB, STEP_HARDWARE};
use crate::errors::CheckError;

pub use hardware::{HardwareCollector, HardwareSource};
pub mod hardware;

/// Advisory hardware check: low memory warns, a missing accelerator is
/// informational, and only an unanswerable query fails the step.
pub struct HardwareProbe<H> {
    source: H,
    threshold_bytes: u64,
}

impl<H: HardwareSource> HardwareProbe<H> {
    pub fn new(source: H, threshold_bytes: u64) -> Self {
        Self {
            source,
            threshold_bytes,
        }
    }
}

impl<H: HardwareSource> Check for HardwareProbe<H> {
    fn name(&self) -> &str {
        STEP_HARDWARE
    }

    fn run(&self) -> Result<Outcome, CheckError> {
        let memory = self.source.total_memory()?;
        let memory_gb = memory as f64 / BYTES_PER_GB;
        let threshold_gb = self.threshold_bytes as f64 / BYTES_PER_GB;
        log::debug!("Total memory {} bytes, threshold {} bytes", memory, self.threshold_bytes);

        let mut outcome = Outcome::passed().note(format!("Available RAM: {:.1} GB", memory_gb));
        if memory < self.threshold_bytes {
            outcome = outcome.warning(format!(
                "Less than {:.0}GB RAM detected, performance may be limited",
                threshold_gb
            ));
        } else {
            outcome = outcome.note("Sufficient RAM available");
        }

        outcome = match self.source.accelerator()? {
            Some(name) => {
                log::info!("GPU detected: {}", name);
                outcome
                    .note(format!("GPU detected: {}", name))
                    .note("GPU acceleration available")
            }
            None => outcome.note("No GPU detected, using CPU (still fully functional)"),
        };
        Ok(outcome)
    }
}
