use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::app::AppSmokeTester;
use crate::check::{Check, Verdict};
use crate::config::Settings;
use crate::consts::MSG_STEP;
use crate::data::DemoDataGenerator;
use crate::deps::DependencyInstaller;
use crate::device::{HardwareCollector, HardwareProbe};
use crate::errors::CheckError;
use crate::models::{ModelSmokeTester, PythonModelHarness, SmokePlan};
use crate::runtime::{CommandRunner, Python, RuntimeChecker};
use crate::suite::TestRunner;

#[derive(Debug)]
pub struct StepResult {
    pub name: String,
    pub verdict: Verdict,
}

/// Everything one invocation produced, in step order.
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub steps: Vec<StepResult>,
}

impl RunSummary {
    pub fn failed_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|step| step.verdict.is_failure())
            .map(|step| step.name.as_str())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|step| !step.verdict.is_failure())
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|step| step.name == name)
    }
}

/// Runs checks in order. Every check runs no matter how earlier ones
/// ended; errors and panics are turned into a failure of that step only.
#[derive(Default)]
pub struct Pipeline {
    checks: Vec<Box<dyn Check>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard seven steps against real collaborators.
    pub fn standard(settings: &Settings, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let python = Python::new(&settings.python, &settings.project_dir, runner.clone());

        let mut pipeline = Self::new();
        pipeline
            .push(RuntimeChecker::new(python.clone(), settings.min_python_version()?))
            .push(DependencyInstaller::new(
                python.clone(),
                settings.resolve(&settings.requirements),
            ))
            .push(HardwareProbe::new(
                HardwareCollector::new(runner),
                settings.memory_threshold_bytes(),
            ))
            .push(DemoDataGenerator::new(
                python.clone(),
                settings.resolve(&settings.demo_dir),
                settings.demo_samples,
            ))
            .push(ModelSmokeTester::new(
                PythonModelHarness::new(python.clone()),
                SmokePlan::standard(settings.resolve(&settings.model_source_dir), settings.num_classes),
            ))
            .push(AppSmokeTester::new(
                python.clone(),
                settings.app_entry.clone(),
                settings.app_launcher.clone(),
            ))
            .push(TestRunner::new(python, settings.test_dir.clone()));
        Ok(pipeline)
    }

    pub fn push(&mut self, check: impl Check + 'static) -> &mut Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn run(&self) -> RunSummary {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        log::info!("Starting setup run {} with {} steps", run_id, self.checks.len());

        let mut steps = Vec::with_capacity(self.checks.len());
        for check in &self.checks {
            let name = check.name().to_string();
            log::debug!("Step {} pending", name);
            println!("\n{}", MSG_STEP.replace("{}", &name));

            log::debug!("Step {} running", name);
            let verdict = run_isolated(check.as_ref());
            print_verdict(&verdict);
            match &verdict {
                Verdict::Passed(_) => log::info!("Step {} passed", name),
                Verdict::Failed(err) => log::warn!("Step {} failed: {}", name, err),
            }

            steps.push(StepResult { name, verdict });
        }

        RunSummary {
            run_id,
            started_at,
            steps,
        }
    }
}

fn run_isolated(check: &dyn Check) -> Verdict {
    match panic::catch_unwind(AssertUnwindSafe(|| check.run())) {
        Ok(result) => Verdict::from(result),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            Verdict::Failed(CheckError::Panicked(message))
        }
    }
}

fn print_verdict(verdict: &Verdict) {
    match verdict {
        Verdict::Passed(outcome) => {
            for note in &outcome.notes {
                println!("   [ok] {}", note);
            }
            for warning in &outcome.warnings {
                println!("   [warn] {}", warning);
            }
        }
        Verdict::Failed(err) => println!("   [fail] {}", err),
    }
}
