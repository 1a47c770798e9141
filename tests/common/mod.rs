#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::path::Path;
use std::sync::Arc;

use multimodal_quickstart::CheckError;
use multimodal_quickstart::config::Settings;
use multimodal_quickstart::device::HardwareSource;
use multimodal_quickstart::models::{ModelHarness, ModelRole, ProbeReport, RoleReport, SmokePlan};
use multimodal_quickstart::runtime::{CommandOutput, CommandRunner, CommandSpec, Python};

pub const GB: u64 = 1024 * 1024 * 1024;

pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn exit(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

/// Answers commands from a list of `(key, output)` rules. A rule matches
/// when the key is the program or appears in any argument; the first
/// match wins. Unmatched commands fail to launch.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: RefCell<Vec<(String, CommandOutput)>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, key: &str, output: CommandOutput) -> &Self {
        self.rules.borrow_mut().push((key.to_string(), output));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, key: &str) -> bool {
        self.calls.borrow().iter().any(|spec| matches(spec, key))
    }
}

fn matches(spec: &CommandSpec, key: &str) -> bool {
    spec.program == key || spec.args.iter().any(|arg| arg.contains(key))
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CheckError> {
        self.calls.borrow_mut().push(spec.clone());
        self.rules
            .borrow()
            .iter()
            .find(|(key, _)| matches(spec, key))
            .map(|(_, output)| output.clone())
            .ok_or_else(|| CheckError::Launch {
                command: spec.display(),
                source: io::Error::new(io::ErrorKind::NotFound, "not scripted"),
            })
    }
}

/// A runner that answers every step of a healthy project.
pub fn healthy_runner() -> Arc<ScriptedRunner> {
    let runner = ScriptedRunner::new();
    runner
        .on("--version", ok("Python 3.10.12\n"))
        .on("pip", ok("Successfully installed torch-2.0.1\n"))
        .on("nvidia-smi", exit(9, "", "NVIDIA-SMI has failed"))
        .on("create_demo_data", ok("datasets/demo\n"))
        .on("importlib", ok(&healthy_probe_json()))
        .on("import main", ok(""))
        .on("pytest", ok("12 passed in 3.21s\n"));
    runner
}

pub fn healthy_probe_json() -> String {
    serde_json::to_string(&healthy_report()).unwrap()
}

pub fn healthy_report() -> ProbeReport {
    let mut report = ProbeReport::default();
    report.roles.insert(ModelRole::Image, RoleReport::ok(vec![1, 10], Some(vec![1, 512])));
    report.roles.insert(ModelRole::Audio, RoleReport::ok(vec![1, 10], Some(vec![1, 256])));
    report.roles.insert(ModelRole::Text, RoleReport::ok(vec![1, 10], Some(vec![1, 128])));
    report.roles.insert(ModelRole::Fusion, RoleReport::ok(vec![1, 10], None));
    report
}

pub fn python(project_dir: &Path, runner: Arc<ScriptedRunner>) -> Python {
    Python::new("python3", project_dir, runner as Arc<dyn CommandRunner>)
}

/// A project directory with the front-end entry points in place.
pub fn project_with_app() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("app")).unwrap();
    std::fs::write(dir.path().join("app/main.py"), "import streamlit as st\n").unwrap();
    std::fs::write(dir.path().join("app/run_app.py"), "import subprocess\n").unwrap();
    dir
}

pub fn settings_for(project_dir: &Path) -> Settings {
    Settings {
        project_dir: project_dir.to_path_buf(),
        ..Settings::default()
    }
}

pub struct FakeHardware {
    pub memory: Result<u64, String>,
    pub gpu: Option<String>,
}

impl HardwareSource for FakeHardware {
    fn total_memory(&self) -> Result<u64, CheckError> {
        self.memory.clone().map_err(CheckError::Introspection)
    }

    fn accelerator(&self) -> Result<Option<String>, CheckError> {
        Ok(self.gpu.clone())
    }
}

/// Returns a fixed report and remembers the plan it was given.
pub struct CannedHarness {
    pub report: Result<ProbeReport, String>,
    pub seen: RefCell<Option<SmokePlan>>,
}

impl CannedHarness {
    pub fn new(report: ProbeReport) -> Self {
        Self {
            report: Ok(report),
            seen: RefCell::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            report: Err(message.to_string()),
            seen: RefCell::new(None),
        }
    }
}

impl ModelHarness for CannedHarness {
    fn probe(&self, plan: &SmokePlan) -> Result<ProbeReport, CheckError> {
        *self.seen.borrow_mut() = Some(plan.clone());
        self.report.clone().map_err(CheckError::Collaborator)
    }
}
