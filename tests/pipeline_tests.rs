mod common;

use std::path::PathBuf;
use std::sync::Arc;

use common::*;
use multimodal_quickstart::check::Verdict;
use multimodal_quickstart::consts::*;
use multimodal_quickstart::deps::default_manifest;
use multimodal_quickstart::device::HardwareProbe;
use multimodal_quickstart::errors::CheckError;
use multimodal_quickstart::models::{ModelSmokeTester, SmokePlan};
use multimodal_quickstart::pipeline::Pipeline;
use multimodal_quickstart::report::ReportGenerator;
use multimodal_quickstart::runtime::CommandRunner;

const ALL_STEPS: [&str; 7] = [
    STEP_PYTHON_VERSION,
    STEP_DEPENDENCIES,
    STEP_HARDWARE,
    STEP_DEMO_DATA,
    STEP_MODELS,
    STEP_APP,
    STEP_TEST_SUITE,
];

fn standard(dir: &std::path::Path, runner: &Arc<ScriptedRunner>) -> Pipeline {
    let runner: Arc<dyn CommandRunner> = runner.clone();
    Pipeline::standard(&settings_for(dir), runner).unwrap()
}

#[test]
fn healthy_project_runs_every_step_in_order_and_exits_zero() {
    let project = project_with_app();
    let runner = healthy_runner();

    let pipeline = standard(project.path(), &runner);
    assert_eq!(pipeline.len(), 7);
    let summary = pipeline.run();

    let names: Vec<&str> = summary.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ALL_STEPS.to_vec());
    assert!(summary.failed_steps().is_empty(), "{:?}", summary.steps);
    assert_eq!(summary.exit_code(), 0);

    // nvidia-smi failing only means there is no GPU
    let hardware = summary.step(STEP_HARDWARE).unwrap().verdict.outcome().unwrap();
    assert!(hardware.notes.iter().any(|n| n.contains("using CPU")));
}

#[test]
fn manifest_is_created_once_and_left_alone_afterwards() {
    let project = project_with_app();
    let manifest = project.path().join(REQUIREMENTS_FILE);
    assert!(!manifest.exists());

    standard(project.path(), &healthy_runner()).run();
    let first = std::fs::read_to_string(&manifest).unwrap();
    assert_eq!(first, default_manifest());
    assert_eq!(first.lines().count(), PINNED_REQUIREMENTS.len());

    standard(project.path(), &healthy_runner()).run();
    assert_eq!(std::fs::read_to_string(&manifest).unwrap(), first);
}

#[test]
fn failed_install_does_not_stop_later_steps() {
    let project = project_with_app();
    let runner = ScriptedRunner::new();
    runner
        .on("--version", ok("Python 3.11.4\n"))
        .on("pip", exit(1, "", "ERROR: Could not find a version that satisfies torch==2.0.1"))
        .on("create_demo_data", ok("datasets/demo\n"))
        .on("importlib", ok(&healthy_probe_json()))
        .on("import main", ok(""))
        .on("pytest", ok("ok\n"));

    let summary = standard(project.path(), &runner).run();

    assert_eq!(summary.failed_steps(), vec![STEP_DEPENDENCIES]);
    assert_eq!(summary.exit_code(), 1);
    let err = summary.step(STEP_DEPENDENCIES).unwrap().verdict.error().unwrap();
    assert!(err.to_string().contains("Could not find a version that satisfies torch==2.0.1"));

    assert!(runner.called("nvidia-smi"));
    assert!(runner.called("create_demo_data"));
    assert!(runner.called("importlib"));
    assert!(runner.called("pytest"));
}

#[test]
fn missing_app_file_fails_the_run_with_the_path() {
    let project = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(project.path().join("app")).unwrap();
    std::fs::write(project.path().join("app/run_app.py"), "").unwrap();

    let summary = standard(project.path(), &healthy_runner()).run();

    assert_eq!(summary.failed_steps(), vec![STEP_APP]);
    assert_eq!(summary.exit_code(), 1);
    match &summary.step(STEP_APP).unwrap().verdict {
        Verdict::Failed(CheckError::MissingFile(path)) => {
            assert_eq!(path, &PathBuf::from(APP_ENTRY))
        }
        other => panic!("unexpected verdict {:?}", other),
    }
}

#[test]
fn every_step_fails_when_nothing_is_installed() {
    let project = tempfile::tempdir().unwrap();
    let summary = standard(project.path(), &ScriptedRunner::new()).run();

    // hardware still passes: memory comes from sysinfo, no nvidia-smi means CPU
    let expected: Vec<&str> = ALL_STEPS
        .iter()
        .copied()
        .filter(|name| *name != STEP_HARDWARE)
        .collect();
    assert_eq!(summary.failed_steps(), expected);
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn low_memory_warning_alone_keeps_the_run_green() {
    let mut pipeline = Pipeline::new();
    pipeline
        .push(HardwareProbe::new(
            FakeHardware {
                memory: Ok(4 * GB),
                gpu: None,
            },
            6 * GB,
        ))
        .push(ModelSmokeTester::new(
            CannedHarness::new(healthy_report()),
            SmokePlan::standard(PathBuf::from("src"), NUM_CLASSES),
        ));
    let summary = pipeline.run();

    assert_eq!(summary.exit_code(), 0);
    let outcome = summary.steps[0].verdict.outcome().unwrap();
    assert_eq!(outcome.warnings.len(), 1);
}

#[test]
fn success_report_is_written_and_failure_report_is_not() {
    let project = project_with_app();
    let report_path = project.path().join(REPORT_FILE);
    let reporter = ReportGenerator::new(report_path.clone());

    let failed = standard(project.path(), &ScriptedRunner::new()).run();
    reporter.publish(&failed);
    assert!(!report_path.exists());
    let failure_text = reporter.render_failure(&failed);
    assert!(failure_text.starts_with("Setup incomplete. Failed steps: Python Version, Dependencies"));
    assert!(failure_text.contains("Troubleshooting:"));

    let passed = standard(project.path(), &healthy_runner()).run();
    reporter.publish(&passed);
    let written = std::fs::read_to_string(&report_path).unwrap();
    assert!(written.contains("SETUP COMPLETION REPORT"));
    assert!(written.contains(SUPPORT_CONTACT));
    assert!(written.contains(&passed.run_id.to_string()));
}
