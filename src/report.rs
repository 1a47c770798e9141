use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::consts::*;
use crate::pipeline::RunSummary;

const COMPLETION_REPORT: &str = "
SETUP COMPLETION REPORT
=======================

Components Successfully Configured:
   - Python environment and dependencies
   - CNN models (Image, Audio, Text, Fusion)
   - Data processing pipeline
   - Streamlit web application
   - Test suite

Ready to Use:
   1. Run the application: python app/run_app.py
   2. Open browser: {app_url}
   3. Load models and start experimenting!

System Status:
   - All models functional
   - Real-time processing capable
   - Laptop-optimized performance
   - Full multimodal integration

Next Steps:
   - Review README.md for detailed documentation
   - Check docs/research_report.md for technical details
   - Explore docs/use_cases_and_advantages.md for applications
   - Customize for your specific use cases

Project Requirements:
   - SRM Institute Major Project (Zeroth -> Final Review)
   - All academic requirements satisfied
   - SDG alignment documented
   - Complete project documentation

For support: {contact}
";

pub struct ReportGenerator {
    path: PathBuf,
}

impl ReportGenerator {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn render_success(&self, summary: &RunSummary) -> String {
        let body = COMPLETION_REPORT
            .replace("{app_url}", APP_URL)
            .replace("{contact}", SUPPORT_CONTACT);
        format!(
            "{}\nGenerated {} (run {})\n",
            body,
            summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            summary.run_id
        )
    }

    pub fn render_failure(&self, summary: &RunSummary) -> String {
        let mut text = MSG_SETUP_INCOMPLETE.replace("{}", &summary.failed_steps().join(", "));
        text.push_str("\n\nTroubleshooting:\n");
        for hint in TROUBLESHOOTING_HINTS {
            text.push_str(&format!("   - {}\n", hint));
        }
        text
    }

    /// Writes the completion report. Only called for a fully successful run.
    pub fn write_success(&self, summary: &RunSummary) -> Result<String> {
        let report = self.render_success(summary);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, &report)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        log::info!("Setup report written to {}", self.path.display());
        Ok(report)
    }

    /// Prints the outcome of a run, writing the report file on success.
    pub fn publish(&self, summary: &RunSummary) {
        println!("\n{}", "=".repeat(60));

        if !summary.is_success() {
            println!("{}", self.render_failure(summary));
            return;
        }

        match self.write_success(summary) {
            Ok(report) => println!("{}", report),
            Err(e) => {
                log::error!("{:#}", e);
                println!("{}", self.render_success(summary));
                println!("Warning: report could not be saved: {:#}", e);
            }
        }
        println!("{}", MSG_SETUP_COMPLETE);
        println!("{}", MSG_SYSTEM_READY);
    }
}
