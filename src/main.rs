use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use multimodal_quickstart::config::Settings;
use multimodal_quickstart::consts::*;
use multimodal_quickstart::pipeline::Pipeline;
use multimodal_quickstart::report::ReportGenerator;
use multimodal_quickstart::runtime::SystemRunner;

fn main() -> Result<ExitCode> {
    // 初始化日志
    env_logger::init();
    println!("{}", MSG_BANNER);

    // 加载配置
    let settings = Settings::load()?;
    log::debug!("Settings: {:?}", settings);

    // 按顺序执行所有步骤
    let pipeline = Pipeline::standard(&settings, Arc::new(SystemRunner))?;
    let summary = pipeline.run();

    // 输出报告
    let reporter = ReportGenerator::new(settings.resolve(&settings.report_file));
    reporter.publish(&summary);

    if summary.is_success() {
        println!("\n{}", MSG_PRO_TIP);
    } else {
        println!("\n{}", MSG_NEED_HELP.replace("{}", SUPPORT_CONTACT));
    }

    Ok(ExitCode::from(summary.exit_code() as u8))
}
