use anyhow::Result;

use auto_job_submit::config::Config;
use auto_job_submit::logger;
use auto_job_submit::models::parse_platform_args;
use auto_job_submit::orchestrator::App;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::load();

    // 命令行参数决定运行哪些平台，缺省全部
    let args: Vec<String> = std::env::args().skip(1).collect();
    let platforms = parse_platform_args(&args);

    // 依次运行各平台
    let mut app = App::initialize(config);
    app.run(&platforms).await;

    Ok(())
}
