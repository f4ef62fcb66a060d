use anyhow::Result;
use forvo_audio_fetch::orchestrator::App;
use forvo_audio_fetch::{logger, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置（账号密码缺失时在这里直接失败）
    let config = Config::from_env()?;

    // 初始化应用（启动浏览器 + 登录，只做一次）
    let app = App::initialize(config).await?;

    // 运行主流程；无论成功失败都要关闭浏览器
    let result = app.run().await;
    app.shutdown().await;

    result
}
