use forvo_audio_fetch::browser::{launch_browser, login, set_download_directory};
use forvo_audio_fetch::infrastructure::PageDriver;
use forvo_audio_fetch::workflow::{FetchFlow, WordCtx};
use forvo_audio_fetch::{logger, Config};

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_browser_launch_and_shutdown() {
    // 初始化日志
    logger::init();

    let config = Config {
        headless: true,
        ..Config::default()
    };

    let result = launch_browser(&config).await;
    assert!(result.is_ok(), "应该能够成功启动浏览器");

    let (mut browser, _page) = result.unwrap();
    let _ = browser.close().await;
    let _ = browser.wait().await;
}

#[tokio::test]
#[ignore] // 需要真实的 Forvo 账号（FORVO_EMAIL / FORVO_PASSWORD / FORVO_DOWNLOAD_DIRECTORY）
async fn test_login() {
    logger::init();

    let config = Config::from_env().expect("缺少必需的环境变量");

    let (mut browser, page) = launch_browser(&config).await.expect("启动浏览器失败");

    let result = login(&page, &config).await;
    assert!(result.is_ok(), "登录应该成功: {:?}", result.err());

    let _ = browser.close().await;
    let _ = browser.wait().await;
}

#[tokio::test]
#[ignore] // 端到端抓取一个单词，需要账号和网络
async fn test_fetch_single_word() {
    logger::init();

    let config = Config::from_env().expect("缺少必需的环境变量");

    let (mut browser, page) = launch_browser(&config).await.expect("启动浏览器失败");
    set_download_directory(&page, &config.download_directory)
        .await
        .expect("配置下载目录失败");
    login(&page, &config).await.expect("登录失败");

    let driver = PageDriver::new(page);
    let flow = FetchFlow::new(&config).expect("创建抓取流程失败");
    let ctx = WordCtx::new(
        1,
        "λόγος".to_string(),
        "https://forvo.com/word/%CE%BB%CF%8C%CE%B3%CE%BF%CF%82/".to_string(),
    );

    let outcome = flow.run(&driver, &ctx).await.expect("抓取流程失败");
    println!("抓取结果: {:?}", outcome);

    let _ = browser.close().await;
    let _ = browser.wait().await;
}
