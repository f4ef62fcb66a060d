//! Forvo 登录
//!
//! 整个进程只登录一次，在处理任何单词之前完成。
//! 登录失败对整个批次是致命的：不重试、不处理验证码，直接终止。

use tokio::time::sleep;
use tracing::{debug, info};

use chromiumoxide::Page;

use crate::config::Config;
use crate::error::{AppError, AppResult, AuthError};

/// 登录 Forvo，并把会话 cookie 留在共享浏览器上下文里
///
/// 步骤：打开登录页 → 填邮箱和密码 → 勾选"记住我" → 提交
pub async fn login(page: &Page, config: &Config) -> AppResult<()> {
    info!("🔑 正在登录 Forvo: {}", config.login_url);

    page.goto(&config.login_url).await.map_err(|e| {
        AppError::Auth(AuthError::LoginPageUnreachable {
            url: config.login_url.clone(),
            source: Box::new(e),
        })
    })?;
    page.wait_for_navigation().await?;

    // 填写账号密码
    let login_field = page
        .find_element("input[name='login']")
        .await
        .map_err(|e| AppError::auth_field_missing("login", e))?;
    login_field.click().await?;
    login_field.type_str(&config.forvo_email).await?;

    let password_field = page
        .find_element("input[name='password']")
        .await
        .map_err(|e| AppError::auth_field_missing("password", e))?;
    password_field.click().await?;
    password_field.type_str(&config.forvo_password).await?;

    // 勾选持久会话
    let remember = page
        .find_element("input[name='remember']")
        .await
        .map_err(|e| AppError::auth_field_missing("remember", e))?;
    remember.click().await?;
    debug!("已勾选记住登录状态");

    // 提交表单
    let submit = page
        .find_element("input[type='submit'], button[type='submit']")
        .await
        .map_err(|e| AppError::auth_field_missing("submit", e))?;
    submit.click().await.map_err(|e| {
        AppError::Auth(AuthError::SubmitFailed {
            source: Box::new(e),
        })
    })?;

    page.wait_for_navigation().await?;
    // 等登录后的 cookie 落定
    sleep(tokio::time::Duration::from_millis(300)).await;

    info!("✅ 登录完成");
    Ok(())
}
