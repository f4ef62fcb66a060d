use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 输入表格文件路径（至少包含 Word 和 Forvo URL 两列）
    pub csv_path: String,
    /// Forvo 登录邮箱
    pub forvo_email: String,
    /// Forvo 登录密码
    pub forvo_password: String,
    /// 浏览器下载目录（音频文件落在这里）
    pub download_directory: String,
    /// 登录页面 URL
    pub login_url: String,
    /// 等待下载按钮可点击的超时（秒）
    pub audio_element_wait_secs: u64,
    /// 点击后复查音频文件的最大轮询次数
    pub post_click_poll_attempts: usize,
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// 输出日志文件
    pub output_log_file: String,
    // --- 抖动延迟参数（截断正态分布，单位：秒） ---
    pub delay_mean: f64,
    pub delay_sd: f64,
    pub delay_low: f64,
    pub delay_upp: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: "data/words.csv".to_string(),
            forvo_email: String::new(),
            forvo_password: String::new(),
            download_directory: String::new(),
            login_url: "https://forvo.com/login/".to_string(),
            audio_element_wait_secs: 10,
            post_click_poll_attempts: 3,
            headless: true,
            output_log_file: "output.txt".to_string(),
            delay_mean: 1.5,
            delay_sd: 1.0,
            delay_low: 0.5,
            delay_upp: 3.0,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 账号、密码和下载目录没有合理的默认值，缺失即报错
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();
        Ok(Self {
            csv_path: std::env::var("CSV_PATH").unwrap_or(default.csv_path),
            forvo_email: require_env("FORVO_EMAIL")?,
            forvo_password: require_env("FORVO_PASSWORD")?,
            download_directory: require_env("FORVO_DOWNLOAD_DIRECTORY")?,
            login_url: std::env::var("FORVO_LOGIN_URL").unwrap_or(default.login_url),
            audio_element_wait_secs: std::env::var("AUDIO_ELEMENT_WAIT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.audio_element_wait_secs),
            post_click_poll_attempts: std::env::var("POST_CLICK_POLL_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.post_click_poll_attempts),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            delay_mean: std::env::var("DELAY_MEAN").ok().and_then(|v| v.parse().ok()).unwrap_or(default.delay_mean),
            delay_sd: std::env::var("DELAY_SD").ok().and_then(|v| v.parse().ok()).unwrap_or(default.delay_sd),
            delay_low: std::env::var("DELAY_LOW").ok().and_then(|v| v.parse().ok()).unwrap_or(default.delay_low),
            delay_upp: std::env::var("DELAY_UPP").ok().and_then(|v| v.parse().ok()).unwrap_or(default.delay_upp),
        })
    }
}

/// 读取必填的环境变量
fn require_env(var_name: &str) -> AppResult<String> {
    std::env::var(var_name).map_err(|_| {
        AppError::Config(ConfigError::EnvVarNotFound {
            var_name: var_name.to_string(),
        })
    })
}
