use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 页面导航超时（秒），嵌套在总时限之内
    pub nav_timeout_secs: u64,
    /// 单次求解的总时限（秒），必须小于上游网关的 180 秒
    pub solve_total_timeout_secs: u64,
    /// 单个网络请求的超时（秒）：附件下载 / 答案提交 / 转写
    pub request_timeout_secs: u64,
    /// 附件大小上限（字节），超过直接拒绝解码
    pub max_attachment_bytes: u64,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 音频转写模型
    pub transcribe_model_name: String,
    // --- 提示词 ---
    pub system_prompt: String,
    pub user_prompt: String,
    // --- 提交身份（缺省时以 null 透传） ---
    pub submit_email: Option<String>,
    pub submit_secret: Option<String>,
    /// 浏览器可执行文件路径（缺省时由 chromiumoxide 自动探测）
    pub chrome_executable: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nav_timeout_secs: 60,
            solve_total_timeout_secs: 160,
            request_timeout_secs: 30,
            max_attachment_bytes: 10 * 1024 * 1024,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            transcribe_model_name: "whisper-1".to_string(),
            system_prompt: String::new(),
            user_prompt: String::new(),
            submit_email: None,
            submit_secret: None,
            chrome_executable: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            nav_timeout_secs: std::env::var("NAV_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.nav_timeout_secs),
            solve_total_timeout_secs: std::env::var("SOLVE_TOTAL_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.solve_total_timeout_secs),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_attachment_bytes: std::env::var("MAX_ATTACHMENT_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_attachment_bytes),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            transcribe_model_name: std::env::var("TRANSCRIBE_MODEL_NAME").unwrap_or(default.transcribe_model_name),
            system_prompt: std::env::var("SYSTEM_PROMPT").unwrap_or(default.system_prompt),
            user_prompt: std::env::var("USER_PROMPT").unwrap_or(default.user_prompt),
            submit_email: std::env::var("SUBMIT_EMAIL").ok(),
            submit_secret: std::env::var("SUBMIT_SECRET").ok(),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok(),
        }
    }

    pub fn nav_timeout(&self) -> Duration {
        Duration::from_secs(self.nav_timeout_secs)
    }

    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.solve_total_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
