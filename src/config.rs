use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_FINVIZ_BASE_URL: &str = "https://finviz.com";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_OPENROUTER_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub finviz_base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub offline: bool,
    pub openrouter_api_key: Option<String>,
    pub openrouter_url: String,
    pub openrouter_model: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            finviz_base_url: DEFAULT_FINVIZ_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            // Finviz rejects requests without a browser-like agent
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) finviz-dashboard/2025.9".to_string(),
            offline: false,
            openrouter_api_key: None,
            openrouter_url: DEFAULT_OPENROUTER_URL.to_string(),
            openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
        }
    }

    pub fn with_bind_addr(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn with_finviz_base_url(mut self, url: &str) -> Self {
        self.finviz_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Blank keys are treated as absent so an empty env var disables the lookup.
    pub fn with_openrouter_api_key(mut self, key: Option<String>) -> Self {
        self.openrouter_api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_openrouter_model(mut self, model: &str) -> Self {
        self.openrouter_model = model.to_string();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
