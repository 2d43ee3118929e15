#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub provider_base_url: String,
    pub provider_login: String,
    pub provider_password: String,
    pub provider_timeout_secs: u64,
    pub provider_success_code: u32,
    pub provider_error_threshold: u32,
    pub rate_limit_per_minute: u32,
    pub rate_limit_per_hour: u32,
    pub summarizer_base_url: String,
    pub summarizer_api_key: Option<String>,
    pub summarizer_model: String,
    pub summarizer_timeout_secs: u64,
    pub ledger_retention_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("provider_base_url", &self.provider_base_url)
            .field("provider_login", &self.provider_login)
            .field("provider_password", &"[redacted]")
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("provider_success_code", &self.provider_success_code)
            .field("provider_error_threshold", &self.provider_error_threshold)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("rate_limit_per_hour", &self.rate_limit_per_hour)
            .field("summarizer_base_url", &self.summarizer_base_url)
            .field(
                "summarizer_api_key",
                &self.summarizer_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("summarizer_model", &self.summarizer_model)
            .field("summarizer_timeout_secs", &self.summarizer_timeout_secs)
            .field("ledger_retention_secs", &self.ledger_retention_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
