use std::time::Duration;

pub const DEFAULT_PORT: u16 = 61222;
pub const DEFAULT_AUTHORITY_URL: &str = "https://api.magiccap.me";
pub const DEFAULT_AUTHORITY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the token authority (`/swap_tokens/create/:uploader` lives under it).
    pub authority_url: String,
    /// Upper bound on one authority call, connect included.
    pub authority_timeout: Duration,
    /// Interval of the expired-token sweep. `None` keeps expiry purely lazy.
    /// Set via UPLOADERS_SWEEP_INTERVAL_SECS; 0 disables.
    pub sweep_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            authority_url: DEFAULT_AUTHORITY_URL.to_string(),
            authority_timeout: Duration::from_secs(DEFAULT_AUTHORITY_TIMEOUT_SECS),
            sweep_interval: None,
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
    let authority_url = get("UPLOADERS_AUTHORITY_URL")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHORITY_URL.into());

    if !authority_url.starts_with("http://") && !authority_url.starts_with("https://") {
        anyhow::bail!(
            "UPLOADERS_AUTHORITY_URL must be an http(s) URL, got '{}'",
            authority_url
        );
    }

    let timeout_secs = get("UPLOADERS_AUTHORITY_TIMEOUT_SECS")
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_AUTHORITY_TIMEOUT_SECS);

    let sweep_secs = get("UPLOADERS_SWEEP_INTERVAL_SECS")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(Config {
        port: get("UPLOADERS_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT),
        authority_url,
        authority_timeout: Duration::from_secs(timeout_secs),
        sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
    })
}
