use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Caption languages to try, in priority order
    pub languages: Vec<String>,

    /// Shared HTTP client settings
    pub http: HttpConfig,

    /// Official caption endpoint
    pub timedtext: TimedTextConfig,

    /// yt-dlp fallback
    pub ytdlp: YtDlpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout, also applied to the transcript library
    pub timeout_secs: u64,

    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimedTextConfig {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YtDlpConfig {
    /// Executable name or path
    pub path: String,

    /// Upper bound for one metadata dump
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()],
            http: HttpConfig::default(),
            timedtext: TimedTextConfig::default(),
            ytdlp: YtDlpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("transcript-harvester/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for TimedTextConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.youtube.com/api/timedtext".to_string(),
        }
    }
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            path: "yt-dlp".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl YtDlpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from an explicit file, the usual locations, or defaults.
    ///
    /// An explicit path must exist; the implicit locations are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_path().filter(|path| path.exists()),
        };

        let config = match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Get configuration file path
    fn config_path() -> Option<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join("transcript-harvester").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            anyhow::bail!("At least one caption language must be configured");
        }
        if self.languages.iter().any(|lang| lang.trim().is_empty()) {
            anyhow::bail!("Caption languages must not be blank");
        }

        if self.http.timeout_secs == 0 || self.ytdlp.timeout_secs == 0 {
            anyhow::bail!("Timeouts must be greater than zero");
        }

        let endpoint = Url::parse(&self.timedtext.endpoint)
            .with_context(|| format!("Invalid timedtext endpoint: {}", self.timedtext.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!("Timedtext endpoint must use HTTP or HTTPS protocol");
        }

        Ok(())
    }

    /// Log the effective configuration
    pub fn display(&self) {
        tracing::debug!("Languages: {}", self.languages.join(", "));
        tracing::debug!("HTTP timeout: {}s", self.http.timeout_secs);
        tracing::debug!("Timedtext endpoint: {}", self.timedtext.endpoint);
        tracing::debug!("yt-dlp: {} (timeout {}s)", self.ytdlp.path, self.ytdlp.timeout_secs);
    }
}
