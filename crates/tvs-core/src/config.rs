use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-request HTTP limits (`[http]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

/// Whole-pipeline retry parameters (`[retry]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of pipeline runs (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds between runs (e.g. 0.25 = 250ms), doubled per attempt.
    pub base_delay_secs: f64,
    /// Maximum delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

/// Size probe parameters (`[probe]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// HEAD / Range GET / GET cycles per URL.
    pub max_cycles: u32,
    /// Pause after an unsuccessful cycle, in milliseconds.
    pub retry_delay_ms: u64,
    /// Probe media URLs concurrently.
    pub parallel: bool,
    /// Route probe requests through `proxy` as well. Off by default: only the
    /// backend calls are proxied.
    pub use_proxy: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_cycles: 50,
            retry_delay_ms: 1000,
            parallel: false,
            use_proxy: false,
        }
    }
}

/// Global configuration loaded from `~/.config/tvs/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TvsConfig {
    /// Optional proxy URL: `http://`, `https://`, `socks4://` or `socks5://`.
    pub proxy: Option<String>,
    pub http: HttpConfig,
    pub retry: RetryConfig,
    pub probe: ProbeConfig,
}

impl TvsConfig {
    /// Rejects values that parse as TOML but cannot drive the pipeline.
    pub fn validate(&self) -> Result<()> {
        let base = self.retry.base_delay_secs;
        if !base.is_finite() || base < 0.0 || base > self.retry.max_delay_secs as f64 {
            anyhow::bail!(
                "retry.base_delay_secs must be between 0 and retry.max_delay_secs ({}), got {}",
                self.retry.max_delay_secs,
                base
            );
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tvs")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TvsConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<TvsConfig> {
    if !path.exists() {
        let default_cfg = TvsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: TvsConfig = toml::from_str(&data)?;
    cfg.validate()
        .map_err(|e| e.context(format!("invalid config {}", path.display())))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = TvsConfig::default();
        assert!(cfg.proxy.is_none());
        assert_eq!(cfg.http.connect_timeout_secs, 15);
        assert_eq!(cfg.http.timeout_secs, 30);
        assert_eq!(cfg.retry.max_attempts, 50);
        assert_eq!(cfg.probe.max_cycles, 50);
        assert_eq!(cfg.probe.retry_delay_ms, 1000);
        assert!(!cfg.probe.parallel);
        assert!(!cfg.probe.use_proxy);
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut cfg = TvsConfig::default();
        cfg.proxy = Some("socks5://127.0.0.1:9050".into());
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: TvsConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let toml = r#"
            proxy = "http://10.0.0.1:8080"

            [probe]
            max_cycles = 5
            parallel = true
        "#;
        let cfg: TvsConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.proxy.as_deref(), Some("http://10.0.0.1:8080"));
        assert_eq!(cfg.probe.max_cycles, 5);
        assert!(cfg.probe.parallel);
        assert_eq!(cfg.probe.retry_delay_ms, 1000);
        assert_eq!(cfg.http, HttpConfig::default());
        assert_eq!(cfg.retry.max_attempts, 50);
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            [retry]
            max_attempts = 3
            base_delay_secs = 0.5
            max_delay_secs = 15
        "#;
        let cfg: TvsConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.retry.max_attempts, 3);
        assert!((cfg.retry.base_delay_secs - 0.5).abs() < 1e-9);
        assert_eq!(cfg.retry.max_delay_secs, 15);
    }

    #[test]
    fn infinite_base_delay_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[retry]\nbase_delay_secs = inf\n").unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("base_delay_secs"));
    }

    #[test]
    fn base_delay_bounds() {
        let mut cfg = TvsConfig::default();
        assert!(cfg.validate().is_ok());
        cfg.retry.base_delay_secs = -1.0;
        assert!(cfg.validate().is_err());
        cfg.retry.base_delay_secs = 1e300;
        assert!(cfg.validate().is_err());
        cfg.retry.base_delay_secs = 5.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_or_init_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, TvsConfig::default());

        fs::write(&path, "[http]\ntimeout_secs = 90\n").unwrap();
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.http.timeout_secs, 90);
        assert_eq!(loaded.http.connect_timeout_secs, 15);
    }
}
