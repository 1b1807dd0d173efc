use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default TextOn data directory: ~/.texton
pub fn get_texton_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".texton"))
}

pub fn load_from_str(s: &str) -> anyhow::Result<AppConfig> {
    Ok(toml::from_str::<AppConfig>(s)?)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.texton/config.toml (highest)
    let data_dir = get_texton_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg: AppConfig = if user_config.exists() {
        load_from_str(&std::fs::read_to_string(&user_config)?)?
    } else if local_config.exists() {
        load_from_str(&std::fs::read_to_string(local_config)?)?
    } else {
        AppConfig::default()
    };

    if cfg
        .storage
        .directory
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        cfg.storage.directory = Some(data_dir.join("storage").to_string_lossy().to_string());
    }

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

/// Environment variable overrides (Priority 0: highest). Empty values are ignored.
pub(crate) fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("TEXTON_API_URL") {
        cfg.api.base_url = v;
    }
    if let Some(v) = get("TEXTON_STORAGE_DIR") {
        cfg.storage.directory = Some(v);
    }
    if let Some(v) = get("TEXTON_PORT") {
        match v.trim().parse::<u16>() {
            Ok(port) => cfg.dev_server.port = port,
            Err(_) => tracing::warn!(target: "texton.config", value = %v, "ignoring invalid TEXTON_PORT"),
        }
    }
    if let Some(v) = get("TEXTON_API_TARGET") {
        cfg.dev_server.api_target = strip_api_suffix(&v);
    }
    if let Some(v) = get("TEXTON_STATIC_DIR") {
        cfg.dev_server.static_dir = v;
    }
}

fn strip_api_suffix(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    trimmed.strip_suffix("/api").unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = load_from_str(
            r#"
            [api]
            base_url = "https://notes.example.com/api"

            [dev_server]
            port = 12000
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "https://notes.example.com/api");
        assert_eq!(cfg.api.timeout_ms, 30_000);
        assert_eq!(cfg.dev_server.port, 12000);
        assert_eq!(cfg.dev_server.api_target, "http://localhost:8000");
        assert_eq!(cfg.session.idle_poll_secs, 10);
    }

    #[test]
    fn env_overrides_win_and_skip_empty() {
        let env: HashMap<&str, &str> = [
            ("TEXTON_API_URL", "http://10.0.0.2:8000/api"),
            ("TEXTON_PORT", "12345"),
            ("TEXTON_API_TARGET", "http://10.0.0.2:8000/api/"),
            ("TEXTON_STATIC_DIR", "   "),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.api.base_url, "http://10.0.0.2:8000/api");
        assert_eq!(cfg.dev_server.port, 12345);
        assert_eq!(cfg.dev_server.api_target, "http://10.0.0.2:8000");
        assert_eq!(cfg.dev_server.static_dir, "dist");
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| {
            (k == "TEXTON_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(cfg.dev_server.port, 10086);
    }
}
