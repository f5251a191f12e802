use anyhow::{Context, Result, bail};
use mono2notion_core::{PipelineConfig, StatementZone};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "mono2notion.toml";

/// Read the config file if present, then let the environment override it.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let mut cfg = read_config_file(path)?;
    apply_env_overrides(&mut cfg, |key| {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    })?;
    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<PipelineConfig> {
    if !path.exists() {
        return Ok(PipelineConfig::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Secrets and deployment-specific values usually arrive via the environment.
pub fn apply_env_overrides(
    cfg: &mut PipelineConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(v) = var("NOTION_API_KEY") {
        cfg.notion.api_key = Some(v);
    }
    if let Some(v) = var("NOTION_DB_URL") {
        cfg.notion.database_url = Some(v);
    }
    if let Some(v) = var("NOTION_DB_ID") {
        cfg.notion.database_id = Some(v);
    }
    if let Some(v) = var("NOTION_API_BASE") {
        cfg.notion.api_base = v;
    }
    if let Some(v) = var("MONO2NOTION_TZ") {
        cfg.statement.timezone = v
            .parse::<StatementZone>()
            .map_err(|e| anyhow::anyhow!("MONO2NOTION_TZ: {e}"))?;
    }
    if let Some(v) = var("MONO2NOTION_SCRATCH_DIR") {
        cfg.storage.scratch_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = var("AWS_REGION") {
        cfg.storage.region = Some(v);
    }
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("config already exists: {}", path.display());
    }
    let s = toml::to_string_pretty(&PipelineConfig::default()).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Copy of the config that is safe to print.
pub fn redacted(cfg: &PipelineConfig) -> PipelineConfig {
    let mut out = cfg.clone();
    if out.notion.api_key.is_some() {
        out.notion.api_key = Some("***".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut cfg = PipelineConfig::default();
        cfg.notion.api_key = Some("from-file".into());

        apply_env_overrides(
            &mut cfg,
            env(&[
                ("NOTION_API_KEY", "secret_env"),
                ("NOTION_DB_URL", "https://www.notion.so/ws/abc123?v=1"),
                ("MONO2NOTION_TZ", "Europe/Kyiv"),
                ("MONO2NOTION_SCRATCH_DIR", "/tmp/m2n"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.notion.api_key.as_deref(), Some("secret_env"));
        assert_eq!(cfg.notion.database_id().unwrap(), "abc123");
        assert_eq!(cfg.statement.timezone.to_string(), "Europe/Kyiv");
        assert_eq!(cfg.storage.scratch_dir(), PathBuf::from("/tmp/m2n"));
    }

    #[test]
    fn test_bad_timezone_env_is_error() {
        let mut cfg = PipelineConfig::default();
        assert!(apply_env_overrides(&mut cfg, env(&[("MONO2NOTION_TZ", "Nowhere/City")])).is_err());
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = read_config_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.notion.timeout_ms, 5_000);
    }

    #[test]
    fn test_init_writes_loadable_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        init_config(&path).unwrap();
        let cfg = read_config_file(&path).unwrap();
        assert_eq!(cfg.notion.retry.max_attempts, 5);
        assert_eq!(cfg.notion.api_base, "https://api.notion.com");

        assert!(init_config(&path).is_err());
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut cfg = PipelineConfig::default();
        cfg.notion.api_key = Some("secret_abc".into());
        assert_eq!(redacted(&cfg).notion.api_key.as_deref(), Some("***"));
        assert_eq!(redacted(&PipelineConfig::default()).notion.api_key, None);
    }
}
