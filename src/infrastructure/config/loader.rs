//! 설정 파일 탐색/병합 로더.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;
use tracing::debug;

use crate::application::config::{Config, DEFAULT_GEMINI_API_BASE, DEFAULT_TIMEOUT_MS};
use crate::domain::review::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};

pub const CONFIG_ENV: &str = "ESLREVIEW_CONFIG";

#[derive(Debug, Clone)]
pub(crate) struct LoadedConfig {
    pub config: Config,
    pub searched_paths: Vec<PathBuf>,
    pub loaded_paths: Vec<PathBuf>,
}

/// 우선순위 경로를 순회해 JSON 설정을 병합한다.
pub(crate) fn load_merged_config() -> Result<LoadedConfig> {
    // 명시 경로가 아직 없으면 편집용 템플릿을 먼저 만들어 둔다.
    if let Ok(path) = env::var(CONFIG_ENV)
        && !path.trim().is_empty()
        && !Path::new(&path).exists()
    {
        bootstrap_template(Path::new(&path))?;
    }

    load_from_paths(config_paths())
}

/// 주어진 경로 목록을 낮은 우선순위부터 병합한다. 없는 파일은 건너뛴다.
pub(crate) fn load_from_paths(paths: Vec<PathBuf>) -> Result<LoadedConfig> {
    let mut merged = Config::default();
    let mut loaded_paths = Vec::new();

    for path in &paths {
        if !path.exists() {
            continue;
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let parsed: Config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
        merged.merge_from(parsed);
        debug!(path = %path.display(), "loaded config file");
        loaded_paths.push(path.to_path_buf());
    }

    Ok(LoadedConfig {
        config: merged,
        searched_paths: paths,
        loaded_paths,
    })
}

/// 시스템 + 사용자 + 프로젝트 + 명시 경로 순으로 병합 경로를 구성한다.
pub fn config_paths() -> Vec<PathBuf> {
    // 낮은 우선순위 -> 높은 우선순위 순서로 병합됨.
    let mut paths = vec![PathBuf::from("/etc/eslreview/config.json")];

    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("eslreview").join("config.json"));
    }

    paths.push(PathBuf::from(".eslreview/config.json"));

    if let Ok(path) = env::var(CONFIG_ENV)
        && !path.trim().is_empty()
    {
        paths.push(PathBuf::from(path));
    }

    dedup_paths(paths)
}

fn bootstrap_template(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        return Ok(());
    }

    if let Some(parent) = config_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let template = json!({
        "defaults": {
            "temperature": DEFAULT_TEMPERATURE,
            "top_p": DEFAULT_TOP_P,
            "timeout_ms": DEFAULT_TIMEOUT_MS
        },
        "providers": {
            "gemini": {
                "enabled": true,
                "api_key_env": "GEMINI_API_KEY",
                "model": DEFAULT_MODEL,
                "api_base": DEFAULT_GEMINI_API_BASE
            }
        }
    });

    let rendered = serde_json::to_string_pretty(&template)?;
    fs::write(config_path, format!("{rendered}\n")).with_context(|| {
        format!(
            "failed to create config template at {}",
            config_path.display()
        )
    })
}

fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for p in paths {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}
