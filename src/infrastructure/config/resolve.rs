//! 설정 값(key/env)을 실제 런타임 값으로 해석하는 유틸리티.
//!
//! - 환경변수 접근은 인프라 계층에서만 수행한다.

use std::env;

use crate::application::config::{FALLBACK_API_KEY_ENVS, ProviderConfig};

/// Provider(API key) 해석 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredentialResolution {
    pub credential: Option<String>,
    pub source: Option<String>,
}

/// Provider API key를 해석한다.
/// 우선순위: `api_key` > `api_key_env` > 기본 환경변수 목록.
pub fn resolve_provider_api_key(cfg: &ProviderConfig) -> ProviderCredentialResolution {
    resolve_with(cfg, |name| env::var(name).ok())
}

fn resolve_with(
    cfg: &ProviderConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ProviderCredentialResolution {
    if let Some(key) = cfg.api_key.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        return ProviderCredentialResolution {
            credential: Some(key.to_string()),
            source: Some("inline".to_string()),
        };
    }

    let configured_env = cfg
        .api_key_env
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(env_name) = configured_env {
        return match lookup(env_name).map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => ProviderCredentialResolution {
                credential: Some(v),
                source: Some(format!("env:{env_name}")),
            },
            _ => ProviderCredentialResolution {
                credential: None,
                source: Some(format!("env:{env_name} (missing)")),
            },
        };
    }

    for env_name in FALLBACK_API_KEY_ENVS {
        if let Some(v) = lookup(env_name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            return ProviderCredentialResolution {
                credential: Some(v),
                source: Some(format!("env:{env_name}")),
            };
        }
    }

    ProviderCredentialResolution {
        credential: None,
        source: None,
    }
}
