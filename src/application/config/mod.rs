//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수 접근은 `infrastructure`에서만 수행한다.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::review::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, GenerationSettings};

pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// `api_key`/`api_key_env`가 모두 비었을 때 순서대로 조회하는 환경변수.
pub const FALLBACK_API_KEY_ENVS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 전역 기본값
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// provider 실행 설정
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    /// 샘플링 temperature(기본 1.0)
    pub temperature: Option<f32>,
    /// nucleus sampling top_p(기본 0.95)
    pub top_p: Option<f32>,
    /// 생성 호출 타임아웃(ms)
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProvidersConfig {
    pub gemini: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProviderConfig {
    /// provider 활성화 여부(기본 true)
    pub enabled: Option<bool>,
    /// 사용할 모델 식별자(선택)
    pub model: Option<String>,
    /// API 베이스 URL(선택)
    pub api_base: Option<String>,
    /// 인증 키/토큰(직접값)
    pub api_key: Option<String>,
    /// 인증 키/토큰을 읽을 환경변수 이름
    pub api_key_env: Option<String>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.defaults.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    /// 생성 호출에 넘길 샘플링 설정을 해석한다.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self
                .providers
                .gemini
                .as_ref()
                .and_then(|p| p.model.clone())
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.defaults.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            top_p: self.defaults.top_p.unwrap_or(DEFAULT_TOP_P),
        }
    }

    /// 설정에 gemini 블록이 없어도 기본값으로 활성화된 것으로 본다.
    pub fn gemini(&self) -> ProviderConfig {
        self.providers.gemini.clone().unwrap_or_default()
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: Config) {
        self.defaults.merge_from(other.defaults);
        self.providers.merge_from(other.providers);
    }
}

impl DefaultsConfig {
    pub fn merge_from(&mut self, other: DefaultsConfig) {
        if other.temperature.is_some() {
            self.temperature = other.temperature;
        }
        if other.top_p.is_some() {
            self.top_p = other.top_p;
        }
        if other.timeout_ms.is_some() {
            self.timeout_ms = other.timeout_ms;
        }
    }
}

impl ProviderConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn api_base(&self) -> String {
        self.api_base
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string())
    }

    pub fn merge_from(&mut self, other: ProviderConfig) {
        if other.enabled.is_some() {
            self.enabled = other.enabled;
        }
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.api_key_env.is_some() {
            self.api_key_env = other.api_key_env;
        }
    }
}

impl ProvidersConfig {
    pub fn merge_from(&mut self, other: ProvidersConfig) {
        match (self.gemini.as_mut(), other.gemini) {
            (Some(existing), Some(next)) => existing.merge_from(next),
            (None, Some(next)) => self.gemini = Some(next),
            _ => {}
        }
    }
}
