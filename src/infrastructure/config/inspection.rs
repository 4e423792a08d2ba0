//! 적용 설정 진단(inspection) 뷰 모델.

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::resolve_provider_api_key;
use crate::application::config::DefaultsConfig;

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub defaults: DefaultsConfig,
    pub effective: EffectiveSettings,
    pub gemini: GeminiInspection,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveSettings {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_ms: u128,
}

/// API key 값 자체는 노출하지 않고 출처/해석 여부만 보여준다.
#[derive(Debug, Clone, Serialize)]
pub struct GeminiInspection {
    pub enabled: bool,
    pub api_base: String,
    pub api_key_source: Option<String>,
    pub api_key_resolved: bool,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let settings = loaded.config.generation_settings();
        let gemini = loaded.config.gemini();
        let credential = resolve_provider_api_key(&gemini);

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            defaults: loaded.config.defaults.clone(),
            effective: EffectiveSettings {
                model: settings.model,
                temperature: settings.temperature,
                top_p: settings.top_p,
                timeout_ms: loaded.config.timeout().as_millis(),
            },
            gemini: GeminiInspection {
                enabled: gemini.is_enabled(),
                api_base: gemini.api_base(),
                api_key_source: credential.source,
                api_key_resolved: credential.credential.is_some(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::application::config::Config;

    #[test]
    fn inspection_never_contains_inline_key() {
        let config: Config = serde_json::from_str(
            r#"{"providers":{"gemini":{"api_key":"AIzaSecretValue","enabled":false}}}"#,
        )
        .expect("config");
        let inspection = ConfigInspection::from_loaded(LoadedConfig {
            config,
            searched_paths: vec![PathBuf::from("a.json")],
            loaded_paths: vec![PathBuf::from("a.json")],
        });

        let json = serde_json::to_string(&inspection).expect("serialize");
        assert!(!json.contains("AIzaSecretValue"));
        assert!(inspection.gemini.api_key_resolved);
        assert!(!inspection.gemini.enabled);
        assert_eq!(inspection.gemini.api_key_source.as_deref(), Some("inline"));
        assert_eq!(inspection.loaded_paths, vec!["a.json".to_string()]);
    }
}
