//! 설정 파일 탐색/병합 결과를 확인하는 유스케이스.

use anyhow::Result;
use serde_json::Value;

use crate::application::ports::ConfigRepository;

/// 현재 적용 중인 설정을 사람이 읽기 쉬운 형태로 반환한다.
pub struct InspectConfigUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
}

impl<'a> InspectConfigUseCase<'a> {
    /// 설정 점검 결과 JSON 문자열을 생성한다.
    pub fn execute(&self) -> Result<String> {
        self.config_repo.inspect_pretty_json()
    }

    /// REPL 시작 화면용 요약 줄을 만든다. 오류도 줄로 변환해 돌려준다.
    pub fn dashboard_lines(&self) -> Vec<String> {
        match self.execute() {
            Ok(raw) => summarize_inspection(&raw),
            Err(err) => vec![
                "Config: error".to_string(),
                format!("detail: {err}"),
                "hint: run `/config` to inspect and fix".to_string(),
            ],
        }
    }
}

fn summarize_inspection(raw: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => {
            lines.push("Config: loaded (dashboard parse fallback)".to_string());
            lines.push("hint: run `/config` to inspect details".to_string());
            return lines;
        }
    };

    let loaded_count = value
        .get("loaded_paths")
        .and_then(Value::as_array)
        .map(|arr| arr.len())
        .unwrap_or(0);
    lines.push(format!("Config: ok (loaded files: {loaded_count})"));

    let model = value
        .pointer("/effective/model")
        .and_then(Value::as_str)
        .unwrap_or("-");
    let temperature = value
        .pointer("/effective/temperature")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let top_p = value
        .pointer("/effective/top_p")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    lines.push(format!("Model: {model} (temperature {temperature:.2}, top_p {top_p:.2})"));

    let enabled = value
        .pointer("/gemini/enabled")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let resolved = value
        .pointer("/gemini/api_key_resolved")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let source = value
        .pointer("/gemini/api_key_source")
        .and_then(Value::as_str)
        .unwrap_or("not set");
    let state = if enabled { "enabled" } else { "disabled" };
    let key = if resolved { "ok" } else { "missing" };
    lines.push(format!("Gemini: {state}, api key {key} ({source})"));

    lines
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;
    use crate::application::config::Config;

    struct RawRepo(&'static str);

    impl ConfigRepository for RawRepo {
        fn load(&self) -> Result<Config> {
            Ok(Config::default())
        }

        fn inspect_pretty_json(&self) -> Result<String> {
            if self.0.is_empty() {
                bail!("failed to parse JSON in .eslreview/config.json");
            }
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn dashboard_summarizes_inspection() {
        let repo = RawRepo(
            r#"{"loaded_paths":["a","b"],
                "effective":{"model":"gemini-2.5-flash","temperature":1.0,"top_p":0.95},
                "gemini":{"enabled":true,"api_key_resolved":true,"api_key_source":"env:GEMINI_API_KEY"}}"#,
        );
        let lines = InspectConfigUseCase { config_repo: &repo }.dashboard_lines();
        assert_eq!(lines[0], "Config: ok (loaded files: 2)");
        assert_eq!(lines[1], "Model: gemini-2.5-flash (temperature 1.00, top_p 0.95)");
        assert_eq!(lines[2], "Gemini: enabled, api key ok (env:GEMINI_API_KEY)");
    }

    #[test]
    fn dashboard_reports_load_errors() {
        let repo = RawRepo("");
        let lines = InspectConfigUseCase { config_repo: &repo }.dashboard_lines();
        assert_eq!(lines[0], "Config: error");
        assert!(lines[1].contains("failed to parse JSON"));
    }
}
