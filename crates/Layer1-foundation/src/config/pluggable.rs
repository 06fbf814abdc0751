//! Pluggable Config - 통합 설정
//!
//! 글로벌(`~/.config/pluggable/pluggable.json`)과 프로젝트(`.pluggable/pluggable.json`)
//! 설정을 병합합니다. 프로젝트 값이 우선합니다.

use crate::env_detect::RuntimeEnvironment;
use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// 설정 파일명
pub const PLUGGABLE_CONFIG_FILE: &str = "pluggable.json";

fn default_version() -> u32 {
    1
}

/// Pluggable 통합 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluggableConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// 실행 환경 태그. 없으면 `PLUGGABLE_ENV`에서 감지
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<RuntimeEnvironment>,

    /// 라이프사이클 훅 기본 타임아웃 (ms). 없으면 무제한
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_timeout_ms: Option<u64>,

    /// 로그 레벨 (`RUST_LOG`가 없을 때 사용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for PluggableConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            environment: None,
            hook_timeout_ms: None,
            log_level: None,
        }
    }
}

impl PluggableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            config.merge_from(&global)?;
        }

        // 2. 프로젝트 설정
        if let Ok(project) = JsonStore::current_project() {
            config.merge_from(&project)?;
        }

        Ok(config)
    }

    /// 주어진 저장소의 설정 파일이 있으면 병합
    pub fn merge_from(&mut self, store: &JsonStore) -> Result<()> {
        if let Some(loaded) = store.load_optional::<PluggableConfig>(PLUGGABLE_CONFIG_FILE)? {
            debug!(path = %store.file_path(PLUGGABLE_CONFIG_FILE).display(), "Merging config");
            self.merge(loaded);
        }
        Ok(())
    }

    /// 저장소에 설정 저장
    pub fn save_to(&self, store: &JsonStore) -> Result<()> {
        store.save(PLUGGABLE_CONFIG_FILE, self)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: PluggableConfig) {
        self.version = self.version.max(other.version);
        if other.environment.is_some() {
            self.environment = other.environment;
        }
        if other.hook_timeout_ms.is_some() {
            self.hook_timeout_ms = other.hook_timeout_ms;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    // ========================================================================
    // Resolved values
    // ========================================================================

    /// 명시된 환경 또는 감지된 환경
    pub fn resolved_environment(&self) -> RuntimeEnvironment {
        self.environment.unwrap_or_else(RuntimeEnvironment::detect)
    }

    /// 훅 타임아웃 (0 이하는 무제한으로 취급)
    pub fn hook_timeout(&self) -> Option<Duration> {
        self.hook_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn environment(mut self, environment: RuntimeEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn hook_timeout_ms(mut self, ms: u64) -> Self {
        self.hook_timeout_ms = Some(ms);
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PluggableConfig::new();
        assert_eq!(config.version, 1);
        assert!(config.environment.is_none());
        assert!(config.hook_timeout().is_none());
    }

    #[test]
    fn test_config_merge() {
        let mut base = PluggableConfig::new().hook_timeout_ms(500).log_level("warn");

        let overlay = PluggableConfig::new()
            .environment(RuntimeEnvironment::Production)
            .hook_timeout_ms(1500);

        base.merge(overlay);

        assert_eq!(base.environment, Some(RuntimeEnvironment::Production));
        assert_eq!(base.hook_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(base.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_zero_timeout_means_unbounded() {
        let config = PluggableConfig::new().hook_timeout_ms(0);
        assert!(config.hook_timeout().is_none());
    }

    #[test]
    fn test_explicit_environment_wins() {
        let config = PluggableConfig::new().environment(RuntimeEnvironment::Production);
        assert_eq!(config.resolved_environment(), RuntimeEnvironment::Production);
    }

    #[test]
    fn test_save_and_merge_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        PluggableConfig::new()
            .environment(RuntimeEnvironment::Production)
            .hook_timeout_ms(250)
            .save_to(&store)
            .unwrap();

        let raw = std::fs::read_to_string(store.file_path(PLUGGABLE_CONFIG_FILE)).unwrap();
        assert!(raw.contains("\"hookTimeoutMs\": 250"));

        let mut config = PluggableConfig::new();
        config.merge_from(&store).unwrap();
        assert_eq!(config.environment, Some(RuntimeEnvironment::Production));
        assert_eq!(config.hook_timeout_ms, Some(250));
    }

    #[test]
    fn test_merge_from_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let mut config = PluggableConfig::new();
        config.merge_from(&store).unwrap();
        assert_eq!(config, PluggableConfig::new());
    }
}
