//! Plugin Manifest - 플러그인 메타데이터 정의
//!
//! 등록 이후에는 변경되지 않는 식별자/표시 정보, 의존성 목록, 작성자 설정.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 플러그인 버전
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PluginVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl std::fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Default for PluginVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// 플러그인 작성자 설정
///
/// 매니저는 읽기만 합니다. `enabled`가 true면 등록 직후 활성화를 시도합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// 등록 시 자동 활성화 여부
    pub enabled: bool,

    /// 우선순위 (기본 파이프라인 순서에는 사용되지 않음)
    pub priority: i32,

    /// 플러그인별 옵션
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 0,
            options: Map::new(),
        }
    }
}

impl PluginConfig {
    /// 옵션 값 조회
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// 정수 옵션 조회
    pub fn option_u64(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(Value::as_u64)
    }
}

/// 플러그인 매니페스트 - 플러그인의 모든 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// 고유 플러그인 ID (예: "json-formatter")
    pub id: String,

    /// 표시 이름
    pub name: String,

    /// 버전
    pub version: PluginVersion,

    /// 설명
    pub description: String,

    /// 작성자
    pub author: Option<String>,

    /// 활성화 전에 active 상태여야 하는 플러그인 ID (순서 유지, 중복 없음)
    pub dependencies: Vec<String>,

    /// 작성자 설정
    pub config: PluginConfig,
}

impl PluginManifest {
    /// 새 매니페스트 생성
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: PluginVersion::default(),
            description: String::new(),
            author: None,
            dependencies: vec![],
            config: PluginConfig::default(),
        }
    }

    /// 빌더 패턴: 버전 설정
    pub fn with_version(mut self, version: PluginVersion) -> Self {
        self.version = version;
        self
    }

    /// 빌더 패턴: 설명 설정
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// 빌더 패턴: 작성자 설정
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// 빌더 패턴: 의존성 추가 (이미 있으면 무시)
    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !self.dependencies.contains(&id) {
            self.dependencies.push(id);
        }
        self
    }

    /// 빌더 패턴: 자동 활성화 여부
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// 빌더 패턴: 우선순위
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.config.priority = priority;
        self
    }

    /// 빌더 패턴: 옵션 추가
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.options.insert(key.into(), value.into());
        self
    }

    /// 의존하는 플러그인이 있는지
    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == id)
    }
}
