//! Environment Detection - 실행 환경 태그 감지
//!
//! 플러그인 컨텍스트에 주입되는 정보용 태그입니다. 매니저는 이 값으로 분기하지 않습니다.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// 실행 환경을 지정하는 환경 변수
pub const ENV_PLUGGABLE_ENV: &str = "PLUGGABLE_ENV";

/// 실행 환경 태그
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Production,
}

impl RuntimeEnvironment {
    /// `PLUGGABLE_ENV`에서 감지 (없으면 development)
    pub fn detect() -> Self {
        Self::from_value(env::var(ENV_PLUGGABLE_ENV).ok().as_deref())
    }

    /// 환경 변수 값 해석. `production`/`prod` 외에는 모두 development
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("production") | Some("prod") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuntimeEnvironment {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown environment '{}' (expected development or production)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(
            RuntimeEnvironment::from_value(Some("production")),
            RuntimeEnvironment::Production
        );
        assert_eq!(
            RuntimeEnvironment::from_value(Some(" PROD ")),
            RuntimeEnvironment::Production
        );
        assert_eq!(
            RuntimeEnvironment::from_value(Some("staging")),
            RuntimeEnvironment::Development
        );
        assert_eq!(
            RuntimeEnvironment::from_value(None),
            RuntimeEnvironment::Development
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "dev".parse::<RuntimeEnvironment>().unwrap(),
            RuntimeEnvironment::Development
        );
        assert!("qa".parse::<RuntimeEnvironment>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&RuntimeEnvironment::Production).unwrap();
        assert_eq!(json, "\"production\"");
    }
}
