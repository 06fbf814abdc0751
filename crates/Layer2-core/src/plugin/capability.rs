//! Plugin Capability - 플러그인이 제공하는 기능 (닫힌 집합)
//!
//! 문자열 태그 대신 variant로 표현합니다. 호출자는 `Capability`를 match 한 뒤
//! 해당 기능의 연산을 호출합니다.

use async_trait::async_trait;
use pluggable_foundation::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

// ============================================================================
// CapabilityKind - 기능 종류 태그
// ============================================================================

/// 플러그인 기능 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// 데이터 변환
    Transform,
    /// 데이터 검증
    Validate,
    /// 텍스트 포맷팅
    Format,
    /// 숫자 연산
    Operate,
}

impl CapabilityKind {
    /// 모든 기능 종류
    pub const ALL: [CapabilityKind; 4] = [
        CapabilityKind::Transform,
        CapabilityKind::Validate,
        CapabilityKind::Format,
        CapabilityKind::Operate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transform => "transform",
            Self::Validate => "validate",
            Self::Format => "format",
            Self::Operate => "operate",
        }
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CapabilityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "transform" | "transformer" => Ok(Self::Transform),
            "validate" | "validator" => Ok(Self::Validate),
            "format" | "formatter" => Ok(Self::Format),
            "operate" | "operation" => Ok(Self::Operate),
            other => Err(Error::InvalidInput(format!("unknown capability '{}'", other))),
        }
    }
}

// ============================================================================
// 기능별 연산 trait
// ============================================================================

/// 검증 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: vec![],
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// 데이터 변환: `data -> data'`
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, data: Value) -> Result<Value>;
}

/// 데이터 검증: `data -> {valid, errors}`
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, data: &Value) -> Result<ValidationReport>;
}

/// 포맷팅: `data -> text`
#[async_trait]
pub trait Formatter: Send + Sync {
    async fn format(&self, data: &Value) -> Result<String>;
}

/// 숫자 연산: `numbers... -> number`
#[async_trait]
pub trait Operation: Send + Sync {
    async fn execute(&self, operands: &[f64]) -> Result<f64>;
}

// ============================================================================
// Capability - 기능 variant
// ============================================================================

/// 플러그인 기능 (각 variant가 해당 연산 trait object를 빌려줌)
#[derive(Clone, Copy)]
pub enum Capability<'a> {
    Transform(&'a dyn Transformer),
    Validate(&'a dyn Validator),
    Format(&'a dyn Formatter),
    Operate(&'a dyn Operation),
}

impl Capability<'_> {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Self::Transform(_) => CapabilityKind::Transform,
            Self::Validate(_) => CapabilityKind::Validate,
            Self::Format(_) => CapabilityKind::Format,
            Self::Operate(_) => CapabilityKind::Operate,
        }
    }
}

impl std::fmt::Debug for Capability<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Capability::{}", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Negate;

    #[async_trait]
    impl Operation for Negate {
        async fn execute(&self, operands: &[f64]) -> Result<f64> {
            operands
                .first()
                .map(|v| -v)
                .ok_or_else(|| Error::InvalidInput("no operands".into()))
        }
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in CapabilityKind::ALL {
            assert_eq!(kind.as_str().parse::<CapabilityKind>().unwrap(), kind);
        }
        assert_eq!(
            "formatter".parse::<CapabilityKind>().unwrap(),
            CapabilityKind::Format
        );
        assert!("render".parse::<CapabilityKind>().is_err());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&CapabilityKind::Operate).unwrap();
        assert_eq!(json, "\"operate\"");
    }

    #[tokio::test]
    async fn test_capability_dispatch() {
        let negate = Negate;
        let capability = Capability::Operate(&negate);
        assert_eq!(capability.kind(), CapabilityKind::Operate);

        match capability {
            Capability::Operate(op) => assert_eq!(op.execute(&[2.5]).await.unwrap(), -2.5),
            other => panic!("unexpected capability {:?}", other),
        }
    }

    #[test]
    fn test_validation_report() {
        assert!(ValidationReport::ok().valid);
        let report = ValidationReport::invalid(vec!["too short".into()]);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
    }
}
