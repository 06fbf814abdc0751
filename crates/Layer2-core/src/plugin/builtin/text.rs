//! 텍스트 플러그인 - 대문자 변환, 문자열 길이 검증

use crate::plugin::{
    Capability, Plugin, PluginManifest, PluginVersion, Transformer, ValidationReport, Validator,
};
use async_trait::async_trait;
use pluggable_foundation::Result;
use serde_json::Value;

// ============================================================================
// UppercaseTransformer
// ============================================================================

/// 문자열을 대문자로 변환. 문자열이 아니면 그대로 통과
pub struct UppercaseTransformer;

impl UppercaseTransformer {
    pub const ID: &'static str = "uppercase-transformer";

    pub fn new() -> Self {
        Self
    }
}

impl Default for UppercaseTransformer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transformer for UppercaseTransformer {
    async fn transform(&self, data: Value) -> Result<Value> {
        Ok(match data {
            Value::String(text) => Value::String(text.to_uppercase()),
            other => other,
        })
    }
}

#[async_trait]
impl Plugin for UppercaseTransformer {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new(Self::ID, "Uppercase Transformer")
            .with_version(PluginVersion::new(1, 0, 0))
            .with_description("Converts text to upper case")
            .with_priority(1)
    }

    fn capability(&self) -> Capability<'_> {
        Capability::Transform(self)
    }
}

// ============================================================================
// StringLengthValidator
// ============================================================================

const DEFAULT_MIN_LENGTH: u64 = 3;
const DEFAULT_MAX_LENGTH: u64 = 50;

/// 문자열 길이가 `[minLength, maxLength]` 범위인지 검증
pub struct StringLengthValidator {
    manifest: PluginManifest,
}

impl StringLengthValidator {
    pub const ID: &'static str = "string-length-validator";

    pub fn new() -> Self {
        Self::with_bounds(DEFAULT_MIN_LENGTH, DEFAULT_MAX_LENGTH)
    }

    pub fn with_bounds(min_length: u64, max_length: u64) -> Self {
        Self {
            manifest: PluginManifest::new(Self::ID, "String Length Validator")
                .with_version(PluginVersion::new(1, 0, 0))
                .with_description("Checks that the string length is within range")
                .with_priority(2)
                .with_option("minLength", min_length)
                .with_option("maxLength", max_length),
        }
    }

    fn bounds(&self) -> (u64, u64) {
        let config = &self.manifest.config;
        (
            config.option_u64("minLength").unwrap_or(DEFAULT_MIN_LENGTH),
            config.option_u64("maxLength").unwrap_or(DEFAULT_MAX_LENGTH),
        )
    }
}

impl Default for StringLengthValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Validator for StringLengthValidator {
    async fn validate(&self, data: &Value) -> Result<ValidationReport> {
        let Some(text) = data.as_str() else {
            return Ok(ValidationReport::invalid(vec![
                "Input must be a string".to_string(),
            ]));
        };

        let (min, max) = self.bounds();
        let length = text.chars().count() as u64;
        if length < min || length > max {
            return Ok(ValidationReport::invalid(vec![format!(
                "String length must be between {} and {} characters",
                min, max
            )]));
        }

        Ok(ValidationReport::ok())
    }
}

#[async_trait]
impl Plugin for StringLengthValidator {
    fn manifest(&self) -> PluginManifest {
        self.manifest.clone()
    }

    fn capability(&self) -> Capability<'_> {
        Capability::Validate(self)
    }
}
