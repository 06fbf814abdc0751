//! 사칙연산 플러그인

use crate::plugin::{Capability, Operation, Plugin, PluginManifest, PluginVersion};
use async_trait::async_trait;
use pluggable_foundation::{Error, Result};

/// 연산 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl ArithmeticKind {
    pub const ALL: [ArithmeticKind; 4] = [
        ArithmeticKind::Addition,
        ArithmeticKind::Subtraction,
        ArithmeticKind::Multiplication,
        ArithmeticKind::Division,
    ];

    /// 플러그인 ID
    pub fn id(&self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
        }
    }

    fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Addition => lhs + rhs,
            Self::Subtraction => lhs - rhs,
            Self::Multiplication => lhs * rhs,
            Self::Division if rhs == 0.0 => f64::NAN,
            Self::Division => lhs / rhs,
        }
    }
}

/// 왼쪽부터 접는 사칙연산 (`a op b op c ...`)
pub struct ArithmeticOperation {
    kind: ArithmeticKind,
}

impl ArithmeticOperation {
    pub fn new(kind: ArithmeticKind) -> Self {
        Self { kind }
    }

    pub fn addition() -> Self {
        Self::new(ArithmeticKind::Addition)
    }

    pub fn subtraction() -> Self {
        Self::new(ArithmeticKind::Subtraction)
    }

    pub fn multiplication() -> Self {
        Self::new(ArithmeticKind::Multiplication)
    }

    pub fn division() -> Self {
        Self::new(ArithmeticKind::Division)
    }

    pub fn kind(&self) -> ArithmeticKind {
        self.kind
    }
}

#[async_trait]
impl Operation for ArithmeticOperation {
    async fn execute(&self, operands: &[f64]) -> Result<f64> {
        let (first, rest) = operands.split_first().ok_or_else(|| {
            Error::InvalidInput(format!("{} needs at least one operand", self.kind.id()))
        })?;

        Ok(rest
            .iter()
            .fold(*first, |acc, value| self.kind.apply(acc, *value)))
    }
}

#[async_trait]
impl Plugin for ArithmeticOperation {
    fn manifest(&self) -> PluginManifest {
        let description = match self.kind {
            ArithmeticKind::Addition => "Adds the operands",
            ArithmeticKind::Subtraction => "Subtracts the operands from the first",
            ArithmeticKind::Multiplication => "Multiplies the operands",
            ArithmeticKind::Division => "Divides the first operand by the rest (NaN on zero)",
        };

        PluginManifest::new(self.kind.id(), self.kind.id())
            .with_version(PluginVersion::new(1, 0, 0))
            .with_description(description)
    }

    fn capability(&self) -> Capability<'_> {
        Capability::Operate(self)
    }
}
