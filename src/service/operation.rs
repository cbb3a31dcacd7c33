//! The closed set of supported operators.

use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// Binary integer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Wire and storage name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Rejects a right operand the operation is undefined for.
    pub fn validate(&self, b: i64) -> Result<(), CalcError> {
        match self {
            Operation::Divide if b == 0 => Err(CalcError::DivisionByZero),
            _ => Ok(()),
        }
    }

    /// Computes `a <op> b`.
    ///
    /// Overflow wraps like machine integers; division truncates toward zero.
    pub fn apply(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.validate(b)?;
        Ok(match self {
            Operation::Add => a.wrapping_add(b),
            Operation::Subtract => a.wrapping_sub(b),
            Operation::Multiply => a.wrapping_mul(b),
            Operation::Divide => a.wrapping_div(b),
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "multiply" => Ok(Operation::Multiply),
            "divide" => Ok(Operation::Divide),
            other => Err(CalcError::UnknownOperation(other.to_string())),
        }
    }
}
