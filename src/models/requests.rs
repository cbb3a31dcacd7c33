//! Request DTOs for the calculator API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::service::Operation;

/// Request body for POST /calculate
///
/// `operation` stays a plain string here so that an unknown operator is
/// reported as such instead of as a generic body error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub input1: i64,
    pub input2: i64,
    pub operation: String,
}

impl CalculateRequest {
    pub fn new(input1: i64, input2: i64, operation: Operation) -> Self {
        Self {
            input1,
            input2,
            operation: operation.as_str().to_string(),
        }
    }

    /// Resolves the operator against the supported set.
    pub fn operation(&self) -> Result<Operation, CalcError> {
        self.operation.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_request_deserialize() {
        let json = r#"{"input1": 4, "input2": 2, "operation": "divide"}"#;
        let req: CalculateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.input1, 4);
        assert_eq!(req.input2, 2);
        assert_eq!(req.operation(), Ok(Operation::Divide));
    }

    #[test]
    fn test_unknown_operation() {
        let json = r#"{"input1": 4, "input2": 2, "operation": "power"}"#;
        let req: CalculateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            req.operation(),
            Err(CalcError::UnknownOperation("power".to_string()))
        );
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{"input1": 4, "operation": "add"}"#;
        assert!(serde_json::from_str::<CalculateRequest>(json).is_err());
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let request = CalculateRequest::new(1, 2, Operation::Subtract);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""operation":"subtract""#));
    }
}
