// 📐 Shape Layer - API Schemas
// Request/response shapes for expenses, independent of how they are stored

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// EXPENSE SHAPES
// ============================================================================

/// Body accepted by create and update.
/// Deserialization is the validation step: a missing field, a non-numeric
/// amount or a date that isn't `YYYY-MM-DD` rejects the whole request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExpenseInput {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

/// Update takes the same body as create: every field is overwritten.
pub type ExpenseUpdate = ExpenseInput;

/// Expense as returned to clients
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExpenseOutput {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

// ============================================================================
// QUERY PARAMETERS
// ============================================================================

pub const DEFAULT_SKIP: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 100;

/// Offset pagination for the list operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_skip")]
    pub skip: u32,

    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_skip() -> u32 {
    DEFAULT_SKIP
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}

// ============================================================================
// RESPONSE BODIES
// ============================================================================

/// `{"message": ...}` confirmation body
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"msg": ...}` body of the root endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RootStatus {
    pub msg: String,
}

/// `{"detail": ...}` body carried by every error response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_accepts_valid_body() {
        let input: ExpenseInput = serde_json::from_value(json!({
            "description": "Coffee",
            "amount": 4.5,
            "date": "2024-01-01"
        }))
        .unwrap();

        assert_eq!(input.description, "Coffee");
        assert_eq!(input.amount, 4.5);
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_input_accepts_integer_amount() {
        let input: ExpenseInput = serde_json::from_value(json!({
            "description": "Rent",
            "amount": 1200,
            "date": "2024-02-01"
        }))
        .unwrap();

        assert_eq!(input.amount, 1200.0);
    }

    #[test]
    fn test_input_ignores_unknown_fields() {
        let input: ExpenseInput = serde_json::from_value(json!({
            "description": "a",
            "amount": 1,
            "date": "2024-01-01",
            "extra": 1
        }))
        .unwrap();

        assert_eq!(input.description, "a");
        assert_eq!(input.amount, 1.0);
    }

    #[test]
    fn test_input_rejects_missing_field() {
        let result: Result<ExpenseInput, _> = serde_json::from_value(json!({
            "description": "Coffee",
            "date": "2024-01-01"
        }));

        let err = result.unwrap_err().to_string();
        assert!(err.contains("amount"), "unexpected error: {}", err);
    }

    #[test]
    fn test_input_rejects_wrong_types() {
        let amount_as_word: Result<ExpenseInput, _> = serde_json::from_value(json!({
            "description": "Coffee",
            "amount": "four",
            "date": "2024-01-01"
        }));
        assert!(amount_as_word.is_err());

        let description_as_number: Result<ExpenseInput, _> = serde_json::from_value(json!({
            "description": 12,
            "amount": 4.5,
            "date": "2024-01-01"
        }));
        assert!(description_as_number.is_err());
    }

    #[test]
    fn test_input_rejects_invalid_date() {
        for date in ["2024-13-01", "2024-02-30", "01/01/2024", "yesterday"] {
            let result: Result<ExpenseInput, _> = serde_json::from_value(json!({
                "description": "Coffee",
                "amount": 4.5,
                "date": date
            }));
            assert!(result.is_err(), "date {} should be rejected", date);
        }
    }

    #[test]
    fn test_output_serializes_all_fields() {
        let output = ExpenseOutput {
            id: 7,
            description: "Coffee".to_string(),
            amount: 4.5,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            json!({"id": 7, "description": "Coffee", "amount": 4.5, "date": "2024-01-01"})
        );
    }

    #[test]
    fn test_list_params_defaults() {
        let params: ListParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params, ListParams::default());
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 100);

        let params: ListParams = serde_json::from_value(json!({"limit": 5})).unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 5);
    }

    #[test]
    fn test_list_params_reject_negative() {
        let result: Result<ListParams, _> = serde_json::from_value(json!({"skip": -1}));
        assert!(result.is_err());
    }
}
