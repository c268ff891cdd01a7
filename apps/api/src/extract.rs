use axum::extract::FromRequest;
use serde_json::Value;

use crate::errors::AppError;

/// `Json` extractor whose rejections render as `AppError::Validation`, so a
/// malformed body gets the same `{"error": ...}` shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Treats absent and whitespace-only strings alike.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reads a client-supplied id field. Strings and numbers are accepted as text
/// (a number is never a valid key, so it resolves to "unknown" downstream);
/// anything else, or a blank string, counts as absent.
pub fn id_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => non_blank(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
