use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Field-keyed validation messages, in insertion order per field.
///
/// Keys are arbitrary strings, so unknown input keys and the whole-body
/// `_schema` entry can be reported next to regular fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Key used for errors about the body as a whole
    pub const SCHEMA: &'static str = "_schema";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Folds in validator errors. Rules without a message report their code.
    pub fn merge(&mut self, errors: ValidationErrors) {
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                self.add(field.to_string(), message);
            }
        }
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Self::new();
        fields.merge(errors);
        fields
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("name", "first");
        errors.add("name", "second");
        errors.add(FieldErrors::SCHEMA, "Invalid input type.");

        assert_eq!(errors.get("name").unwrap(), ["first", "second"]);
        assert!(errors.has("_schema"));
        assert_eq!(errors.to_string(), "invalid fields: _schema, name");
    }

    #[test]
    fn test_merge_validator_errors() {
        let mut validator_errors = ValidationErrors::new();
        validator_errors.add("quantity", ValidationError::new("range"));

        let mut errors = FieldErrors::new();
        errors.add("name", "This field is required.");
        errors.merge(validator_errors);

        assert_eq!(errors.get("quantity").unwrap(), ["range"]);
        assert!(errors.has("name"));
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.add("sku", "bad");
        assert!(errors.into_result().is_err());
    }
}
