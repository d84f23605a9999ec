//! Per-field validation failures
//!
//! Every failing field is reported, each with one or more messages. The
//! wire shape is a JSON object of field name to message list:
//!
//! ```json
//! {"emp_name": ["This field is required."], "emp_id": ["This field may not be blank."]}
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Field key used for failures that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Accumulated validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set holding a single failure
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Fold another set of failures into this one
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Failing field names in sorted order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing failed
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_field() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "This field is required.");
        errors.add("email", "Enter a valid email address.");
        errors.add("name", "second message");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.messages("name").len(), 2);
        assert!(errors.messages("phone").is_empty());
    }

    #[test]
    fn test_serializes_as_field_map() {
        let errors = ValidationErrors::single("blog", "Invalid pk \"9\" - object does not exist.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"blog": ["Invalid pk \"9\" - object does not exist."]})
        );
    }

    #[test]
    fn test_display_is_sorted() {
        let mut errors = ValidationErrors::new();
        errors.add("phone", "bad");
        errors.add("email", "worse");
        assert_eq!(errors.to_string(), "email: worse; phone: bad");
    }

    #[test]
    fn test_merge_and_into_result() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.merge(ValidationErrors::single("text", "This field may not be blank."));
        assert!(errors.has_field("text"));
        assert!(errors.into_result().is_err());
    }
}
