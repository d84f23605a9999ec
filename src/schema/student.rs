use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::filter::FieldValue;
use crate::serializer::{FieldReader, Serializer, ValidationErrors, WriteContext};
use crate::store::{Table, Tables};

use super::{id_value, Entity};

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 254;
const PHONE_MAX: usize = 20;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9 ()\-]{7,20}$").expect("phone pattern is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Entity for Student {
    type Key = u64;
    const NAME: &'static str = "Student";

    fn key(&self) -> u64 {
        self.id
    }

    fn assign_key(&mut self, seq: u64) {
        self.id = seq;
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(id_value(self.id)),
            "name" => Some(FieldValue::Text(&self.name)),
            "email" => Some(FieldValue::Text(&self.email)),
            "phone" => Some(FieldValue::Text(&self.phone)),
            _ => None,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.students
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.students
    }
}

impl Serializer for Student {
    fn to_external(&self, _view: &Tables) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
        })
    }

    fn from_external(
        payload: &Value,
        existing: Option<&Self>,
        ctx: &WriteContext<'_>,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(payload, ctx.mode);

        let name = reader.text("name", NAME_MAX, existing.map(|s| s.name.as_str()));
        let email = reader.text_matching(
            "email",
            EMAIL_MAX,
            email_pattern(),
            "Enter a valid email address.",
            existing.map(|s| s.email.as_str()),
        );
        let phone = reader.text_matching(
            "phone",
            PHONE_MAX,
            phone_pattern(),
            "Enter a valid phone number.",
            existing.map(|s| s.phone.as_str()),
        );

        reader.finish()?;
        Ok(Self {
            id: existing.map_or(0, |s| s.id),
            name,
            email,
            phone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Actor;
    use crate::serializer::WriteMode;

    fn create(payload: Value) -> Result<Student, ValidationErrors> {
        let actor = Actor::Anonymous;
        Student::from_external(&payload, None, &WriteContext::new(WriteMode::Create, &actor))
    }

    #[test]
    fn test_valid_student() {
        let student = create(json!({
            "name": "Meera",
            "email": "meera@example.com",
            "phone": "+91 (22) 555-0101",
            "id": 99,
        }))
        .unwrap();

        assert_eq!(student.id, 0);
        assert_eq!(student.phone, "+91 (22) 555-0101");
    }

    #[test]
    fn test_invalid_contact_details() {
        let errors = create(json!({
            "name": "Meera",
            "email": "not-an-email",
            "phone": "12ab",
        }))
        .unwrap_err();

        assert_eq!(errors.messages("email"), ["Enter a valid email address."]);
        assert_eq!(errors.messages("phone"), ["Enter a valid phone number."]);
    }

    #[test]
    fn test_short_phone_rejected() {
        let errors = create(json!({
            "name": "Meera",
            "email": "m@example.com",
            "phone": "12345",
        }))
        .unwrap_err();
        assert!(errors.has_field("phone"));
    }
}
