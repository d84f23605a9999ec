use serde_json::{json, Value};

use crate::filter::FieldValue;
use crate::serializer::{FieldReader, Serializer, ValidationErrors, WriteContext};
use crate::store::{Table, Tables};

use super::Entity;

pub const EMP_ID_MAX: usize = 10;
pub const EMP_NAME_MAX: usize = 30;
pub const EMP_DESIGNATION_MAX: usize = 20;

/// Employee keyed by a client-supplied id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub emp_id: String,
    pub emp_name: String,
    pub emp_designation: String,
}

impl Entity for Employee {
    type Key = String;
    const NAME: &'static str = "Employee";

    fn key(&self) -> String {
        self.emp_id.clone()
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "emp_id" => Some(FieldValue::Text(&self.emp_id)),
            "emp_name" => Some(FieldValue::Text(&self.emp_name)),
            "emp_designation" => Some(FieldValue::Text(&self.emp_designation)),
            _ => None,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.employees
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.employees
    }
}

impl Serializer for Employee {
    fn to_external(&self, _view: &Tables) -> Value {
        json!({
            "emp_id": self.emp_id,
            "emp_name": self.emp_name,
            "emp_designation": self.emp_designation,
        })
    }

    fn from_external(
        payload: &Value,
        existing: Option<&Self>,
        ctx: &WriteContext<'_>,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(payload, ctx.mode);

        // The key is fixed once stored; updates may repeat it but not change it.
        let emp_id = match existing {
            None => reader.text("emp_id", EMP_ID_MAX, None),
            Some(current) => {
                if reader.contains("emp_id") {
                    let sent = reader.text("emp_id", EMP_ID_MAX, None);
                    if !reader.failed("emp_id") && sent != current.emp_id {
                        reader.reject("emp_id", "Primary key cannot be changed.");
                    }
                }
                current.emp_id.clone()
            }
        };
        let emp_name = reader.text(
            "emp_name",
            EMP_NAME_MAX,
            existing.map(|e| e.emp_name.as_str()),
        );
        let emp_designation = reader.text(
            "emp_designation",
            EMP_DESIGNATION_MAX,
            existing.map(|e| e.emp_designation.as_str()),
        );

        reader.finish()?;
        Ok(Self {
            emp_id,
            emp_name,
            emp_designation,
        })
    }
}
