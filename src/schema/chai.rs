use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::filter::FieldValue;
use crate::serializer::{FieldReader, Serializer, ValidationErrors, WriteContext};
use crate::store::{Table, Tables};

use super::{id_value, render_timestamp, Entity};

const NAME_MAX: usize = 100;
const IMAGE_MAX: usize = 255;

/// Tea category, stored and rendered as its two-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChaiType {
    #[default]
    Black,
    Green,
    White,
}

impl ChaiType {
    pub const ALL: [ChaiType; 3] = [ChaiType::Black, ChaiType::Green, ChaiType::White];

    pub fn code(&self) -> &'static str {
        match self {
            ChaiType::Black => "BL",
            ChaiType::Green => "GR",
            ChaiType::White => "WT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChaiType::Black => "Black Tea",
            ChaiType::Green => "Green Tea",
            ChaiType::White => "White Tea",
        }
    }
}

impl fmt::Display for ChaiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ChaiType {
    type Err = String;

    /// Accepts the code or the label, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChaiType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(s) || t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaiVariety {
    pub id: u64,
    pub name: String,
    /// Opaque storage reference for the picture
    pub image: String,
    pub date_added: DateTime<Utc>,
    pub chai_type: ChaiType,
}

impl Entity for ChaiVariety {
    type Key = u64;
    const NAME: &'static str = "ChaiVariety";

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
            "image" => Some(FieldValue::Text(&self.image)),
            "date_added" => Some(FieldValue::Timestamp(self.date_added)),
            "chai_type" => Some(FieldValue::Text(self.chai_type.code())),
            _ => None,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.chai
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.chai
    }
}

impl Serializer for ChaiVariety {
    fn to_external(&self, _view: &Tables) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "image": self.image,
            "date_added": render_timestamp(&self.date_added),
            "chai_type": self.chai_type.code(),
        })
    }

    fn from_external(
        payload: &Value,
        existing: Option<&Self>,
        ctx: &WriteContext<'_>,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(payload, ctx.mode);

        let name = reader.text("name", NAME_MAX, existing.map(|c| c.name.as_str()));
        let image = reader.text("image", IMAGE_MAX, existing.map(|c| c.image.as_str()));
        let date_added = reader.timestamp_or("date_added", existing.map(|c| c.date_added), ctx.now);
        let chai_type = reader.choice("chai_type", existing.map(|c| c.chai_type));

        reader.finish()?;
        Ok(Self {
            id: existing.map_or(0, |c| c.id),
            name,
            image,
            date_added,
            chai_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Actor;
    use crate::serializer::WriteMode;

    #[test]
    fn test_chai_type_accepts_code_or_label() {
        assert_eq!("GR".parse::<ChaiType>(), Ok(ChaiType::Green));
        assert_eq!("white tea".parse::<ChaiType>(), Ok(ChaiType::White));
        assert_eq!("bl".parse::<ChaiType>(), Ok(ChaiType::Black));
        assert!("Oolong".parse::<ChaiType>().is_err());
    }

    #[test]
    fn test_date_added_defaults_to_now() {
        let actor = Actor::Anonymous;
        let ctx = WriteContext::new(WriteMode::Create, &actor);
        let payload = json!({"name": "Masala", "image": "chai/masala.png", "chai_type": "Black Tea"});

        let chai = ChaiVariety::from_external(&payload, None, &ctx).unwrap();
        assert_eq!(chai.date_added, ctx.now);
        assert_eq!(chai.to_external(&Tables::default())["chai_type"], "BL");
    }

    #[test]
    fn test_invalid_choice_and_missing_image() {
        let actor = Actor::Anonymous;
        let ctx = WriteContext::new(WriteMode::Create, &actor);
        let payload = json!({"name": "Oolong", "chai_type": "OO"});

        let errors = ChaiVariety::from_external(&payload, None, &ctx).unwrap_err();
        assert_eq!(errors.messages("chai_type"), ["\"OO\" is not a valid choice."]);
        assert!(errors.has_field("image"));
    }
}
