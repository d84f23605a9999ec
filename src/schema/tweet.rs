use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::auth::Actor;
use crate::filter::FieldValue;
use crate::serializer::{FieldReader, Serializer, ValidationErrors, WriteContext};
use crate::store::{Table, Tables};

use super::{id_value, render_timestamp, Entity};

const TEXT_MAX: usize = 240;
const PHOTO_MAX: usize = 255;

/// A short post owned by the user who wrote it
///
/// `user` and `created_at` are set on create and never taken from a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub id: u64,
    pub user: String,
    pub text: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Tweet {
    type Key = u64;
    const NAME: &'static str = "Tweet";
    const OWNED: bool = true;

    fn key(&self) -> u64 {
        self.id
    }

    fn assign_key(&mut self, seq: u64) {
        self.id = seq;
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(id_value(self.id)),
            "user" => Some(FieldValue::Text(&self.user)),
            "text" => Some(FieldValue::Text(&self.text)),
            "photo" => self.photo.as_deref().map(FieldValue::Text),
            "created_at" => Some(FieldValue::Timestamp(self.created_at)),
            _ => None,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.tweets
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.tweets
    }

    fn writable_by(&self, actor: &Actor) -> bool {
        actor.username() == Some(self.user.as_str())
    }
}

impl Serializer for Tweet {
    fn to_external(&self, _view: &Tables) -> Value {
        json!({
            "id": self.id,
            "user": self.user,
            "text": self.text,
            "photo": self.photo,
            "created_at": render_timestamp(&self.created_at),
        })
    }

    fn from_external(
        payload: &Value,
        existing: Option<&Self>,
        ctx: &WriteContext<'_>,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(payload, ctx.mode);

        let text = reader.text("text", TEXT_MAX, existing.map(|t| t.text.as_str()));
        let photo = reader.optional_text("photo", PHOTO_MAX, existing.map(|t| t.photo.as_deref()));

        reader.finish()?;
        let (id, user, created_at) = match existing {
            Some(current) => (current.id, current.user.clone(), current.created_at),
            None => (
                0,
                ctx.actor.username().unwrap_or_default().to_string(),
                ctx.now,
            ),
        };
        Ok(Self {
            id,
            user,
            text,
            photo,
            created_at,
        })
    }
}
