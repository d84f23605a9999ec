//! Blogs and their comments
//!
//! A blog renders its comments inline under `comments`, oldest first. That
//! collection is read-only: comments are written through their own resource
//! and a `comments` key in a blog payload is ignored. Deleting a blog
//! deletes its comments in the same store transaction.

use serde_json::{json, Value};

use crate::filter::FieldValue;
use crate::serializer::{FieldReader, Serializer, ValidationErrors, WriteContext};
use crate::store::{Table, Tables};

use super::{id_value, Entity};

const BLOG_TITLE_MAX: usize = 200;
const COMMENT_TEXT_MAX: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    pub id: u64,
    pub blog_title: String,
}

impl Entity for Blog {
    type Key = u64;
    const NAME: &'static str = "Blog";

    fn key(&self) -> u64 {
        self.id
    }

    fn assign_key(&mut self, seq: u64) {
        self.id = seq;
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(id_value(self.id)),
            "blog_title" => Some(FieldValue::Text(&self.blog_title)),
            _ => None,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.blogs
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.blogs
    }

    fn on_delete(&self, tables: &mut Tables) -> usize {
        tables.comments.remove_where(|c| c.blog == self.id)
    }
}

impl Serializer for Blog {
    fn to_external(&self, view: &Tables) -> Value {
        let comments: Vec<Value> = view
            .comments
            .iter()
            .filter(|c| c.blog == self.id)
            .map(|c| c.to_external(view))
            .collect();

        json!({
            "id": self.id,
            "blog_title": self.blog_title,
            "comments": comments,
        })
    }

    fn from_external(
        payload: &Value,
        existing: Option<&Self>,
        ctx: &WriteContext<'_>,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(payload, ctx.mode);
        let blog_title = reader.text(
            "blog_title",
            BLOG_TITLE_MAX,
            existing.map(|b| b.blog_title.as_str()),
        );

        reader.finish()?;
        Ok(Self {
            id: existing.map_or(0, |b| b.id),
            blog_title,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    /// Id of the owning blog
    pub blog: u64,
    pub text: String,
}

impl Entity for Comment {
    type Key = u64;
    const NAME: &'static str = "Comment";

    fn key(&self) -> u64 {
        self.id
    }

    fn assign_key(&mut self, seq: u64) {
        self.id = seq;
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(id_value(self.id)),
            "blog" => Some(id_value(self.blog)),
            "text" => Some(FieldValue::Text(&self.text)),
            _ => None,
        }
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.comments
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.comments
    }

    fn check_relations(&self, tables: &Tables) -> Result<(), ValidationErrors> {
        if tables.blogs.contains(&self.blog) {
            Ok(())
        } else {
            Err(ValidationErrors::single(
                "blog",
                format!("Invalid pk \"{}\" - object does not exist.", self.blog),
            ))
        }
    }
}

impl Serializer for Comment {
    fn to_external(&self, _view: &Tables) -> Value {
        json!({
            "id": self.id,
            "blog": self.blog,
            "text": self.text,
        })
    }

    fn from_external(
        payload: &Value,
        existing: Option<&Self>,
        ctx: &WriteContext<'_>,
    ) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(payload, ctx.mode);

        let blog = reader.integer("blog", existing.map(|c| c.blog as i64));
        if !reader.failed("blog") && blog < 1 {
            reader.reject(
                "blog",
                format!("Invalid pk \"{}\" - object does not exist.", blog),
            );
        }
        let text = reader.text("text", COMMENT_TEXT_MAX, existing.map(|c| c.text.as_str()));

        reader.finish()?;
        Ok(Self {
            id: existing.map_or(0, |c| c.id),
            blog: u64::try_from(blog).unwrap_or_default(),
            text,
        })
    }
}
