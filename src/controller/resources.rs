//! Resource declarations: mount path, filters, search and ordering

use crate::filter::{FieldKind, FilterField, OrderBy};
use crate::schema::{Blog, ChaiType, ChaiVariety, Comment, Employee, Student, Tweet};

use super::config::{Resource, ResourceConfig};

/// Mount paths of every resource, in routing order
pub const RESOURCE_PATHS: [&str; 6] = [
    Employee::PATH,
    Student::PATH,
    Blog::PATH,
    Comment::PATH,
    ChaiVariety::PATH,
    Tweet::PATH,
];

impl Resource for Employee {
    const PATH: &'static str = "employees";

    fn config() -> ResourceConfig {
        const FILTERS: &[FilterField] = &[
            FilterField::exact("designation", "emp_designation", FieldKind::Text),
            FilterField::contains("name", "emp_name"),
            FilterField::min("id_min", "emp_id", FieldKind::NumericText),
            FilterField::max("id_max", "emp_id", FieldKind::NumericText),
        ];
        ResourceConfig::new(Self::PATH).with_filters(FILTERS)
    }
}

impl Resource for Student {
    const PATH: &'static str = "students";

    fn config() -> ResourceConfig {
        const FILTERS: &[FilterField] = &[
            FilterField::contains("name", "name"),
            FilterField::exact("email", "email", FieldKind::Text),
            FilterField::min("id_min", "id", FieldKind::Integer),
            FilterField::max("id_max", "id", FieldKind::Integer),
        ];
        ResourceConfig::new(Self::PATH).with_filters(FILTERS)
    }
}

impl Resource for Blog {
    const PATH: &'static str = "blogs";

    fn config() -> ResourceConfig {
        const FILTERS: &[FilterField] = &[FilterField::contains("title", "blog_title")];
        ResourceConfig::new(Self::PATH)
            .with_filters(FILTERS)
            .with_search(&["blog_title"])
            .with_ordering(&["id", "blog_title"], &[])
    }
}

impl Resource for Comment {
    const PATH: &'static str = "comments";

    fn config() -> ResourceConfig {
        const FILTERS: &[FilterField] = &[
            FilterField::exact("blog", "blog", FieldKind::Integer),
            FilterField::contains("text", "text"),
        ];
        ResourceConfig::new(Self::PATH).with_filters(FILTERS)
    }
}

impl Resource for ChaiVariety {
    const PATH: &'static str = "chai";

    fn config() -> ResourceConfig {
        const FILTERS: &[FilterField] = &[
            FilterField::contains("name", "name"),
            FilterField::exact("chai_type", "chai_type", FieldKind::Choice(chai_type_code)),
            FilterField::min("added_after", "date_added", FieldKind::Timestamp),
            FilterField::max("added_before", "date_added", FieldKind::Timestamp),
        ];
        ResourceConfig::new(Self::PATH).with_filters(FILTERS)
    }
}

/// Filter values name a chai type the same way writes do: code or label
fn chai_type_code(raw: &str) -> Option<&'static str> {
    raw.parse::<ChaiType>().ok().map(|kind| kind.code())
}

impl Resource for Tweet {
    const PATH: &'static str = "tweets";

    fn config() -> ResourceConfig {
        const FILTERS: &[FilterField] = &[
            FilterField::exact("user", "user", FieldKind::Text),
            FilterField::contains("text", "text"),
        ];
        const NEWEST_FIRST: &[OrderBy] = &[OrderBy::desc("created_at"), OrderBy::desc("id")];
        ResourceConfig::new(Self::PATH)
            .with_filters(FILTERS)
            .with_ordering(&["created_at", "id"], NEWEST_FIRST)
    }
}
