//! # Entity Store
//!
//! In-process tables for every resource family behind a single lock.

mod database;
mod errors;
mod table;

pub use database::Database;
pub use errors::{StoreError, StoreResult};
pub use table::Table;

use crate::schema::{Blog, ChaiVariety, Comment, Employee, Student, Tweet};

/// Every table, guarded together by `Database`
#[derive(Debug, Default)]
pub struct Tables {
    pub employees: Table<Employee>,
    pub students: Table<Student>,
    pub blogs: Table<Blog>,
    pub comments: Table<Comment>,
    pub chai: Table<ChaiVariety>,
    pub tweets: Table<Tweet>,
}
