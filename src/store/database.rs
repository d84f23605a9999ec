//! # Entity Store
//!
//! All tables sit behind one `RwLock`. Every mutation, including its
//! relation checks and cascades, runs inside a single write-lock critical
//! section, so readers see either the whole old state or the whole new one.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::schema::Entity;
use crate::serializer::{ValidationErrors, NON_FIELD_ERRORS};

use super::errors::{StoreError, StoreResult};
use super::Tables;

#[derive(Debug, Default)]
pub struct Database {
    tables: RwLock<Tables>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write_guard(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }

    /// Run `f` against a consistent snapshot of every table
    pub fn read<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&Tables) -> R,
    {
        let tables = self.read_guard()?;
        Ok(f(&tables))
    }

    /// Every record of `E` in creation order
    pub fn get_all<E: Entity>(&self) -> StoreResult<Vec<E>> {
        self.read(|tables| E::table(tables).iter().cloned().collect())
    }

    pub fn get<E: Entity>(&self, key: &E::Key) -> StoreResult<E> {
        self.read(|tables| E::table(tables).get(key).cloned())?
            .ok_or_else(|| StoreError::not_found(E::NAME, key))
    }

    /// Insert a new record after checking its relations
    pub fn create<E: Entity>(&self, record: E) -> StoreResult<E> {
        let mut tables = self.write_guard()?;
        record.check_relations(&tables)?;
        E::table_mut(&mut tables).insert(record)
    }

    /// Rebuild the record stored under `key` and write it back
    ///
    /// `build` sees the current record and returns its replacement; it runs
    /// under the write lock, so nothing can change the record in between.
    pub fn update<E, F>(&self, key: &E::Key, build: F) -> StoreResult<E>
    where
        E: Entity,
        F: FnOnce(&E) -> StoreResult<E>,
    {
        let mut tables = self.write_guard()?;
        let current = E::table(&tables)
            .get(key)
            .ok_or_else(|| StoreError::not_found(E::NAME, key))?;

        let updated = build(current)?;
        if updated.key() != *key {
            return Err(StoreError::Validation(ValidationErrors::single(
                NON_FIELD_ERRORS,
                "Primary key cannot be changed.",
            )));
        }
        updated.check_relations(&tables)?;
        E::table_mut(&mut tables).replace(updated)
    }

    /// Delete the record under `key` and everything that depends on it
    ///
    /// A record `visible` rejects is reported as not found. Returns the
    /// number of dependent records removed alongside it.
    pub fn delete<E, F>(&self, key: &E::Key, visible: F) -> StoreResult<usize>
    where
        E: Entity,
        F: FnOnce(&E) -> bool,
    {
        let mut tables = self.write_guard()?;
        let removed = match E::table(&tables).get(key) {
            Some(record) if visible(record) => record.clone(),
            _ => return Err(StoreError::not_found(E::NAME, key)),
        };

        E::table_mut(&mut tables).remove(key);
        Ok(removed.on_delete(&mut tables))
    }
}
