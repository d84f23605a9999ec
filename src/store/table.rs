//! One record type's rows in creation order

use std::collections::{BTreeMap, HashMap};

use crate::schema::Entity;

use super::errors::{StoreError, StoreResult};

/// Rows keyed by insertion sequence, plus a primary-key index
///
/// Iteration follows the sequence, which is creation order. Sequences start
/// at 1 and are never reused, so auto-assigned ids are never reused either.
#[derive(Debug, Clone)]
pub struct Table<E: Entity> {
    rows: BTreeMap<u64, E>,
    index: HashMap<E::Key, u64>,
    next_sequence: u64,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            index: HashMap::new(),
            next_sequence: 1,
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record, assigning its key if the entity uses one
    pub fn insert(&mut self, mut record: E) -> StoreResult<E> {
        let sequence = self.next_sequence;
        record.assign_key(sequence);

        let key = record.key();
        if self.index.contains_key(&key) {
            return Err(StoreError::DuplicateKey {
                entity: E::NAME,
                key: key.to_string(),
            });
        }

        self.next_sequence += 1;
        self.index.insert(key, sequence);
        self.rows.insert(sequence, record.clone());
        Ok(record)
    }

    /// Overwrite the stored record with the same key
    pub fn replace(&mut self, record: E) -> StoreResult<E> {
        let key = record.key();
        let sequence = *self
            .index
            .get(&key)
            .ok_or_else(|| StoreError::not_found(E::NAME, &key))?;
        self.rows.insert(sequence, record.clone());
        Ok(record)
    }

    pub fn remove(&mut self, key: &E::Key) -> Option<E> {
        let sequence = self.index.remove(key)?;
        self.rows.remove(&sequence)
    }

    /// Remove every record matching `predicate`; returns the count
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&E) -> bool,
    {
        let doomed: Vec<(u64, E::Key)> = self
            .rows
            .iter()
            .filter(|(_, record)| predicate(record))
            .map(|(seq, record)| (*seq, record.key()))
            .collect();

        for (sequence, key) in &doomed {
            self.rows.remove(sequence);
            self.index.remove(key);
        }
        doomed.len()
    }

    pub fn get(&self, key: &E::Key) -> Option<&E> {
        self.index.get(key).and_then(|seq| self.rows.get(seq))
    }

    pub fn contains(&self, key: &E::Key) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
