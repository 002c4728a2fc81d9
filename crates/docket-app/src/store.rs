// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{EntityId, Record};

/// What a failed fetch-all does to the previously loaded records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    KeepPrevious,
    Clear,
}

/// The most recently fetched records of one entity type, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore<T: Record> {
    records: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T: Record> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Record> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<T>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, id: T::Id) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Settles a fetch-all. Success replaces everything and clears the
    /// error; failure records `message` and applies `policy`.
    pub fn finish_load<E>(
        &mut self,
        outcome: Result<Vec<T>, E>,
        policy: FailurePolicy,
        message: impl FnOnce(&E) -> String,
    ) {
        match outcome {
            Ok(records) => {
                self.records = records;
                self.error = None;
            }
            Err(error) => {
                if policy == FailurePolicy::Clear {
                    self.records.clear();
                }
                self.error = Some(message(&error));
            }
        }
        self.loading = false;
    }

    pub fn append(&mut self, record: T) {
        self.records.push(record);
    }

    /// Replaces the record sharing `record`'s id. Returns false when absent.
    pub fn replace(&mut self, record: T) -> bool {
        let id = record.id();
        match self.records.iter_mut().find(|existing| existing.id() == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.records.iter().position(|record| record.id() == id)?;
        Some(self.records.remove(index))
    }

    pub fn contains(&self, id: T::Id) -> bool {
        id.is_assigned() && self.find(id).is_some()
    }
}
