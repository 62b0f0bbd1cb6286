// src/seeder.rs
//! Collection seeding.
//!
//! A [`Seeder`] is bound to an explicit store handle and a collection name.
//! Seeding is two steps: make sure the collection exists, then insert the
//! records as new documents. Nothing is deduplicated, so inserting the same
//! records twice stores them twice.

use crate::error::SeedError;
use crate::record::PreferenceRecord;
use crate::store::DocumentStore;
use bson::Document;
use tracing::{debug, info};

/// What to do when the target collection already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectionPolicy {
    /// Existing collection is a no-op.
    #[default]
    Ignore,
    /// Existing collection is a [`SeedError::DuplicateCollection`].
    Strict,
}

/// Outcome of a [`Seeder::seed`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub collection: String,
    /// Whether this run created the collection.
    pub created: bool,
    pub inserted: usize,
}

pub struct Seeder<'a, S> {
    store: &'a S,
    collection: String,
    policy: CollectionPolicy,
    batch_size: usize,
}

impl<'a, S: DocumentStore> Seeder<'a, S> {
    pub fn new(store: &'a S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            policy: CollectionPolicy::default(),
            batch_size: 0,
        }
    }

    pub fn with_policy(mut self, policy: CollectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the number of documents per insert call. 0 sends everything at once.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Creates the collection if it is missing. Returns `true` if this call created it.
    pub async fn ensure_collection(&self) -> Result<bool, SeedError> {
        if self.store.collection_exists(&self.collection).await? {
            return self.already_exists();
        }

        match self.store.create_collection(&self.collection).await {
            Ok(()) => {
                info!("Created collection '{}'", self.collection);
                Ok(true)
            }
            // lost a creation race with another writer
            Err(e) if e.is_namespace_exists() => self.already_exists(),
            Err(e) => Err(e),
        }
    }

    fn already_exists(&self) -> Result<bool, SeedError> {
        match self.policy {
            CollectionPolicy::Ignore => {
                debug!("Collection '{}' already exists", self.collection);
                Ok(false)
            }
            CollectionPolicy::Strict => Err(SeedError::DuplicateCollection(self.collection.clone())),
        }
    }

    /// Inserts `records` as new documents, in order, and returns how many were written.
    ///
    /// Every record is validated and encoded before anything is sent, so a bad
    /// record leaves the store untouched. Rejections from the store abort the
    /// run; how much of a rejected batch was written is up to the store.
    pub async fn insert_many(&self, records: &[PreferenceRecord]) -> Result<usize, SeedError> {
        if records.is_empty() {
            debug!("No records to insert into '{}'", self.collection);
            return Ok(0);
        }

        let docs = encode(records)?;
        let total = docs.len();
        info!("Inserting {} records into '{}'...", total, self.collection);

        let inserted = if self.batch_size == 0 || self.batch_size >= total {
            self.store.insert_many(&self.collection, docs).await?
        } else {
            let mut inserted = 0;
            for (i, chunk) in docs.chunks(self.batch_size).enumerate() {
                let offset = i * self.batch_size;
                inserted += self
                    .store
                    .insert_many(&self.collection, chunk.to_vec())
                    .await
                    .map_err(|e| e.offset(offset))?;
                debug!("  Inserted {}/{} records", inserted, total);
            }
            inserted
        };

        info!("Inserted {} records into '{}'", inserted, self.collection);
        Ok(inserted)
    }

    /// Ensures the collection exists, then inserts `records`.
    pub async fn seed(&self, records: &[PreferenceRecord]) -> Result<SeedReport, SeedError> {
        let created = self.ensure_collection().await?;
        let inserted = self.insert_many(records).await?;
        Ok(SeedReport {
            collection: self.collection.clone(),
            created,
            inserted,
        })
    }
}

/// Checks every record, reporting the first failure by its index in `records`.
pub fn validate(records: &[PreferenceRecord]) -> Result<(), SeedError> {
    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|reason| SeedError::Validation { index, reason })?;
    }
    Ok(())
}

fn encode(records: &[PreferenceRecord]) -> Result<Vec<Document>, SeedError> {
    validate(records)?;
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            record.to_document().map_err(|e| SeedError::Validation {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}
