// src/store.rs
use crate::error::SeedError;
use bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// The database handle a [`Seeder`](crate::Seeder) writes through.
///
/// Implemented by `mongodb::Database` for real runs and by [`MemoryStore`]
/// for `--dry-run` and tests, so seeding never selects a database implicitly.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    async fn collection_exists(&self, name: &str) -> Result<bool, SeedError>;

    /// Creates `name`. Fails if the collection already exists.
    async fn create_collection(&self, name: &str) -> Result<(), SeedError>;

    /// Inserts `docs` as new documents and returns how many were written.
    async fn insert_many(&self, name: &str, docs: Vec<Document>) -> Result<usize, SeedError>;

    async fn count_documents(&self, name: &str) -> Result<u64, SeedError>;
}

/// Opens a client for `uri`, pings the deployment and returns the `db` handle.
pub async fn connect(uri: &str, db: &str) -> Result<Database, SeedError> {
    let client_options = ClientOptions::parse(uri)
        .await
        .map_err(|e| SeedError::Connection(e.to_string()))?;
    let client =
        Client::with_options(client_options).map_err(|e| SeedError::Connection(e.to_string()))?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| SeedError::Connection(e.to_string()))?;

    info!("Connected to MongoDB, using database '{}'", db);
    Ok(client.database(db))
}

impl DocumentStore for Database {
    async fn collection_exists(&self, name: &str) -> Result<bool, SeedError> {
        let names = self
            .list_collection_names()
            .filter(doc! { "name": name })
            .await?;
        Ok(names.iter().any(|n| n == name))
    }

    async fn create_collection(&self, name: &str) -> Result<(), SeedError> {
        Database::create_collection(self, name).await?;
        Ok(())
    }

    async fn insert_many(&self, name: &str, docs: Vec<Document>) -> Result<usize, SeedError> {
        let result = self.collection::<Document>(name).insert_many(docs).await?;
        debug!("Inserted {} documents into '{}'", result.inserted_ids.len(), name);
        Ok(result.inserted_ids.len())
    }

    async fn count_documents(&self, name: &str) -> Result<u64, SeedError> {
        Ok(self
            .collection::<Document>(name)
            .count_documents(doc! {})
            .await?)
    }
}

/// An in-process stand-in for a database, used by `--dry-run` and tests.
///
/// Mirrors the server where it matters: creating an existing collection
/// fails, and inserting into a missing one creates it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Vec<Document>>> {
        self.collections.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the documents in `name`, in insertion order.
    pub fn documents(&self, name: &str) -> Vec<Document> {
        self.lock().get(name).cloned().unwrap_or_default()
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }
}

impl DocumentStore for MemoryStore {
    async fn collection_exists(&self, name: &str) -> Result<bool, SeedError> {
        Ok(self.lock().contains_key(name))
    }

    async fn create_collection(&self, name: &str) -> Result<(), SeedError> {
        let mut collections = self.lock();
        if collections.contains_key(name) {
            return Err(SeedError::DuplicateCollection(name.to_string()));
        }
        collections.insert(name.to_string(), Vec::new());
        Ok(())
    }

    async fn insert_many(&self, name: &str, docs: Vec<Document>) -> Result<usize, SeedError> {
        let count = docs.len();
        self.lock().entry(name.to_string()).or_default().extend(docs);
        Ok(count)
    }

    async fn count_documents(&self, name: &str) -> Result<u64, SeedError> {
        Ok(self.lock().get(name).map_or(0, |docs| docs.len() as u64))
    }
}
