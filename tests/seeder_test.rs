use bson::{Bson, Document};
use mongoseed::fixture::customer_preferences;
use mongoseed::{CollectionPolicy, DocumentStore, MemoryStore, PreferenceRecord, SeedError, Seeder};
use std::sync::atomic::{AtomicUsize, Ordering};

const COLLECTION: &str = "customer_preferences";

/// Wraps a `MemoryStore` and rejects the `reject_call`-th insert (1-based)
/// the way the server reports a bad document: index relative to that call.
struct RejectingStore {
    inner: MemoryStore,
    reject_call: usize,
    calls: AtomicUsize,
}

impl RejectingStore {
    fn new(reject_call: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            reject_call,
            calls: AtomicUsize::new(0),
        }
    }
}

impl DocumentStore for RejectingStore {
    async fn collection_exists(&self, name: &str) -> Result<bool, SeedError> {
        self.inner.collection_exists(name).await
    }

    async fn create_collection(&self, name: &str) -> Result<(), SeedError> {
        self.inner.create_collection(name).await
    }

    async fn insert_many(&self, name: &str, docs: Vec<Document>) -> Result<usize, SeedError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.reject_call {
            return Err(SeedError::Validation {
                index: 0,
                reason: "E11000 duplicate key".to_string(),
            });
        }
        self.inner.insert_many(name, docs).await
    }

    async fn count_documents(&self, name: &str) -> Result<u64, SeedError> {
        self.inner.count_documents(name).await
    }
}

fn six_records() -> Vec<PreferenceRecord> {
    let mut records = customer_preferences();
    records.extend(customer_preferences());
    records
}

#[tokio::test]
async fn test_seed_empty_store_with_builtin_records() {
    let store = MemoryStore::new();
    let records = customer_preferences();

    let report = Seeder::new(&store, COLLECTION).seed(&records).await.unwrap();

    assert_eq!(report.collection, COLLECTION);
    assert!(report.created);
    assert_eq!(report.inserted, 3);

    let docs = store.documents(COLLECTION);
    assert_eq!(docs.len(), 3);

    let expected = [
        ("johndoe@example.com", "Electronics", "Gold", "2024-09-01T00:00:00Z"),
        ("janesmith@example.com", "Books", "Silver", "2024-09-02T00:00:00Z"),
        ("bobjohnson@example.com", "Clothing", "Bronze", "2024-09-03T00:00:00Z"),
    ];
    for (doc, (email, preference, status, updated)) in docs.iter().zip(expected) {
        assert_eq!(doc.get_str("customer_email").unwrap(), email);
        assert_eq!(doc.get_str("preference").unwrap(), preference);
        assert_eq!(doc.get_str("loyalty_status").unwrap(), status);
        assert_eq!(
            doc.get_datetime("last_updated").unwrap().try_to_rfc3339_string().unwrap(),
            updated
        );
    }
}

#[tokio::test]
async fn test_stored_documents_decode_to_the_input() {
    let store = MemoryStore::new();
    let records = customer_preferences();

    Seeder::new(&store, COLLECTION).seed(&records).await.unwrap();

    let stored: Vec<PreferenceRecord> = store
        .documents(COLLECTION)
        .into_iter()
        .map(|doc| bson::from_document(doc).unwrap())
        .collect();
    assert_eq!(stored, records);
}

#[tokio::test]
async fn test_ensure_collection_twice_is_a_noop() {
    let store = MemoryStore::new();
    let seeder = Seeder::new(&store, COLLECTION);

    assert!(seeder.ensure_collection().await.unwrap());
    seeder.insert_many(&customer_preferences()).await.unwrap();

    assert!(!seeder.ensure_collection().await.unwrap());
    assert!(!seeder.ensure_collection().await.unwrap());
    assert_eq!(store.count_documents(COLLECTION).await.unwrap(), 3);
}

#[tokio::test]
async fn test_insert_twice_doubles_the_count() {
    let store = MemoryStore::new();
    let seeder = Seeder::new(&store, COLLECTION);
    let records = customer_preferences();

    seeder.seed(&records).await.unwrap();
    let report = seeder.seed(&records).await.unwrap();

    assert!(!report.created);
    assert_eq!(report.inserted, 3);
    assert_eq!(store.count_documents(COLLECTION).await.unwrap(), 6);
}

#[tokio::test]
async fn test_empty_input_still_creates_collection() {
    let store = MemoryStore::new();

    let report = Seeder::new(&store, COLLECTION).seed(&[]).await.unwrap();

    assert!(report.created);
    assert_eq!(report.inserted, 0);
    assert!(store.collection_exists(COLLECTION).await.unwrap());
    assert_eq!(store.count_documents(COLLECTION).await.unwrap(), 0);
}

#[tokio::test]
async fn test_strict_policy_rejects_existing_collection() {
    let store = MemoryStore::new();
    store.create_collection(COLLECTION).await.unwrap();

    let err = Seeder::new(&store, COLLECTION)
        .with_policy(CollectionPolicy::Strict)
        .seed(&customer_preferences())
        .await
        .unwrap_err();

    match err {
        SeedError::DuplicateCollection(name) => assert_eq!(name, COLLECTION),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.count_documents(COLLECTION).await.unwrap(), 0);
}

#[tokio::test]
async fn test_strict_policy_creates_missing_collection() {
    let store = MemoryStore::new();

    let report = Seeder::new(&store, COLLECTION)
        .with_policy(CollectionPolicy::Strict)
        .seed(&customer_preferences())
        .await
        .unwrap();

    assert!(report.created);
    assert_eq!(report.inserted, 3);
}

#[tokio::test]
async fn test_invalid_record_in_later_batch_is_caught_before_any_write() {
    let store = MemoryStore::new();
    let mut records = six_records();
    records[4].customer_email = "".to_string();

    let err = Seeder::new(&store, COLLECTION)
        .with_batch_size(2)
        .insert_many(&records)
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::Validation { index: 4, .. }));
    assert_eq!(store.count_documents(COLLECTION).await.unwrap(), 0);
}

#[tokio::test]
async fn test_store_rejection_in_later_batch_stops_the_run() {
    let store = RejectingStore::new(2);

    let err = Seeder::new(&store, COLLECTION)
        .with_batch_size(2)
        .seed(&six_records())
        .await
        .unwrap_err();

    match err {
        SeedError::Validation { index, reason } => {
            assert_eq!(index, 2);
            assert_eq!(reason, "E11000 duplicate key");
        }
        other => panic!("unexpected error: {other}"),
    }
    // first batch stays written, nothing after the rejected one is sent
    assert_eq!(store.count_documents(COLLECTION).await.unwrap(), 2);
    assert_eq!(store.calls.load(Ordering::SeqCst), 2);

    let emails: Vec<String> = store
        .inner
        .documents(COLLECTION)
        .iter()
        .map(|d| d.get_str("customer_email").unwrap().to_string())
        .collect();
    assert_eq!(emails, ["johndoe@example.com", "janesmith@example.com"]);
}

#[tokio::test]
async fn test_store_rejection_without_batching_keeps_store_index() {
    let store = RejectingStore::new(1);

    let err = Seeder::new(&store, COLLECTION)
        .seed(&six_records())
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::Validation { index: 0, .. }));
    assert!(store.collection_exists(COLLECTION).await.unwrap());
    assert_eq!(store.count_documents(COLLECTION).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_loyalty_tier_is_stored_verbatim() {
    let store = MemoryStore::new();
    let mut records = customer_preferences();
    records[0].loyalty_status = "Platinum".into();

    Seeder::new(&store, COLLECTION).seed(&records).await.unwrap();

    let docs = store.documents(COLLECTION);
    assert_eq!(
        docs[0].get("loyalty_status"),
        Some(&Bson::String("Platinum".to_string()))
    );
}

#[tokio::test]
async fn test_seeders_share_an_explicit_store() {
    let store = MemoryStore::new();

    Seeder::new(&store, "a").seed(&customer_preferences()).await.unwrap();
    Seeder::new(&store, "b").seed(&customer_preferences()[..1]).await.unwrap();

    assert_eq!(store.collection_names(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(store.count_documents("a").await.unwrap(), 3);
    assert_eq!(store.count_documents("b").await.unwrap(), 1);
}
