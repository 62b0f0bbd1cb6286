mod cli;

use crate::cli::Cli;
use anyhow::Result;
use bson::Bson;
use clap::Parser;
use mongoseed::store::{connect, DocumentStore, MemoryStore};
use mongoseed::{fixture, seeder, CollectionPolicy, PreferenceRecord, Seeder};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let records: Vec<PreferenceRecord> = match &args.fixture {
        Some(path) => fixture::load(path)?,
        None => fixture::customer_preferences(),
    };
    info!("Loaded {} records", records.len());

    let policy = if args.strict_create {
        CollectionPolicy::Strict
    } else {
        CollectionPolicy::Ignore
    };

    if args.validate_only {
        seeder::validate(&records)?;
        println!("✅ {} records are valid.", records.len());
        return Ok(());
    }

    if args.dry_run {
        let store = MemoryStore::new();
        let seeder = Seeder::new(&store, &args.collection)
            .with_policy(policy)
            .with_batch_size(args.batch_size);
        seeder.seed(&records).await?;

        for (i, doc) in store.documents(&args.collection).into_iter().enumerate() {
            println!("Record {}: {}", i, Bson::Document(doc).into_relaxed_extjson());
        }
        println!("✅ Dry run complete, nothing was written.");
        return Ok(());
    }

    let db = connect(&args.mongo_uri, &args.db).await?;
    let seeder = Seeder::new(&db, &args.collection)
        .with_policy(policy)
        .with_batch_size(args.batch_size);
    let report = seeder.seed(&records).await?;
    let total = db.count_documents(&report.collection).await?;

    info!(
        collection = %report.collection,
        created = report.created,
        inserted = report.inserted,
        total,
        "Seed completed"
    );
    println!("✅ Seeded {} records into {}.{}", report.inserted, args.db, report.collection);
    Ok(())
}
