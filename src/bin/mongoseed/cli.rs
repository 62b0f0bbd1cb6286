use clap::Parser;
use mongoseed::fixture::{DEFAULT_COLLECTION, DEFAULT_DATABASE};
use std::path::PathBuf;

/// CLI arguments for mongoseed
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    /// Database name
    #[arg(long, env = "MONGODB_DATABASE", default_value = DEFAULT_DATABASE)]
    pub db: String,

    /// Collection to seed
    #[arg(long, env = "SEED_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Fixture file (.json, .yaml, .yml or .csv) to seed instead of the built-in records
    #[arg(long, env = "SEED_FIXTURE")]
    pub fixture: Option<PathBuf>,

    /// Documents per insert call, 0 sends everything at once
    #[arg(long, default_value_t = 0)]
    pub batch_size: usize,

    /// Fail if the collection already exists
    #[arg(long, default_value_t = false)]
    pub strict_create: bool,

    /// Seed an in-memory store and print the documents instead of writing to MongoDB
    #[arg(long)]
    pub dry_run: bool,

    /// Load and validate the records without touching any store
    #[arg(long)]
    pub validate_only: bool,

    #[arg(long)]
    pub debug: bool,
}
