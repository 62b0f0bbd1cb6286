//! Seed MongoDB collections with customer preference records.
//!
//! ```rust,ignore
//! use mongoseed::{fixture, store, Seeder};
//!
//! let db = store::connect("mongodb://localhost:27017", "mydatabase").await?;
//! let report = Seeder::new(&db, "customer_preferences")
//!     .seed(&fixture::customer_preferences())
//!     .await?;
//! ```

pub mod error;
pub mod fixture;
pub mod record;
pub mod seeder;
pub mod store;

pub use error::SeedError;
pub use record::{LoyaltyStatus, PreferenceRecord};
pub use seeder::{CollectionPolicy, SeedReport, Seeder};
pub use store::{DocumentStore, MemoryStore};
