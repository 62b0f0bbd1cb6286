// src/fixture.rs
//! Seed datasets: the built-in customer preferences and fixture files.
//!
//! A fixture file holds records with the four document fields. Dates are
//! written as `YYYY-MM-DD` or RFC 3339 strings.
//!
//! ```yaml
//! - customer_email: johndoe@example.com
//!   preference: Electronics
//!   loyalty_status: Gold
//!   last_updated: 2024-09-01
//! ```

use crate::error::SeedError;
use crate::record::{parse_date, LoyaltyStatus, PreferenceRecord};
use bson::DateTime;
use chrono::{TimeZone, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_DATABASE: &str = "mydatabase";
pub const DEFAULT_COLLECTION: &str = "customer_preferences";

/// The three customer preference records seeded when no fixture is given.
pub fn customer_preferences() -> Vec<PreferenceRecord> {
    vec![
        PreferenceRecord::new(
            "johndoe@example.com",
            "Electronics",
            LoyaltyStatus::Gold,
            day(2024, 9, 1),
        ),
        PreferenceRecord::new(
            "janesmith@example.com",
            "Books",
            LoyaltyStatus::Silver,
            day(2024, 9, 2),
        ),
        PreferenceRecord::new(
            "bobjohnson@example.com",
            "Clothing",
            LoyaltyStatus::Bronze,
            day(2024, 9, 3),
        ),
    ]
}

fn day(year: i32, month: u32, day: u32) -> DateTime {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .map(DateTime::from_chrono)
        .unwrap_or(DateTime::MIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    Json,
    Yaml,
    Csv,
}

impl FixtureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(FixtureFormat::Json),
            "yaml" | "yml" => Some(FixtureFormat::Yaml),
            "csv" => Some(FixtureFormat::Csv),
            _ => None,
        }
    }
}

/// A record as written in a fixture file, before date parsing.
#[derive(Debug, Deserialize)]
struct FixtureRow {
    customer_email: String,
    preference: String,
    loyalty_status: String,
    last_updated: String,
}

impl FixtureRow {
    fn into_record(self) -> Result<PreferenceRecord, String> {
        let last_updated = parse_date(&self.last_updated)?;
        Ok(PreferenceRecord::new(
            self.customer_email,
            self.preference,
            self.loyalty_status,
            last_updated,
        ))
    }
}

/// Loads the records of a fixture file, choosing the format by extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<PreferenceRecord>, SeedError> {
    let path = path.as_ref();
    let format = FixtureFormat::from_path(path).ok_or_else(|| {
        SeedError::fixture(path, "unsupported extension, expected .json, .yaml, .yml or .csv")
    })?;
    debug!("Loading {:?} fixture from {}", format, path.display());

    let rows = match format {
        FixtureFormat::Json => {
            let reader = BufReader::new(File::open(path).map_err(|e| SeedError::fixture(path, e))?);
            serde_json::from_reader::<_, Vec<FixtureRow>>(reader)
                .map_err(|e| SeedError::fixture(path, e))?
        }
        FixtureFormat::Yaml => {
            let text = std::fs::read_to_string(path).map_err(|e| SeedError::fixture(path, e))?;
            serde_yaml::from_str::<Vec<FixtureRow>>(&text).map_err(|e| SeedError::fixture(path, e))?
        }
        FixtureFormat::Csv => return load_csv(path),
    };

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.into_record()
                .map_err(|e| SeedError::fixture(path, format!("record {}: {}", i, e)))
        })
        .collect()
}

fn load_csv(path: &Path) -> Result<Vec<PreferenceRecord>, SeedError> {
    let file = File::open(path).map_err(|e| SeedError::fixture(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize::<FixtureRow>().enumerate() {
        // header is row 1
        let row_num = i + 2;
        let row = result.map_err(|e| SeedError::fixture(path, format!("row {}: {}", row_num, e)))?;
        let record = row
            .into_record()
            .map_err(|e| SeedError::fixture(path, format!("row {}: {}", row_num, e)))?;
        records.push(record);
    }
    Ok(records)
}
