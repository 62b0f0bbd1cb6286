// src/record.rs
//! The customer preference document and its BSON encoding.

use bson::{DateTime, Document};
use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loyalty tier of a customer. The set is open: unknown tiers are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoyaltyStatus {
    Gold,
    Silver,
    Bronze,
    Other(String),
}

impl LoyaltyStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LoyaltyStatus::Gold => "Gold",
            LoyaltyStatus::Silver => "Silver",
            LoyaltyStatus::Bronze => "Bronze",
            LoyaltyStatus::Other(s) => s,
        }
    }
}

impl From<String> for LoyaltyStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Gold" => LoyaltyStatus::Gold,
            "Silver" => LoyaltyStatus::Silver,
            "Bronze" => LoyaltyStatus::Bronze,
            _ => LoyaltyStatus::Other(value),
        }
    }
}

impl From<&str> for LoyaltyStatus {
    fn from(value: &str) -> Self {
        LoyaltyStatus::from(value.to_string())
    }
}

impl From<LoyaltyStatus> for String {
    fn from(status: LoyaltyStatus) -> Self {
        match status {
            LoyaltyStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LoyaltyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One document of the `customer_preferences` collection.
///
/// Field order here is the field order of the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub customer_email: String,
    pub preference: String,
    pub loyalty_status: LoyaltyStatus,
    pub last_updated: DateTime,
}

impl PreferenceRecord {
    pub fn new(
        customer_email: impl Into<String>,
        preference: impl Into<String>,
        loyalty_status: impl Into<LoyaltyStatus>,
        last_updated: DateTime,
    ) -> Self {
        Self {
            customer_email: customer_email.into(),
            preference: preference.into(),
            loyalty_status: loyalty_status.into(),
            last_updated,
        }
    }

    /// Checks the constraints enforced before a record reaches the store.
    pub fn validate(&self) -> Result<(), String> {
        if self.customer_email.trim().is_empty() {
            return Err("customer_email must not be empty".to_string());
        }
        Ok(())
    }

    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }

    #[cfg(test)]
    pub(crate) fn last_updated_rfc3339(&self) -> String {
        self.last_updated.try_to_rfc3339_string().unwrap()
    }
}

/// Parses `YYYY-MM-DD` as midnight UTC, or a full RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Result<DateTime, String> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("'{}' is not a valid date", value))?;
        return Ok(DateTime::from_chrono(Utc.from_utc_datetime(&midnight)));
    }
    DateTime::parse_rfc3339_str(value)
        .map_err(|_| format!("'{}' is neither YYYY-MM-DD nor RFC 3339", value))
}
