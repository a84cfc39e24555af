//! Core data types for the gasmon service
//!
//! The wire types mirror the upstream ThingSpeak feed JSON; `ReadingTable`
//! is the parsed, request-scoped table every aggregation starts from.

use crate::error::{GasmonError, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// ============================================================================
// Upstream Feed Models
// ============================================================================

/// Response envelope for the channel feed endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedsResponse {
    /// Feed entries, oldest first as returned by the channel
    pub feeds: Vec<Feed>,
}

/// One upstream feed record: a timestamp and a sensor reading value
///
/// The channel carries the reading in `field1` as a numeric string.
/// Additional fields in the payload are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Feed {
    /// Reading timestamp, ISO-8601 with offset
    pub created_at: String,
    /// Sensor value as reported by the channel
    pub field1: Option<String>,
    /// Entry sequence number within the channel
    pub entry_id: Option<i64>,
}

// ============================================================================
// Reading Table
// ============================================================================

/// A single parsed sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Timestamp in the offset the upstream reported it with
    pub timestamp: DateTime<FixedOffset>,
    /// Integer sensor value
    pub value: i64,
}

/// Ordered table of readings, one row per feed record
///
/// Input order is preserved; timestamps need not be unique or sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingTable {
    readings: Vec<Reading>,
}

impl ReadingTable {
    /// Parse raw feed records into a reading table.
    ///
    /// Any record with a missing or non-integer value, or an unparseable
    /// timestamp, fails the whole conversion.
    pub fn from_feeds(feeds: &[Feed]) -> Result<Self> {
        let mut readings = Vec::with_capacity(feeds.len());

        for feed in feeds {
            let timestamp = DateTime::parse_from_rfc3339(&feed.created_at).map_err(|e| {
                GasmonError::malformed_data(format!(
                    "invalid timestamp '{}': {}",
                    feed.created_at, e
                ))
            })?;

            let raw_value = feed.field1.as_deref().ok_or_else(|| {
                GasmonError::malformed_data(format!(
                    "feed entry at {} has no value",
                    feed.created_at
                ))
            })?;

            let value: i64 = raw_value.trim().parse().map_err(|_| {
                GasmonError::malformed_data(format!(
                    "value '{}' at {} is not an integer",
                    raw_value, feed.created_at
                ))
            })?;

            readings.push(Reading { timestamp, value });
        }

        Ok(Self { readings })
    }

    /// Number of readings in the table
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the table holds no readings
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Iterate the readings in input order
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    /// Iterate the integer values in input order
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.readings.iter().map(|r| r.value)
    }

    /// Largest value in the table, if any
    pub fn max_value(&self) -> Option<i64> {
        self.values().max()
    }
}
