//! Data shaping for chart rendering
//!
//! Two transformations over a reading table: resampling to one-per-day
//! mean values, and exact-value occurrence counts.

use chrono::NaiveDate;
use gasmon_common::ReadingTable;
use std::collections::HashMap;
use tracing::debug;

/// Readings strictly above this value are flagged as high
pub const HIGH_THRESHOLD: i64 = 150;

/// Whether a reading value counts as high under the fixed threshold rule
pub fn is_high_reading(value: i64) -> bool {
    value > HIGH_THRESHOLD
}

/// Mean of all readings on one calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub mean: f64,
}

/// Daily means in ascending date order, one entry per day with readings
pub type DailySeries = Vec<DailyPoint>;

/// Resample a reading table to per-day arithmetic means.
///
/// Days are taken in each timestamp's own UTC offset. Days without readings
/// do not appear in the output.
pub fn daily_mean(table: &ReadingTable) -> DailySeries {
    let mut sums: HashMap<NaiveDate, (i64, u32)> = HashMap::new();

    for reading in table.iter() {
        let date = reading.timestamp.date_naive();
        let entry = sums.entry(date).or_insert((0, 0));
        entry.0 += reading.value;
        entry.1 += 1;
    }

    let mut series: DailySeries = sums
        .into_iter()
        .map(|(date, (sum, count))| DailyPoint {
            date,
            mean: sum as f64 / count as f64,
        })
        .collect();

    series.sort_by_key(|point| point.date);

    debug!("Resampled {} readings into {} days", table.len(), series.len());
    series
}

/// Exact-value occurrence counts over a reading table
///
/// Values are not binned. Label order is the order each distinct value was
/// first observed, so labels and counts stay paired for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueHistogram {
    labels: Vec<i64>,
    counts: HashMap<i64, u64>,
}

impl ValueHistogram {
    /// Count value occurrences across all readings in the table
    pub fn from_table(table: &ReadingTable) -> Self {
        let mut labels = Vec::new();
        let mut counts: HashMap<i64, u64> = HashMap::new();

        for value in table.values() {
            let count = counts.entry(value).or_insert(0);
            if *count == 0 {
                labels.push(value);
            }
            *count += 1;
        }

        debug!(
            "Counted {} distinct values over {} readings",
            labels.len(),
            table.len()
        );
        Self { labels, counts }
    }

    /// Distinct values in first-observed order
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Occurrence count for one value
    pub fn count_of(&self, value: i64) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Counts aligned with `labels()`
    pub fn counts(&self) -> Vec<u64> {
        self.labels.iter().map(|v| self.counts[v]).collect()
    }

    /// Iterate `(value, count)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.labels.iter().map(move |v| (*v, self.counts[v]))
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no values were counted
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}
