use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ListingRecord – one advertisement snapshot (one row of a shard file)
// ---------------------------------------------------------------------------

/// A single apartment listing as captured in a daily snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Snapshot date of the advertisement.
    pub time: NaiveDate,
    /// City region label.
    pub region: String,
    /// Floor the apartment is on.
    pub floor: u32,
    /// Number of rooms.
    pub rooms: u32,
    /// Apartment size in square meters.
    pub square_m: f64,
    /// Asking price divided by size, computed upstream.
    pub price_per_square_m: f64,
}

// ---------------------------------------------------------------------------
// ListingDataset – all records of one category (sale or rent)
// ---------------------------------------------------------------------------

/// The concatenated records of one listing category, with the region
/// index precomputed for the selector widget.
#[derive(Debug, Clone, Default)]
pub struct ListingDataset {
    /// All records, in shard order.
    pub records: Vec<ListingRecord>,
    /// Regions observed in the records, most listings first.
    pub regions: Vec<String>,
}

impl ListingDataset {
    /// Build the region index from the loaded records.
    pub fn from_records(records: Vec<ListingRecord>) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for rec in &records {
            *counts.entry(rec.region.as_str()).or_default() += 1;
        }

        // Descending by count, name as tie-breaker for a stable order.
        let mut regions: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, n)| (name.to_string(), n))
            .collect();
        regions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        ListingDataset {
            records,
            regions: regions.into_iter().map(|(name, _)| name).collect(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MarketData – the sale/rent dataset pair for one session
// ---------------------------------------------------------------------------

/// Both listing categories, loaded once per session and cached.
/// Sale and rent rows are never merged; only their per-date summaries
/// are combined (for the yield series).
#[derive(Debug, Clone)]
pub struct MarketData {
    pub sale: ListingDataset,
    pub rent: ListingDataset,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(region: &str) -> ListingRecord {
        ListingRecord {
            time: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            region: region.to_string(),
            floor: 2,
            rooms: 2,
            square_m: 50.0,
            price_per_square_m: 1000.0,
        }
    }

    #[test]
    fn regions_ordered_by_listing_count() {
        let ds = ListingDataset::from_records(vec![
            rec("Centre"),
            rec("Teika"),
            rec("Teika"),
            rec("Purvciems"),
            rec("Teika"),
            rec("Purvciems"),
        ]);
        assert_eq!(ds.regions, vec!["Teika", "Purvciems", "Centre"]);
    }

    #[test]
    fn empty_dataset_has_no_regions() {
        let ds = ListingDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.regions.is_empty());
    }
}
