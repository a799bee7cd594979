use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::ListingDataset;

// ---------------------------------------------------------------------------
// Central-tendency policy
// ---------------------------------------------------------------------------

/// Which statistic summarizes price-per-square-meter within a day.
/// One flag instead of parallel median/mean pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CentralTendency {
    #[default]
    Median,
    Mean,
}

impl CentralTendency {
    pub fn label(&self) -> &'static str {
        match self {
            CentralTendency::Median => "Median",
            CentralTendency::Mean => "Mean",
        }
    }

    /// Apply the statistic to a group's prices. `None` for an empty slice
    /// (groups are only formed from existing rows, so this is unreachable
    /// from `summarize`).
    fn apply(&self, values: &mut [f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            CentralTendency::Mean => {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
            CentralTendency::Median => {
                values.sort_by(|a, b| a.total_cmp(b));
                let mid = values.len() / 2;
                if values.len() % 2 == 1 {
                    Some(values[mid])
                } else {
                    Some((values[mid - 1] + values[mid]) / 2.0)
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DailySummary – one row per distinct snapshot date
// ---------------------------------------------------------------------------

/// One aggregated row: all listings sharing a snapshot date.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub time: NaiveDate,
    /// Number of active listings on that date.
    pub count: usize,
    /// Median or mean price per square meter on that date.
    pub central_price: f64,
}

/// The per-date aggregation of one filtered category, ascending by time.
/// Time ordering is what the YoY positional lookback relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySummary {
    pub rows: Vec<SummaryRow>,
}

impl DailySummary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The count column as a plain series, for charting.
    pub fn counts(&self) -> Vec<(NaiveDate, f64)> {
        self.rows.iter().map(|r| (r.time, r.count as f64)).collect()
    }

    /// The central-price column as a plain series, for charting.
    pub fn central_prices(&self) -> Vec<(NaiveDate, f64)> {
        self.rows.iter().map(|r| (r.time, r.central_price)).collect()
    }
}

/// Group the selected records by snapshot date and aggregate each group.
///
/// `indices` selects the rows that passed the filter stage. The BTreeMap
/// grouping guarantees the ascending time order of the output. An empty
/// selection produces an empty summary.
pub fn summarize(
    dataset: &ListingDataset,
    indices: &[usize],
    statistic: CentralTendency,
) -> DailySummary {
    let mut groups: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for &i in indices {
        let rec = &dataset.records[i];
        groups
            .entry(rec.time)
            .or_default()
            .push(rec.price_per_square_m);
    }

    let rows = groups
        .into_iter()
        .filter_map(|(time, mut prices)| {
            let count = prices.len();
            statistic.apply(&mut prices).map(|central_price| SummaryRow {
                time,
                count,
                central_price,
            })
        })
        .collect();

    DailySummary { rows }
}
