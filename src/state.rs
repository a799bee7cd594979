use chrono::NaiveDate;

use crate::color::SeriesColors;
use crate::data::filter::{FilterCriteria, filtered_indices};
use crate::data::metrics::{yield_series, yoy_of};
use crate::data::model::MarketData;
use crate::data::summary::{CentralTendency, DailySummary, summarize};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Sale,
    Rent,
    Yields,
    About,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Sale, Tab::Rent, Tab::Yields, Tab::About];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Sale => "FOR SALE",
            Tab::Rent => "FOR RENT",
            Tab::Yields => "YIELDS",
            Tab::About => "ABOUT THE APP",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The raw datasets are loaded once per session and cached here; every
/// filter or config change re-runs the pipeline from the filter stage
/// onward via [`AppState::recompute`].
pub struct AppState {
    /// Loaded sale + rent datasets (None until a data folder is opened).
    pub data: Option<MarketData>,

    /// Current sidebar selections.
    pub criteria: FilterCriteria,

    /// Median or mean price-per-square-meter aggregation.
    pub statistic: CentralTendency,

    /// Whether the year-over-year charts are shown.
    pub show_yoy: bool,

    /// Selected central-panel tab.
    pub active_tab: Tab,

    // -- pipeline outputs, recomputed on every filter/config change --
    pub sale_summary: DailySummary,
    pub rent_summary: DailySummary,
    pub sale_price_yoy: Vec<(NaiveDate, f64)>,
    pub rent_price_yoy: Vec<(NaiveDate, f64)>,
    pub yields: Vec<(NaiveDate, f64)>,
    pub yield_yoy: Vec<(NaiveDate, f64)>,

    /// Rows passing the filter, per category (top-bar label).
    pub sale_visible: usize,
    pub rent_visible: usize,

    /// Per-series chart colours.
    pub colors: SeriesColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a folder loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data: None,
            criteria: FilterCriteria::default(),
            statistic: CentralTendency::default(),
            show_yoy: false,
            active_tab: Tab::default(),
            sale_summary: DailySummary::default(),
            rent_summary: DailySummary::default(),
            sale_price_yoy: Vec::new(),
            rent_price_yoy: Vec::new(),
            yields: Vec::new(),
            yield_yoy: Vec::new(),
            sale_visible: 0,
            rent_visible: 0,
            colors: SeriesColors::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest freshly loaded data, reset the filters, run the pipeline.
    pub fn set_market_data(&mut self, data: MarketData) {
        self.criteria = FilterCriteria::default();
        self.data = Some(data);
        self.status_message = None;
        self.loading = false;
        self.recompute();
    }

    /// Re-run filter → aggregation → derived metrics for both categories.
    /// The same criteria are applied to sale and rent alike.
    pub fn recompute(&mut self) {
        let Some(data) = &self.data else {
            return;
        };

        let sale_idx = filtered_indices(&data.sale, &self.criteria);
        let rent_idx = filtered_indices(&data.rent, &self.criteria);
        self.sale_visible = sale_idx.len();
        self.rent_visible = rent_idx.len();

        self.sale_summary = summarize(&data.sale, &sale_idx, self.statistic);
        self.rent_summary = summarize(&data.rent, &rent_idx, self.statistic);

        self.sale_price_yoy = yoy_of(&self.sale_summary.central_prices());
        self.rent_price_yoy = yoy_of(&self.rent_summary.central_prices());

        self.yields = yield_series(&self.sale_summary, &self.rent_summary);
        self.yield_yoy = yoy_of(&self.yields);
    }

    /// Switch the central-tendency statistic and re-aggregate.
    pub fn set_statistic(&mut self, statistic: CentralTendency) {
        if self.statistic != statistic {
            self.statistic = statistic;
            self.recompute();
        }
    }

    /// Regions for the selector: taken from the sale dataset, most
    /// listings first.
    pub fn region_choices(&self) -> Vec<String> {
        self.data
            .as_ref()
            .map(|d| d.sale.regions.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::RegionFilter;
    use crate::data::model::{ListingDataset, ListingRecord};

    fn rec(region: &str, floor: u32, rooms: u32, square_m: f64, price: f64) -> ListingRecord {
        ListingRecord {
            time: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            region: region.to_string(),
            floor,
            rooms,
            square_m,
            price_per_square_m: price,
        }
    }

    #[test]
    fn end_to_end_pipeline() {
        let data = MarketData {
            sale: ListingDataset::from_records(vec![
                rec("A", 2, 3, 50.0, 1000.0),
                rec("A", 5, 3, 60.0, 1200.0),
            ]),
            rent: ListingDataset::from_records(vec![rec("A", 2, 3, 50.0, 8.0)]),
        };

        let mut state = AppState::default();
        state.set_market_data(data);
        state.criteria.region = RegionFilter::Region("A".to_string());
        state.recompute();

        assert_eq!(state.sale_summary.rows.len(), 1);
        assert_eq!(state.sale_summary.rows[0].count, 2);
        assert_eq!(state.sale_summary.rows[0].central_price, 1100.0);

        assert_eq!(state.rent_summary.rows[0].count, 1);
        assert_eq!(state.rent_summary.rows[0].central_price, 8.0);

        assert_eq!(state.yields.len(), 1);
        let expected = 8.0 * 12.0 / 1100.0 * 100.0;
        assert!((state.yields[0].1 - expected).abs() < 1e-9);
        assert!((state.yields[0].1 - 87.27).abs() < 0.01);
    }

    #[test]
    fn empty_filter_result_propagates_cleanly() {
        let data = MarketData {
            sale: ListingDataset::from_records(vec![rec("A", 2, 3, 50.0, 1000.0)]),
            rent: ListingDataset::from_records(vec![rec("A", 2, 3, 50.0, 8.0)]),
        };

        let mut state = AppState::default();
        state.set_market_data(data);
        state.criteria.region = RegionFilter::Region("B".to_string());
        state.recompute();

        assert_eq!(state.sale_visible, 0);
        assert!(state.sale_summary.is_empty());
        assert!(state.rent_summary.is_empty());
        assert!(state.yields.is_empty());
        assert!(state.yield_yoy.is_empty());
    }

    #[test]
    fn statistic_switch_reaggregates() {
        let data = MarketData {
            sale: ListingDataset::from_records(vec![
                rec("A", 1, 1, 30.0, 10.0),
                rec("A", 2, 2, 40.0, 20.0),
                rec("A", 3, 3, 50.0, 100.0),
            ]),
            rent: ListingDataset::from_records(vec![rec("A", 1, 1, 30.0, 5.0)]),
        };

        let mut state = AppState::default();
        state.set_market_data(data);
        assert_eq!(state.sale_summary.rows[0].central_price, 20.0);

        state.set_statistic(CentralTendency::Mean);
        assert!((state.sale_summary.rows[0].central_price - 130.0 / 3.0).abs() < 1e-9);
    }
}
