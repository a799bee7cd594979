use super::model::ListingDataset;

// ---------------------------------------------------------------------------
// Filter criteria: region selection plus three inclusive ranges
// ---------------------------------------------------------------------------

/// Region selection for the sidebar combo box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    /// The "All regions" sentinel: no region constraint.
    #[default]
    All,
    /// Exact match on one region label.
    Region(String),
}

impl RegionFilter {
    pub fn label(&self) -> &str {
        match self {
            RegionFilter::All => "All regions",
            RegionFilter::Region(name) => name,
        }
    }
}

/// Fixed slider bounds, matching the source data's value ranges.
pub const MAX_FLOOR: u32 = 23;
pub const MAX_ROOMS: u32 = 6;
pub const MAX_SIZE: u32 = 250;

/// The user's current filter selections. All bounds are inclusive.
/// The sliders keep min ≤ max; a violated range simply matches no rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub region: RegionFilter,
    pub floor: (u32, u32),
    pub rooms: (u32, u32),
    pub square_m: (u32, u32),
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            region: RegionFilter::All,
            floor: (1, MAX_FLOOR),
            rooms: (1, MAX_ROOMS),
            square_m: (1, MAX_SIZE),
        }
    }
}

/// Return indices of records that pass all four predicates.
///
/// The predicates are conjunctive and side-effect free; the same
/// criteria are applied to the sale and rent datasets independently.
pub fn filtered_indices(dataset: &ListingDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            let region_ok = match &criteria.region {
                RegionFilter::All => true,
                RegionFilter::Region(name) => rec.region == *name,
            };
            region_ok
                && rec.floor >= criteria.floor.0
                && rec.floor <= criteria.floor.1
                && rec.rooms >= criteria.rooms.0
                && rec.rooms <= criteria.rooms.1
                && rec.square_m >= criteria.square_m.0 as f64
                && rec.square_m <= criteria.square_m.1 as f64
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ListingDataset, ListingRecord};
    use chrono::NaiveDate;

    fn rec(region: &str, floor: u32, rooms: u32, square_m: f64) -> ListingRecord {
        ListingRecord {
            time: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            region: region.to_string(),
            floor,
            rooms,
            square_m,
            price_per_square_m: 1500.0,
        }
    }

    fn dataset() -> ListingDataset {
        ListingDataset::from_records(vec![
            rec("Centre", 2, 3, 55.0),
            rec("Centre", 12, 2, 40.0),
            rec("Teika", 5, 4, 88.0),
            rec("Teika", 1, 1, 28.0),
            rec("Purvciems", 9, 3, 62.0),
        ])
    }

    #[test]
    fn all_regions_with_full_ranges_keeps_everything() {
        let ds = dataset();
        let idx = filtered_indices(&ds, &FilterCriteria::default());
        assert_eq!(idx, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn region_match_is_exact() {
        let ds = dataset();
        let criteria = FilterCriteria {
            region: RegionFilter::Region("Teika".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![2, 3]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = dataset();
        let criteria = FilterCriteria {
            floor: (5, 9),
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![2, 4]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = dataset();
        let criteria = FilterCriteria {
            region: RegionFilter::Region("Centre".to_string()),
            square_m: (45, 250),
            ..FilterCriteria::default()
        };
        let once = filtered_indices(&ds, &criteria);
        let narrowed = ListingDataset::from_records(
            once.iter().map(|&i| ds.records[i].clone()).collect(),
        );
        let twice = filtered_indices(&narrowed, &criteria);
        assert_eq!(twice.len(), once.len());
        for (j, &i) in once.iter().enumerate() {
            assert_eq!(narrowed.records[twice[j]], ds.records[i]);
        }
    }

    #[test]
    fn predicates_commute() {
        let ds = dataset();
        let by_region = FilterCriteria {
            region: RegionFilter::Region("Centre".to_string()),
            ..FilterCriteria::default()
        };
        let by_floor = FilterCriteria {
            floor: (1, 10),
            ..FilterCriteria::default()
        };
        let both = FilterCriteria {
            region: RegionFilter::Region("Centre".to_string()),
            floor: (1, 10),
            ..FilterCriteria::default()
        };

        // region-then-floor == floor-then-region == both-at-once
        let region_first: Vec<&ListingRecord> = filtered_indices(&ds, &by_region)
            .into_iter()
            .map(|i| &ds.records[i])
            .filter(|r| r.floor >= 1 && r.floor <= 10)
            .collect();
        let floor_first: Vec<&ListingRecord> = filtered_indices(&ds, &by_floor)
            .into_iter()
            .map(|i| &ds.records[i])
            .filter(|r| r.region == "Centre")
            .collect();
        let combined: Vec<&ListingRecord> = filtered_indices(&ds, &both)
            .into_iter()
            .map(|i| &ds.records[i])
            .collect();

        assert_eq!(region_first, floor_first);
        assert_eq!(region_first, combined);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let ds = dataset();
        let criteria = FilterCriteria {
            rooms: (5, 2),
            ..FilterCriteria::default()
        };
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let ds = dataset();
        let criteria = FilterCriteria {
            region: RegionFilter::Region("Agenskalns".to_string()),
            ..FilterCriteria::default()
        };
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }
}
