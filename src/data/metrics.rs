use chrono::NaiveDate;

use super::summary::DailySummary;

// ---------------------------------------------------------------------------
// Year-over-year change
// ---------------------------------------------------------------------------

/// Rows looked back for the year-over-year comparison. The offset is
/// positional in the time-ordered series, not a calendar lookback: with
/// gap-free daily data the two coincide.
pub const YOY_OFFSET: usize = 365;

/// Percentage change of each value against the value `YOY_OFFSET` rows
/// earlier. `None` where no prior row exists or the prior value is zero
/// or non-finite.
pub fn yoy_series(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i < YOY_OFFSET {
                return None;
            }
            let prior = values[i - YOY_OFFSET];
            if prior == 0.0 || !prior.is_finite() || !v.is_finite() {
                return None;
            }
            Some((v - prior) / prior * 100.0)
        })
        .collect()
}

/// YoY of a dated series, keeping only the rows where the change is
/// defined. Chart-ready.
pub fn yoy_of(series: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, f64)> {
    let values: Vec<f64> = series.iter().map(|&(_, v)| v).collect();
    series
        .iter()
        .zip(yoy_series(&values))
        .filter_map(|(&(time, _), change)| change.map(|c| (time, c)))
        .collect()
}

// ---------------------------------------------------------------------------
// Rental yield
// ---------------------------------------------------------------------------

/// Annualized rental yield per date, as a percentage:
/// `(rent_central * 12 / sale_central) * 100`.
///
/// Inner join on the snapshot date: a date present in only one summary
/// produces no row. A zero or non-finite sale price skips the row
/// instead of faulting.
pub fn yield_series(sale: &DailySummary, rent: &DailySummary) -> Vec<(NaiveDate, f64)> {
    let mut out = Vec::new();
    let mut sale_rows = sale.rows.iter().peekable();

    // Both summaries are ascending by time, so a merge walk suffices.
    for rent_row in &rent.rows {
        while sale_rows
            .peek()
            .is_some_and(|s| s.time < rent_row.time)
        {
            sale_rows.next();
        }
        let Some(sale_row) = sale_rows.peek() else {
            break;
        };
        if sale_row.time != rent_row.time {
            continue;
        }
        let denom = sale_row.central_price;
        if denom == 0.0 || !denom.is_finite() || !rent_row.central_price.is_finite() {
            continue;
        }
        out.push((
            rent_row.time,
            rent_row.central_price * 12.0 / denom * 100.0,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::summary::SummaryRow;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(n as u64)
    }

    fn summary(rows: &[(i64, f64)]) -> DailySummary {
        DailySummary {
            rows: rows
                .iter()
                .map(|&(n, price)| SummaryRow {
                    time: day(n),
                    count: 1,
                    central_price: price,
                })
                .collect(),
        }
    }

    #[test]
    fn yoy_is_missing_before_the_offset() {
        let values: Vec<f64> = (0..YOY_OFFSET).map(|i| i as f64 + 1.0).collect();
        let yoy = yoy_series(&values);
        assert!(yoy.iter().all(Option::is_none));
    }

    #[test]
    fn yoy_exact_change() {
        let mut values = vec![100.0; YOY_OFFSET];
        values.push(110.0);
        let yoy = yoy_series(&values);
        assert_eq!(yoy[YOY_OFFSET], Some(10.0));
    }

    #[test]
    fn yoy_zero_prior_is_missing_not_a_fault() {
        let mut values = vec![0.0; YOY_OFFSET];
        values.push(50.0);
        let yoy = yoy_series(&values);
        assert_eq!(yoy[YOY_OFFSET], None);
    }

    #[test]
    fn yoy_of_drops_undefined_rows() {
        let series: Vec<(NaiveDate, f64)> =
            (0..=YOY_OFFSET as i64).map(|n| (day(n), 100.0)).collect();
        let yoy = yoy_of(&series);
        assert_eq!(yoy, vec![(day(YOY_OFFSET as i64), 0.0)]);
    }

    #[test]
    fn yield_formula() {
        let sale = summary(&[(0, 1000.0)]);
        let rent = summary(&[(0, 5.0)]);
        let y = yield_series(&sale, &rent);
        assert_eq!(y, vec![(day(0), 6.0)]);
    }

    #[test]
    fn yield_is_an_inner_join_on_time() {
        let sale = summary(&[(0, 1000.0), (1, 1000.0), (3, 1000.0)]);
        let rent = summary(&[(1, 5.0), (2, 5.0), (3, 10.0)]);
        let y = yield_series(&sale, &rent);
        assert_eq!(y, vec![(day(1), 6.0), (day(3), 12.0)]);
    }

    #[test]
    fn yield_skips_zero_sale_price() {
        let sale = summary(&[(0, 0.0), (1, 1000.0)]);
        let rent = summary(&[(0, 5.0), (1, 5.0)]);
        let y = yield_series(&sale, &rent);
        assert_eq!(y, vec![(day(1), 6.0)]);
    }

    #[test]
    fn yield_of_disjoint_series_is_empty() {
        let sale = summary(&[(0, 1000.0)]);
        let rent = summary(&[(1, 5.0)]);
        assert!(yield_series(&sale, &rent).is_empty());
    }
}
