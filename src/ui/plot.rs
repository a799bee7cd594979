use chrono::NaiveDate;
use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints};

// ---------------------------------------------------------------------------
// Time-series line chart (central panel)
// ---------------------------------------------------------------------------

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch date")
}

fn epoch_days(date: NaiveDate) -> f64 {
    date.signed_duration_since(epoch()).num_days() as f64
}

fn date_label(days: f64) -> String {
    epoch()
        .checked_add_signed(chrono::Duration::days(days.round() as i64))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("{days:.0}"))
}

/// Render one per-date metric series as a line chart. An empty series
/// renders an empty plot area (no data is not an error).
pub fn time_series_plot(
    ui: &mut Ui,
    id: &str,
    series_name: &str,
    series: &[(NaiveDate, f64)],
    color: Color32,
) {
    let points: PlotPoints = series
        .iter()
        .map(|&(date, value)| [epoch_days(date), value])
        .collect();

    let name = series_name.to_string();

    Plot::new(id)
        .height(240.0)
        .legend(egui_plot::Legend::default())
        .x_axis_formatter(|mark, _range| date_label(mark.value))
        .label_formatter(move |_, value| {
            format!("{}\n{}: {:.2}", date_label(value.x), name, value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name(series_name)
                    .color(color)
                    .width(1.5),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(date_label(epoch_days(date)), "2024-03-01");
    }
}
