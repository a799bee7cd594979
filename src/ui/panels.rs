use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::SeriesKind;
use crate::data::filter::{MAX_FLOOR, MAX_ROOMS, MAX_SIZE, RegionFilter};
use crate::data::summary::{CentralTendency, DailySummary};
use crate::state::{AppState, Tab};
use crate::ui::plot::time_series_plot;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Any widget change re-runs the pipeline.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.data.is_none() {
        ui.label("No data loaded.");
        return;
    }

    let mut changed = false;

    // ---- Region selector ----
    ui.strong("Region");
    let regions = state.region_choices();
    egui::ComboBox::from_id_salt("region_select")
        .selected_text(state.criteria.region.label().to_string())
        .show_ui(ui, |ui: &mut Ui| {
            let all_selected = state.criteria.region == RegionFilter::All;
            if ui.selectable_label(all_selected, "All regions").clicked() {
                state.criteria.region = RegionFilter::All;
                changed = true;
            }
            for region in &regions {
                let selected =
                    state.criteria.region == RegionFilter::Region(region.clone());
                if ui.selectable_label(selected, region).clicked() {
                    state.criteria.region = RegionFilter::Region(region.clone());
                    changed = true;
                }
            }
        });
    ui.separator();

    // ---- Range selectors ----
    changed |= range_sliders(ui, "Floor", &mut state.criteria.floor, MAX_FLOOR);
    changed |= range_sliders(ui, "Room count", &mut state.criteria.rooms, MAX_ROOMS);
    changed |= range_sliders(
        ui,
        "Size (square meters)",
        &mut state.criteria.square_m,
        MAX_SIZE,
    );

    if changed {
        state.recompute();
    }
}

/// A min/max slider pair over `[1, max]`. Keeps the pair ordered by
/// dragging the other end along, so the core always sees min ≤ max.
fn range_sliders(ui: &mut Ui, label: &str, range: &mut (u32, u32), max: u32) -> bool {
    let mut changed = false;
    ui.strong(label);
    if ui
        .add(egui::Slider::new(&mut range.0, 1..=max).text("min"))
        .changed()
    {
        range.1 = range.1.max(range.0);
        changed = true;
    }
    if ui
        .add(egui::Slider::new(&mut range.1, 1..=max).text("max"))
        .changed()
    {
        range.0 = range.0.min(range.1);
        changed = true;
    }
    ui.separator();
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(data) = &state.data {
            ui.label(format!(
                "{} sale / {} rent listings, {} / {} matching",
                data.sale.len(),
                data.rent.len(),
                state.sale_visible,
                state.rent_visible,
            ));
            ui.separator();
        }

        for statistic in [CentralTendency::Median, CentralTendency::Mean] {
            if ui
                .selectable_label(state.statistic == statistic, statistic.label())
                .clicked()
            {
                state.set_statistic(statistic);
            }
        }

        ui.separator();

        if ui
            .selectable_label(state.show_yoy, "Year-over-year")
            .clicked()
        {
            state.show_yoy = !state.show_yoy;
        }

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – tabs
// ---------------------------------------------------------------------------

/// Render the tab bar and the active tab's charts.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.label())
                .clicked()
            {
                state.active_tab = tab;
            }
        }
    });
    ui.separator();

    if state.data.is_none() && state.active_tab != Tab::About {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data folder to view listings  (File → Open data folder…)");
        });
        return;
    }

    let state = &*state;
    match state.active_tab {
        Tab::Sale => listing_tab(
            ui,
            "Apartments for sale",
            "for sale",
            &state.sale_summary,
            &state.sale_price_yoy,
            state,
        ),
        Tab::Rent => listing_tab(
            ui,
            "Apartments for rent",
            "for rent",
            &state.rent_summary,
            &state.rent_price_yoy,
            state,
        ),
        Tab::Yields => yields_tab(ui, state),
        Tab::About => about_tab(ui),
    }
}

fn listing_tab(
    ui: &mut Ui,
    title: &str,
    noun: &str,
    summary: &DailySummary,
    price_yoy: &[(NaiveDate, f64)],
    state: &AppState,
) {
    let colors = &state.colors;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(title);
            if summary.is_empty() {
                ui.label("No listings match the current filters.");
            }
            ui.add_space(4.0);

            ui.strong("Number of Active Listings");
            ui.label(format!(
                "How many apartments were listed {noun} at particular dates"
            ));
            time_series_plot(
                ui,
                &format!("{noun}_count"),
                "active listings",
                &summary.counts(),
                colors.color_for(SeriesKind::Count),
            );
            ui.add_space(8.0);

            let stat = state.statistic.label().to_lowercase();
            ui.strong(format!("{} price per square meter", state.statistic.label()));
            ui.label(format!(
                "The {stat} price per square meter at particular dates"
            ));
            time_series_plot(
                ui,
                &format!("{noun}_price"),
                &format!("{stat} price per square meter"),
                &summary.central_prices(),
                colors.color_for(SeriesKind::CentralPrice),
            );

            if state.show_yoy {
                ui.add_space(8.0);
                ui.strong("Price change year-over-year (%)");
                ui.label(format!(
                    "Change of the {stat} price against its value one year of snapshots earlier"
                ));
                time_series_plot(
                    ui,
                    &format!("{noun}_price_yoy"),
                    "price change (%)",
                    price_yoy,
                    colors.color_for(SeriesKind::PriceYoy),
                );
            }
        });
}

fn yields_tab(ui: &mut Ui, state: &AppState) {
    let colors = &state.colors;
    let stat = state.statistic.label().to_lowercase();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Annual yield");
            ui.label(format!(
                "The annual yield of renting out an apartment, according to the {stat} \
                 rent and sale price per square meter. The formula is:"
            ));
            ui.label(format!(
                "({stat} rent price per square meter * 12)  /  {stat} sale price per square meter"
            ));
            time_series_plot(
                ui,
                "yield",
                "annual yield (%)",
                &state.yields,
                colors.color_for(SeriesKind::Yield),
            );

            if state.show_yoy {
                ui.add_space(8.0);
                ui.strong("Yield change year-over-year (%)");
                time_series_plot(
                    ui,
                    "yield_yoy",
                    "yield change (%)",
                    &state.yield_yoy,
                    colors.color_for(SeriesKind::YieldYoy),
                );
            }
        });
}

fn about_tab(ui: &mut Ui) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("About the app");
            ui.label(
                "This app provides a summarized overview of apartment listings. It shows \
                 the number of advertisements active at the end of each day, and the \
                 median (or mean) price per square meter for those listings.",
            );
            ui.label(
                "You can toggle between apartments for sale and for rent, and narrow the \
                 listings down by city region, apartment size, room count, and floor \
                 using the filters in the left sidebar. All charts update as soon as a \
                 filter changes.",
            );
            ui.label(
                "The data is read from snapshot shard files (sale_* and rent_*) in the \
                 opened data folder. New snapshots are appended at the end of each day.",
            );
        });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open listing data folder")
        .pick_folder();

    if let Some(dir) = folder {
        state.loading = true;
        match crate::data::loader::load_market_data(&dir) {
            Ok(data) => {
                log::info!(
                    "Loaded {} sale and {} rent records",
                    data.sale.len(),
                    data.rent.len()
                );
                state.set_market_data(data);
            }
            Err(e) => {
                log::error!("Failed to load data folder: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
